//! High-score persistence collaborators
//!
//! The engine only ever stores a single integer. It loads it once when a session is
//! constructed and saves it every time the running score overtakes it.

use crate::io::error::{GameError, Result, file_system};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Storage medium for the persistent high score
pub trait HighScoreStore {
    /// Read the stored high score, returning 0 when nothing was stored yet
    ///
    /// # Errors
    ///
    /// Returns an error if the storage medium cannot be read or holds invalid data
    fn load_high_score(&mut self) -> Result<u64>;

    /// Replace the stored high score
    ///
    /// # Errors
    ///
    /// Returns an error if the storage medium cannot be written
    fn save_high_score(&mut self, value: u64) -> Result<()>;
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for Box<T> {
    fn load_high_score(&mut self) -> Result<u64> {
        (**self).load_high_score()
    }

    fn save_high_score(&mut self, value: u64) -> Result<()> {
        (**self).save_high_score(value)
    }
}

/// In-process store that also counts how often it was written
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: u64,
    saves: usize,
}

impl MemoryStore {
    /// Create a store holding an initial high score
    pub const fn new(value: u64) -> Self {
        Self { value, saves: 0 }
    }

    /// Currently stored value
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Number of saves performed since construction
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&mut self) -> Result<u64> {
        Ok(self.value)
    }

    fn save_high_score(&mut self, value: u64) -> Result<()> {
        self.value = value;
        self.saves += 1;
        Ok(())
    }
}

/// Store keeping the high score as a decimal integer in a text file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the file at `path`
    ///
    /// The file is not touched until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn load_high_score(&mut self) -> Result<u64> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(0),
            Err(error) => return Err(file_system(&self.path, "load high score", error)),
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }

        trimmed
            .parse::<u64>()
            .map_err(|_parse_error| GameError::CorruptHighScore {
                path: self.path.clone(),
                content: trimmed.to_string(),
            })
    }

    fn save_high_score(&mut self, value: u64) -> Result<()> {
        fs::write(&self.path, format!("{value}\n"))
            .map_err(|error| file_system(&self.path, "save high score", error))
    }
}
