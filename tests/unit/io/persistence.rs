//! Tests for the in-memory and file-backed high-score stores

#[cfg(test)]
mod tests {
    use std::fs;
    use tempfile::tempdir;
    use tilematch::GameError;
    use tilematch::io::persistence::{FileStore, HighScoreStore, MemoryStore};

    // Tests the memory store returns what was saved and counts saves
    // Verified by not counting saves
    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new(12);

        assert_eq!(store.load_high_score().expect("infallible"), 12);
        store.save_high_score(30).expect("infallible");
        store.save_high_score(45).expect("infallible");
        assert_eq!(store.load_high_score().expect("infallible"), 45);
        assert_eq!(store.saves(), 2);
    }

    // Tests a missing or empty file reads as zero
    // Verified by treating a missing file as an error
    #[test]
    fn test_file_store_missing_or_empty() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("high_score.txt");
        let mut store = FileStore::new(&path);

        assert_eq!(store.load_high_score().expect("missing file"), 0);
        fs::write(&path, "  \n").expect("write");
        assert_eq!(store.load_high_score().expect("empty file"), 0);
        assert_eq!(store.path(), path.as_path());
    }

    // Tests saved values survive a new store on the same file
    // Verified by writing the value without a trailing newline check
    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("high_score.txt");

        FileStore::new(&path).save_high_score(1234).expect("writable");

        assert_eq!(fs::read_to_string(&path).expect("read"), "1234\n");
        assert_eq!(FileStore::new(&path).load_high_score().expect("readable"), 1234);
    }

    // Tests unparsable content is reported with the offending text
    // Verified by defaulting corrupt content to zero
    #[test]
    fn test_file_store_corrupt_content() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("high_score.txt");
        fs::write(&path, "-5\n").expect("write");

        let result = FileStore::new(&path).load_high_score();

        assert!(matches!(
            result,
            Err(GameError::CorruptHighScore { ref content, .. }) if content == "-5"
        ));
    }

    // Tests I/O failures other than a missing file surface as file system errors
    // Verified by swallowing every read error
    #[test]
    fn test_file_store_io_failure() {
        let dir = tempdir().expect("temp dir");
        let mut store = FileStore::new(dir.path());

        assert!(matches!(
            store.load_high_score(),
            Err(GameError::FileSystem {
                operation: "load high score",
                ..
            })
        ));
        assert!(matches!(
            store.save_high_score(1),
            Err(GameError::FileSystem {
                operation: "save high score",
                ..
            })
        ));
    }

    // Tests boxed stores forward to the inner store
    // Verified by returning a constant from the boxed implementation
    #[test]
    fn test_boxed_store_forwards() {
        let mut store: Box<dyn HighScoreStore> = Box::new(MemoryStore::new(7));

        store.save_high_score(8).expect("infallible");
        assert_eq!(store.load_high_score().expect("infallible"), 8);
    }
}
