//! Tests for error message formatting and source chaining

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::path::PathBuf;
    use tilematch::GameError;
    use tilematch::io::error::{invalid_parameter, precondition};

    // Tests precondition errors name the operation and reason
    // Verified by omitting the operation from the message
    #[test]
    fn test_precondition_message() {
        let message = precondition("swap", &"gameplay has no board").to_string();

        assert_eq!(message, "Precondition failed in swap: gameplay has no board");
    }

    // Tests invalid parameter errors contain all fields
    // Verified by omitting the value from the message
    #[test]
    fn test_invalid_parameter_message() {
        let error = invalid_parameter("grid_width", &0, &"must be between 1 and 1024");
        let message = error.to_string();

        assert!(message.contains("grid_width"));
        assert!(message.contains("'0'"));
        assert!(message.contains("must be between 1 and 1024"));
        assert!(error.source().is_none());
    }

    // Tests corrupt high score errors show the path and offending content
    // Verified by dropping the content from the message
    #[test]
    fn test_corrupt_high_score_message() {
        let error = GameError::CorruptHighScore {
            path: PathBuf::from("/var/games/high_score.txt"),
            content: "lots".to_string(),
        };
        let message = error.to_string();

        assert!(message.contains("/var/games/high_score.txt"));
        assert!(message.contains("\"lots\""));
    }

    // Tests file system errors chain their I/O source
    // Verified by breaking the source chain
    #[test]
    fn test_file_system_source_chain() {
        let error = GameError::FileSystem {
            path: "/tmp/score".into(),
            operation: "save high score",
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied"),
        };

        assert!(error.source().is_some());
        assert!(error.to_string().contains("access denied"));
    }
}
