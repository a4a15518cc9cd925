//! Error types for filestash.

use thiserror::Error;

/// Common error type for filestash.
#[derive(Error, Debug)]
pub enum StashError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input (bad filename, disallowed file).
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for filestash operations.
pub type Result<T> = std::result::Result<T, StashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = StashError::Validation("file type not allowed".to_string());
        assert_eq!(err.to_string(), "validation error: file type not allowed");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = StashError::NotFound("File: photo.jpg".to_string());
        assert_eq!(err.to_string(), "File: photo.jpg not found");
    }

    #[test]
    fn test_config_error_display() {
        let err = StashError::Config("bad port".to_string());
        assert_eq!(err.to_string(), "configuration error: bad port");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StashError = io_err.into();
        assert!(matches!(err, StashError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(StashError::Validation("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
