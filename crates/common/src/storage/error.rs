//! Storage error types
//!
//! Errors raised by the coordinated cache files. Integrates with the common
//! error classification so callers can decide between falling back to a
//! default value and surfacing the failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Cache file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Cache file {0} is read-only")]
    ReadOnly(PathBuf),

    #[error("Failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

impl ErrorClassification for StorageError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Lock { .. } => true,
            Self::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Corrupt { .. } => ErrorSeverity::Warning,
            Self::ReadOnly(_) => ErrorSeverity::Info,
            Self::Lock { .. } => ErrorSeverity::Warning,
            Self::Io(_) => ErrorSeverity::Error,
            // Serializing our own types should never fail
            Self::SerdeJson(_) => ErrorSeverity::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_is_a_warning_not_retryable() {
        let err = StorageError::Corrupt { path: "cache.json".into(), message: "eof".into() };
        assert!(!err.is_retryable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(err.to_string().contains("cache.json"));
    }

    #[test]
    fn test_lock_failures_are_retryable() {
        let err = StorageError::Lock {
            path: "cache.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::WouldBlock),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_io_classification() {
        let interrupted = StorageError::from(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(interrupted.is_retryable());

        let denied = StorageError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(!denied.is_retryable());
        assert_eq!(denied.severity(), ErrorSeverity::Error);
    }
}
