use thiserror::Error;

/// Error type shared by every storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    /// Write without overwrite hit an existing entry
    #[error("entry already exists and overwrite is disabled: {0}")]
    AlreadyExists(String),

    /// Read or delete of an absent entry
    #[error("entry not found: {0}")]
    NotFound(String),

    /// I/O failure against the underlying backend
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Whether the error is the caller's fault (no retry, 4xx mapping)
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::AlreadyExists(_) | Self::NotFound(_))
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_classified() {
        assert!(StorageError::AlreadyExists("a".into()).is_user_error());
        assert!(StorageError::NotFound("a".into()).is_user_error());
        assert!(!StorageError::Backend("disk on fire".into()).is_user_error());
    }
}
