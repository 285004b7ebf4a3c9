pub mod directories;
pub mod files;
pub mod health;

use crate::error::ApiError;
use std::path::{Component, Path};

/// Wildcard segments arrive without a leading slash but may still be empty,
/// slash-only or traversal attempts; every route rejects those before
/// touching storage.
pub(crate) fn require_path(path: &str) -> Result<&str, ApiError> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::Validation("path must not be empty".to_string()));
    }
    if Path::new(trimmed)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(ApiError::Validation(
            "path must not contain '..'".to_string(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_slash_only_paths_are_rejected() {
        assert!(require_path("").is_err());
        assert!(require_path("/").is_err());
        assert!(require_path("///").is_err());
        assert_eq!(require_path("a/b.txt").unwrap(), "a/b.txt");
        assert_eq!(require_path("/a/b.txt/").unwrap(), "a/b.txt");
    }

    #[test]
    fn parent_traversal_is_rejected() {
        assert!(require_path("../etc/passwd").is_err());
        assert!(require_path("a/../../b.txt").is_err());
        assert!(require_path("..").is_err());
    }
}
