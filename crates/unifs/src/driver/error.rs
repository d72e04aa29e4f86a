//! Storage driver error types.

use std::io;
use thiserror::Error;

/// Failure reported by a storage driver.
///
/// These are the documented failure modes of the driver boundary. The
/// adapters never inspect them beyond carrying them as the cause of an
/// [`FsError`](crate::FsError).
#[derive(Debug, Error)]
pub enum DriverError {
    /// Address does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Address already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Permission denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Expected a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Expected a file.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// Directory not empty.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// Address is not one this driver can interpret.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The driver returned fewer bytes than the requested range.
    #[error("short read at {address}: expected {expected} bytes, got {actual}")]
    ShortRead {
        address: String,
        expected: u64,
        actual: u64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl DriverError {
    /// Create a NotFound error.
    pub fn not_found(address: impl Into<String>) -> Self {
        Self::NotFound(address.into())
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(address: impl Into<String>) -> Self {
        Self::AlreadyExists(address.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(address: impl Into<String>) -> Self {
        Self::NotADirectory(address.into())
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(address: impl Into<String>) -> Self {
        Self::IsADirectory(address.into())
    }

    /// Create a DirectoryNotEmpty error.
    pub fn directory_not_empty(address: impl Into<String>) -> Self {
        Self::DirectoryNotEmpty(address.into())
    }

    /// Create an InvalidAddress error.
    pub fn invalid_address(address: impl Into<String>) -> Self {
        Self::InvalidAddress(address.into())
    }

    /// Create an Other error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns true if the failure means the address does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            DriverError::NotFound(_) => true,
            DriverError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Driver result type.
pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(DriverError::not_found("mem:/a").is_not_found());
        assert!(DriverError::Io(io::Error::from(io::ErrorKind::NotFound)).is_not_found());
        assert!(!DriverError::already_exists("mem:/a").is_not_found());
        assert!(!DriverError::Io(io::Error::other("disk on fire")).is_not_found());
    }

    #[test]
    fn test_short_read_message() {
        let err = DriverError::ShortRead {
            address: "mem:/f".into(),
            expected: 10,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "short read at mem:/f: expected 10 bytes, got 4"
        );
    }
}
