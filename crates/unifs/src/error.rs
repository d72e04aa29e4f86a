//! Adapter error taxonomy.
//!
//! Every driver failure surfaces to callers as one of three kinds, chosen by
//! the operation that was running, never by the shape of the failure:
//!
//! | Operation                          | Kind                    |
//! |------------------------------------|-------------------------|
//! | stat, list, read                   | `NotReadable`           |
//! | write, remove, mkdir, rmdir        | `NoModificationAllowed` |
//! | patch                              | `NotSupported`          |
//!
//! The underlying failure stays attached as the error source.

use serde::{Deserialize, Serialize};
use std::io;
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::convert::ConvError;
use crate::driver::DriverError;
use crate::path::join_paths;

/// Closed set of error kinds surfaced to callers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum ErrorKind {
    NotReadable,
    NoModificationAllowed,
    NotSupported,
}

/// Adapter operations, used to classify failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Stat,
    List,
    Read,
    Write,
    Remove,
    MakeDirectory,
    RemoveDirectory,
    Patch,
}

impl Operation {
    /// The error kind any failure of this operation maps to.
    pub fn error_kind(self) -> ErrorKind {
        match self {
            Operation::Stat | Operation::List | Operation::Read => ErrorKind::NotReadable,
            Operation::Write
            | Operation::Remove
            | Operation::MakeDirectory
            | Operation::RemoveDirectory => ErrorKind::NoModificationAllowed,
            Operation::Patch => ErrorKind::NotSupported,
        }
    }
}

/// Underlying cause of an [`FsError`].
#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Conversion(#[from] ConvError),

    #[error("{0}")]
    Message(String),
}

impl Cause {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

/// Error returned by every adapter operation.
#[derive(Debug, Error)]
#[error("{kind}: {path} (repository {repository}): {cause}")]
pub struct FsError {
    kind: ErrorKind,
    repository: String,
    path: String,
    #[source]
    cause: Cause,
}

impl FsError {
    pub fn new(
        kind: ErrorKind,
        repository: impl Into<String>,
        path: impl Into<String>,
        cause: impl Into<Cause>,
    ) -> Self {
        Self {
            kind,
            repository: repository.into(),
            path: path.into(),
            cause: cause.into(),
        }
    }

    /// Create a NotReadable error.
    pub fn not_readable(repository: &str, path: &str, cause: impl Into<Cause>) -> Self {
        Self::new(ErrorKind::NotReadable, repository, path, cause)
    }

    /// Create a NoModificationAllowed error.
    pub fn no_modification_allowed(repository: &str, path: &str, cause: impl Into<Cause>) -> Self {
        Self::new(ErrorKind::NoModificationAllowed, repository, path, cause)
    }

    /// Create a NotSupported error.
    pub fn not_supported(repository: &str, path: &str, what: &str) -> Self {
        Self::new(
            ErrorKind::NotSupported,
            repository,
            path,
            Cause::message(format!("{what} is not supported")),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Repository root joined with the logical path.
    pub fn full_path(&self) -> String {
        join_paths(&self.repository, &self.path)
    }

    /// Flatten into the payload shape shown to callers and UIs.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            error_kind: self.kind,
            repository_id: self.repository.clone(),
            logical_path: self.path.clone(),
            underlying_cause: self.cause.to_string(),
        }
    }
}

/// Classify a failure of `op` on `path` within `repository`.
pub fn map_error(op: Operation, repository: &str, path: &str, cause: impl Into<Cause>) -> FsError {
    let err = FsError::new(op.error_kind(), repository, path, cause);
    tracing::debug!(
        op = %op,
        kind = %err.kind,
        repository = %repository,
        path = %path,
        cause = %err.cause,
        "adapter operation failed"
    );
    err
}

/// Serializable error report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error_kind: ErrorKind,
    pub repository_id: String,
    pub logical_path: String,
    pub underlying_cause: String,
}

/// Convert FsError to std::io::Error for compatibility.
impl From<FsError> for io::Error {
    fn from(e: FsError) -> Self {
        let kind = match (&e.kind, &e.cause) {
            (ErrorKind::NotSupported, _) => io::ErrorKind::Unsupported,
            (_, Cause::Driver(DriverError::Io(inner))) => inner.kind(),
            (_, Cause::Driver(DriverError::NotFound(_))) => io::ErrorKind::NotFound,
            (_, Cause::Driver(DriverError::AlreadyExists(_))) => io::ErrorKind::AlreadyExists,
            (_, Cause::Driver(DriverError::PermissionDenied(_))) => {
                io::ErrorKind::PermissionDenied
            }
            (_, Cause::Driver(DriverError::NotADirectory(_))) => io::ErrorKind::NotADirectory,
            (_, Cause::Driver(DriverError::IsADirectory(_))) => io::ErrorKind::IsADirectory,
            (_, Cause::Driver(DriverError::DirectoryNotEmpty(_))) => {
                io::ErrorKind::DirectoryNotEmpty
            }
            (_, Cause::Conversion(_)) => io::ErrorKind::InvalidData,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, e)
    }
}

/// Adapter result type.
pub type FsResult<T> = Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_classification() {
        for op in [Operation::Stat, Operation::List, Operation::Read] {
            assert_eq!(op.error_kind(), ErrorKind::NotReadable);
        }
        for op in [
            Operation::Write,
            Operation::Remove,
            Operation::MakeDirectory,
            Operation::RemoveDirectory,
        ] {
            assert_eq!(op.error_kind(), ErrorKind::NoModificationAllowed);
        }
        assert_eq!(Operation::Patch.error_kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn test_map_error_keeps_context() {
        let err = map_error(
            Operation::Read,
            "/data",
            "/notes.txt",
            DriverError::not_found("mem:/data/notes.txt"),
        );
        assert_eq!(err.kind(), ErrorKind::NotReadable);
        assert_eq!(err.repository(), "/data");
        assert_eq!(err.path(), "/notes.txt");
        assert_eq!(err.full_path(), "/data/notes.txt");
        assert!(matches!(err.cause(), Cause::Driver(DriverError::NotFound(_))));

        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "not found: mem:/data/notes.txt");
    }

    #[test]
    fn test_payload_serialization() {
        let err = FsError::not_supported("/data", "/a", "patch");
        let json = serde_json::to_value(err.payload()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error_kind": "NotSupported",
                "repository_id": "/data",
                "logical_path": "/a",
                "underlying_cause": "patch is not supported",
            })
        );
    }

    #[test]
    fn test_kind_names_are_stable() {
        assert_eq!(ErrorKind::NotReadable.to_string(), "NotReadable");
        assert_eq!(
            "NoModificationAllowed".parse::<ErrorKind>().unwrap(),
            ErrorKind::NoModificationAllowed
        );
        assert_eq!(Operation::MakeDirectory.as_ref(), "make_directory");
    }

    #[test]
    fn test_into_io_error() {
        let err = FsError::not_readable("/", "/x", DriverError::not_found("mem:/x"));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);

        let err = FsError::not_supported("/", "/x", "patch");
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::Unsupported);
    }
}
