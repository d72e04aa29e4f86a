//! Filesystem adapter configuration.
//!
//! Options are plain serde structs so they can live in a RON file:
//!
//! ```ron
//! (
//!     use_etag: true,
//!     buffer_size: Some(65536),
//! )
//! ```

use serde::{Deserialize, Serialize};

/// Options for a [`FileSystemAdapter`](crate::FileSystemAdapter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsOptions {
    /// Compute content hashes on stat. Hashing reads the whole file.
    pub use_etag: bool,
    /// Conversion chunk size used when a call does not pass one.
    pub buffer_size: Option<usize>,
}

impl FsOptions {
    /// Parse options from RON text. Missing fields take their defaults.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    pub fn with_etag(mut self, use_etag: bool) -> Self {
        self.use_etag = use_etag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = FsOptions::default();
        assert!(!opts.use_etag);
        assert!(opts.buffer_size.is_none());
    }

    #[test]
    fn test_from_ron() {
        let opts = FsOptions::from_ron("(use_etag: true, buffer_size: Some(4096))").unwrap();
        assert!(opts.use_etag);
        assert_eq!(opts.buffer_size, Some(4096));
    }

    #[test]
    fn test_from_ron_partial() {
        let opts = FsOptions::from_ron("(use_etag: true)").unwrap();
        assert!(opts.use_etag);
        assert!(opts.buffer_size.is_none());

        let opts = FsOptions::from_ron("()").unwrap();
        assert_eq!(opts, FsOptions::default());
    }

    #[test]
    fn test_from_ron_rejects_garbage() {
        assert!(FsOptions::from_ron("(use_etag: maybe)").is_err());
    }
}
