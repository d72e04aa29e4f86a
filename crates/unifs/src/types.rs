//! Core adapter types.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::convert::StringType;

/// Canonical file metadata.
///
/// Directories carry no size. `size`, when present, is the exact byte length
/// at the moment of the stat call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
    /// Opaque content hash, only present when etags are enabled.
    pub etag: Option<String>,
}

impl Stats {
    /// Stats for a file of `size` bytes.
    pub fn file(size: u64) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    /// Returns true if these stats describe a directory.
    pub fn is_directory(&self) -> bool {
        self.size.is_none()
    }

    /// Returns true if these stats describe a file.
    pub fn is_file(&self) -> bool {
        self.size.is_some()
    }
}

/// Directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Logical path of the child (parent path joined with the raw name).
    pub path: String,
}

/// Which stat fields an adapter can change independently of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchableFields {
    pub accessed: bool,
    pub created: bool,
    pub modified: bool,
}

impl PatchableFields {
    pub const NONE: Self = Self {
        accessed: false,
        created: false,
        modified: false,
    };

    pub fn any(&self) -> bool {
        self.accessed || self.created || self.modified
    }
}

/// Options for ranged reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Byte offset to start at (default 0).
    pub start: Option<u64>,
    /// Byte count (default: the rest of the file). Clamped to the file size.
    pub length: Option<u64>,
    /// Chunk size hint for decoding.
    pub buffer_size: Option<usize>,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `length` bytes starting at `start`.
    pub fn range(start: u64, length: u64) -> Self {
        Self {
            start: Some(start),
            length: Some(length),
            buffer_size: None,
        }
    }

    pub fn with_start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }
}

/// Options for writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// How text payloads represent their bytes.
    pub src_string_type: Option<StringType>,
    /// Chunk size hint for encoding.
    pub buffer_size: Option<usize>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_src_string_type(mut self, src_string_type: StringType) -> Self {
        self.src_string_type = Some(src_string_type);
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_kind() {
        assert!(Stats::file(10).is_file());
        assert!(!Stats::file(0).is_directory());
        assert!(Stats::default().is_directory());
    }

    #[test]
    fn test_read_options_builder() {
        let opts = ReadOptions::new().with_start(4).with_buffer_size(16);
        assert_eq!(opts.start, Some(4));
        assert!(opts.length.is_none());
        assert_eq!(opts.buffer_size, Some(16));

        assert_eq!(ReadOptions::range(2, 3).length, Some(3));
    }

    #[test]
    fn test_patchable_none() {
        assert!(!PatchableFields::NONE.any());
    }
}
