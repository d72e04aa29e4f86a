//! Storage driver boundary.
//!
//! A driver is the native capability provider underneath the adapters. It
//! knows nothing about repositories or logical paths: every call takes a
//! fully resolved address string. Adapters call it and classify whatever it
//! returns.
//!
//! Bytes cross this boundary as base64 text, mirroring drivers whose native
//! API only moves strings. Use [`Converter`](crate::Converter) on either side.
//!
//! - [`MemoryDriver`] - In-process storage (testing, scratch repositories)
//! - [`LocalDriver`] - Local filesystem via `tokio::fs`

use async_trait::async_trait;
use std::time::SystemTime;

mod error;
mod local;
mod memory;

pub use error::{DriverError, DriverResult};
pub use local::LocalDriver;
pub use memory::MemoryDriver;

/// Raw metadata as reported by a driver.
///
/// A missing address is reported as `exists == false` rather than an error;
/// the stat translator decides what that means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInfo {
    pub exists: bool,
    pub is_directory: bool,
    /// Byte length, only filled when requested.
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
    /// Content hash, only filled when requested.
    pub hash: Option<String>,
}

impl RawInfo {
    /// Info for an address that does not exist.
    pub fn missing() -> Self {
        Self::default()
    }
}

/// Storage driver operations.
///
/// All operations are address-based and independent: the driver holds no
/// handle state between calls and is responsible for its own durability.
#[async_trait]
pub trait StorageDriver: Send + Sync {
    /// Address prefix under which repositories live (a document root).
    fn base_address(&self) -> &str;

    /// Largest range a single `read_range` call will serve, if limited.
    fn max_read_len(&self) -> Option<u64> {
        None
    }

    /// Query existence, type, modification time and optionally size/hash.
    async fn stat(&self, address: &str, want_size: bool, want_hash: bool) -> DriverResult<RawInfo>;

    /// Names of the immediate children of a directory.
    async fn list_children(&self, address: &str) -> DriverResult<Vec<String>>;

    /// Read `length` bytes starting at `offset`, returned as base64 text.
    ///
    /// Returns fewer bytes if end of file is reached.
    async fn read_range(&self, address: &str, offset: u64, length: u64) -> DriverResult<String>;

    /// Replace the whole content at `address` with the decoded base64 text.
    async fn write_all(&self, address: &str, base64: &str) -> DriverResult<()>;

    /// Delete a file or an empty directory.
    async fn delete(&self, address: &str) -> DriverResult<()>;

    /// Create a directory. The parent must already exist.
    async fn make_directory(&self, address: &str) -> DriverResult<()>;
}

/// Hex blake3 digest used as a content hash by the bundled drivers.
pub(crate) fn content_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
