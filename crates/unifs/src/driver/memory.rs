//! In-memory storage driver.
//!
//! Used for scratch repositories and testing. All data is ephemeral.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::time::SystemTime;

use super::error::{DriverError, DriverResult};
use super::{RawInfo, StorageDriver, content_hash};

const SCHEME: &str = "mem:";

/// Entry in the memory store.
#[derive(Debug, Clone)]
enum Entry {
    File { data: Vec<u8>, modified: SystemTime },
    Directory { modified: SystemTime },
}

impl Entry {
    fn modified(&self) -> SystemTime {
        match self {
            Entry::File { modified, .. } => *modified,
            Entry::Directory { modified } => *modified,
        }
    }
}

/// In-memory storage driver.
///
/// Addresses look like `mem:/data/notes.txt`. Entries are kept in a
/// `BTreeMap`, so listings come back in name order.
#[derive(Debug)]
pub struct MemoryDriver {
    entries: RwLock<BTreeMap<String, Entry>>,
    max_read_len: Option<u64>,
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDriver {
    /// Create a new empty store. Only the root directory exists.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            "/".to_string(),
            Entry::Directory {
                modified: SystemTime::now(),
            },
        );
        Self {
            entries: RwLock::new(entries),
            max_read_len: None,
        }
    }

    /// Limit how many bytes a single `read_range` call serves.
    pub fn with_max_read_len(mut self, max: u64) -> Self {
        self.max_read_len = Some(max.max(1));
        self
    }

    /// Strip the scheme and normalize the remaining path into a store key.
    fn key(address: &str) -> DriverResult<String> {
        let rest = address
            .strip_prefix(SCHEME)
            .ok_or_else(|| DriverError::invalid_address(address))?;

        let mut parts: Vec<&str> = Vec::new();
        for part in rest.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                part => parts.push(part),
            }
        }
        Ok(format!("/{}", parts.join("/")))
    }

    fn parent_key(key: &str) -> Option<&str> {
        if key == "/" {
            return None;
        }
        match key.rfind('/') {
            Some(0) => Some("/"),
            Some(idx) => Some(&key[..idx]),
            None => None,
        }
    }

    /// Check that the parent of `key` exists and is a directory.
    fn check_parent(entries: &BTreeMap<String, Entry>, key: &str) -> DriverResult<()> {
        let Some(parent) = Self::parent_key(key) else {
            return Err(DriverError::already_exists(key));
        };
        match entries.get(parent) {
            Some(Entry::Directory { .. }) => Ok(()),
            Some(Entry::File { .. }) => Err(DriverError::not_a_directory(parent)),
            None => Err(DriverError::not_found(parent)),
        }
    }

    fn children<'a>(
        entries: &'a BTreeMap<String, Entry>,
        key: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        entries.keys().filter_map(move |k| {
            if k == key {
                return None;
            }
            match Self::parent_key(k) {
                Some(parent) if parent == key => k.rsplit('/').next(),
                _ => None,
            }
        })
    }
}

#[async_trait]
impl StorageDriver for MemoryDriver {
    fn base_address(&self) -> &str {
        SCHEME
    }

    fn max_read_len(&self) -> Option<u64> {
        self.max_read_len
    }

    async fn stat(&self, address: &str, want_size: bool, want_hash: bool) -> DriverResult<RawInfo> {
        let key = Self::key(address)?;
        let entries = self.entries.read();

        let Some(entry) = entries.get(&key) else {
            return Ok(RawInfo::missing());
        };

        let info = match entry {
            Entry::File { data, modified } => RawInfo {
                exists: true,
                is_directory: false,
                size: want_size.then_some(data.len() as u64),
                modified: Some(*modified),
                hash: want_hash.then(|| content_hash(data)),
            },
            Entry::Directory { .. } => RawInfo {
                exists: true,
                is_directory: true,
                size: None,
                modified: Some(entry.modified()),
                hash: None,
            },
        };
        Ok(info)
    }

    async fn list_children(&self, address: &str) -> DriverResult<Vec<String>> {
        let key = Self::key(address)?;
        let entries = self.entries.read();

        match entries.get(&key) {
            Some(Entry::Directory { .. }) => {}
            Some(Entry::File { .. }) => return Err(DriverError::not_a_directory(address)),
            None => return Err(DriverError::not_found(address)),
        }

        Ok(Self::children(&entries, &key).map(str::to_string).collect())
    }

    async fn read_range(&self, address: &str, offset: u64, length: u64) -> DriverResult<String> {
        let key = Self::key(address)?;
        let entries = self.entries.read();

        match entries.get(&key) {
            Some(Entry::File { data, .. }) => {
                let length = match self.max_read_len {
                    Some(max) => length.min(max),
                    None => length,
                };
                let start = (offset as usize).min(data.len());
                let end = start.saturating_add(length as usize).min(data.len());
                Ok(STANDARD.encode(&data[start..end]))
            }
            Some(Entry::Directory { .. }) => Err(DriverError::is_a_directory(address)),
            None => Err(DriverError::not_found(address)),
        }
    }

    async fn write_all(&self, address: &str, base64: &str) -> DriverResult<()> {
        let key = Self::key(address)?;
        let data = STANDARD
            .decode(base64)
            .map_err(|e| DriverError::other(format!("invalid base64 payload: {e}")))?;

        let mut entries = self.entries.write();
        if let Some(Entry::Directory { .. }) = entries.get(&key) {
            return Err(DriverError::is_a_directory(address));
        }
        Self::check_parent(&entries, &key)?;

        entries.insert(
            key,
            Entry::File {
                data,
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, address: &str) -> DriverResult<()> {
        let key = Self::key(address)?;
        if key == "/" {
            return Err(DriverError::PermissionDenied("cannot remove root".into()));
        }

        let mut entries = self.entries.write();
        match entries.get(&key) {
            Some(Entry::Directory { .. }) => {
                if Self::children(&entries, &key).next().is_some() {
                    return Err(DriverError::directory_not_empty(address));
                }
            }
            Some(Entry::File { .. }) => {}
            None => return Err(DriverError::not_found(address)),
        }

        entries.remove(&key);
        Ok(())
    }

    async fn make_directory(&self, address: &str) -> DriverResult<()> {
        let key = Self::key(address)?;

        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            return Err(DriverError::already_exists(address));
        }
        Self::check_parent(&entries, &key)?;

        entries.insert(
            key,
            Entry::Directory {
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b64(data: &[u8]) -> String {
        STANDARD.encode(data)
    }

    #[tokio::test]
    async fn test_write_and_read_range() {
        let driver = MemoryDriver::new();
        driver
            .write_all("mem:/test.txt", &b64(b"hello world"))
            .await
            .unwrap();

        let data = driver.read_range("mem:/test.txt", 6, 5).await.unwrap();
        assert_eq!(STANDARD.decode(data).unwrap(), b"world");

        let data = driver.read_range("mem:/test.txt", 6, 100).await.unwrap();
        assert_eq!(STANDARD.decode(data).unwrap(), b"world");
    }

    #[tokio::test]
    async fn test_max_read_len_caps_range() {
        let driver = MemoryDriver::new().with_max_read_len(4);
        driver
            .write_all("mem:/test.txt", &b64(b"hello world"))
            .await
            .unwrap();

        let data = driver.read_range("mem:/test.txt", 0, 11).await.unwrap();
        assert_eq!(STANDARD.decode(data).unwrap(), b"hell");
    }

    #[tokio::test]
    async fn test_stat() {
        let driver = MemoryDriver::new();
        driver
            .write_all("mem:/f", &b64(b"0123456789"))
            .await
            .unwrap();

        let info = driver.stat("mem:/f", true, false).await.unwrap();
        assert!(info.exists);
        assert!(!info.is_directory);
        assert_eq!(info.size, Some(10));
        assert!(info.hash.is_none());

        let info = driver.stat("mem:/f", false, true).await.unwrap();
        assert!(info.size.is_none());
        assert_eq!(info.hash, Some(content_hash(b"0123456789")));

        let info = driver.stat("mem:/missing", true, true).await.unwrap();
        assert!(!info.exists);
    }

    #[tokio::test]
    async fn test_mkdir_requires_parent() {
        let driver = MemoryDriver::new();
        let err = driver.make_directory("mem:/a/b").await.unwrap_err();
        assert!(err.is_not_found());

        driver.make_directory("mem:/a").await.unwrap();
        driver.make_directory("mem:/a/b").await.unwrap();
        assert!(driver.stat("mem:/a/b", false, false).await.unwrap().is_directory);

        let err = driver.make_directory("mem:/a").await.unwrap_err();
        assert!(matches!(err, DriverError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_list_children() {
        let driver = MemoryDriver::new();
        driver.make_directory("mem:/dir").await.unwrap();
        driver.make_directory("mem:/dir/sub").await.unwrap();
        driver.write_all("mem:/dir/b.txt", &b64(b"b")).await.unwrap();
        driver.write_all("mem:/dir/a.txt", &b64(b"a")).await.unwrap();
        driver.write_all("mem:/dir/sub/deep", &b64(b"x")).await.unwrap();

        let names = driver.list_children("mem:/dir").await.unwrap();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub"]);

        let names = driver.list_children("mem:/dir/sub").await.unwrap();
        assert_eq!(names, vec!["deep"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let driver = MemoryDriver::new();
        driver.make_directory("mem:/dir").await.unwrap();
        driver.write_all("mem:/dir/f", &b64(b"x")).await.unwrap();

        let err = driver.delete("mem:/dir").await.unwrap_err();
        assert!(matches!(err, DriverError::DirectoryNotEmpty(_)));

        driver.delete("mem:/dir/f").await.unwrap();
        driver.delete("mem:/dir").await.unwrap();
        assert!(!driver.stat("mem:/dir", false, false).await.unwrap().exists);

        assert!(driver.delete("mem:/dir").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_write_requires_parent() {
        let driver = MemoryDriver::new();
        let err = driver.write_all("mem:/nope/f", &b64(b"x")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_address_normalization() {
        let driver = MemoryDriver::new();
        driver.make_directory("mem:/a").await.unwrap();
        driver.write_all("mem:/a/c.txt", &b64(b"c")).await.unwrap();

        assert!(driver.stat("mem://a/c.txt", false, false).await.unwrap().exists);
        assert!(driver.stat("mem:/a/./c.txt", false, false).await.unwrap().exists);
        assert!(driver.stat("mem:/a//c.txt", false, false).await.unwrap().exists);
        assert!(driver.stat("mem:/a/b/../c.txt", false, false).await.unwrap().exists);
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let driver = MemoryDriver::new();
        let err = driver.stat("file:///etc", false, false).await.unwrap_err();
        assert!(matches!(err, DriverError::InvalidAddress(_)));
    }
}
