//! Local filesystem driver.
//!
//! Addresses are plain local paths under the driver's base directory.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::SeekFrom;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::error::{DriverError, DriverResult};
use super::{RawInfo, StorageDriver, content_hash};

/// Local filesystem driver.
///
/// If the base directory is `/home/amy/.unifs`, a repository rooted at
/// `/notes` lives at `/home/amy/.unifs/notes` and every address the
/// adapters hand in is a path below it.
#[derive(Debug, Clone)]
pub struct LocalDriver {
    base: PathBuf,
    base_address: String,
}

impl LocalDriver {
    /// Create a driver whose base address is `base`.
    ///
    /// The base is canonicalized when it exists so that symlinked temp
    /// directories (e.g. macOS `/tmp` → `/private/tmp`) compare cleanly.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base: PathBuf = base.into();
        let base = dunce::canonicalize(&base).unwrap_or(base);
        let base_address = base.to_string_lossy().into_owned();
        Self { base, base_address }
    }

    /// Get the base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Turn an address into a path, refusing anything outside the base.
    fn path(&self, address: &str) -> DriverResult<PathBuf> {
        let path = Path::new(address);
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(DriverError::invalid_address(address));
        }
        if !path.starts_with(&self.base) {
            return Err(DriverError::invalid_address(address));
        }
        Ok(path.to_path_buf())
    }
}

#[async_trait]
impl StorageDriver for LocalDriver {
    fn base_address(&self) -> &str {
        &self.base_address
    }

    async fn stat(&self, address: &str, want_size: bool, want_hash: bool) -> DriverResult<RawInfo> {
        let path = self.path(address)?;
        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RawInfo::missing()),
            Err(e) => return Err(e.into()),
        };

        let is_directory = meta.is_dir();
        let hash = if want_hash && !is_directory {
            let data = fs::read(&path).await?;
            Some(content_hash(&data))
        } else {
            None
        };

        Ok(RawInfo {
            exists: true,
            is_directory,
            size: (want_size && !is_directory).then(|| meta.len()),
            modified: meta.modified().ok(),
            hash,
        })
    }

    async fn list_children(&self, address: &str) -> DriverResult<Vec<String>> {
        let path = self.path(address)?;
        let mut names = Vec::new();
        let mut dir = fs::read_dir(&path).await?;

        while let Some(entry) = dir.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        Ok(names)
    }

    async fn read_range(&self, address: &str, offset: u64, length: u64) -> DriverResult<String> {
        let path = self.path(address)?;
        let mut file = fs::File::open(&path).await?;
        file.seek(SeekFrom::Start(offset)).await?;

        let mut buffer = Vec::new();
        file.take(length).read_to_end(&mut buffer).await?;

        Ok(STANDARD.encode(&buffer))
    }

    async fn write_all(&self, address: &str, base64: &str) -> DriverResult<()> {
        let path = self.path(address)?;
        let data = STANDARD
            .decode(base64)
            .map_err(|e| DriverError::other(format!("invalid base64 payload: {e}")))?;

        if fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            return Err(DriverError::is_a_directory(address));
        }

        fs::write(&path, &data).await?;
        Ok(())
    }

    async fn delete(&self, address: &str) -> DriverResult<()> {
        let path = self.path(address)?;
        if path == self.base {
            return Err(DriverError::PermissionDenied("cannot remove base directory".into()));
        }

        let meta = fs::symlink_metadata(&path).await?;
        if meta.is_dir() {
            fs::remove_dir(&path).await?;
        } else {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn make_directory(&self, address: &str) -> DriverResult<()> {
        let path = self.path(address)?;
        fs::create_dir(&path).await?;
        Ok(())
    }
}
