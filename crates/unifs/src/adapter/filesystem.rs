//! Root adapter: owns the storage root and hands out file/directory handles.

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

use super::directory::DirectoryAdapter;
use super::file::FileAdapter;
use crate::capabilities::{ADAPTER_CAPABILITIES, Capabilities, HasCapabilities};
use crate::config::FsOptions;
use crate::convert::{Converter, Data};
use crate::driver::{DriverResult, StorageDriver};
use crate::error::{Cause, FsError, FsResult, Operation, map_error};
use crate::path::normalize_path;
use crate::stats::translate_stats;
use crate::types::{ReadOptions, Stats, WriteOptions};

/// Outcome of the background storage-root creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootStatus {
    /// Still running.
    Pending,
    /// Root exists (it was already there or was just created).
    Ready,
    /// Creation failed. Later operations surface their own errors.
    Failed(String),
}

/// A repository rooted at a logical path on top of a storage driver.
///
/// Construction starts a background task that makes sure the root directory
/// exists. Nothing waits for it: operations issued straight after `new` may
/// run before the root is there. Callers that need the ordering await
/// [`ready`](Self::ready) first.
pub struct FileSystemAdapter {
    repository: String,
    root_address: String,
    driver: Arc<dyn StorageDriver>,
    options: FsOptions,
    converter: Converter,
    root_status: watch::Receiver<RootStatus>,
}

impl fmt::Debug for FileSystemAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSystemAdapter")
            .field("repository", &self.repository)
            .field("root_address", &self.root_address)
            .field("options", &self.options)
            .field("root_status", &*self.root_status.borrow())
            .finish()
    }
}

impl FileSystemAdapter {
    /// Create an adapter for the repository at `root_dir`.
    ///
    /// Must be called from within a Tokio runtime for the root to be created;
    /// without one the creation step is skipped and recorded as failed.
    pub fn new(root_dir: &str, driver: Arc<dyn StorageDriver>, options: FsOptions) -> Self {
        let repository = normalize_path(root_dir);
        let base = driver.base_address().trim_end_matches('/');
        let root_address = if repository == "/" {
            base.to_string()
        } else {
            format!("{}{}", base, repository)
        };

        let (tx, rx) = watch::channel(RootStatus::Pending);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let driver = Arc::clone(&driver);
                let address = root_address.clone();
                handle.spawn(async move {
                    let status = match ensure_root(driver.as_ref(), &address).await {
                        Ok(created) => {
                            if created {
                                tracing::info!(address = %address, "created storage root");
                            }
                            RootStatus::Ready
                        }
                        Err(e) => {
                            tracing::warn!(
                                address = %address,
                                error = %e,
                                "failed to create storage root"
                            );
                            RootStatus::Failed(e.to_string())
                        }
                    };
                    let _ = tx.send(status);
                });
            }
            Err(_) => {
                tracing::warn!(address = %root_address, "no async runtime, storage root not created");
                let _ = tx.send(RootStatus::Failed("no async runtime".into()));
            }
        }

        Self {
            repository,
            root_address,
            driver,
            options,
            converter: Converter,
            root_status: rx,
        }
    }

    /// Wait for the background root creation to finish.
    pub async fn ready(&self) -> RootStatus {
        let mut rx = self.root_status.clone();
        match rx.wait_for(|s| *s != RootStatus::Pending).await {
            Ok(status) => status.clone(),
            Err(_) => RootStatus::Failed("root creation task ended without reporting".into()),
        }
    }

    /// Current root status without waiting.
    pub fn root_status(&self) -> RootStatus {
        self.root_status.borrow().clone()
    }

    /// Normalized logical root path, used as the repository id in errors.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Resolved driver address of the repository root.
    pub fn root_address(&self) -> &str {
        &self.root_address
    }

    pub fn options(&self) -> &FsOptions {
        &self.options
    }

    pub(crate) fn driver(&self) -> &dyn StorageDriver {
        self.driver.as_ref()
    }

    pub(crate) fn converter(&self) -> &Converter {
        &self.converter
    }

    pub(crate) fn error(&self, op: Operation, path: &str, cause: impl Into<Cause>) -> FsError {
        map_error(op, &self.repository, path, cause)
    }

    /// Resolve a logical path to a driver address. Pure concatenation.
    pub fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.root_address, path)
    }

    /// Driver address for `path`, for callers that need direct access.
    pub fn to_address(&self, path: &str) -> String {
        self.resolve(&normalize_path(path))
    }

    /// Get a file handle. No I/O happens until an operation is called.
    pub fn get_file(&self, path: &str) -> FileAdapter<'_> {
        let path = normalize_path(path);
        let address = self.resolve(&path);
        FileAdapter::new(self, path, address)
    }

    /// Get a directory handle. No I/O happens until an operation is called.
    pub fn get_directory(&self, path: &str) -> DirectoryAdapter<'_> {
        let path = normalize_path(path);
        let address = self.resolve(&path);
        DirectoryAdapter::new(self, path, address)
    }

    /// Fetch stats for `path`.
    ///
    /// Content hashes are only requested when `use_etag` is enabled.
    pub async fn head(&self, path: &str) -> FsResult<Stats> {
        let path = normalize_path(path);
        let address = self.resolve(&path);
        tracing::debug!(path = %path, address = %address, "head");

        let info = self
            .driver
            .stat(&address, true, self.options.use_etag)
            .await
            .map_err(|e| self.error(Operation::Stat, &path, e))?;

        translate_stats(&address, info).map_err(|e| self.error(Operation::Stat, &path, e))
    }

    /// Metadata patching is not supported; always fails with `NotSupported`.
    pub async fn patch(&self, path: &str, _props: &Stats) -> FsResult<()> {
        let path = normalize_path(path);
        Err(FsError::not_supported(&self.repository, &path, "patch"))
    }

    /// Read a file: stat it, then read the requested range.
    pub async fn read_file(&self, path: &str, options: &ReadOptions) -> FsResult<Vec<u8>> {
        let stats = self.head(path).await?;
        self.get_file(path).read(&stats, options).await
    }

    /// Write a whole file, creating it if needed. Does not stat first.
    pub async fn write_file(
        &self,
        path: &str,
        data: impl Into<Data>,
        options: &WriteOptions,
    ) -> FsResult<()> {
        self.get_file(path).write(data.into(), None, options).await
    }

    pub fn capabilities(&self) -> &'static Capabilities {
        &ADAPTER_CAPABILITIES
    }
}

impl HasCapabilities for FileSystemAdapter {
    const CAPABILITIES: Capabilities = ADAPTER_CAPABILITIES;
}

/// Stat the root and create it when missing. Returns whether it was created.
async fn ensure_root(driver: &dyn StorageDriver, address: &str) -> DriverResult<bool> {
    let info = driver.stat(address, false, false).await?;
    if info.exists {
        return Ok(false);
    }
    driver.make_directory(address).await?;
    Ok(true)
}
