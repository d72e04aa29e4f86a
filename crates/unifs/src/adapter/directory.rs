//! Directory handle: list, create, remove.

use super::filesystem::FileSystemAdapter;
use crate::capabilities::{ADAPTER_CAPABILITIES, Capabilities};
use crate::error::{Cause, FsError, FsResult, Operation};
use crate::path::join_paths;
use crate::types::Item;

/// Handle to a directory in a [`FileSystemAdapter`].
#[derive(Debug, Clone)]
pub struct DirectoryAdapter<'a> {
    fs: &'a FileSystemAdapter,
    path: String,
    address: String,
}

impl<'a> DirectoryAdapter<'a> {
    pub(crate) fn new(fs: &'a FileSystemAdapter, path: String, address: String) -> Self {
        Self { fs, path, address }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Repository root joined with the logical path.
    pub fn full_path(&self) -> String {
        join_paths(self.fs.repository(), &self.path)
    }

    pub fn capabilities(&self) -> &'static Capabilities {
        &ADAPTER_CAPABILITIES
    }

    /// List immediate children, in the order the driver returns them.
    pub async fn list(&self) -> FsResult<Vec<Item>> {
        tracing::debug!(path = %self.path, address = %self.address, "list");
        let names = self
            .fs
            .driver()
            .list_children(&self.address)
            .await
            .map_err(|e| self.fail(Operation::List, e))?;

        Ok(names
            .iter()
            .map(|name| Item {
                path: join_paths(&self.path, name),
            })
            .collect())
    }

    /// Create this directory. The parent must already exist.
    pub async fn mkdir(&self) -> FsResult<()> {
        tracing::debug!(path = %self.path, address = %self.address, "mkdir");
        self.fs
            .driver()
            .make_directory(&self.address)
            .await
            .map_err(|e| self.fail(Operation::MakeDirectory, e))
    }

    /// Remove this directory. Fails if it still has children.
    pub async fn rmdir(&self) -> FsResult<()> {
        tracing::debug!(path = %self.path, address = %self.address, "rmdir");
        self.fs
            .driver()
            .delete(&self.address)
            .await
            .map_err(|e| self.fail(Operation::RemoveDirectory, e))
    }

    fn fail(&self, op: Operation, cause: impl Into<Cause>) -> FsError {
        self.fs.error(op, &self.path, cause)
    }
}
