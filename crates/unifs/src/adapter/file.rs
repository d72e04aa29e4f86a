//! File handle: ranged reads, whole-file writes, delete.

use super::filesystem::FileSystemAdapter;
use crate::capabilities::{ADAPTER_CAPABILITIES, Capabilities};
use crate::convert::{ConvertOptions, DEFAULT_BUFFER_SIZE, Data, StringType};
use crate::driver::DriverError;
use crate::error::{Cause, FsError, FsResult, Operation};
use crate::path::join_paths;
use crate::types::{ReadOptions, Stats, WriteOptions};

/// Handle to a file in a [`FileSystemAdapter`].
///
/// Holds only the logical path and its resolved address; every call goes
/// straight to the driver.
#[derive(Debug, Clone)]
pub struct FileAdapter<'a> {
    fs: &'a FileSystemAdapter,
    path: String,
    address: String,
}

impl<'a> FileAdapter<'a> {
    pub(crate) fn new(fs: &'a FileSystemAdapter, path: String, address: String) -> Self {
        Self { fs, path, address }
    }

    /// Logical path within the repository.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolved driver address.
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

    /// Read a byte range of the file described by `stats`.
    ///
    /// The range is `[start, start + length)` clamped to `stats.size`. An
    /// empty range returns immediately without touching the driver.
    /// Otherwise the range is served by one driver call, or by consecutive
    /// calls of at most `max_read_len` bytes when the driver declares a limit.
    pub async fn read(&self, stats: &Stats, options: &ReadOptions) -> FsResult<Vec<u8>> {
        let Some(size) = stats.size else {
            return Err(self.fail(Operation::Read, Cause::message("file size is unknown")));
        };

        let start = options.start.unwrap_or(0);
        let end = match options.length {
            Some(length) => start.saturating_add(length).min(size),
            None => size,
        };
        if end <= start {
            return Ok(Vec::new());
        }

        let driver = self.fs.driver();
        let limit = driver.max_read_len();
        let conv = ConvertOptions {
            src_string_type: Some(StringType::Base64),
            buffer_size: options.buffer_size.or(self.fs.options().buffer_size),
        };

        tracing::debug!(
            path = %self.path,
            address = %self.address,
            start,
            end,
            chunk_limit = ?limit,
            "read"
        );

        // Stats may be stale; grow with what the driver returns
        let expected = end - start;
        let capacity = usize::try_from(expected)
            .map_or(DEFAULT_BUFFER_SIZE, |n| n.min(DEFAULT_BUFFER_SIZE));
        let mut out = Vec::with_capacity(capacity);
        let mut offset = start;
        while offset < end {
            let remaining = end - offset;
            let step = limit.map_or(remaining, |max| max.min(remaining));

            let encoded = driver
                .read_range(&self.address, offset, step)
                .await
                .map_err(|e| self.fail(Operation::Read, e))?;
            let mut chunk = self
                .fs
                .converter()
                .to_bytes(&encoded, &conv)
                .await
                .map_err(|e| self.fail(Operation::Read, e))?;

            if chunk.is_empty() {
                let short = DriverError::ShortRead {
                    address: self.address.clone(),
                    expected,
                    actual: out.len() as u64,
                };
                return Err(self.fail(Operation::Read, short));
            }
            chunk.truncate(usize::try_from(step).unwrap_or(usize::MAX));

            offset += chunk.len() as u64;
            out.extend_from_slice(&chunk);
        }

        Ok(out)
    }

    /// Replace the file's content with `data`.
    ///
    /// Always a whole-file overwrite; `_previous` is accepted for callers that
    /// already hold the old stats but is not consulted.
    pub async fn write(
        &self,
        data: Data,
        _previous: Option<&Stats>,
        options: &WriteOptions,
    ) -> FsResult<()> {
        let conv = ConvertOptions {
            src_string_type: options.src_string_type,
            buffer_size: options.buffer_size.or(self.fs.options().buffer_size),
        };
        let encoded = self
            .fs
            .converter()
            .to_base64(data, &conv)
            .await
            .map_err(|e| self.fail(Operation::Write, e))?;

        tracing::debug!(
            path = %self.path,
            address = %self.address,
            encoded_len = encoded.len(),
            "write"
        );

        self.fs
            .driver()
            .write_all(&self.address, &encoded)
            .await
            .map_err(|e| self.fail(Operation::Write, e))
    }

    /// Delete the file.
    pub async fn remove(&self) -> FsResult<()> {
        tracing::debug!(path = %self.path, address = %self.address, "remove");
        self.fs
            .driver()
            .delete(&self.address)
            .await
            .map_err(|e| self.fail(Operation::Remove, e))
    }

    fn fail(&self, op: Operation, cause: impl Into<Cause>) -> FsError {
        self.fs.error(op, &self.path, cause)
    }
}
