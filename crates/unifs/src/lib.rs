//! Filesystem adapters over string-addressed storage drivers.
//!
//! A [`FileSystemAdapter`] exposes a repository rooted at a logical path on
//! top of a [`StorageDriver`]. Reads are ranged and clamped to the file size,
//! writes replace the whole file, and every driver failure is classified into
//! one of the [`ErrorKind`]s by the operation that was running.
//!
//! ```no_run
//! use std::sync::Arc;
//! use unifs::{FileSystemAdapter, FsOptions, MemoryDriver, ReadOptions, WriteOptions};
//!
//! # async fn demo() -> unifs::FsResult<()> {
//! let fs = FileSystemAdapter::new("/data", Arc::new(MemoryDriver::new()), FsOptions::default());
//! fs.ready().await;
//!
//! fs.write_file("/hello.txt", "hello world", &WriteOptions::default()).await?;
//! let bytes = fs.read_file("/hello.txt", &ReadOptions::range(6, 5)).await?;
//! assert_eq!(bytes, b"world");
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod capabilities;
pub mod config;
pub mod convert;
pub mod driver;
pub mod error;
pub mod path;
pub mod stats;
pub mod types;

pub use adapter::{DirectoryAdapter, FileAdapter, FileSystemAdapter, RootStatus};
pub use capabilities::{ADAPTER_CAPABILITIES, Capabilities, HasCapabilities};
pub use config::FsOptions;
pub use convert::{
    ConvError, ConvResult, ConvertOptions, Converter, DEFAULT_BUFFER_SIZE, Data, StringType,
};
pub use driver::{DriverError, DriverResult, LocalDriver, MemoryDriver, RawInfo, StorageDriver};
pub use error::{Cause, ErrorKind, ErrorPayload, FsError, FsResult, Operation, map_error};
pub use path::{join_paths, normalize_path};
pub use stats::{PATCHABLE_FIELDS, translate_stats};
pub use types::{Item, PatchableFields, ReadOptions, Stats, WriteOptions};
