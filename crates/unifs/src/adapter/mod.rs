//! Repository adapters.
//!
//! [`FileSystemAdapter`] owns the storage root and hands out lightweight
//! [`FileAdapter`] and [`DirectoryAdapter`] handles that borrow it.

mod directory;
mod file;
mod filesystem;

pub use directory::DirectoryAdapter;
pub use file::FileAdapter;
pub use filesystem::{FileSystemAdapter, RootStatus};
