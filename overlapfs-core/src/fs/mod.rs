//! Filesystem layers that can be stacked under an overlay.
//!
//! - `ReadFs`: the read-only capability every layer provides
//! - `MemoryFs`: in-memory tree
//! - `ZipFs`: ZIP archive extracted into memory
//! - `DirFs`: directory on local disk
//! - `SubFs`: sub-tree view of any layer

mod dir_fs;
mod memory_fs;
mod read_fs;
mod sub_fs;
mod zip_fs;

pub use dir_fs::DirFs;
pub use memory_fs::MemoryFs;
pub use read_fs::{read_file, DirEntry, FsFile, Metadata, ReadFs};
pub use sub_fs::SubFs;
pub use zip_fs::ZipFs;
