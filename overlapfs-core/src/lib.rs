//! Read-only overlay filesystem
//!
//! This crate layers one filesystem tree on top of another and presents
//! them as a single namespace:
//! - Single-path lookups (`open`, `stat`) see the overlay's entry, falling
//!   back to the base only when the overlay reports not-found
//! - Listings (`read_dir`, `glob`) merge both trees, dropping base entries
//!   shadowed by the overlay, sorted by name
//!
//! # Architecture
//!
//! - `ReadFs` trait: open / stat / read_dir / glob, implemented by every layer
//! - `OverlapFs`: the overlay resolver, itself a `ReadFs` so overlays stack
//! - `MemoryFs`, `ZipFs`, `DirFs`: concrete layers
//! - `SubFs`, `read_file`: helpers composed on top of any `ReadFs`
//!
//! ```
//! use overlapfs_core::{read_file, MemoryFs, OverlapFs, ReadFs};
//!
//! let base = MemoryFs::with_files([("a.txt", b"base".to_vec()), ("b.txt", b"b".to_vec())]);
//! let overlay = MemoryFs::with_files([("a.txt", b"overlay".to_vec())]);
//! let fs = OverlapFs::new(base, overlay);
//!
//! assert_eq!(read_file(&fs, "a.txt").unwrap(), b"overlay");
//! assert_eq!(fs.glob("*.txt").unwrap(), vec!["a.txt", "b.txt"]);
//! ```

pub mod error;
pub mod fs;
pub mod merge;
pub mod overlap;
pub mod path;
pub mod pattern;

pub use error::{FsError, FsResult};
pub use fs::{read_file, DirEntry, DirFs, FsFile, MemoryFs, Metadata, ReadFs, SubFs, ZipFs};
pub use merge::merge_unique;
pub use overlap::OverlapFs;
