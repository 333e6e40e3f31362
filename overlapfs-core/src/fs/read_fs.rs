//! ReadFs trait - the capability set every overlay layer provides.

use std::io::Read;
use std::sync::Arc;
use std::time::SystemTime;

use serde::Serialize;

use crate::error::FsResult;

/// File metadata returned by `stat` and by open handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Last path element (`"."` for a layer root)
    pub name: String,
    /// Size in bytes (0 for directories)
    pub size: u64,
    pub is_dir: bool,
    /// Modification time, when the layer tracks one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<SystemTime>,
}

impl Metadata {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            is_dir: false,
            modified: None,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            is_dir: true,
            modified: None,
        }
    }
}

/// A single entry in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

impl From<Metadata> for DirEntry {
    fn from(meta: Metadata) -> Self {
        Self {
            name: meta.name,
            is_dir: meta.is_dir,
            size: meta.size,
        }
    }
}

/// An open file. Closing is dropping.
pub trait FsFile: Read + Send {
    /// Metadata of the opened file.
    fn metadata(&self) -> FsResult<Metadata>;
}

/// Read-only filesystem interface.
///
/// Implementations must report a missing path as `FsError::NotFound` so
/// that overlays can tell it apart from every other failure.
pub trait ReadFs: Send + Sync {
    /// Open a file for reading.
    fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>>;

    /// Get metadata for a path.
    fn stat(&self, path: &str) -> FsResult<Metadata>;

    /// List a directory.
    fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>>;

    /// Return every path matching `pattern`.
    fn glob(&self, pattern: &str) -> FsResult<Vec<String>>;
}

impl<T: ReadFs + ?Sized> ReadFs for &T {
    fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>> {
        (**self).open(path)
    }

    fn stat(&self, path: &str) -> FsResult<Metadata> {
        (**self).stat(path)
    }

    fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        (**self).read_dir(path)
    }

    fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
        (**self).glob(pattern)
    }
}

impl<T: ReadFs + ?Sized> ReadFs for Box<T> {
    fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>> {
        (**self).open(path)
    }

    fn stat(&self, path: &str) -> FsResult<Metadata> {
        (**self).stat(path)
    }

    fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        (**self).read_dir(path)
    }

    fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
        (**self).glob(pattern)
    }
}

impl<T: ReadFs + ?Sized> ReadFs for Arc<T> {
    fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>> {
        (**self).open(path)
    }

    fn stat(&self, path: &str) -> FsResult<Metadata> {
        (**self).stat(path)
    }

    fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        (**self).read_dir(path)
    }

    fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
        (**self).glob(pattern)
    }
}

/// Read a whole file through `open`.
pub fn read_file<F: ReadFs + ?Sized>(fs: &F, path: &str) -> FsResult<Vec<u8>> {
    let mut file = fs.open(path)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(content)
}
