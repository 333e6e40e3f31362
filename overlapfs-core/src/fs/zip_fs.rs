//! Read-only filesystem backed by a ZIP archive.
//!
//! The archive is extracted into memory once at load time; lookups never
//! touch the archive again.

use std::io::{Read, Seek};
use std::path::Path;

use tracing::{debug, warn};
use zip::ZipArchive;

use super::memory_fs::MemoryFs;
use super::read_fs::{DirEntry, FsFile, Metadata, ReadFs};
use crate::error::FsResult;
use crate::path::valid_path;

/// ZIP archive exposed as a read-only tree. Nested paths are kept as-is.
#[derive(Debug, Clone, Default)]
pub struct ZipFs {
    tree: MemoryFs,
}

impl ZipFs {
    /// Load an archive from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> FsResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut tree = MemoryFs::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().trim_end_matches('/').to_string();

            if !valid_path(&name) || name == "." {
                warn!(entry = %file.name(), "skipping archive entry with invalid path");
                continue;
            }

            let added = if file.is_dir() {
                tree.try_add_dir(&name)
            } else {
                let mut content = Vec::new();
                file.read_to_end(&mut content)?;
                tree.try_add_file(&name, content)
            };

            // First entry wins when a name is used both as file and directory.
            if let Err(e) = added {
                warn!(entry = %name, error = %e, "skipping conflicting archive entry");
            }
        }

        debug!(files = tree.len(), "loaded zip archive");
        Ok(Self { tree })
    }

    /// Load an archive from a file path.
    pub fn from_path(path: &Path) -> FsResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Number of files in the archive.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl ReadFs for ZipFs {
    fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>> {
        self.tree.open(path)
    }

    fn stat(&self, path: &str) -> FsResult<Metadata> {
        self.tree.stat(path)
    }

    fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        self.tree.read_dir(path)
    }

    fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
        self.tree.glob(pattern)
    }
}
