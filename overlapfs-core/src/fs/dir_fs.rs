//! Local-disk filesystem rooted at a directory.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::warn;

use super::read_fs::{DirEntry, FsFile, Metadata, ReadFs};
use crate::error::{FsError, FsResult};
use crate::pattern::glob_by_read_dir;
use crate::path::{base_name, valid_path};

/// Directory on disk exposed as a read-only tree.
///
/// Only valid layer paths are accepted, so lookups cannot escape `root`
/// through `..` or absolute paths. Symlinks are followed.
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> FsResult<PathBuf> {
        if !valid_path(path) {
            return Err(FsError::InvalidPath(path.to_string()));
        }
        if path == "." {
            return Ok(self.root.clone());
        }
        Ok(self.root.join(path))
    }
}

/// Map an I/O failure for `path`, keeping missing files recognizable.
fn io_error(path: &str, err: io::Error) -> FsError {
    match err.kind() {
        io::ErrorKind::NotFound => FsError::NotFound(path.to_string()),
        _ => FsError::Io(err),
    }
}

fn to_metadata(name: &str, meta: &std::fs::Metadata) -> Metadata {
    Metadata {
        name: name.to_string(),
        size: if meta.is_dir() { 0 } else { meta.len() },
        is_dir: meta.is_dir(),
        modified: meta.modified().ok(),
    }
}

struct DiskFile {
    file: File,
    meta: Metadata,
}

impl Read for DiskFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl FsFile for DiskFile {
    fn metadata(&self) -> FsResult<Metadata> {
        Ok(self.meta.clone())
    }
}

impl ReadFs for DirFs {
    fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>> {
        let full = self.resolve(path)?;
        let file = File::open(&full).map_err(|e| io_error(path, e))?;
        let meta = file.metadata().map_err(|e| io_error(path, e))?;
        Ok(Box::new(DiskFile {
            file,
            meta: to_metadata(base_name(path), &meta),
        }))
    }

    fn stat(&self, path: &str) -> FsResult<Metadata> {
        let full = self.resolve(path)?;
        let meta = std::fs::metadata(&full).map_err(|e| io_error(path, e))?;
        Ok(to_metadata(base_name(path), &meta))
    }

    fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        let full = self.resolve(path)?;
        let meta = std::fs::metadata(&full).map_err(|e| io_error(path, e))?;
        if !meta.is_dir() {
            return Err(FsError::NotADirectory(path.to_string()));
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&full)? {
            let entry = entry?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(dir = %full.display(), name = ?raw, "skipping non UTF-8 file name");
                    continue;
                }
            };
            // Follow symlinks so entries agree with stat; dangling links list as themselves.
            let meta = match std::fs::metadata(entry.path()) {
                Ok(meta) => meta,
                Err(_) => entry.metadata()?,
            };
            entries.push(DirEntry::from(to_metadata(&name, &meta)));
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
        glob_by_read_dir(self, pattern)
    }
}
