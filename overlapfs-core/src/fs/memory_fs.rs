//! In-memory filesystem implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Read};

use super::read_fs::{DirEntry, FsFile, Metadata, ReadFs};
use crate::error::{FsError, FsResult};
use crate::pattern::glob_by_read_dir;
use crate::path::{ancestors, base_name, valid_path};

/// Simple in-memory tree.
///
/// Files are keyed by their full path. Parent directories exist implicitly;
/// empty directories can be added explicitly.
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial files.
    ///
    /// Panics under the same conditions as `add_file`.
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let mut fs = Self::new();
        for (name, data) in files {
            fs.add_file(name.as_ref(), data);
        }
        fs
    }

    /// Add a file, creating its parent directories.
    ///
    /// Panics if `path` is not a valid layer path or clashes with an
    /// existing directory; see `try_add_file`.
    pub fn add_file(&mut self, path: &str, data: impl Into<Vec<u8>>) {
        if let Err(e) = self.try_add_file(path, data) {
            panic!("cannot add file {:?}: {}", path, e);
        }
    }

    /// Add a file, creating its parent directories.
    ///
    /// Fails without changing the tree if `path` is already a directory or
    /// any parent is already a file. Re-adding a file replaces its content.
    pub fn try_add_file(&mut self, path: &str, data: impl Into<Vec<u8>>) -> FsResult<()> {
        if !valid_path(path) || path == "." {
            return Err(FsError::InvalidPath(path.to_string()));
        }
        if self.dirs.contains(path) {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        self.check_parents(path)?;

        for dir in ancestors(path) {
            self.dirs.insert(dir.to_string());
        }
        self.files.insert(path.to_string(), data.into());
        Ok(())
    }

    /// Add a file from string content.
    pub fn add_file_str(&mut self, path: &str, content: &str) {
        self.add_file(path, content.as_bytes().to_vec());
    }

    /// Add a (possibly empty) directory and its parents.
    ///
    /// Panics if `path` is not a valid layer path or clashes with an
    /// existing file; see `try_add_dir`.
    pub fn add_dir(&mut self, path: &str) {
        if let Err(e) = self.try_add_dir(path) {
            panic!("cannot add directory {:?}: {}", path, e);
        }
    }

    /// Add a (possibly empty) directory and its parents.
    ///
    /// Fails without changing the tree if `path` or any parent is already a file.
    pub fn try_add_dir(&mut self, path: &str) -> FsResult<()> {
        if !valid_path(path) {
            return Err(FsError::InvalidPath(path.to_string()));
        }
        if path == "." {
            return Ok(());
        }
        if self.files.contains_key(path) {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        self.check_parents(path)?;

        for dir in ancestors(path) {
            self.dirs.insert(dir.to_string());
        }
        self.dirs.insert(path.to_string());
        Ok(())
    }

    fn check_parents(&self, path: &str) -> FsResult<()> {
        match ancestors(path).find(|dir| self.files.contains_key(*dir)) {
            Some(file) => Err(FsError::NotADirectory(file.to_string())),
            None => Ok(()),
        }
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn is_dir(&self, path: &str) -> bool {
        path == "." || self.dirs.contains(path)
    }

    fn check(path: &str) -> FsResult<()> {
        if valid_path(path) {
            Ok(())
        } else {
            Err(FsError::InvalidPath(path.to_string()))
        }
    }
}

/// Handle to an in-memory file or directory.
struct MemoryFile {
    meta: Metadata,
    data: Cursor<Vec<u8>>,
}

impl Read for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.meta.is_dir {
            return Err(io::Error::other(FsError::IsADirectory(self.meta.name.clone())));
        }
        self.data.read(buf)
    }
}

impl FsFile for MemoryFile {
    fn metadata(&self) -> FsResult<Metadata> {
        Ok(self.meta.clone())
    }
}

impl ReadFs for MemoryFs {
    fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>> {
        let meta = self.stat(path)?;
        let data = self.files.get(path).cloned().unwrap_or_default();
        Ok(Box::new(MemoryFile {
            meta,
            data: Cursor::new(data),
        }))
    }

    fn stat(&self, path: &str) -> FsResult<Metadata> {
        Self::check(path)?;
        if let Some(data) = self.files.get(path) {
            return Ok(Metadata::file(base_name(path), data.len() as u64));
        }
        if self.is_dir(path) {
            return Ok(Metadata::dir(base_name(path)));
        }
        Err(FsError::NotFound(path.to_string()))
    }

    fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        Self::check(path)?;
        if self.files.contains_key(path) {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        if !self.is_dir(path) {
            return Err(FsError::NotFound(path.to_string()));
        }

        let prefix = if path == "." {
            String::new()
        } else {
            format!("{}/", path)
        };
        let is_child = |full: &str| {
            full.strip_prefix(prefix.as_str())
                .is_some_and(|rest| !rest.contains('/'))
        };

        let mut entries: Vec<DirEntry> = self
            .files
            .iter()
            .filter(|(full, _)| is_child(full.as_str()))
            .map(|(full, data)| DirEntry {
                name: base_name(full).to_string(),
                is_dir: false,
                size: data.len() as u64,
            })
            .chain(
                self.dirs
                    .iter()
                    .filter(|full| is_child(full.as_str()))
                    .map(|full| DirEntry {
                        name: base_name(full).to_string(),
                        is_dir: true,
                        size: 0,
                    }),
            )
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
        glob_by_read_dir(self, pattern)
    }
}
