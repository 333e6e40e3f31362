//! View of a sub-tree of another filesystem.

use super::read_fs::{DirEntry, FsFile, Metadata, ReadFs};
use crate::error::{FsError, FsResult};
use crate::path::{join, valid_path};
use crate::pattern::validate as validate_pattern;

/// Filesystem rooted at `dir` inside another filesystem.
///
/// Paths are resolved by prefixing `dir`; nothing else is reinterpreted.
pub struct SubFs<F: ReadFs> {
    inner: F,
    dir: String,
}

impl<F: ReadFs> SubFs<F> {
    pub fn new(inner: F, dir: &str) -> FsResult<Self> {
        if !valid_path(dir) {
            return Err(FsError::InvalidPath(dir.to_string()));
        }
        Ok(Self {
            inner,
            dir: dir.to_string(),
        })
    }

    fn full(&self, path: &str) -> FsResult<String> {
        if !valid_path(path) {
            return Err(FsError::InvalidPath(path.to_string()));
        }
        Ok(match path {
            "." => self.dir.clone(),
            _ => join(&self.dir, path),
        })
    }
}

impl<F: ReadFs> ReadFs for SubFs<F> {
    fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>> {
        self.inner.open(&self.full(path)?)
    }

    fn stat(&self, path: &str) -> FsResult<Metadata> {
        self.inner.stat(&self.full(path)?)
    }

    fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        self.inner.read_dir(&self.full(path)?)
    }

    fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
        if self.dir == "." {
            return self.inner.glob(pattern);
        }
        // The view's own root; joining would produce an invalid "dir/.".
        if pattern == "." {
            return Ok(match self.inner.stat(&self.dir) {
                Ok(_) => vec![".".to_string()],
                Err(_) => Vec::new(),
            });
        }
        // Validate before touching the inner filesystem.
        validate_pattern(pattern)?;

        let prefix = format!("{}/", self.dir);
        let matches = self.inner.glob(&join(&self.dir, pattern))?;
        Ok(matches
            .into_iter()
            .filter_map(|m| m.strip_prefix(prefix.as_str()).map(str::to_string))
            .collect())
    }
}
