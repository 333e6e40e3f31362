//! Read-only overlay of one filesystem on top of another.

use tracing::debug;

use crate::error::FsResult;
use crate::fs::{DirEntry, FsFile, Metadata, ReadFs};
use crate::merge::merge_unique;

/// Overlay filesystem: `overlay` layered on top of `base`.
///
/// - `open` and `stat` use the overlay unless it reports not-found, then fall
///   back to the base
/// - `read_dir` and `glob` merge both sides, overlay entries shadowing base
///   entries of the same name
///
/// Any error from the overlay other than not-found is returned as-is and the
/// base is not consulted, even if it holds the path. Listings have no such
/// fallback: an error on either side fails the whole call.
///
/// Neither layer is ever modified. Pass references or `Arc`s to keep
/// ownership with the caller.
#[derive(Debug, Clone)]
pub struct OverlapFs<A: ReadFs, B: ReadFs> {
    base: A,
    overlay: B,
}

impl<A: ReadFs, B: ReadFs> OverlapFs<A, B> {
    pub fn new(base: A, overlay: B) -> Self {
        Self { base, overlay }
    }

    /// Get the lower (base) filesystem.
    pub fn base(&self) -> &A {
        &self.base
    }

    /// Get the upper (overlay) filesystem.
    pub fn overlay(&self) -> &B {
        &self.overlay
    }
}

impl<A: ReadFs, B: ReadFs> ReadFs for OverlapFs<A, B> {
    fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>> {
        match self.overlay.open(path) {
            Ok(file) => {
                debug!(path, layer = "overlay", "open");
                Ok(file)
            }
            Err(e) if e.is_not_found() => {
                debug!(path, layer = "base", "open");
                self.base.open(path)
            }
            Err(e) => Err(e),
        }
    }

    fn stat(&self, path: &str) -> FsResult<Metadata> {
        match self.overlay.stat(path) {
            Err(e) if e.is_not_found() => self.base.stat(path),
            other => other,
        }
    }

    fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        let upper = self.overlay.read_dir(path)?;
        let lower = self.base.read_dir(path)?;
        Ok(merge_unique(upper, lower, |entry| entry.name.as_str()))
    }

    fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
        let upper = self.overlay.glob(pattern)?;
        let lower = self.base.glob(pattern)?;
        Ok(merge_unique(upper, lower, String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsError;
    use crate::fs::{read_file, MemoryFs};

    /// Layer that fails every call with a permission error.
    struct DeniedFs;

    fn denied(path: &str) -> FsError {
        FsError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            path.to_string(),
        ))
    }

    impl ReadFs for DeniedFs {
        fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>> {
            Err(denied(path))
        }

        fn stat(&self, path: &str) -> FsResult<Metadata> {
            Err(denied(path))
        }

        fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
            Err(denied(path))
        }

        fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
            Err(denied(pattern))
        }
    }

    /// Layer where nothing exists; its errors name the layer.
    struct EmptyFs(&'static str);

    impl EmptyFs {
        fn missing(&self, path: &str) -> FsError {
            FsError::NotFound(format!("{}:{}", self.0, path))
        }
    }

    impl ReadFs for EmptyFs {
        fn open(&self, path: &str) -> FsResult<Box<dyn FsFile>> {
            Err(self.missing(path))
        }

        fn stat(&self, path: &str) -> FsResult<Metadata> {
            Err(self.missing(path))
        }

        fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
            Err(self.missing(path))
        }

        fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
            Err(self.missing(pattern))
        }
    }

    fn is_denied(err: &FsError) -> bool {
        matches!(err, FsError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    }

    #[test]
    fn test_read_from_base() {
        let mut base = MemoryFs::new();
        base.add_file("base.txt", b"base content".to_vec());

        let fs = OverlapFs::new(base, MemoryFs::new());

        assert_eq!(read_file(&fs, "base.txt").unwrap(), b"base content");
        assert_eq!(fs.stat("base.txt").unwrap().size, 12);
    }

    #[test]
    fn test_read_from_overlay() {
        let mut overlay = MemoryFs::new();
        overlay.add_file("new.txt", b"new content".to_vec());

        let fs = OverlapFs::new(MemoryFs::new(), overlay);

        assert_eq!(read_file(&fs, "new.txt").unwrap(), b"new content");
    }

    #[test]
    fn test_overlay_shadows_base_file() {
        let base = MemoryFs::with_files([("file.txt", b"original".to_vec())]);
        let overlay = MemoryFs::with_files([("file.txt", b"modified!".to_vec())]);

        let fs = OverlapFs::new(base, overlay);

        assert_eq!(read_file(&fs, "file.txt").unwrap(), b"modified!");
        assert_eq!(fs.stat("file.txt").unwrap().size, 9);
        assert_eq!(read_file(fs.base(), "file.txt").unwrap(), b"original");
    }

    #[test]
    fn test_missing_everywhere() {
        let fs = OverlapFs::new(MemoryFs::new(), MemoryFs::new());
        assert!(fs.open("nope.txt").err().unwrap().is_not_found());
        assert!(fs.stat("nope.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn test_base_not_found_is_surfaced() {
        let fs = OverlapFs::new(EmptyFs("base"), EmptyFs("overlay"));

        assert!(matches!(fs.stat("x.txt"), Err(FsError::NotFound(ref p)) if p == "base:x.txt"));
        assert!(matches!(fs.open("x.txt").err(), Some(FsError::NotFound(ref p)) if p == "base:x.txt"));
    }

    #[test]
    fn test_base_not_consulted_when_overlay_has_path() {
        let overlay = MemoryFs::with_files([("a.txt", b"from overlay".to_vec())]);
        let fs = OverlapFs::new(DeniedFs, overlay);

        assert_eq!(read_file(&fs, "a.txt").unwrap(), b"from overlay");
        assert_eq!(fs.stat("a.txt").unwrap().size, 12);
        assert_eq!(fs.overlay().len(), 1);
    }

    #[test]
    fn test_base_error_surfaces_after_fallback() {
        let fs = OverlapFs::new(DeniedFs, MemoryFs::new());
        assert!(is_denied(&fs.stat("a.txt").unwrap_err()));
        assert!(is_denied(&fs.open("a.txt").err().unwrap()));
    }

    #[test]
    fn test_overlay_error_hides_base_file() {
        // A failing overlay is never bypassed, even though the base has the file.
        let base = MemoryFs::with_files([("a.txt", b"from base".to_vec())]);
        let fs = OverlapFs::new(base, DeniedFs);

        assert!(is_denied(&fs.open("a.txt").err().unwrap()));
        assert!(is_denied(&fs.stat("a.txt").unwrap_err()));
    }

    #[test]
    fn test_invalid_path_in_overlay_does_not_fall_back() {
        let base = MemoryFs::with_files([("a.txt", vec![1])]);
        let fs = OverlapFs::new(base, MemoryFs::new());
        assert!(matches!(fs.stat("/a.txt"), Err(FsError::InvalidPath(_))));
    }

    #[test]
    fn test_read_dir_merges() {
        let base = MemoryFs::with_files([("b.txt", vec![1]), ("shared.txt", vec![1])]);
        let overlay = MemoryFs::with_files([("a.txt", vec![2]), ("shared.txt", vec![2, 2])]);

        let fs = OverlapFs::new(base, overlay);
        let entries = fs.read_dir(".").unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "shared.txt"]);
        // Overlay entry kept for the shared name
        assert_eq!(entries[2].size, 2);
    }

    #[test]
    fn test_read_dir_fails_if_either_side_fails() {
        let fs = OverlapFs::new(MemoryFs::new(), DeniedFs);
        assert!(is_denied(&fs.read_dir(".").unwrap_err()));

        let fs = OverlapFs::new(DeniedFs, MemoryFs::new());
        assert!(is_denied(&fs.read_dir(".").unwrap_err()));
    }

    #[test]
    fn test_read_dir_missing_on_one_side_fails() {
        let overlay = MemoryFs::with_files([("only-b/x.txt", vec![1])]);
        let fs = OverlapFs::new(MemoryFs::new(), overlay);
        assert!(fs.read_dir("only-b").unwrap_err().is_not_found());
    }

    #[test]
    fn test_glob_merges() {
        let base = MemoryFs::with_files([("x.go", vec![1]), ("y.go", vec![1])]);
        let overlay = MemoryFs::with_files([("y.go", vec![2]), ("z.go", vec![2])]);

        let fs = OverlapFs::new(base, overlay);
        assert_eq!(fs.glob("*.go").unwrap(), vec!["x.go", "y.go", "z.go"]);
    }

    #[test]
    fn test_glob_fails_if_base_fails() {
        let overlay = MemoryFs::with_files([("z.go", vec![2])]);
        let fs = OverlapFs::new(DeniedFs, overlay);
        assert!(is_denied(&fs.glob("*.go").unwrap_err()));
    }

    #[test]
    fn test_glob_fails_if_overlay_fails() {
        let base = MemoryFs::with_files([("x.go", vec![1])]);
        let fs = OverlapFs::new(base, DeniedFs);
        assert!(is_denied(&fs.glob("*.go").unwrap_err()));
    }

    #[test]
    fn test_borrowed_layers() {
        let base = MemoryFs::with_files([("a.txt", b"a".to_vec())]);
        let overlay = MemoryFs::with_files([("b.txt", b"b".to_vec())]);

        let fs = OverlapFs::new(&base, &overlay);
        assert_eq!(fs.glob("*.txt").unwrap(), vec!["a.txt", "b.txt"]);
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_stacked_overlays() {
        let bottom = MemoryFs::with_files([("f.txt", b"bottom".to_vec()), ("g.txt", b"g".to_vec())]);
        let middle = MemoryFs::with_files([("f.txt", b"middle".to_vec())]);
        let top = MemoryFs::with_files([("h.txt", b"h".to_vec())]);

        let fs = OverlapFs::new(OverlapFs::new(bottom, middle), top);
        assert_eq!(read_file(&fs, "f.txt").unwrap(), b"middle");
        assert_eq!(fs.glob("*.txt").unwrap(), vec!["f.txt", "g.txt", "h.txt"]);
    }
}
