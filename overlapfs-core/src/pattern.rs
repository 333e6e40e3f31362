//! Directory-walking glob shared by the concrete filesystem layers.
//!
//! Patterns use `*`, `?` and `[...]` classes. Wildcards match within a
//! single path element only; `/` must appear literally.

use glob::{MatchOptions, Pattern};

use crate::error::{FsError, FsResult};
use crate::fs::ReadFs;
use crate::path::{join, split};

/// Bound on how many wildcard directory levels one pattern may contain.
const MAX_DEPTH: usize = 32;

fn match_options() -> MatchOptions {
    let mut options = MatchOptions::new();
    options.require_literal_separator = true;
    options
}

/// Whether a pattern contains any glob metacharacter.
pub fn has_meta(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Glob `pattern` using only `stat` and `read_dir` on `fs`.
///
/// Results come back in listing order, directory by directory. Directories
/// that cannot be listed contribute no matches.
pub fn glob_by_read_dir<F: ReadFs + ?Sized>(fs: &F, pattern: &str) -> FsResult<Vec<String>> {
    glob_depth(fs, pattern, 0)
}

fn compile(pattern: &str) -> FsResult<Pattern> {
    Pattern::new(pattern).map_err(|e| FsError::BadPattern(format!("{}: {}", pattern, e.msg)))
}

/// Check that `pattern` is well formed without matching anything.
pub fn validate(pattern: &str) -> FsResult<()> {
    compile(pattern).map(|_| ())
}

fn glob_depth<F: ReadFs + ?Sized>(fs: &F, pattern: &str, depth: usize) -> FsResult<Vec<String>> {
    if depth > MAX_DEPTH {
        return Err(FsError::BadPattern(pattern.to_string()));
    }

    // Reject malformed patterns even when nothing would be listed.
    compile(pattern)?;

    if !has_meta(pattern) {
        return Ok(match fs.stat(pattern) {
            Ok(_) => vec![pattern.to_string()],
            Err(_) => Vec::new(),
        });
    }

    let (dir, file) = split(pattern);
    if !has_meta(dir) {
        return glob_in(fs, dir, file);
    }

    let mut matches = Vec::new();
    for candidate in glob_depth(fs, dir, depth + 1)? {
        matches.extend(glob_in(fs, &candidate, file)?);
    }
    Ok(matches)
}

fn glob_in<F: ReadFs + ?Sized>(fs: &F, dir: &str, file: &str) -> FsResult<Vec<String>> {
    let pattern = compile(file)?;
    let options = match_options();
    let entries = match fs.read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(Vec::new()),
    };

    Ok(entries
        .iter()
        .filter(|entry| pattern.matches_with(&entry.name, options))
        .map(|entry| join(dir, &entry.name))
        .collect())
}
