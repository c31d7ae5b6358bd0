//! Filesystem helpers: page discovery, path normalization and
//! content-addressed writes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

/// File extensions treated as HTML pages.
const PAGE_EXTENSIONS: &[&str] = &["html", "htm"];

/// Check whether a path looks like an HTML page.
pub fn is_page(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| PAGE_EXTENSIONS.iter().any(|p| ext.eq_ignore_ascii_case(p)))
}

/// Expand user-supplied paths into a sorted list of HTML pages.
///
/// Files are kept as given (even without an HTML extension), directories
/// are walked recursively for `*.html` / `*.htm`.
pub fn collect_pages(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut pages = Vec::new();

    for path in paths {
        if path.is_dir() {
            pages.extend(
                WalkDir::new(path)
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.path())
                    .filter(|p| is_page(p)),
            );
        } else {
            pages.push(path.clone());
        }
    }

    pages.sort();
    pages.dedup();
    pages
}

/// Absolute, canonical path when possible.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

/// Write `content` to `path` unless the file already holds identical bytes.
///
/// Returns `true` if the file was written.
pub fn write_if_changed(path: &Path, content: &[u8]) -> io::Result<bool> {
    if let Ok(existing) = fs::read(path)
        && blake3::hash(&existing) == blake3::hash(content)
    {
        return Ok(false);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(true)
}
