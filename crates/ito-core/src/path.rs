//! # Path Helpers
//!
//! Content files are authored on Windows and Linux alike, so reference
//! values may use either separator. Everything in the workspace works on
//! `/`-separated relative strings and only turns them into a [`PathBuf`]
//! when joining onto a root, one component at a time.

use std::path::{Component, Path, PathBuf};

/// Replace every `\` with `/`.
pub fn normalize_separators(value: &str) -> String {
    value.replace('\\', "/")
}

/// Join a `/`- or `\`-separated relative reference onto `root`.
///
/// Empty components (doubled or trailing separators) are dropped.
pub fn join_relative(root: &Path, relative: &str) -> PathBuf {
    let normalized = normalize_separators(relative);
    let mut path = root.to_path_buf();
    for part in normalized.split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let at_name = matches!(last, Some(Component::Normal(_)));
                // `..` above the root stays at the root.
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if at_name {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// The visited-set identity of a record path: absolute and lexically
/// normalized, so two spellings of one file share an identity.
pub fn identity_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    lexical_normalize(&absolute)
}
