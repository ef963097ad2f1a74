//! # Content Source
//!
//! All filesystem traffic of a validation run (reading records, checking
//! that referenced files exist) goes through [`ContentSource`]. Production
//! code uses [`DiskSource`]; tests wrap it to count or redirect calls.

use std::io;
use std::path::Path;

/// Read access to the content tree.
pub trait ContentSource {
    /// Read a whole file as UTF-8. The handle is closed before returning.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// True if something exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// True if `path` is a regular file. Sources without a notion of
    /// directories fall back to [`exists`](Self::exists).
    fn is_file(&self, path: &Path) -> bool {
        self.exists(path)
    }
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskSource;

impl ContentSource for DiskSource {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

impl<T: ContentSource + ?Sized> ContentSource for &T {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }
}
