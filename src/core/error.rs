//! Per-entry faults raised while resolving or digesting files

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A recoverable fault tied to a single filesystem entry
///
/// None of these abort a scan. They are turned into diagnostics where they
/// are discovered and the entry contributes nothing to the result.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Access denied `{}`", path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unexpected error `{}`", path.display())]
    Unexpected {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised for `path`
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::PermissionDenied {
            ScanError::AccessDenied { path, source }
        } else {
            ScanError::Unexpected { path, source }
        }
    }

    /// Classify a directory walk error, falling back to `root` when the
    /// error carries no path of its own
    pub fn from_walk(root: &Path, err: walkdir::Error) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        Self::from_io(&path, err.into())
    }

    pub fn path(&self) -> &Path {
        match self {
            ScanError::AccessDenied { path, .. } | ScanError::Unexpected { path, .. } => path,
        }
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, ScanError::AccessDenied { .. })
    }
}
