//! Resolution of path specifications into regular files

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::pattern::expand_pattern;
use crate::core::diagnostics::{Diagnostic, DiagnosticSink};
use crate::core::error::ScanError;

/// Resolve a single root path into the regular files reachable from it
///
/// # Arguments
/// * `root` - File or directory to resolve
/// * `recursive` - Whether to descend into directories
/// * `sink` - Receives diagnostics for skipped or unreadable entries
///
/// # Returns
/// Regular file paths in depth-first order, entries of each directory
/// sorted by name. A directory resolves to nothing unless `recursive` is
/// set. Faults are reported to `sink` and only drop the offending entry.
pub fn resolve_path(root: &Path, recursive: bool, sink: &dyn DiagnosticSink) -> Vec<PathBuf> {
    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) => {
            report_unresolvable(root, e, sink);
            return Vec::new();
        }
    };

    if metadata.is_file() {
        vec![root.to_path_buf()]
    } else if metadata.is_dir() {
        if recursive {
            walk_directory(root, sink)
        } else {
            log::debug!("not descending into `{}`", root.display());
            Vec::new()
        }
    } else {
        sink.report(Diagnostic::SpecialFile(root.to_path_buf()));
        Vec::new()
    }
}

/// Expand and resolve every specification, concatenating results in the
/// order the specifications were given
pub fn resolve_specs<S: AsRef<str>>(
    specs: &[S],
    recursive: bool,
    sink: &dyn DiagnosticSink,
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for spec in specs {
        let spec = spec.as_ref();
        sink.progress(spec);
        for path in expand_pattern(spec) {
            files.extend(resolve_path(&path, recursive, sink));
        }
    }

    files
}

fn walk_directory(root: &Path, sink: &dyn DiagnosticSink) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                let file_type = entry.file_type();
                if file_type.is_file() {
                    files.push(entry.into_path());
                } else if !file_type.is_dir() {
                    sink.report(Diagnostic::SpecialFile(entry.into_path()));
                }
            }
            Err(err) => {
                let fault = ScanError::from_walk(root, err);
                if is_dangling_symlink(fault.path()) {
                    sink.report(Diagnostic::SpecialFile(fault.path().to_path_buf()));
                } else {
                    sink.report(fault.into());
                }
            }
        }
    }

    files
}

/// A path whose metadata cannot be read is a special file when it is a
/// symlink pointing nowhere, otherwise a fault
fn report_unresolvable(path: &Path, err: io::Error, sink: &dyn DiagnosticSink) {
    if err.kind() == io::ErrorKind::NotFound && is_dangling_symlink(path) {
        sink.report(Diagnostic::SpecialFile(path.to_path_buf()));
    } else {
        sink.report(ScanError::from_io(path, err).into());
    }
}

fn is_dangling_symlink(path: &Path) -> bool {
    let is_symlink = fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    is_symlink && fs::metadata(path).is_err_and(|e| e.kind() == io::ErrorKind::NotFound)
}
