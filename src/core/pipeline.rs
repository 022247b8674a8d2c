//! End-to-end scans: resolve, digest, classify

use indicatif::ProgressBar;

use super::diagnostics::DiagnosticSink;
use crate::scanner::duplicate_detector::{digest_files, find_duplicates, DuplicateGroup, FileReference};
use crate::scanner::file_scanner::resolve_specs;

/// Options controlling path resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Descend into directories
    pub recursive: bool,
}

/// Result of a duplicate scan
#[derive(Debug, Clone, Default)]
pub struct DuplicateScan {
    /// Regular files found by resolution
    pub files_scanned: usize,
    /// Files whose content was digested successfully
    pub files_digested: usize,
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicateScan {
    pub fn redundant_files(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::redundant_count).sum()
    }
}

/// Find groups of files with identical content
///
/// # Arguments
/// * `specs` - Path specifications, each subject to wildcard expansion
/// * `options` - Resolution options
/// * `sink` - Side channel for diagnostics and progress
/// * `progress` - Progress bar for the digest stage
pub fn find_duplicate_files<S: AsRef<str>>(
    specs: &[S],
    options: &ScanOptions,
    sink: &dyn DiagnosticSink,
    progress: &ProgressBar,
) -> DuplicateScan {
    let paths = resolve_specs(specs, options.recursive, sink);
    sink.progress(&format!("{} files scanned", paths.len()));

    progress.set_length(paths.len() as u64);
    let files = digest_files(&paths, sink, progress);
    progress.finish_and_clear();
    let files_digested = files.len();

    sink.progress("Scanning for duplicates...");
    let groups = find_duplicates(files);
    sink.progress("done");
    log::info!(
        "{} of {} files digested, {} duplicate group(s)",
        files_digested,
        paths.len(),
        groups.len()
    );

    DuplicateScan {
        files_scanned: paths.len(),
        files_digested,
        groups,
    }
}

/// Digest every file the specifications resolve to
///
/// # Returns
/// References in traversal order; unreadable files are left out
pub fn fingerprint_files<S: AsRef<str>>(
    specs: &[S],
    options: &ScanOptions,
    sink: &dyn DiagnosticSink,
    progress: &ProgressBar,
) -> Vec<FileReference> {
    let paths = resolve_specs(specs, options.recursive, sink);
    sink.progress(&format!("{} files scanned", paths.len()));

    progress.set_length(paths.len() as u64);
    let files = digest_files(&paths, sink, progress);
    progress.finish_and_clear();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::{CollectingDiagnostics, DiagnosticsConfig};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_verbose_progress_messages() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a"), b"x").unwrap();
        fs::write(temp_dir.path().join("b"), b"x").unwrap();

        let spec = format!("{}/*", temp_dir.path().display());
        let sink = CollectingDiagnostics::new(DiagnosticsConfig { verbose: true });
        let scan = find_duplicate_files(&[&spec], &ScanOptions::default(), &sink, &ProgressBar::hidden());

        assert_eq!(scan.files_scanned, 2);
        assert_eq!(scan.files_digested, 2);
        assert_eq!(scan.redundant_files(), 1);
        assert_eq!(
            sink.progress_messages(),
            vec![
                spec.clone(),
                "2 files scanned".to_string(),
                "Scanning for duplicates...".to_string(),
                "done".to_string(),
            ]
        );
    }

    #[test]
    fn test_fingerprint_keeps_traversal_order() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested/z"), b"1").unwrap();
        fs::write(temp_dir.path().join("y"), b"2").unwrap();

        let spec = temp_dir.path().display().to_string();
        let sink = CollectingDiagnostics::default();
        let options = ScanOptions { recursive: true };
        let files = fingerprint_files(&[spec], &options, &sink, &ProgressBar::hidden());

        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![temp_dir.path().join("nested/z"), temp_dir.path().join("y")]
        );
    }
}
