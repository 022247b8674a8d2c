//! Duplicate file detection by content digest

use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::diagnostics::DiagnosticSink;
use crate::core::digest::{compute_file_digest, ContentDigest};
use crate::core::error::ScanError;

/// A regular file together with the digest of its content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub path: PathBuf,
    pub digest: ContentDigest,
}

/// Two or more files with identical content
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub digest: ContentDigest,
    pub files: Vec<FileReference>,
}

impl DuplicateGroup {
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    /// Members beyond the first
    pub fn redundant_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}

/// Digest-to-files index that remembers first-appearance order
#[derive(Debug, Default)]
pub struct DigestIndex {
    positions: HashMap<ContentDigest, usize>,
    buckets: Vec<(ContentDigest, Vec<FileReference>)>,
}

impl DigestIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `file` to the bucket of its digest
    pub fn insert(&mut self, file: FileReference) {
        match self.positions.get(&file.digest) {
            Some(&idx) => self.buckets[idx].1.push(file),
            None => {
                self.positions.insert(file.digest, self.buckets.len());
                self.buckets.push((file.digest, vec![file]));
            }
        }
    }

    /// Number of distinct digests
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, digest: &ContentDigest) -> Option<&[FileReference]> {
        self.positions
            .get(digest)
            .map(|&idx| self.buckets[idx].1.as_slice())
    }

    /// Buckets holding at least two files, in first-appearance order
    pub fn into_duplicate_groups(self) -> Vec<DuplicateGroup> {
        self.buckets
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(digest, files)| DuplicateGroup { digest, files })
            .collect()
    }
}

impl FromIterator<FileReference> for DigestIndex {
    fn from_iter<I: IntoIterator<Item = FileReference>>(iter: I) -> Self {
        let mut index = DigestIndex::new();
        for file in iter {
            index.insert(file);
        }
        index
    }
}

/// Digest files in parallel on the current rayon pool
///
/// # Arguments
/// * `paths` - Resolved regular files
/// * `sink` - Receives a diagnostic for every file that cannot be read
/// * `progress` - Advanced once per file
///
/// # Returns
/// References for every readable file, in the order of `paths`
pub fn digest_files(
    paths: &[PathBuf],
    sink: &dyn DiagnosticSink,
    progress: &ProgressBar,
) -> Vec<FileReference> {
    digest_files_with(paths, sink, progress, compute_file_digest)
}

/// Like [`digest_files`], with the per-file digest function supplied
///
/// Diagnostics are reported after all workers finish, in the order of
/// `paths`.
pub fn digest_files_with<F>(
    paths: &[PathBuf],
    sink: &dyn DiagnosticSink,
    progress: &ProgressBar,
    digest: F,
) -> Vec<FileReference>
where
    F: Fn(&Path) -> io::Result<ContentDigest> + Sync,
{
    let results: Vec<Result<FileReference, ScanError>> = paths
        .par_iter()
        .progress_with(progress.clone())
        .map(|path| match digest(path) {
            Ok(digest) => Ok(FileReference {
                path: path.clone(),
                digest,
            }),
            Err(e) => Err(ScanError::from_io(path, e)),
        })
        .collect();

    let mut files = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(file) => files.push(file),
            Err(e) => sink.report(e.into()),
        }
    }
    files
}

/// Group files sharing a digest
///
/// # Returns
/// Groups of two or more files, ordered by the first appearance of each
/// digest; members keep their input order
pub fn find_duplicates<I>(files: I) -> Vec<DuplicateGroup>
where
    I: IntoIterator<Item = FileReference>,
{
    files
        .into_iter()
        .collect::<DigestIndex>()
        .into_duplicate_groups()
}
