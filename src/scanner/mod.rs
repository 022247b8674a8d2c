//! File resolution and duplicate classification

pub mod duplicate_detector;
pub mod file_scanner;
pub mod pattern;

pub use duplicate_detector::{digest_files, digest_files_with, find_duplicates, DigestIndex, DuplicateGroup, FileReference};
pub use file_scanner::{resolve_path, resolve_specs};
pub use pattern::expand_pattern;
