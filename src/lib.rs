//! Duplicate File Finder Library
//!
//! Finds files with identical content by digesting every resolved file and
//! grouping equal digests.

pub mod core;
pub mod logging;
pub mod scanner;
pub mod reporting;

pub use crate::core::digest;
pub use crate::scanner::file_scanner;
pub use crate::reporting::report_writer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::diagnostics::{
        CollectingDiagnostics, Diagnostic, DiagnosticSink, DiagnosticsConfig, StderrDiagnostics,
    };
    pub use crate::core::digest::{compute_file_digest, ContentDigest};
    pub use crate::core::error::ScanError;
    pub use crate::core::pipeline::{find_duplicate_files, fingerprint_files, DuplicateScan, ScanOptions};
    pub use crate::scanner::duplicate_detector::{digest_files, digest_files_with, find_duplicates, DigestIndex, DuplicateGroup, FileReference};
    pub use crate::scanner::file_scanner::{resolve_path, resolve_specs};
    pub use crate::reporting::report_writer::{write_fingerprints, write_json_report, write_report};
}
