//! Report writing functionality

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::core::pipeline::DuplicateScan;
use crate::scanner::duplicate_detector::{DuplicateGroup, FileReference};

/// One exported file fingerprint
///
/// Fields are declared in key order so the JSON output has sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FingerprintRecord {
    pub digest: String,
    pub filename: String,
}

impl From<&FileReference> for FingerprintRecord {
    fn from(file: &FileReference) -> Self {
        Self {
            digest: file.digest.to_hex(),
            filename: path_string(&file.path),
        }
    }
}

/// UTF-8 rendering of a path for JSON output
///
/// JSON strings cannot carry arbitrary bytes, so non-UTF-8 names are
/// rendered with U+FFFD replacement characters and a warning is logged.
fn path_string(path: &Path) -> String {
    match path.to_str() {
        Some(s) => s.to_owned(),
        None => {
            log::warn!("file name is not valid UTF-8, exported lossily: {}", path.display());
            path.to_string_lossy().into_owned()
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonDuplicateGroup {
    digest: String,
    files: Vec<String>,
}

#[derive(Debug, Serialize)]
struct JsonSummary {
    files_scanned: usize,
    files_digested: usize,
    duplicate_groups: usize,
    redundant_files: usize,
}

#[derive(Debug, Serialize)]
struct JsonReport {
    duplicates: Vec<JsonDuplicateGroup>,
    summary: JsonSummary,
}

/// Write duplicate groups as plain text
///
/// The first member of each group is printed on its own line, the rest
/// indented by a tab and a space, and groups are separated by a blank line.
pub fn write_report<W: Write>(out: &mut W, groups: &[DuplicateGroup]) -> Result<()> {
    for group in groups {
        let mut paths = group.paths();
        if let Some(first) = paths.next() {
            writeln!(out, "{}", first.display())?;
        }
        for path in paths {
            writeln!(out, "\t {}", path.display())?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Write a duplicate scan as pretty-printed JSON
pub fn write_json_report<W: Write>(out: &mut W, scan: &DuplicateScan) -> Result<()> {
    let report = JsonReport {
        duplicates: scan
            .groups
            .iter()
            .map(|group| JsonDuplicateGroup {
                digest: group.digest.to_hex(),
                files: group.paths().map(path_string).collect(),
            })
            .collect(),
        summary: JsonSummary {
            files_scanned: scan.files_scanned,
            files_digested: scan.files_digested,
            duplicate_groups: scan.groups.len(),
            redundant_files: scan.redundant_files(),
        },
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Fingerprint records sorted by filename, then digest
pub fn fingerprint_records(files: &[FileReference]) -> Vec<FingerprintRecord> {
    let mut records: Vec<FingerprintRecord> = files.iter().map(FingerprintRecord::from).collect();
    records.sort_by(|a, b| a.filename.cmp(&b.filename).then_with(|| a.digest.cmp(&b.digest)));
    records
}

/// Write fingerprints as a JSON array with four-space indentation
pub fn write_fingerprints<W: Write>(out: &mut W, files: &[FileReference]) -> Result<()> {
    let records = fingerprint_records(files);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut *out, formatter);
    records.serialize(&mut serializer)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
