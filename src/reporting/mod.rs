//! Report rendering

pub mod report_writer;

pub use report_writer::{write_fingerprints, write_json_report, write_report, FingerprintRecord};
