//! Digests, diagnostics and the scan pipeline

pub mod diagnostics;
pub mod digest;
pub mod error;
pub mod pipeline;
