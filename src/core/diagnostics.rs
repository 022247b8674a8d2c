//! Side channel for non-fatal diagnostics
//!
//! Diagnostics never travel with the scan result. Callers hand a
//! [`DiagnosticSink`] to the resolver and classifier, and the sink decides
//! where warnings and progress messages end up.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::ScanError;

/// Options recognised by the diagnostic emitters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Emit progress messages in addition to warnings
    pub verbose: bool,
}

/// A non-fatal event observed during a scan
#[derive(Debug)]
pub enum Diagnostic {
    /// Entry that is neither a directory nor a regular file
    SpecialFile(PathBuf),
    /// Entry that could not be traversed or read
    Fault(ScanError),
}

impl Diagnostic {
    pub fn path(&self) -> &Path {
        match self {
            Diagnostic::SpecialFile(path) => path,
            Diagnostic::Fault(err) => err.path(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SpecialFile(path) => {
                write!(f, "Ignoring special file `{}`", path.display())
            }
            Diagnostic::Fault(err) => write!(f, "{}", err),
        }
    }
}

impl From<ScanError> for Diagnostic {
    fn from(err: ScanError) -> Self {
        Diagnostic::Fault(err)
    }
}

/// Receiver for diagnostics and progress messages
///
/// Sinks are shared with the digest workers, hence `Sync`.
pub trait DiagnosticSink: Sync {
    fn report(&self, diagnostic: Diagnostic);

    /// Progress message, only shown in verbose mode
    fn progress(&self, message: &str);
}

/// Writes diagnostics to stderr, one line each
#[derive(Debug, Default)]
pub struct StderrDiagnostics {
    config: DiagnosticsConfig,
}

impl StderrDiagnostics {
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self { config }
    }
}

impl DiagnosticSink for StderrDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        let mut stderr = std::io::stderr().lock();
        let _ = match (&diagnostic, self.config.verbose) {
            (Diagnostic::Fault(err), true) => {
                let cause = std::error::Error::source(err)
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                writeln!(stderr, "{}: {}", diagnostic, cause)
            }
            _ => writeln!(stderr, "{}", diagnostic),
        };
    }

    fn progress(&self, message: &str) {
        if self.config.verbose {
            let _ = writeln!(std::io::stderr().lock(), "{}", message);
        }
    }
}

/// Keeps diagnostics in memory in the order they were reported
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    config: DiagnosticsConfig,
    diagnostics: Mutex<Vec<Diagnostic>>,
    progress: Mutex<Vec<String>>,
}

impl CollectingDiagnostics {
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rendered diagnostic lines
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .lock()
            .map(|d| d.iter().map(|diag| diag.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn progress_messages(&self) -> Vec<String> {
        self.progress.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner().unwrap_or_default()
    }
}

impl DiagnosticSink for CollectingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic);
        }
    }

    fn progress(&self, message: &str) {
        if !self.config.verbose {
            return;
        }
        if let Ok(mut progress) = self.progress.lock() {
            progress.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_special_file_message() {
        let diag = Diagnostic::SpecialFile(PathBuf::from("/dev/null"));
        assert_eq!(diag.to_string(), "Ignoring special file `/dev/null`");
        assert_eq!(diag.path(), Path::new("/dev/null"));
    }

    #[test]
    fn test_collecting_preserves_order() {
        let sink = CollectingDiagnostics::default();
        sink.report(Diagnostic::SpecialFile(PathBuf::from("a")));
        sink.report(
            ScanError::from_io(
                Path::new("b"),
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            )
            .into(),
        );

        assert_eq!(
            sink.messages(),
            vec!["Ignoring special file `a`", "Access denied `b`"]
        );

        let diagnostics = sink.into_diagnostics();
        assert!(matches!(diagnostics[0], Diagnostic::SpecialFile(_)));
        assert!(matches!(&diagnostics[1], Diagnostic::Fault(err) if err.is_access_denied()));
        assert_eq!(diagnostics[1].path(), Path::new("b"));
    }

    #[test]
    fn test_progress_requires_verbose() {
        let quiet = CollectingDiagnostics::default();
        quiet.progress("3 files scanned");
        assert!(quiet.progress_messages().is_empty());

        let verbose = CollectingDiagnostics::new(DiagnosticsConfig { verbose: true });
        verbose.progress("3 files scanned");
        assert_eq!(verbose.progress_messages(), vec!["3 files scanned"]);
        assert!(verbose.is_empty());
    }
}
