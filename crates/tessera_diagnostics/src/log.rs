//! # Diagnostic Log
//!
//! The default sink. Records are kept in arrival order until drained.

use std::io::Write;

use parking_lot::Mutex;

use crate::record::{Diagnostic, Severity};
use crate::DiagnosticSink;

/// What a [`Severity::Fatal`] report does to the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FatalPolicy {
    /// Keep the record and return to the reporter.
    #[default]
    Record,
    /// Flush every queued record to stderr, then abort the process.
    Abort,
}

/// In-memory diagnostic sink mirrored into `tracing`.
///
/// # Thread Safety
///
/// The record list sits behind a mutex so one log can be shared between
/// registries, but reports are expected from a single thread at a time.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    /// Queued records, oldest first.
    records: Mutex<Vec<Diagnostic>>,
    /// Escalation for fatal reports.
    fatal_policy: FatalPolicy,
}

impl DiagnosticLog {
    /// Creates an empty log that records fatal reports without aborting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty log with the given fatal escalation.
    #[must_use]
    pub fn with_fatal_policy(fatal_policy: FatalPolicy) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fatal_policy,
        }
    }

    /// Returns the fatal escalation policy.
    #[inline]
    #[must_use]
    pub const fn fatal_policy(&self) -> FatalPolicy {
        self.fatal_policy
    }

    /// Returns a snapshot of every queued record.
    #[must_use]
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    /// Removes and returns every queued record.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Number of queued records at `minimum` severity or worse.
    #[must_use]
    pub fn count_at_least(&self, minimum: Severity) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|record| record.severity >= minimum)
            .count()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Renders queued records at `minimum` severity or worse, one per line.
    #[must_use]
    pub fn render(&self, minimum: Severity) -> String {
        let records = self.records.lock();
        let mut out = String::new();
        for record in records.iter().filter(|record| record.severity >= minimum) {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        out
    }

    /// Writes queued records at `minimum` severity or worse to stderr and
    /// removes them. Less severe records stay queued.
    pub fn flush(&self, minimum: Severity) {
        let mut rendered = String::new();
        self.records.lock().retain(|record| {
            if record.severity < minimum {
                return true;
            }
            rendered.push_str(&record.to_string());
            rendered.push('\n');
            false
        });

        let mut stderr = std::io::stderr().lock();
        // Nothing sensible to do if stderr is gone.
        let _ = stderr.write_all(rendered.as_bytes());
        let _ = stderr.flush();
    }

    fn mirror(diagnostic: &Diagnostic) {
        let location = diagnostic.location.to_string();
        match diagnostic.severity {
            Severity::Debug => {
                tracing::debug!(location = %location, "{}", diagnostic.message);
            }
            Severity::Warn => {
                tracing::warn!(location = %location, "{}", diagnostic.message);
            }
            Severity::Error => {
                tracing::error!(location = %location, "{}", diagnostic.message);
            }
            Severity::Fatal => {
                tracing::error!(location = %location, fatal = true, "{}", diagnostic.message);
            }
        }
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn report(&self, diagnostic: Diagnostic) {
        Self::mirror(&diagnostic);
        let fatal = diagnostic.severity == Severity::Fatal;
        self.records.lock().push(diagnostic);

        if fatal && self.fatal_policy == FatalPolicy::Abort {
            eprintln!("-- FATAL ERROR OCCURRED --");
            self.flush(Severity::Debug);
            std::process::abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic;

    #[test]
    fn test_records_in_order() {
        let log = DiagnosticLog::new();
        diagnostic!(log, Severity::Debug, "first");
        diagnostic!(log, Severity::Error, "second {}", 2);

        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].message, "second 2");
        assert_eq!(records[1].severity, Severity::Error);
    }

    #[test]
    fn test_fatal_recorded_without_abort() {
        let log = DiagnosticLog::new();
        diagnostic!(log, Severity::Fatal, "pool exhausted");

        assert_eq!(log.fatal_policy(), FatalPolicy::Record);
        assert_eq!(log.count_at_least(Severity::Fatal), 1);
    }

    #[test]
    fn test_drain_empties_log() {
        let log = DiagnosticLog::new();
        diagnostic!(log, Severity::Warn, "no components");

        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_render_filters_by_severity() {
        let log = DiagnosticLog::new();
        diagnostic!(log, Severity::Debug, "quiet");
        diagnostic!(log, Severity::Warn, "loud");

        let rendered = log.render(Severity::Warn);
        assert!(rendered.contains("WARN"));
        assert!(rendered.contains("loud"));
        assert!(!rendered.contains("quiet"));
    }

    #[test]
    fn test_flush_keeps_less_severe_records() {
        let log = DiagnosticLog::new();
        diagnostic!(log, Severity::Debug, "quiet");
        diagnostic!(log, Severity::Error, "loud");

        log.flush(Severity::Error);

        let records = log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "quiet");
        assert_eq!(log.count_at_least(Severity::Error), 0);

        log.flush(Severity::Debug);
        assert!(log.is_empty());
    }

    #[test]
    fn test_location_captured() {
        let log = DiagnosticLog::new();
        diagnostic!(log, Severity::Warn, "here");

        let record = &log.records()[0];
        assert!(record.location.file.ends_with("log.rs"));
        assert!(record.location.line > 0);
    }
}
