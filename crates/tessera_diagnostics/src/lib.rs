//! # TESSERA Diagnostics
//!
//! The failure ledger every storage layer reports into.
//!
//! ## Model
//!
//! - A [`Diagnostic`] is one structured record: where it happened, how bad
//!   it is, what happened and when.
//! - A [`DiagnosticSink`] accepts records fire-and-forget. The engine never
//!   reads anything back from it.
//! - [`DiagnosticLog`] is the default sink: it keeps every record, mirrors it
//!   into `tracing`, and decides what a [`Severity::Fatal`] record means for
//!   the process through its [`FatalPolicy`].
//!
//! ## Example
//!
//! ```rust
//! use tessera_diagnostics::{diagnostic, DiagnosticLog, Severity};
//!
//! let log = DiagnosticLog::new();
//! diagnostic!(log, Severity::Warn, "entity {} had no components", 7);
//! assert_eq!(log.count_at_least(Severity::Warn), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod log;
mod record;

pub use log::{DiagnosticLog, FatalPolicy};
pub use record::{Diagnostic, Location, Severity};

/// Receiver of diagnostic records.
///
/// Implementations must not call back into the reporter; reporting happens
/// in the middle of storage operations.
pub trait DiagnosticSink {
    /// Accepts one record. Fire-and-forget.
    fn report(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<S> {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Reports a formatted diagnostic to a sink, capturing the call site.
///
/// ```rust
/// use tessera_diagnostics::{diagnostic, DiagnosticLog, Severity};
///
/// let log = DiagnosticLog::new();
/// diagnostic!(log, Severity::Debug, "reserve({}) ignored", 4);
/// ```
#[macro_export]
macro_rules! diagnostic {
    ($sink:expr, $severity:expr, $($arg:tt)+) => {
        $crate::DiagnosticSink::report(
            &$sink,
            $crate::Diagnostic::new(
                $crate::Location::new(file!(), line!(), column!()),
                $severity,
                format!($($arg)+),
            ),
        )
    };
}
