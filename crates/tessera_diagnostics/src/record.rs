//! # Diagnostic Records

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// How bad a reported condition is.
///
/// Ordered from least to most severe so filters can use `>=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational; the operation proceeded.
    Debug,
    /// Benign anomaly; the operation proceeded or was a harmless no-op.
    Warn,
    /// The operation was abandoned; stored data is untouched.
    Error,
    /// A prior invariant is broken or a hard capacity was hit.
    Fatal,
}

impl Severity {
    /// Upper-case label used in rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source position a diagnostic was raised from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    /// Source file.
    pub file: &'static str,
    /// Line within `file`.
    pub line: u32,
    /// Column within `line`.
    pub column: u32,
}

impl Location {
    /// Creates a location from its parts.
    #[must_use]
    pub const fn new(file: &'static str, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }
}

impl From<&'static std::panic::Location<'static>> for Location {
    fn from(location: &'static std::panic::Location<'static>) -> Self {
        Self::new(location.file(), location.line(), location.column())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One structured failure record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the condition was detected.
    pub location: Location,
    /// How bad it is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Wall-clock time of the report.
    pub timestamp: SystemTime,
}

impl Diagnostic {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(location: Location, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            location,
            severity,
            message: message.into(),
            timestamp: SystemTime::now(),
        }
    }
}

impl fmt::Display for Diagnostic {
    /// Renders as `[HH:MM:SS] SEVERITY: file:line message` (UTC).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        let of_day = seconds % 86_400;

        write!(
            f,
            "[{:02}:{:02}:{:02}] {}: {} {}",
            of_day / 3_600,
            (of_day / 60) % 60,
            of_day % 60,
            self.severity,
            self.location,
            self.message
        )
    }
}
