//! Log records handed to the export pipeline.

use std::fmt;
use std::time::SystemTime;

/// Severity of an emitted log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// OpenTelemetry severity text (`"INFO"`, `"ERROR"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable log record.
///
/// Built once per emission and moved into the backend; the caller keeps
/// nothing after `emit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    timestamp: SystemTime,
    severity: Severity,
    body: String,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    pub fn new(severity: Severity, body: impl Into<String>) -> Self {
        Self::at(SystemTime::now(), severity, body)
    }

    /// Create a record with an explicit timestamp.
    pub fn at(timestamp: SystemTime, severity: Severity, body: impl Into<String>) -> Self {
        Self {
            timestamp,
            severity,
            body: body.into(),
        }
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consume the record, returning its parts.
    pub fn into_parts(self) -> (SystemTime, Severity, String) {
        (self.timestamp, self.severity, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn severity_text_matches_otel_names() {
        assert_eq!(Severity::Info.as_str(), "INFO");
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert!(Severity::Warn > Severity::Info);
    }

    #[test]
    fn record_keeps_its_fields() {
        let ts = SystemTime::UNIX_EPOCH + Duration::from_secs(42);
        let record = LogRecord::at(ts, Severity::Info, "hello");

        assert_eq!(record.timestamp(), ts);
        assert_eq!(record.severity(), Severity::Info);
        assert_eq!(record.body(), "hello");

        let (_, severity, body) = record.into_parts();
        assert_eq!(severity, Severity::Info);
        assert_eq!(body, "hello");
    }
}
