//! Telemetry subsystem lifecycle state.

use std::fmt;

/// Lifecycle state of the telemetry subsystem.
///
/// ```text
/// NotStarted → Starting → Running → ShuttingDown → Stopped
/// ```
///
/// A failed start leaves the subsystem in `Starting`; there is no rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TelemetryState {
    /// Constructed, `start()` not yet called.
    NotStarted = 0,
    /// `start()` in progress, or failed.
    Starting = 1,
    /// Exporters are up; records may be emitted.
    Running = 2,
    /// `shutdown()` in progress.
    ShuttingDown = 3,
    /// Both exporters have been shut down.
    Stopped = 4,
}

impl TelemetryState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::NotStarted,
            1 => Self::Starting,
            2 => Self::Running,
            3 => Self::ShuttingDown,
            _ => Self::Stopped,
        }
    }

    /// Whether `shutdown()` has already been requested.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ShuttingDown | Self::Stopped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::ShuttingDown => "shutting_down",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for TelemetryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!TelemetryState::NotStarted.is_terminal());
        assert!(!TelemetryState::Starting.is_terminal());
        assert!(!TelemetryState::Running.is_terminal());
        assert!(TelemetryState::ShuttingDown.is_terminal());
        assert!(TelemetryState::Stopped.is_terminal());
    }

    #[test]
    fn decodes_stored_discriminant() {
        let stored = TelemetryState::ShuttingDown as u8;
        assert_eq!(TelemetryState::from_u8(stored), TelemetryState::ShuttingDown);
        assert_eq!(TelemetryState::Running.to_string(), "running");
    }
}
