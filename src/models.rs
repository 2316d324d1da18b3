use crate::utilities::now_millis;

pub type SendableError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: i64,
    pub level: Severity,
    pub logger: String,
    pub message: String,
}

impl LogRecord {
    pub fn new(level: Severity, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: now_millis(),
            level,
            logger: logger.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    Success,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub request_id: String,
    pub outcome: OutcomeClass,
    pub processing_time: std::time::Duration,
}

/// One event of a remote append call: epoch millis plus the formatted line.
#[derive(Debug, Clone)]
pub struct OutgoingEvent {
    pub timestamp: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_from_debug_to_critical() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn severity_displays_upper_case_labels() {
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }
}
