use async_trait::async_trait;
use colored::{ColoredString, Colorize};
use std::io::Write;

use crate::models::{LogRecord, OutgoingEvent, SendableError, Severity};
use crate::utilities::millis_to_system_time;

/// Outcome of establishing the remote log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCreation {
    Created,
    AlreadyExists,
}

/// Append-only log-stream service the remote sink delivers to.
#[async_trait]
pub trait LogStreamApi: Send + Sync {
    async fn create_stream(
        &self,
        log_group: &str,
        log_stream: &str,
    ) -> Result<StreamCreation, SendableError>;

    /// Appends a batch and returns the token to supply on the next call.
    async fn put_events(
        &self,
        log_group: &str,
        log_stream: &str,
        events: Vec<OutgoingEvent>,
        sequence_token: Option<String>,
    ) -> Result<Option<String>, SendableError>;
}

pub struct ConsoleSink {
    min_level: Severity,
    out: Box<dyn Write + Send>,
}

impl ConsoleSink {
    pub fn stdout(min_level: Severity) -> Self {
        Self::with_writer(min_level, Box::new(std::io::stdout()))
    }

    pub fn with_writer(min_level: Severity, out: Box<dyn Write + Send>) -> Self {
        Self { min_level, out }
    }

    pub fn accepts(&self, level: Severity) -> bool {
        level >= self.min_level
    }

    /// Formatted synchronous write; write errors never abort the caller.
    pub fn write(&mut self, record: &LogRecord) {
        if !self.accepts(record.level) {
            return;
        }
        let timestamp = humantime::format_rfc3339_millis(millis_to_system_time(record.timestamp));
        let _ = writeln!(
            self.out,
            "{} - {} - {} - {}",
            timestamp,
            record.logger,
            paint_level(record.level),
            record.message
        );
    }
}

fn paint_level(level: Severity) -> ColoredString {
    match level {
        Severity::Debug => level.as_str().dimmed(),
        Severity::Info => level.as_str().green(),
        Severity::Warning => level.as_str().yellow(),
        Severity::Error => level.as_str().red(),
        Severity::Critical => level.as_str().red().bold(),
    }
}

pub struct CloudWatchSink {
    api: Box<dyn LogStreamApi>,
    log_group: String,
    log_stream: String,
    min_level: Severity,
    sequence_token: Option<String>,
}

impl CloudWatchSink {
    pub fn new(
        api: Box<dyn LogStreamApi>,
        log_group: impl Into<String>,
        log_stream: impl Into<String>,
        min_level: Severity,
    ) -> Self {
        Self {
            api,
            log_group: log_group.into(),
            log_stream: log_stream.into(),
            min_level,
            sequence_token: None,
        }
    }

    pub fn accepts(&self, level: Severity) -> bool {
        level >= self.min_level
    }

    pub fn sequence_token(&self) -> Option<&str> {
        self.sequence_token.as_deref()
    }

    /// Creates the log stream; an already-existing stream counts as success.
    pub async fn initialize(&mut self) -> Result<(), SendableError> {
        self.api
            .create_stream(&self.log_group, &self.log_stream)
            .await?;
        Ok(())
    }

    /// Sends the record as a singleton batch carrying the held sequence token.
    /// On failure the token is left unchanged and the record is dropped for
    /// this sink; the error is returned for the caller to report.
    pub async fn append(&mut self, record: &LogRecord) -> Result<(), SendableError> {
        let event = OutgoingEvent {
            timestamp: record.timestamp,
            message: remote_line(record),
        };
        let next = self
            .api
            .put_events(
                &self.log_group,
                &self.log_stream,
                vec![event],
                self.sequence_token.clone(),
            )
            .await?;
        self.sequence_token = next;
        Ok(())
    }
}

fn remote_line(record: &LogRecord) -> String {
    let timestamp = humantime::format_rfc3339_millis(millis_to_system_time(record.timestamp));
    format!(
        "{} {} {} {}",
        timestamp, record.logger, record.level, record.message
    )
}

/// Routes each record to every sink whose minimum severity admits it.
pub struct LogForwarder {
    name: String,
    console: ConsoleSink,
    remote: Option<CloudWatchSink>,
}

impl LogForwarder {
    pub fn new(name: impl Into<String>, console: ConsoleSink) -> Self {
        Self {
            name: name.into(),
            console,
            remote: None,
        }
    }

    pub fn attach_remote(&mut self, sink: CloudWatchSink) {
        self.remote = Some(sink);
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Establishes the remote stream. Any failure other than an existing
    /// stream disables the remote sink for the rest of the process.
    pub async fn initialize_remote(&mut self) {
        let Some(remote) = self.remote.as_mut() else {
            return;
        };
        if let Err(err) = remote.initialize().await {
            self.remote = None;
            let report = LogRecord::new(
                Severity::Error,
                self.name.clone(),
                format!("Error creating log stream: {err}"),
            );
            self.console.write(&report);
        }
    }

    pub async fn emit(&mut self, record: &LogRecord) {
        self.console.write(record);
        if let Some(remote) = self.remote.as_mut() {
            if remote.accepts(record.level) {
                if let Err(err) = remote.append(record).await {
                    let report = LogRecord::new(
                        Severity::Error,
                        self.name.clone(),
                        format!("Error sending log to CloudWatch: {err}"),
                    );
                    self.console.write(&report);
                }
            }
        }
    }

    pub async fn log(&mut self, level: Severity, message: impl Into<String>) {
        let record = LogRecord::new(level, self.name.clone(), message);
        self.emit(&record).await;
    }

    pub async fn debug(&mut self, message: impl Into<String>) {
        self.log(Severity::Debug, message).await;
    }

    pub async fn info(&mut self, message: impl Into<String>) {
        self.log(Severity::Info, message).await;
    }

    pub async fn warning(&mut self, message: impl Into<String>) {
        self.log(Severity::Warning, message).await;
    }

    pub async fn error(&mut self, message: impl Into<String>) {
        self.log(Severity::Error, message).await;
    }

    pub async fn critical(&mut self, message: impl Into<String>) {
        self.log(Severity::Critical, message).await;
    }
}
