use async_trait::async_trait;
use std::collections::HashSet;
use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::forwarder::{LogStreamApi, StreamCreation};
use crate::metrics::MetricsApi;
use crate::models::{OutgoingEvent, SendableError};

/// One observed `put_events` attempt, successful or not.
pub struct RecordedPut {
    pub supplied_token: Option<String>,
    pub messages: Vec<String>,
    pub timestamps: Vec<i64>,
}

/// Recording stand-in for the remote log-stream service. Successful appends
/// hand back "token-{attempt}" so tests can assert token continuity.
pub struct MockStreamApi {
    pub create_calls: Arc<Mutex<u32>>,
    pub puts: Arc<Mutex<Vec<RecordedPut>>>,
    pub accepted: Arc<Mutex<Vec<String>>>,
    respond_already_exists: bool,
    refuse_creates: bool,
    fail_on: HashSet<usize>,
}

impl MockStreamApi {
    pub fn new() -> Self {
        Self {
            create_calls: Arc::default(),
            puts: Arc::default(),
            accepted: Arc::default(),
            respond_already_exists: false,
            refuse_creates: false,
            fail_on: HashSet::new(),
        }
    }

    pub fn already_existing() -> Self {
        Self {
            respond_already_exists: true,
            ..Self::new()
        }
    }

    pub fn refusing_creates() -> Self {
        Self {
            refuse_creates: true,
            ..Self::new()
        }
    }

    /// Fails the given 1-based append attempts.
    pub fn failing_appends(attempts: &[usize]) -> Self {
        Self {
            fail_on: attempts.iter().copied().collect(),
            ..Self::new()
        }
    }
}

#[async_trait]
impl LogStreamApi for MockStreamApi {
    async fn create_stream(
        &self,
        _log_group: &str,
        _log_stream: &str,
    ) -> Result<StreamCreation, SendableError> {
        *self.create_calls.lock().unwrap() += 1;
        if self.refuse_creates {
            return Err("stream creation refused".into());
        }
        Ok(if self.respond_already_exists {
            StreamCreation::AlreadyExists
        } else {
            StreamCreation::Created
        })
    }

    async fn put_events(
        &self,
        _log_group: &str,
        _log_stream: &str,
        events: Vec<OutgoingEvent>,
        sequence_token: Option<String>,
    ) -> Result<Option<String>, SendableError> {
        let mut puts = self.puts.lock().unwrap();
        let attempt = puts.len() + 1;
        puts.push(RecordedPut {
            supplied_token: sequence_token,
            messages: events.iter().map(|e| e.message.clone()).collect(),
            timestamps: events.iter().map(|e| e.timestamp).collect(),
        });
        if self.fail_on.contains(&attempt) {
            return Err("append rejected".into());
        }
        self.accepted
            .lock()
            .unwrap()
            .extend(events.into_iter().map(|e| e.message));
        Ok(Some(format!("token-{attempt}")))
    }
}

pub struct PublishedSample {
    pub namespace: String,
    pub metric_name: String,
    pub value: f64,
    pub timestamp: i64,
}

pub struct MockMetricsApi {
    pub published: Arc<Mutex<Vec<PublishedSample>>>,
    fail: bool,
}

impl MockMetricsApi {
    pub fn new() -> Self {
        Self {
            published: Arc::default(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            published: Arc::default(),
            fail: true,
        }
    }
}

#[async_trait]
impl MetricsApi for MockMetricsApi {
    async fn put_counter(
        &self,
        namespace: &str,
        metric_name: &str,
        value: f64,
        timestamp_millis: i64,
    ) -> Result<(), SendableError> {
        if self.fail {
            return Err("metrics endpoint unavailable".into());
        }
        self.published.lock().unwrap().push(PublishedSample {
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            value,
            timestamp: timestamp_millis,
        });
        Ok(())
    }
}

/// In-memory console target so tests can assert on emitted lines.
#[derive(Clone, Default)]
pub struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl SharedWriter {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
