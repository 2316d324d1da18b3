use async_trait::async_trait;

use crate::models::SendableError;
use crate::utilities::now_millis;

pub const REQUEST_PROCESSED: &str = "RequestProcessed";

/// Counter-ingestion service the publisher delivers samples to.
#[async_trait]
pub trait MetricsApi: Send + Sync {
    async fn put_counter(
        &self,
        namespace: &str,
        metric_name: &str,
        value: f64,
        timestamp_millis: i64,
    ) -> Result<(), SendableError>;
}

/// Best-effort single-sample publisher; the caller logs and discards errors.
pub struct MetricsPublisher {
    api: Box<dyn MetricsApi>,
    namespace: String,
}

impl MetricsPublisher {
    pub fn new(api: Box<dyn MetricsApi>, namespace: impl Into<String>) -> Self {
        Self {
            api,
            namespace: namespace.into(),
        }
    }

    pub async fn publish_request_processed(&self) -> Result<(), SendableError> {
        self.api
            .put_counter(&self.namespace, REQUEST_PROCESSED, 1.0, now_millis())
            .await
    }
}
