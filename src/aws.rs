use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{Region, SdkConfig};
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{MetricDatum, StandardUnit};
use aws_sdk_cloudwatchlogs::types::InputLogEvent;
use std::time::Duration;

use crate::config::AppConfig;
use crate::forwarder::{LogStreamApi, StreamCreation};
use crate::metrics::MetricsApi;
use crate::models::{OutgoingEvent, SendableError};

lazy_static! {
    static ref AWS_REGIONS: Vec<&'static str> = vec![
        "us-east-1", "us-east-2", "us-west-1", "us-west-2",
        "af-south-1", "ap-east-1", "ap-south-1", "ap-south-2",
        "ap-southeast-1", "ap-southeast-2", "ap-southeast-3",
        "ap-northeast-1", "ap-northeast-2", "ap-northeast-3",
        "ca-central-1", "eu-central-1", "eu-central-2",
        "eu-west-1", "eu-west-2", "eu-west-3", "eu-south-1",
        "eu-south-2", "eu-north-1", "me-central-1", "me-south-1",
        "sa-east-1",
    ];
}

fn find_region(input: &str) -> Option<&'static str> {
    AWS_REGIONS.iter().find(|&&region| region == input).copied()
}

/// Loads the shared SDK config with an explicit per-attempt timeout and SDK
/// retries disabled; every remote call is attempted exactly once.
pub async fn build_config(
    app_config: &AppConfig,
    operation_timeout: Duration,
) -> Result<SdkConfig, SendableError> {
    let mut loader = aws_config::from_env()
        .retry_config(RetryConfig::disabled())
        .timeout_config(
            TimeoutConfig::builder()
                .operation_attempt_timeout(operation_timeout)
                .build(),
        );

    if let Some(profile_name) = app_config.profile.clone() {
        loader = loader.profile_name(profile_name);
    }

    if let Some(region_str) = &app_config.region {
        let selected_region = find_region(region_str)
            .ok_or_else(|| format!("unsupported AWS region: {region_str}"))?;
        loader = loader.region(Region::new(selected_region));
    }

    let shared_config = loader.load().await;
    Ok(shared_config)
}

pub struct CloudWatchLogsApi {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchLogsApi {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudwatchlogs::Client::new(config),
        }
    }
}

#[async_trait]
impl LogStreamApi for CloudWatchLogsApi {
    async fn create_stream(
        &self,
        log_group: &str,
        log_stream: &str,
    ) -> Result<StreamCreation, SendableError> {
        match self
            .client
            .create_log_stream()
            .log_group_name(log_group)
            .log_stream_name(log_stream)
            .send()
            .await
        {
            Ok(_) => Ok(StreamCreation::Created),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_already_exists_exception()) =>
            {
                Ok(StreamCreation::AlreadyExists)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn put_events(
        &self,
        log_group: &str,
        log_stream: &str,
        events: Vec<OutgoingEvent>,
        sequence_token: Option<String>,
    ) -> Result<Option<String>, SendableError> {
        let mut request = self
            .client
            .put_log_events()
            .log_group_name(log_group)
            .log_stream_name(log_stream)
            .set_sequence_token(sequence_token);

        for event in events {
            request = request.log_events(
                InputLogEvent::builder()
                    .timestamp(event.timestamp)
                    .message(event.message)
                    .build()?,
            );
        }

        let resp = request.send().await?;
        Ok(resp.next_sequence_token)
    }
}

pub struct CloudWatchMetricsApi {
    client: aws_sdk_cloudwatch::Client,
}

impl CloudWatchMetricsApi {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudwatch::Client::new(config),
        }
    }
}

#[async_trait]
impl MetricsApi for CloudWatchMetricsApi {
    async fn put_counter(
        &self,
        namespace: &str,
        metric_name: &str,
        value: f64,
        timestamp_millis: i64,
    ) -> Result<(), SendableError> {
        let datum = MetricDatum::builder()
            .metric_name(metric_name)
            .value(value)
            .unit(StandardUnit::Count)
            .timestamp(DateTime::from_millis(timestamp_millis))
            .build();

        self.client
            .put_metric_data()
            .namespace(namespace)
            .metric_data(datum)
            .send()
            .await?;
        Ok(())
    }
}
