#[macro_use]
extern crate lazy_static;

mod aws;
mod config;
mod forwarder;
mod metrics;
mod models;
mod simulator;
#[cfg(test)]
mod testutil;
mod utilities;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use crate::config::AppConfig;
use crate::forwarder::{CloudWatchSink, ConsoleSink, LogForwarder};
use crate::metrics::MetricsPublisher;
use crate::models::{OutcomeClass, RequestDescriptor, SendableError, Severity};
use crate::simulator::OutcomeSimulator;

const LOGGER_NAME: &str = "monitoring-demo";
const RULER_WIDTH: usize = 60;

#[tokio::main]
async fn main() -> ExitCode {
    let app_config = AppConfig::parse();

    let (mut forwarder, publisher) = match setup_forwarding(&app_config).await {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("simwatch: failed to start: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&app_config, &mut forwarder, publisher.as_ref()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            forwarder
                .critical(format!("Application crashed: {err}"))
                .await;
            ExitCode::FAILURE
        }
    }
}

/// Builds the forwarder and, when the remote side comes up, the metrics
/// publisher. A client that cannot be constructed or a stream that cannot be
/// created degrades the process to console-only operation instead of failing.
async fn setup_forwarding(
    app_config: &AppConfig,
) -> Result<(LogForwarder, Option<MetricsPublisher>), SendableError> {
    let console = ConsoleSink::stdout(app_config.console_level);
    let mut forwarder = LogForwarder::new(LOGGER_NAME, console);

    if app_config.no_remote {
        return Ok((forwarder, None));
    }

    let timeout = app_config.get_request_timeout()?;
    match aws::build_config(app_config, timeout).await {
        Ok(sdk_config) => {
            forwarder.attach_remote(CloudWatchSink::new(
                Box::new(aws::CloudWatchLogsApi::new(&sdk_config)),
                app_config.log_group.clone(),
                app_config.log_stream.clone(),
                app_config.remote_level,
            ));
            forwarder.initialize_remote().await;
            let publisher = forwarder.remote_enabled().then(|| {
                MetricsPublisher::new(
                    Box::new(aws::CloudWatchMetricsApi::new(&sdk_config)),
                    app_config.metric_namespace.clone(),
                )
            });
            Ok((forwarder, publisher))
        }
        Err(err) => {
            forwarder
                .warning(format!("Could not initialize AWS CloudWatch client: {err}"))
                .await;
            forwarder.warning("Logs will only be written to console").await;
            Ok((forwarder, None))
        }
    }
}

async fn run(
    app_config: &AppConfig,
    forwarder: &mut LogForwarder,
    publisher: Option<&MetricsPublisher>,
) -> Result<(), SendableError> {
    let (min_work, max_work) = app_config.work_range()?;
    let (min_delay, max_delay) = app_config.delay_range()?;
    if max_delay < min_delay {
        return Err("inter-request delay range is inverted".into());
    }
    let mut simulator =
        OutcomeSimulator::new(&app_config.weights, min_work, max_work, app_config.seed)?;
    let mut delay_rng = match app_config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };

    let ruler = "=".repeat(RULER_WIDTH);
    forwarder.info(ruler.clone()).await;
    forwarder.info("Monitoring Demo Application Started").await;
    forwarder.info(ruler.clone()).await;
    forwarder
        .info(format!("Log Group: {}", app_config.log_group))
        .await;
    forwarder
        .info(format!("Log Stream: {}", app_config.log_stream))
        .await;
    forwarder
        .info(format!(
            "AWS Region: {}",
            app_config.region.as_deref().unwrap_or("default")
        ))
        .await;
    if !forwarder.remote_enabled() {
        forwarder
            .warning("CloudWatch integration is disabled - logs will only appear in console")
            .await;
    }

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let mut processed = 0u32;
    for count in 1..=app_config.requests {
        let request_id = utilities::request_id(count);
        forwarder
            .info(format!("Processing request {request_id}"))
            .await;

        let (outcome, processing_time) = simulator.classify();
        if pause(&mut interrupt, processing_time).await {
            return finish_interrupted(forwarder).await;
        }

        let request = RequestDescriptor {
            request_id,
            outcome,
            processing_time,
        };
        let (level, message) = outcome_record(&request);
        forwarder.log(level, message).await;
        processed = count;

        if app_config.metrics_every > 0 && count % app_config.metrics_every == 0 {
            if let Some(publisher) = publisher {
                match publisher.publish_request_processed().await {
                    Ok(()) => forwarder.debug("Metrics published to CloudWatch").await,
                    Err(err) => {
                        forwarder
                            .error(format!("Failed to publish metrics: {err}"))
                            .await
                    }
                }
            }
        }

        if count < app_config.requests {
            let delay = Duration::from_secs_f64(
                delay_rng.random_range(min_delay.as_secs_f64()..=max_delay.as_secs_f64()),
            );
            if pause(&mut interrupt, delay).await {
                return finish_interrupted(forwarder).await;
            }
        }
    }

    forwarder.info(ruler.clone()).await;
    forwarder
        .info(format!("Application completed - Processed {processed} requests"))
        .await;
    forwarder.info(ruler).await;
    Ok(())
}

fn outcome_record(request: &RequestDescriptor) -> (Severity, String) {
    match request.outcome {
        OutcomeClass::Success => (
            Severity::Info,
            format!(
                "Request {} completed successfully in {:.2}s",
                request.request_id,
                request.processing_time.as_secs_f64()
            ),
        ),
        OutcomeClass::Warning => (
            Severity::Warning,
            format!(
                "Request {} completed with warnings: High latency detected",
                request.request_id
            ),
        ),
        OutcomeClass::Error => (
            Severity::Error,
            format!(
                "Request {} failed: Database connection timeout",
                request.request_id
            ),
        ),
        OutcomeClass::Critical => (
            Severity::Critical,
            format!(
                "Request {} failed: SECURITY: Unauthorized access attempt detected",
                request.request_id
            ),
        ),
    }
}

/// Sleeps the given duration; returns true if ctrl-c arrived first.
async fn pause<F>(interrupt: &mut F, duration: Duration) -> bool
where
    F: Future<Output = std::io::Result<()>> + Unpin,
{
    tokio::select! {
        _ = &mut *interrupt => true,
        () = tokio::time::sleep(duration) => false,
    }
}

async fn finish_interrupted(forwarder: &mut LogForwarder) -> Result<(), SendableError> {
    forwarder.info("Application interrupted by user").await;
    Ok(())
}
