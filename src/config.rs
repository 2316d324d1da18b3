use clap::{command, Parser};
use parse_duration::parse;
use std::time::Duration;

use crate::models::{SendableError, Severity};

#[derive(Parser, Debug)]
#[command(
    name = "simwatch",
    version,
    about = "Simulate a request workload and ship its logs and metrics to AWS CloudWatch."
)]
pub struct AppConfig {
    #[arg(long, default_value = "us-east-1")]
    pub region: Option<String>,

    #[arg(long, default_value = "default")]
    pub profile: Option<String>,

    #[arg(long, default_value = "/devsecops/demo/app")]
    pub log_group: String,

    #[arg(long, default_value = "application-stream")]
    pub log_stream: String,

    #[arg(long, default_value = "DevSecOps/Demo")]
    pub metric_namespace: String,

    /// Number of synthetic requests to drive before exiting.
    #[arg(long, default_value_t = 20)]
    pub requests: u32,

    /// Publish one metric sample every N completed requests (0 disables).
    #[arg(long, default_value_t = 5)]
    pub metrics_every: u32,

    /// Outcome weights for success,warning,error,critical; must sum to 100.
    #[arg(long, value_delimiter = ',', default_value = "70,15,10,5")]
    pub weights: Vec<u32>,

    #[arg(long, default_value = "100ms")]
    pub min_work: String,

    #[arg(long, default_value = "2s")]
    pub max_work: String,

    #[arg(long, default_value = "1s")]
    pub min_delay: String,

    #[arg(long, default_value = "3s")]
    pub max_delay: String,

    /// Per-attempt timeout applied to every remote call.
    #[arg(long, default_value = "10s")]
    pub request_timeout: String,

    #[arg(long, value_enum, default_value = "info")]
    pub console_level: Severity,

    #[arg(long, value_enum, default_value = "debug")]
    pub remote_level: Severity,

    /// Seed for the outcome and delay generators; omit for OS entropy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip CloudWatch entirely and log to the console only.
    #[arg(long)]
    pub no_remote: bool,
}

impl AppConfig {
    pub fn work_range(&self) -> Result<(Duration, Duration), SendableError> {
        Ok((
            parse_flag("min-work", &self.min_work)?,
            parse_flag("max-work", &self.max_work)?,
        ))
    }

    pub fn delay_range(&self) -> Result<(Duration, Duration), SendableError> {
        Ok((
            parse_flag("min-delay", &self.min_delay)?,
            parse_flag("max-delay", &self.max_delay)?,
        ))
    }

    pub fn get_request_timeout(&self) -> Result<Duration, SendableError> {
        parse_flag("request-timeout", &self.request_timeout)
    }
}

// Parse a duration string (e.g., "500ms", "2s")
fn parse_flag(flag: &str, value: &str) -> Result<Duration, SendableError> {
    parse(value).map_err(|e| format!("failed to parse --{flag} '{value}': {e}").into())
}
