//! Global arguments for the CLI.

use clap::Parser;
use retryable_cli::{LogArgs, LogConfig, MetricsArgs};

/// Global arguments for the CLI.
#[derive(Parser, Default, Clone, Debug, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Logging arguments.
    #[command(flatten)]
    pub log_args: LogArgs,
    /// Prometheus CLI arguments.
    #[command(flatten)]
    pub metrics: MetricsArgs,
}

impl GlobalArgs {
    /// Initializes the tracing subscriber from the logging arguments.
    pub fn init_tracing(&self) -> anyhow::Result<()> {
        LogConfig::from(self.log_args.clone())
            .init_tracing_subscriber(None)
            .map_err(|e| anyhow::anyhow!(e))
    }

    /// Starts the metrics server when enabled and registers the finder metrics.
    pub fn init_metrics(&self) -> anyhow::Result<()> {
        self.metrics.init_metrics(retryable_finder::Metrics::init)?;
        Ok(())
    }
}
