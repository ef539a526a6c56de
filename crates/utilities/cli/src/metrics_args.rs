//! Prometheus metrics flags.

use crate::{CliResult, init_prometheus_server};
use clap::Parser;
use std::net::IpAddr;

/// Configuration for the Prometheus exporter.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Serves Prometheus metrics for the duration of the run.
    #[arg(
        id = "metrics_enabled",
        long = "metrics.enabled",
        global = true,
        default_value_t = false,
        env = "RETRYABLES_METRICS_ENABLED"
    )]
    pub enabled: bool,
    /// The port of the metrics server.
    #[arg(
        long = "metrics.port",
        global = true,
        default_value_t = 9090,
        env = "RETRYABLES_METRICS_PORT"
    )]
    pub port: u16,
    /// The address of the metrics server.
    #[arg(
        long = "metrics.addr",
        global = true,
        default_value = "0.0.0.0",
        env = "RETRYABLES_METRICS_ADDR"
    )]
    pub addr: IpAddr,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self::parse_from::<[_; 0], &str>([])
    }
}

impl MetricsArgs {
    /// Starts the Prometheus server if enabled.
    ///
    /// `describe` is called to register metric descriptions once the recorder is installed.
    pub fn init_metrics(&self, describe: impl FnOnce()) -> CliResult<()> {
        if self.enabled {
            init_prometheus_server(self.addr, self.port)?;
            describe();
        }
        Ok(())
    }
}
