#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod styles;
pub use styles::cli_styles;

pub mod log;
pub use log::{LogArgs, LogConfig, StderrLogConfig};

mod tracing;
pub use tracing::LogFormat;

mod metrics_args;
pub use metrics_args::MetricsArgs;

mod prometheus;
pub use prometheus::init_prometheus_server;

pub mod backtrace;

mod error;
pub use error::{CliError, CliResult, PrometheusError};
