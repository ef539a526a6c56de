//! Logging flags and the configuration derived from them.

use crate::LogFormat;
use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

/// Global configuration arguments for logging.
#[derive(Parser, Default, Clone, Debug, PartialEq, Eq)]
pub struct LogArgs {
    /// Raises the log level: `-v` for DEBUG, `-vv` for TRACE. The default is INFO.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
    /// Disables logging entirely.
    #[arg(short = 'q', long = "logs.quiet", global = true, env = "RETRYABLES_LOGS_QUIET")]
    pub quiet: bool,
    /// The log format.
    #[arg(
        long = "logs.format",
        default_value = "full",
        global = true,
        env = "RETRYABLES_LOGS_FORMAT"
    )]
    pub format: LogFormat,
}

/// Configuration for terminal logs, written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StderrLogConfig {
    /// The format of the logs.
    pub format: LogFormat,
}

/// The logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// The most verbose level emitted.
    pub global_level: LevelFilter,
    /// Terminal logs, or `None` to disable them.
    pub stderr_logs: Option<StderrLogConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global_level: LevelFilter::INFO,
            stderr_logs: Some(StderrLogConfig { format: LogFormat::Full }),
        }
    }
}

impl From<LogArgs> for LogConfig {
    fn from(args: LogArgs) -> Self {
        let global_level = match args.verbosity {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        let stderr_logs = (!args.quiet).then_some(StderrLogConfig { format: args.format });
        Self { global_level, stderr_logs }
    }
}
