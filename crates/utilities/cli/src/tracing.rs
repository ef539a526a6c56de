//! [tracing_subscriber] utilities.

use crate::LogConfig;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    EnvFilter, Layer,
    prelude::__tracing_subscriber_SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// The format of the logs.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lowercase")]
pub enum LogFormat {
    /// Full format (default).
    #[default]
    Full,
    /// JSON format.
    Json,
    /// Pretty format.
    Pretty,
    /// Compact format.
    Compact,
}

impl LogConfig {
    /// Initializes the global tracing subscriber.
    ///
    /// Logs are written to stderr so that reports on stdout stay machine readable. Directives in
    /// `env_filter`, or `RUST_LOG` when it is `None`, are combined with the configured level.
    pub fn init_tracing_subscriber(
        &self,
        env_filter: Option<EnvFilter>,
    ) -> Result<(), TryInitError> {
        let stderr_layer = self.stderr_logs.as_ref().map(|stderr_logs| {
            let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            match stderr_logs.format {
                LogFormat::Full => layer.boxed(),
                LogFormat::Json => layer.json().boxed(),
                LogFormat::Pretty => layer.pretty().boxed(),
                LogFormat::Compact => layer.compact().boxed(),
            }
        });

        let env_filter = env_filter
            .unwrap_or_else(EnvFilter::from_default_env)
            .add_directive(self.global_level.into());

        tracing_subscriber::registry().with(env_filter).with(stderr_layer).try_init()?;

        Ok(())
    }
}
