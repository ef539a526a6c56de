//! Error types for CLI utilities.

use metrics_exporter_prometheus::BuildError;
use std::io;
use thiserror::Error;

/// Error type for prometheus server initialization.
#[derive(Debug, Error)]
pub enum PrometheusError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to address: {0}")]
    Bind(#[from] io::Error),
    /// Failed to build or install the exporter.
    #[error("failed to install the prometheus exporter: {0}")]
    Install(#[from] BuildError),
}

/// Errors that can occur in CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Neither a network preset nor both contract addresses were given.
    #[error("no contracts configured: pass --network, or both --inbox and --bridge")]
    MissingContracts,

    /// No preset matches the given network name or chain id.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    /// The child chain does not match the selected network preset.
    #[error("child chain id {actual} does not match network {network} (chain id {expected})")]
    ChainIdMismatch {
        /// The preset name.
        network: &'static str,
        /// The preset's chain id.
        expected: u64,
        /// The child chain's chain id.
        actual: u64,
    },

    /// The command was interrupted before it completed.
    #[error("interrupted before completion")]
    Interrupted,

    /// Error initializing metrics.
    #[error("Failed to initialize metrics: {0}")]
    MetricsInitialization(#[from] PrometheusError),
}

/// Type alias for CLI results.
pub type CliResult<T> = Result<T, CliError>;
