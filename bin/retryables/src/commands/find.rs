//! Find Subcommand

use crate::{
    flags::{GlobalArgs, ParentChainArgs, RangeArgs},
    render::{self, OutputFormat},
};
use clap::Parser;
use retryable_cli::CliError;
use retryable_finder::{FinderConfig, RetryableClassifier, RetryableFinder};
use retryable_providers_alloy::{AlloyChildChainProvider, AlloyParentChainProvider};
use tracing::info;
use url::Url;

/// The `find` Subcommand
///
/// The `find` subcommand scans a parent chain block range for retryable submissions and reports
/// the ones that were not redeemed on the child chain.
///
/// # Usage
///
/// ```sh
/// retryables find [FLAGS] [OPTIONS]
/// ```
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(about = "Finds retryable tickets that were not redeemed")]
pub struct FindCommand {
    /// Parent chain connection and contracts.
    #[command(flatten)]
    pub chain: ParentChainArgs,
    /// The child chain RPC URL.
    #[arg(long = "child-rpc", alias = "l2-rpc", env = "RETRYABLES_CHILD_RPC")]
    pub child_rpc: Url,
    /// The block range to scan.
    #[command(flatten)]
    pub range: RangeArgs,
    /// The maximum number of retryables classified concurrently.
    #[arg(
        long = "max-concurrency",
        default_value_t = FinderConfig::DEFAULT_MAX_CONCURRENCY,
        env = "RETRYABLES_MAX_CONCURRENCY"
    )]
    pub max_concurrency: usize,
    /// The output format.
    #[arg(long, short = 'o', default_value = "table", env = "RETRYABLES_OUTPUT")]
    pub output: OutputFormat,
}

impl FindCommand {
    /// Returns the finder configuration.
    pub fn config(&self) -> Result<FinderConfig, CliError> {
        Ok(FinderConfig {
            inbox: self.chain.inbox()?,
            bridge: self.chain.bridge()?,
            max_concurrency: self.max_concurrency,
            log_batch_size: self.range.log_batch_size,
        })
    }

    /// Runs the subcommand.
    pub async fn run(self, _args: &GlobalArgs) -> anyhow::Result<()> {
        let config = self.config()?;
        let preset = self.chain.preset()?;

        let parent = AlloyParentChainProvider::new_http(self.chain.parent_rpc.clone());
        let child = AlloyChildChainProvider::new_http(self.child_rpc.clone());
        let classifier = RetryableClassifier::from_provider(child).await?;
        if let Some(chain) = preset.filter(|chain| chain.chain_id != classifier.chain_id) {
            return Err(CliError::ChainIdMismatch {
                network: chain.name,
                expected: chain.chain_id,
                actual: classifier.chain_id,
            }
            .into());
        }

        let finder = RetryableFinder::new(parent, classifier, config);
        let RangeArgs { from_block, to_block, lookback, .. } = self.range;
        let (from, to) = finder.resolve_range(from_block, to_block, lookback).await?;
        info!(
            target: "cli",
            inbox = %config.inbox,
            bridge = %config.bridge,
            chain_id = finder.classifier.chain_id,
            from,
            to,
            "Scanning for retryables"
        );

        let report = finder.find_pending_retryables(from, to).await?;
        println!("{}", render::report(&report, self.output)?);
        Ok(())
    }
}
