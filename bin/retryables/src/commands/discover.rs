//! Discover Subcommand

use crate::{
    flags::{GlobalArgs, ParentChainArgs, RangeArgs},
    render::{self, OutputFormat},
};
use clap::Parser;
use retryable_finder::{discover_inboxes, resolve_range};
use retryable_providers_alloy::AlloyParentChainProvider;
use tracing::info;

/// The `discover` Subcommand
///
/// The `discover` subcommand lists the inboxes that enqueued messages in a bridge, with message
/// counts per kind.
///
/// # Usage
///
/// ```sh
/// retryables discover [FLAGS] [OPTIONS]
/// ```
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(about = "Lists the inboxes feeding a bridge")]
pub struct DiscoverCommand {
    /// Parent chain connection and contracts.
    #[command(flatten)]
    pub chain: ParentChainArgs,
    /// The block range to scan.
    #[command(flatten)]
    pub range: RangeArgs,
    /// The output format.
    #[arg(long, short = 'o', default_value = "table", env = "RETRYABLES_OUTPUT")]
    pub output: OutputFormat,
}

impl DiscoverCommand {
    /// Runs the subcommand.
    pub async fn run(self, _args: &GlobalArgs) -> anyhow::Result<()> {
        let bridge = self.chain.bridge()?;
        let parent = AlloyParentChainProvider::new_http(self.chain.parent_rpc.clone());

        let (from, to) =
            resolve_range(&parent, self.range.from_block, self.range.to_block, self.range.lookback)
                .await?;
        info!(target: "cli", %bridge, from, to, "Scanning bridge messages");

        let summaries =
            discover_inboxes(&parent, bridge, from, to, self.range.log_batch_size).await?;
        println!("{}", render::inboxes(&summaries, self.output)?);
        Ok(())
    }
}
