//! Parent chain block range selection.

use clap::Parser;
use retryable_finder::FinderConfig;

/// The parent chain block range to scan.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct RangeArgs {
    /// The first block to scan. Defaults to `--lookback` blocks before `--to-block`.
    #[arg(long = "from-block", env = "RETRYABLES_FROM_BLOCK")]
    pub from_block: Option<u64>,
    /// The last block to scan, inclusive. Defaults to the parent chain head.
    #[arg(long = "to-block", env = "RETRYABLES_TO_BLOCK")]
    pub to_block: Option<u64>,
    /// The number of blocks to scan when `--from-block` is not set.
    #[arg(long, default_value_t = Self::DEFAULT_LOOKBACK, env = "RETRYABLES_LOOKBACK")]
    pub lookback: u64,
    /// The maximum number of blocks per log query.
    #[arg(
        long = "log-batch-size",
        default_value_t = FinderConfig::DEFAULT_LOG_BATCH_SIZE,
        env = "RETRYABLES_LOG_BATCH_SIZE"
    )]
    pub log_batch_size: u64,
}

impl RangeArgs {
    /// About a week of parent chain blocks at 12 second block times.
    pub const DEFAULT_LOOKBACK: u64 = 50_400;
}
