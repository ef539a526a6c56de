//! Batched parent chain log queries.

use crate::{FinderError, ParentChainProvider};
use alloc::{boxed::Box, vec::Vec};
use alloy_primitives::{Address, B256};
use tracing::debug;

/// Splits the inclusive range `[from, to]` into inclusive windows of at most `batch_size` blocks.
///
/// A `batch_size` of zero is treated as one.
pub fn block_windows(from: u64, to: u64, batch_size: u64) -> impl Iterator<Item = (u64, u64)> {
    let step = batch_size.max(1);
    let mut next = Some(from).filter(|from| *from <= to);
    core::iter::from_fn(move || {
        let start = next?;
        let end = start.saturating_add(step - 1).min(to);
        next = end.checked_add(1).filter(|n| *n <= to);
        Some((start, end))
    })
}

/// Fetches every log with topic0 `event` emitted by `address` in `[from, to]`, one window at a
/// time. Windows are queried in ascending order and their logs concatenated.
pub async fn fetch_logs<P>(
    provider: &P,
    address: Address,
    event: (&'static str, B256),
    from: u64,
    to: u64,
    batch_size: u64,
) -> Result<Vec<alloy_rpc_types_eth::Log>, FinderError>
where
    P: ParentChainProvider + Sync,
{
    let (name, signature) = event;
    let mut logs = Vec::new();
    for (start, end) in block_windows(from, to, batch_size) {
        let batch = provider.logs(address, signature, start, end).await.map_err(|err| {
            FinderError::ParentLogs { event: name, from: start, to: end, source: Box::new(err) }
        })?;
        debug!(
            target: "finder",
            event = name,
            %address,
            from = start,
            to = end,
            count = batch.len(),
            "Fetched parent chain logs"
        );
        logs.extend(batch);
    }
    Ok(logs)
}
