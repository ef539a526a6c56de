//! Lists the inboxes feeding a bridge.

use crate::{FinderError, ParentChainProvider, logs::fetch_logs};
use alloc::vec::Vec;
use alloy_primitives::Address;
use alloy_sol_types::SolEvent;
use retryable_protocol::{AccountingEvent, InboxMessageKind, MessageDelivered};
use tracing::info;

/// The number of messages of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KindCount {
    /// The message kind.
    pub kind: InboxMessageKind,
    /// The number of messages.
    pub count: usize,
}

/// The messages one inbox enqueued in a bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InboxSummary {
    /// The inbox address.
    pub inbox: Address,
    /// The block of the first message seen.
    pub first_block: u64,
    /// The block of the last message seen.
    pub last_block: u64,
    /// Message counts, ordered by kind.
    pub kinds: Vec<KindCount>,
}

impl InboxSummary {
    /// Returns the total number of messages.
    pub fn messages(&self) -> usize {
        self.kinds.iter().map(|k| k.count).sum()
    }

    /// Returns the number of retryable submissions.
    pub fn retryables(&self) -> usize {
        self.kinds
            .iter()
            .filter(|k| k.kind.is_retryable())
            .map(|k| k.count)
            .sum()
    }

    fn record(&mut self, event: &AccountingEvent) {
        self.first_block = self.first_block.min(event.block_number);
        self.last_block = self.last_block.max(event.block_number);
        match self.kinds.binary_search_by_key(&event.kind, |k| k.kind) {
            Ok(i) => self.kinds[i].count += 1,
            Err(i) => self.kinds.insert(i, KindCount { kind: event.kind, count: 1 }),
        }
    }
}

/// Scans the bridge's `MessageDelivered` logs in `[from, to]` and summarizes them per inbox.
///
/// Inboxes are returned in order of their first message.
pub async fn discover_inboxes<P>(
    provider: &P,
    bridge: Address,
    from: u64,
    to: u64,
    log_batch_size: u64,
) -> Result<Vec<InboxSummary>, FinderError>
where
    P: ParentChainProvider + Sync,
{
    if from > to {
        return Err(FinderError::InvalidRange { from, to });
    }

    let logs = fetch_logs(
        provider,
        bridge,
        (MessageDelivered::SIGNATURE, MessageDelivered::SIGNATURE_HASH),
        from,
        to,
        log_batch_size,
    )
    .await?;

    let mut summaries: Vec<InboxSummary> = Vec::new();
    for log in &logs {
        let event = AccountingEvent::try_from(log)?;
        match summaries.iter_mut().find(|s| s.inbox == event.inbox) {
            Some(summary) => summary.record(&event),
            None => {
                let mut summary = InboxSummary {
                    inbox: event.inbox,
                    first_block: event.block_number,
                    last_block: event.block_number,
                    kinds: Vec::new(),
                };
                summary.record(&event);
                summaries.push(summary);
            }
        }
    }

    info!(
        target: "finder",
        %bridge,
        messages = logs.len(),
        inboxes = summaries.len(),
        "Discovered bridge inboxes"
    );
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockParentProvider, accounting_log, retryable_pair};

    const BRIDGE: Address = Address::repeat_byte(0x22);

    fn message(seq: u64, block: u64, inbox: Address, kind: InboxMessageKind) -> AccountingEvent {
        let mut accounting = retryable_pair(seq, block).accounting;
        accounting.inbox = inbox;
        accounting.kind = kind;
        accounting
    }

    #[tokio::test]
    async fn test_discover_inboxes() {
        let primary = Address::repeat_byte(0xa1);
        let secondary = Address::repeat_byte(0xa2);

        let mut parent = MockParentProvider::default();
        for event in [
            message(1, 10, primary, InboxMessageKind::SubmitRetryable),
            message(2, 12, secondary, InboxMessageKind::EthDeposit),
            message(3, 15, primary, InboxMessageKind::L2Message),
            message(4, 20, primary, InboxMessageKind::SubmitRetryable),
            message(5, 21, primary, InboxMessageKind::Unknown(200)),
        ] {
            parent.push_log(BRIDGE, accounting_log(&event, BRIDGE));
        }

        let summaries = discover_inboxes(&parent, BRIDGE, 0, 100, 7).await.unwrap();
        assert_eq!(summaries.len(), 2);

        let first = &summaries[0];
        assert_eq!(first.inbox, primary);
        assert_eq!((first.first_block, first.last_block), (10, 21));
        assert_eq!(first.messages(), 4);
        assert_eq!(first.retryables(), 2);
        assert_eq!(
            first.kinds,
            vec![
                KindCount { kind: InboxMessageKind::L2Message, count: 1 },
                KindCount { kind: InboxMessageKind::SubmitRetryable, count: 2 },
                KindCount { kind: InboxMessageKind::Unknown(200), count: 1 },
            ]
        );

        let second = &summaries[1];
        assert_eq!(second.inbox, secondary);
        assert_eq!(second.messages(), 1);
        assert_eq!(second.retryables(), 0);
    }

    #[tokio::test]
    async fn test_discover_empty_range() {
        let parent = MockParentProvider::default();
        assert!(discover_inboxes(&parent, BRIDGE, 0, 100, 10).await.unwrap().is_empty());
        assert!(matches!(
            discover_inboxes(&parent, BRIDGE, 5, 4, 10).await,
            Err(FinderError::InvalidRange { .. })
        ));
    }
}
