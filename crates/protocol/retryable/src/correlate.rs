//! Joins inbox deliveries with the bridge's accounting records.

use crate::{AccountingEvent, DeliveryEvent};
use alloy_primitives::{B256, U256, map::HashMap};
use tracing::{debug, trace};

/// A delivery that could not be matched to exactly one accounting record.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error(
    "delivery {sequence_number} (tx {tx_hash}) matched {matches} accounting events, expected exactly one"
)]
pub struct CorrelationError {
    /// The sequence number of the unmatched delivery.
    pub sequence_number: U256,
    /// The parent chain transaction of the delivery.
    pub tx_hash: B256,
    /// The parent chain block of the delivery.
    pub block_number: u64,
    /// The number of accounting events sharing the sequence number.
    pub matches: usize,
}

/// A retryable submission seen through both of its parent chain events.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryablePair {
    /// The inbox delivery carrying the payload.
    pub delivery: DeliveryEvent,
    /// The bridge accounting record carrying the sender and base fee.
    pub accounting: AccountingEvent,
}

/// An index of accounting events by sequence number.
#[derive(Debug, Clone, Default)]
pub struct Correlator {
    by_sequence: HashMap<U256, Vec<AccountingEvent>>,
}

impl Correlator {
    /// Indexes the accounting events by sequence number.
    pub fn new(accountings: impl IntoIterator<Item = AccountingEvent>) -> Self {
        let mut by_sequence: HashMap<U256, Vec<AccountingEvent>> = HashMap::default();
        for accounting in accountings {
            by_sequence.entry(accounting.sequence_number).or_default().push(accounting);
        }
        Self { by_sequence }
    }

    /// Returns the accounting events recorded for `sequence_number`.
    pub fn accountings(&self, sequence_number: &U256) -> &[AccountingEvent] {
        self.by_sequence.get(sequence_number).map_or(&[][..], Vec::as_slice)
    }

    /// Pairs a single delivery with its accounting event.
    ///
    /// Returns `None` when the message is not a retryable submission, and a
    /// [`CorrelationError`] when the delivery has zero or several accounting events.
    pub fn pair(
        &self,
        delivery: DeliveryEvent,
    ) -> Option<Result<RetryablePair, CorrelationError>> {
        let matches = self.accountings(&delivery.sequence_number);
        match matches {
            [accounting] if accounting.kind.is_retryable() => {
                Some(Ok(RetryablePair { accounting: accounting.clone(), delivery }))
            }
            [accounting] => {
                trace!(
                    target: "correlator",
                    sequence_number = %delivery.sequence_number,
                    kind = %accounting.kind,
                    "Skipping non-retryable message"
                );
                None
            }
            _ => Some(Err(CorrelationError {
                sequence_number: delivery.sequence_number,
                tx_hash: delivery.tx_hash,
                block_number: delivery.block_number,
                matches: matches.len(),
            })),
        }
    }
}

/// Pairs every [`DeliveryEvent`] with the [`AccountingEvent`] of the same sequence number, keeping
/// only retryable submissions.
///
/// The output follows the order of `deliveries`. A delivery with zero or several accounting events
/// yields a [`CorrelationError`] in its slot. Pairs of any kind other than
/// [`InboxMessageKind::SubmitRetryable`](crate::InboxMessageKind::SubmitRetryable) are dropped.
pub fn correlate(
    deliveries: Vec<DeliveryEvent>,
    accountings: Vec<AccountingEvent>,
) -> Vec<Result<RetryablePair, CorrelationError>> {
    let correlator = Correlator::new(accountings);
    let total = deliveries.len();
    let pairs: Vec<_> =
        deliveries.into_iter().filter_map(|delivery| correlator.pair(delivery)).collect();

    debug!(
        target: "correlator",
        pairs = pairs.len(),
        skipped = total - pairs.len(),
        "Correlated inbox deliveries"
    );
    pairs
}
