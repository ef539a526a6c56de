//! Classification results and their aggregation into a report.

use crate::PairError;
use alloc::vec::Vec;
use alloy_primitives::{B256, U256};
use retryable_protocol::RetryableStatus;

/// The classified outcome of one retryable submission.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ClassificationResult {
    /// The parent chain transaction that submitted the retryable.
    pub parent_tx_hash: B256,
    /// The parent chain block of the submission.
    pub block_number: u64,
    /// The delayed inbox sequence number.
    pub sequence_number: U256,
    /// The derived hash of the child chain ticket creation transaction.
    pub create_tx_hash: B256,
    /// The hash of the scheduled auto-redeem, once known.
    pub retry_tx_hash: Option<B256>,
    /// The terminal status.
    pub status: RetryableStatus,
}

/// A retryable that could not be classified.
#[derive(Debug, thiserror::Error)]
#[error("retryable {sequence_number} in parent tx {parent_tx_hash}: {error}")]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PairFailure {
    /// The parent chain transaction that submitted the retryable.
    pub parent_tx_hash: B256,
    /// The parent chain block of the submission.
    pub block_number: u64,
    /// The delayed inbox sequence number.
    pub sequence_number: U256,
    /// Why classification failed.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_display"))]
    #[source]
    pub error: PairError,
}

#[cfg(feature = "serde")]
fn serialize_display<T: core::fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// The outcome of a finder run.
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    /// Retryables that still need attention, by ascending submission block.
    pub pending: Vec<ClassificationResult>,
    /// Retryables that were redeemed, by ascending submission block.
    pub redeemed: Vec<ClassificationResult>,
    /// Retryables that could not be classified, by ascending submission block.
    pub failures: Vec<PairFailure>,
}

impl Report {
    /// Partitions results into pending and redeemed and orders every group by submission block.
    ///
    /// The sort is stable, so ties keep their discovery order.
    pub fn aggregate(
        results: impl IntoIterator<Item = ClassificationResult>,
        mut failures: Vec<PairFailure>,
    ) -> Self {
        let (mut pending, mut redeemed): (Vec<_>, Vec<_>) =
            results.into_iter().partition(|result| result.status.is_pending());

        pending.sort_by_key(|result| result.block_number);
        redeemed.sort_by_key(|result| result.block_number);
        failures.sort_by_key(|failure| failure.block_number);

        Self { pending, redeemed, failures }
    }

    /// Returns the number of retryables found, classified or not.
    pub fn len(&self) -> usize {
        self.pending.len() + self.redeemed.len() + self.failures.len()
    }

    /// Returns `true` if no retryable was found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the pending results with the given status.
    pub fn pending_with_status(
        &self,
        status: RetryableStatus,
    ) -> impl Iterator<Item = &ClassificationResult> {
        self.pending.iter().filter(move |result| result.status == status)
    }
}
