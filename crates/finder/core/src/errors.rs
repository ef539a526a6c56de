//! Error types for the finder.

use alloc::boxed::Box;
use alloy_primitives::B256;
use core::error::Error;
use retryable_protocol::{
    CorrelationError, DerivationError, EventDecodeError, RetryableDecodeError,
};

/// A type-erased provider error.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// An error that prevents a single retryable from being classified.
///
/// Sibling retryables are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum PairError {
    /// The inbox message payload could not be decoded.
    #[error("malformed retryable payload in parent tx {tx_hash}: {source}")]
    MalformedPayload {
        /// The parent chain transaction carrying the payload.
        tx_hash: B256,
        /// The decoding error.
        #[source]
        source: RetryableDecodeError,
    },
    /// The inbox delivery log did not decode.
    #[error(transparent)]
    MalformedEvent(#[from] EventDecodeError),
    /// The delivery did not match exactly one accounting event.
    #[error(transparent)]
    CorrelationMismatch(#[from] CorrelationError),
    /// A child chain receipt lookup failed.
    #[error("receipt lookup for child tx {tx_hash} failed: {source}")]
    LookupFailure {
        /// The transaction being looked up.
        tx_hash: B256,
        /// The provider error.
        #[source]
        source: BoxError,
    },
    /// The derivation input was incomplete. This is a logic defect and aborts the whole run.
    #[error(transparent)]
    DerivationInputIncomplete(#[from] DerivationError),
}

impl PairError {
    /// Returns a stable label for the error kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::MalformedEvent(_) => "malformed_event",
            Self::CorrelationMismatch(_) => "correlation_mismatch",
            Self::LookupFailure { .. } => "lookup_failure",
            Self::DerivationInputIncomplete(_) => "derivation_input_incomplete",
        }
    }

    /// Returns `true` if the error must abort the whole run.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DerivationInputIncomplete(_))
    }
}

/// An error that aborts a finder run.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// The requested block range is empty.
    #[error("invalid block range: from block {from} is after to block {to}")]
    InvalidRange {
        /// The first block of the range.
        from: u64,
        /// The last block of the range.
        to: u64,
    },
    /// The parent chain head could not be fetched.
    #[error("failed to fetch the parent chain head: {0}")]
    BlockNumber(#[source] BoxError),
    /// The child chain id could not be fetched.
    #[error("failed to fetch the child chain id: {0}")]
    ChainId(#[source] BoxError),
    /// A parent chain log query failed.
    #[error("failed to fetch {event} logs in blocks [{from}, {to}]: {source}")]
    ParentLogs {
        /// The event being queried.
        event: &'static str,
        /// The first block of the failed window.
        from: u64,
        /// The last block of the failed window.
        to: u64,
        /// The provider error.
        #[source]
        source: BoxError,
    },
    /// A parent chain log did not decode as the queried event.
    #[error(transparent)]
    EventDecode(#[from] EventDecodeError),
    /// The derivation input was incomplete.
    #[error(transparent)]
    DerivationInputIncomplete(#[from] DerivationError),
}
