//! Delayed inbox message kinds.

use derive_more::Display;

/// The kind tag of a message enqueued in the bridge's delayed inbox.
///
/// The tag is emitted as the `kind` field of the bridge's `MessageDelivered` event.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum InboxMessageKind {
    /// A signed or unsigned child chain transaction.
    #[display("l2Message")]
    L2Message,
    /// Marks the end of a child chain block.
    #[display("endOfBlock")]
    EndOfBlock,
    /// A child chain transaction funded by a parent chain deposit.
    #[display("l2FundedByL1")]
    L2FundedByL1,
    /// A rollup protocol event.
    #[display("rollupEvent")]
    RollupEvent,
    /// A retryable ticket submission.
    #[display("submitRetryable")]
    SubmitRetryable,
    /// A batch submitted for gas estimation.
    #[display("batchForGasEstimation")]
    BatchForGasEstimation,
    /// Chain initialization.
    #[display("initialize")]
    Initialize,
    /// A plain ether deposit.
    #[display("ethDeposit")]
    EthDeposit,
    /// A batch poster's report.
    #[display("batchPostingReport")]
    BatchPostingReport,
    /// Any tag not known to this crate.
    #[display("unknown({_0})")]
    Unknown(u8),
}

impl InboxMessageKind {
    /// The raw tag of [`Self::SubmitRetryable`].
    pub const SUBMIT_RETRYABLE_TAG: u8 = 9;

    /// Returns the raw tag of the kind.
    pub const fn tag(self) -> u8 {
        match self {
            Self::L2Message => 3,
            Self::EndOfBlock => 6,
            Self::L2FundedByL1 => 7,
            Self::RollupEvent => 8,
            Self::SubmitRetryable => Self::SUBMIT_RETRYABLE_TAG,
            Self::BatchForGasEstimation => 10,
            Self::Initialize => 11,
            Self::EthDeposit => 12,
            Self::BatchPostingReport => 13,
            Self::Unknown(tag) => tag,
        }
    }

    /// Returns `true` if the kind denotes a retryable ticket submission.
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::SubmitRetryable)
    }
}

impl From<u8> for InboxMessageKind {
    fn from(tag: u8) -> Self {
        match tag {
            3 => Self::L2Message,
            6 => Self::EndOfBlock,
            7 => Self::L2FundedByL1,
            8 => Self::RollupEvent,
            Self::SUBMIT_RETRYABLE_TAG => Self::SubmitRetryable,
            10 => Self::BatchForGasEstimation,
            11 => Self::Initialize,
            12 => Self::EthDeposit,
            13 => Self::BatchPostingReport,
            other => Self::Unknown(other),
        }
    }
}

impl From<InboxMessageKind> for u8 {
    fn from(kind: InboxMessageKind) -> Self {
        kind.tag()
    }
}
