//! Retryable ticket lifecycle outcomes.

use derive_more::Display;

/// The terminal outcome of classifying a retryable submission.
///
/// Variants are ordered by how far the ticket progressed on the child chain.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RetryableStatus {
    /// No create transaction exists on the child chain.
    #[display("NOT_CREATED")]
    NotCreated,
    /// The create transaction reverted.
    #[display("CREATE_FAILED")]
    CreateFailed,
    /// The ticket was created but no auto-redeem was scheduled.
    #[display("NOT_AUTOREDEEMED")]
    NotAutoredeemed,
    /// An auto-redeem was scheduled but its transaction does not exist.
    #[display("AUTOREDEEM_CREATE_FAILED")]
    AutoredeemCreateFailed,
    /// The auto-redeem transaction reverted.
    #[display("AUTOREDEEM_FAILED")]
    AutoredeemFailed,
    /// The auto-redeem succeeded.
    #[display("REDEEMED")]
    Redeemed,
}

impl RetryableStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::NotCreated,
        Self::CreateFailed,
        Self::NotAutoredeemed,
        Self::AutoredeemCreateFailed,
        Self::AutoredeemFailed,
        Self::Redeemed,
    ];

    /// Returns `true` if the ticket still needs attention.
    pub const fn is_pending(self) -> bool {
        !matches!(self, Self::Redeemed)
    }

    /// Returns a short explanation of the status.
    pub const fn reason(self) -> &'static str {
        match self {
            Self::NotCreated => "the ticket creation transaction was not found on the child chain",
            Self::CreateFailed => "the ticket creation transaction reverted",
            Self::NotAutoredeemed => "the ticket was created without scheduling an auto-redeem",
            Self::AutoredeemCreateFailed => "the scheduled auto-redeem transaction was not found",
            Self::AutoredeemFailed => "the auto-redeem transaction reverted",
            Self::Redeemed => "the ticket was redeemed",
        }
    }
}
