//! The retryable submission payload carried by an `InboxMessageDelivered` event.

use alloy_primitives::{Address, Bytes, U256};

/// The width of a single ABI word in the inbox message payload.
const WORD_SIZE: usize = 32;

/// The number of fixed-width words that precede the call data.
const FIXED_WORDS: usize = 9;

/// The length of the fixed-width header of a retryable submission payload.
pub const SUBMISSION_HEADER_LEN: usize = FIXED_WORDS * WORD_SIZE;

/// An error decoding a [`RetryableSubmission`] from an inbox message payload.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RetryableDecodeError {
    /// The payload is too short to contain the fixed-width fields.
    #[error("payload too short for retryable header: expected at least {SUBMISSION_HEADER_LEN} bytes, got {0}")]
    HeaderTooShort(usize),
    /// The declared call data length does not fit the payload.
    #[error("declared call data length {declared} exceeds the {available} trailing bytes")]
    CallDataTooShort {
        /// The call data length declared in the header.
        declared: U256,
        /// The number of bytes following the header.
        available: usize,
    },
}

/// A parent chain request to create a retryable ticket on the child chain.
///
/// This is the body of an inbox message of kind
/// [`InboxMessageKind::SubmitRetryable`](crate::InboxMessageKind::SubmitRetryable). Every field is
/// stored as a 32-byte big-endian word, followed by the raw call data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RetryableSubmission {
    /// The call target on the child chain. The zero address denotes contract creation.
    pub destination: Address,
    /// The value forwarded with the child chain call.
    pub child_call_value: U256,
    /// The value deposited on the parent chain alongside the submission.
    pub call_value: U256,
    /// The maximum fee paid for submitting the ticket.
    pub max_submission_fee: U256,
    /// Receives the refund of unused submission and execution fees.
    pub excess_fee_refund_address: Address,
    /// Receives the call value if the ticket expires or is cancelled.
    pub call_value_refund_address: Address,
    /// The gas limit for the auto-redeem attempt.
    pub gas_limit: U256,
    /// The maximum child chain fee per gas for the auto-redeem attempt.
    pub max_fee_per_gas: U256,
    /// The call data of the child chain call.
    pub data: Bytes,
}

impl RetryableSubmission {
    /// Decodes a [`RetryableSubmission`] from an inbox message payload.
    ///
    /// Bytes following the declared call data are ignored.
    pub fn decode(payload: &[u8]) -> Result<Self, RetryableDecodeError> {
        if payload.len() < SUBMISSION_HEADER_LEN {
            return Err(RetryableDecodeError::HeaderTooShort(payload.len()));
        }

        let (header, body) = payload.split_at(SUBMISSION_HEADER_LEN);
        let mut words = header.chunks_exact(WORD_SIZE);
        let mut next_uint = || U256::from_be_slice(words.next().unwrap_or_default());

        let destination = word_to_address(next_uint());
        let child_call_value = next_uint();
        let call_value = next_uint();
        let max_submission_fee = next_uint();
        let excess_fee_refund_address = word_to_address(next_uint());
        let call_value_refund_address = word_to_address(next_uint());
        let gas_limit = next_uint();
        let max_fee_per_gas = next_uint();
        let data_len = next_uint();

        let data = usize::try_from(data_len)
            .ok()
            .and_then(|len| body.get(..len))
            .ok_or(RetryableDecodeError::CallDataTooShort {
                declared: data_len,
                available: body.len(),
            })?;

        Ok(Self {
            destination,
            child_call_value,
            call_value,
            max_submission_fee,
            excess_fee_refund_address,
            call_value_refund_address,
            gas_limit,
            max_fee_per_gas,
            data: Bytes::copy_from_slice(data),
        })
    }

    /// Encodes the [`RetryableSubmission`] into the inbox message payload layout.
    pub fn encode(&self) -> Bytes {
        let mut out = Vec::with_capacity(SUBMISSION_HEADER_LEN + self.data.len());
        out.extend_from_slice(self.destination.into_word().as_slice());
        out.extend_from_slice(&self.child_call_value.to_be_bytes::<WORD_SIZE>());
        out.extend_from_slice(&self.call_value.to_be_bytes::<WORD_SIZE>());
        out.extend_from_slice(&self.max_submission_fee.to_be_bytes::<WORD_SIZE>());
        out.extend_from_slice(self.excess_fee_refund_address.into_word().as_slice());
        out.extend_from_slice(self.call_value_refund_address.into_word().as_slice());
        out.extend_from_slice(&self.gas_limit.to_be_bytes::<WORD_SIZE>());
        out.extend_from_slice(&self.max_fee_per_gas.to_be_bytes::<WORD_SIZE>());
        out.extend_from_slice(&U256::from(self.data.len()).to_be_bytes::<WORD_SIZE>());
        out.extend_from_slice(&self.data);
        out.into()
    }

    /// Returns the length of the call data.
    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}

/// Takes the low 20 bytes of an ABI word as an [`Address`].
fn word_to_address(word: U256) -> Address {
    Address::from_word(word.to_be_bytes::<WORD_SIZE>().into())
}
