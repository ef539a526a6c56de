//! The child chain transaction synthesized from a retryable submission.

use crate::RetryableSubmission;
use alloy_primitives::{Address, B256, Bytes, ChainId, U256, keccak256};
use alloy_rlp::{BufMut, Encodable, Header};

/// The EIP-2718 type of the child chain's submit-retryable transaction.
pub const SUBMIT_RETRYABLE_TX_TYPE: u8 = 0x69;

/// An error building a [`SubmitRetryableTx`].
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum DerivationError {
    /// A field required for the hash derivation was never set.
    #[error("derivation input incomplete: missing `{0}`")]
    MissingField(&'static str),
}

/// The transaction the child chain creates for every retryable submission.
///
/// Its hash is fully determined by the parent chain message, which lets the create transaction be
/// located on the child chain without observing it first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SubmitRetryableTx {
    /// The child chain id.
    pub chain_id: ChainId,
    /// The delayed inbox sequence number of the message.
    pub request_id: U256,
    /// The aliased sender recorded by the bridge.
    pub from: Address,
    /// The parent chain base fee at submission time.
    pub l1_base_fee: U256,
    /// The parent chain deposit.
    pub deposit_value: U256,
    /// The maximum fee per gas of the auto-redeem.
    pub gas_fee_cap: U256,
    /// The gas limit of the auto-redeem.
    pub gas: U256,
    /// The call target, or the zero address for contract creation.
    pub retry_to: Address,
    /// The value of the retried call.
    pub retry_value: U256,
    /// The beneficiary of the call value refund.
    pub beneficiary: Address,
    /// The maximum submission fee.
    pub max_submission_fee: U256,
    /// The fee refund address.
    pub fee_refund_addr: Address,
    /// The call data of the retried call.
    pub retry_data: Bytes,
}

impl SubmitRetryableTx {
    /// Returns a [`SubmitRetryableTxBuilder`].
    pub fn builder() -> SubmitRetryableTxBuilder {
        SubmitRetryableTxBuilder::default()
    }

    /// The request id as a fixed 32-byte word. Unlike every other integer field, it is not
    /// trimmed of leading zeros.
    pub fn request_id_word(&self) -> B256 {
        B256::from(self.request_id.to_be_bytes::<32>())
    }

    /// Returns the RLP payload length of the field list.
    pub fn rlp_encoded_fields_length(&self) -> usize {
        self.chain_id.length()
            + self.request_id_word().length()
            + self.from.length()
            + self.l1_base_fee.length()
            + self.deposit_value.length()
            + self.gas_fee_cap.length()
            + self.gas.length()
            + self.retry_to_length()
            + self.retry_value.length()
            + self.beneficiary.length()
            + self.max_submission_fee.length()
            + self.fee_refund_addr.length()
            + self.retry_data.length()
    }

    /// Encodes the field list without the list header.
    pub fn rlp_encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.request_id_word().encode(out);
        self.from.encode(out);
        self.l1_base_fee.encode(out);
        self.deposit_value.encode(out);
        self.gas_fee_cap.encode(out);
        self.gas.encode(out);
        self.encode_retry_to(out);
        self.retry_value.encode(out);
        self.beneficiary.encode(out);
        self.max_submission_fee.encode(out);
        self.fee_refund_addr.encode(out);
        self.retry_data.encode(out);
    }

    /// Returns the RLP list header.
    pub fn rlp_header(&self) -> Header {
        Header { list: true, payload_length: self.rlp_encoded_fields_length() }
    }

    /// Returns the EIP-2718 encoding: the type byte followed by the RLP list.
    pub fn encoded_2718(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.length());
        out.put_u8(SUBMIT_RETRYABLE_TX_TYPE);
        self.encode(&mut out);
        out
    }

    /// Computes the child chain transaction hash.
    pub fn tx_hash(&self) -> B256 {
        keccak256(self.encoded_2718())
    }

    // A missing `to` is encoded as the empty string.
    fn retry_to_length(&self) -> usize {
        if self.retry_to.is_zero() { Bytes::new().length() } else { self.retry_to.length() }
    }

    fn encode_retry_to(&self, out: &mut dyn BufMut) {
        if self.retry_to.is_zero() {
            Bytes::new().encode(out);
        } else {
            self.retry_to.encode(out);
        }
    }
}

impl Encodable for SubmitRetryableTx {
    fn encode(&self, out: &mut dyn BufMut) {
        self.rlp_header().encode(out);
        self.rlp_encode_fields(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_encoded_fields_length();
        Header { list: true, payload_length }.length() + payload_length
    }
}

/// Builds a [`SubmitRetryableTx`] from the accounting event and the decoded submission.
#[derive(Debug, Clone, Default)]
pub struct SubmitRetryableTxBuilder {
    chain_id: Option<ChainId>,
    request_id: Option<U256>,
    from: Option<Address>,
    l1_base_fee: Option<U256>,
    submission: Option<RetryableSubmission>,
}

impl SubmitRetryableTxBuilder {
    /// Sets the child chain id.
    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Sets the delayed inbox sequence number.
    pub fn with_request_id(mut self, request_id: U256) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Sets the sender recorded by the bridge.
    pub fn with_sender(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the parent chain base fee.
    pub fn with_l1_base_fee(mut self, l1_base_fee: U256) -> Self {
        self.l1_base_fee = Some(l1_base_fee);
        self
    }

    /// Sets the decoded submission.
    pub fn with_submission(mut self, submission: RetryableSubmission) -> Self {
        self.submission = Some(submission);
        self
    }

    /// Builds the [`SubmitRetryableTx`].
    pub fn build(self) -> Result<SubmitRetryableTx, DerivationError> {
        let chain_id = self.chain_id.ok_or(DerivationError::MissingField("chain_id"))?;
        let request_id = self.request_id.ok_or(DerivationError::MissingField("request_id"))?;
        let from = self.from.ok_or(DerivationError::MissingField("from"))?;
        let l1_base_fee = self.l1_base_fee.ok_or(DerivationError::MissingField("l1_base_fee"))?;
        let submission = self.submission.ok_or(DerivationError::MissingField("submission"))?;

        Ok(SubmitRetryableTx {
            chain_id,
            request_id,
            from,
            l1_base_fee,
            deposit_value: submission.call_value,
            gas_fee_cap: submission.max_fee_per_gas,
            gas: submission.gas_limit,
            retry_to: submission.destination,
            retry_value: submission.child_call_value,
            beneficiary: submission.call_value_refund_address,
            max_submission_fee: submission.max_submission_fee,
            fee_refund_addr: submission.excess_fee_refund_address,
            retry_data: submission.data,
        })
    }
}
