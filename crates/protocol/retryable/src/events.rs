//! Parent and child chain events involved in the retryable lifecycle.

use crate::InboxMessageKind;
use alloy_primitives::{Address, B256, Bytes, Log, U256, address};
use alloy_sol_types::{SolEvent, sol};

/// The address of the `ArbRetryableTx` precompile on the child chain.
pub const ARB_RETRYABLE_TX_ADDRESS: Address = address!("0x000000000000000000000000000000000000006E");

sol! {
    /// Emitted by the inbox with the full payload of every delayed message.
    #[derive(Debug, PartialEq, Eq)]
    event InboxMessageDelivered(uint256 indexed messageNum, bytes data);

    /// Emitted by the bridge when a message is appended to the delayed inbox accumulator.
    #[derive(Debug, PartialEq, Eq)]
    event MessageDelivered(
        uint256 indexed messageIndex,
        bytes32 indexed beforeInboxAcc,
        address inbox,
        uint8 kind,
        address sender,
        bytes32 messageDataHash,
        uint256 baseFeeL1,
        uint64 timestamp
    );

    /// Emitted by the `ArbRetryableTx` precompile when a redeem attempt is scheduled.
    #[derive(Debug, PartialEq, Eq)]
    event RedeemScheduled(
        bytes32 indexed ticketId,
        bytes32 indexed retryTxHash,
        uint64 indexed sequenceNum,
        uint64 donatedGas,
        address gasDonor,
        uint256 maxRefund,
        uint256 submissionFeeRefund
    );
}

/// An error converting an RPC log into a typed event.
#[derive(Debug, thiserror::Error)]
pub enum EventDecodeError {
    /// The log's topics or data do not match the event's ABI.
    #[error("failed to decode {event} log: {source}")]
    Abi {
        /// The event name.
        event: &'static str,
        /// The ABI decoding error.
        #[source]
        source: alloy_sol_types::Error,
    },
    /// The log was returned without its inclusion metadata.
    #[error("{event} log is missing `{field}`; pending logs are not supported")]
    MissingMetadata {
        /// The event name.
        event: &'static str,
        /// The missing field.
        field: &'static str,
    },
}

/// The inclusion metadata of a parent chain log.
fn inclusion(
    log: &alloy_rpc_types_eth::Log,
    event: &'static str,
) -> Result<(B256, u64), EventDecodeError> {
    let tx_hash = log
        .transaction_hash
        .ok_or(EventDecodeError::MissingMetadata { event, field: "transactionHash" })?;
    let block_number =
        log.block_number.ok_or(EventDecodeError::MissingMetadata { event, field: "blockNumber" })?;
    Ok((tx_hash, block_number))
}

/// An inbox message delivery observed on the parent chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DeliveryEvent {
    /// The delayed inbox sequence number.
    pub sequence_number: U256,
    /// The raw message payload.
    pub data: Bytes,
    /// The parent chain transaction that delivered the message.
    pub tx_hash: B256,
    /// The parent chain block the message was delivered in.
    pub block_number: u64,
}

impl TryFrom<&alloy_rpc_types_eth::Log> for DeliveryEvent {
    type Error = EventDecodeError;

    fn try_from(log: &alloy_rpc_types_eth::Log) -> Result<Self, Self::Error> {
        let event = InboxMessageDelivered::decode_log_data(&log.inner.data).map_err(|source| {
            EventDecodeError::Abi { event: InboxMessageDelivered::SIGNATURE, source }
        })?;
        let (tx_hash, block_number) = inclusion(log, InboxMessageDelivered::SIGNATURE)?;
        Ok(Self { sequence_number: event.messageNum, data: event.data, tx_hash, block_number })
    }
}

/// The bridge's accounting record of a delayed inbox message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AccountingEvent {
    /// The delayed inbox sequence number.
    pub sequence_number: U256,
    /// The delayed inbox accumulator before this message.
    pub before_inbox_acc: B256,
    /// The inbox that enqueued the message.
    pub inbox: Address,
    /// The message kind.
    pub kind: InboxMessageKind,
    /// The sender, already aliased by the inbox when it is a contract.
    pub sender: Address,
    /// The keccak hash of the message payload.
    pub message_data_hash: B256,
    /// The parent chain base fee at submission time.
    pub base_fee: U256,
    /// The parent chain timestamp at submission time.
    pub timestamp: u64,
    /// The parent chain block that enqueued the message.
    pub block_number: u64,
}

impl From<MessageDelivered> for AccountingEvent {
    fn from(event: MessageDelivered) -> Self {
        Self {
            sequence_number: event.messageIndex,
            before_inbox_acc: event.beforeInboxAcc,
            inbox: event.inbox,
            kind: event.kind.into(),
            sender: event.sender,
            message_data_hash: event.messageDataHash,
            base_fee: event.baseFeeL1,
            timestamp: event.timestamp,
            block_number: 0,
        }
    }
}

impl TryFrom<&alloy_rpc_types_eth::Log> for AccountingEvent {
    type Error = EventDecodeError;

    fn try_from(log: &alloy_rpc_types_eth::Log) -> Result<Self, Self::Error> {
        let event = MessageDelivered::decode_log_data(&log.inner.data).map_err(|source| {
            EventDecodeError::Abi { event: MessageDelivered::SIGNATURE, source }
        })?;
        let (_, block_number) = inclusion(log, MessageDelivered::SIGNATURE)?;
        Ok(Self { block_number, ..event.into() })
    }
}

/// Returns the retry transaction hash of the first `RedeemScheduled` log emitted by the
/// `ArbRetryableTx` precompile, if any.
///
/// Logs are matched by emitter and event signature, not by position.
pub fn find_redeem_scheduled<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Option<B256> {
    logs.into_iter()
        .filter(|log| log.address == ARB_RETRYABLE_TX_ADDRESS)
        .filter(|log| log.topics().first() == Some(&RedeemScheduled::SIGNATURE_HASH))
        .find_map(|log| RedeemScheduled::decode_log_data(&log.data).ok())
        .map(|event| event.retryTxHash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{LogData, b256, bytes};

    fn rpc_log(inner: Log, block_number: Option<u64>) -> alloy_rpc_types_eth::Log {
        alloy_rpc_types_eth::Log {
            inner,
            block_number,
            transaction_hash: Some(B256::repeat_byte(0x11)),
            ..Default::default()
        }
    }

    fn redeem_scheduled_log(retry_tx_hash: B256) -> Log {
        let event = RedeemScheduled {
            ticketId: B256::repeat_byte(0x01),
            retryTxHash: retry_tx_hash,
            sequenceNum: 0,
            donatedGas: 100_000,
            gasDonor: Address::ZERO,
            maxRefund: U256::ZERO,
            submissionFeeRefund: U256::ZERO,
        };
        Log { address: ARB_RETRYABLE_TX_ADDRESS, data: event.encode_log_data() }
    }

    #[test]
    fn test_event_signatures() {
        assert_eq!(InboxMessageDelivered::SIGNATURE, "InboxMessageDelivered(uint256,bytes)");
        assert_eq!(
            MessageDelivered::SIGNATURE,
            "MessageDelivered(uint256,bytes32,address,uint8,address,bytes32,uint256,uint64)"
        );
        assert_eq!(
            RedeemScheduled::SIGNATURE,
            "RedeemScheduled(bytes32,bytes32,uint64,uint64,address,uint256,uint256)"
        );
    }

    #[test]
    fn test_delivery_event_from_log() {
        let event = InboxMessageDelivered { messageNum: U256::from(7), data: bytes!("c0ffee") };
        let log = rpc_log(Log { address: Address::ZERO, data: event.encode_log_data() }, Some(99));

        let delivery = DeliveryEvent::try_from(&log).unwrap();
        assert_eq!(delivery.sequence_number, U256::from(7));
        assert_eq!(delivery.data, bytes!("c0ffee"));
        assert_eq!(delivery.block_number, 99);
        assert_eq!(delivery.tx_hash, B256::repeat_byte(0x11));
    }

    #[test]
    fn test_delivery_event_requires_block_number() {
        let event = InboxMessageDelivered { messageNum: U256::from(7), data: Bytes::new() };
        let log = rpc_log(Log { address: Address::ZERO, data: event.encode_log_data() }, None);

        let err = DeliveryEvent::try_from(&log).unwrap_err();
        assert!(matches!(err, EventDecodeError::MissingMetadata { field: "blockNumber", .. }));
    }

    #[test]
    fn test_accounting_event_from_log() {
        let event = MessageDelivered {
            messageIndex: U256::from(7),
            beforeInboxAcc: B256::repeat_byte(0xac),
            inbox: address!("0x4Dbd4fc535Ac27206064B68FfCf827b0A60BAB3f"),
            kind: 9,
            sender: address!("0xa1b2c3d4e5f60718293a4b5c6d7e8f9011223344"),
            messageDataHash: B256::repeat_byte(0xdd),
            baseFeeL1: U256::from(12_000_000_000u64),
            timestamp: 1_700_000_000,
        };
        let log = rpc_log(Log { address: Address::ZERO, data: event.encode_log_data() }, Some(5));

        let accounting = AccountingEvent::try_from(&log).unwrap();
        assert_eq!(accounting.sequence_number, U256::from(7));
        assert_eq!(accounting.kind, InboxMessageKind::SubmitRetryable);
        assert_eq!(accounting.sender, address!("0xa1b2c3d4e5f60718293a4b5c6d7e8f9011223344"));
        assert_eq!(accounting.base_fee, U256::from(12_000_000_000u64));
        assert_eq!(accounting.timestamp, 1_700_000_000);
        assert_eq!(accounting.block_number, 5);
    }

    #[test]
    fn test_accounting_event_rejects_foreign_log() {
        let event = InboxMessageDelivered { messageNum: U256::from(7), data: Bytes::new() };
        let log = rpc_log(Log { address: Address::ZERO, data: event.encode_log_data() }, Some(5));

        assert!(matches!(
            AccountingEvent::try_from(&log),
            Err(EventDecodeError::Abi { event: "MessageDelivered(uint256,bytes32,address,uint8,address,bytes32,uint256,uint64)", .. })
        ));
    }

    #[test]
    fn test_find_redeem_scheduled_matches_by_signature() {
        let retry = b256!("0x7b3f1a0c9e8d6f5a4b3c2d1e0f9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a");
        let noise = Log {
            address: Address::ZERO,
            data: LogData::new_unchecked(vec![B256::repeat_byte(0x99)], Bytes::new()),
        };
        let logs = vec![noise.clone(), redeem_scheduled_log(retry), noise];

        assert_eq!(find_redeem_scheduled(&logs), Some(retry));
    }

    #[test]
    fn test_find_redeem_scheduled_ignores_other_emitters() {
        let retry = B256::repeat_byte(0x5a);
        let spoofed = Log { address: Address::repeat_byte(0x6e), ..redeem_scheduled_log(retry) };
        assert_eq!(find_redeem_scheduled(&[spoofed.clone()]), None);

        let genuine = redeem_scheduled_log(B256::repeat_byte(0x5b));
        assert_eq!(find_redeem_scheduled(&[spoofed, genuine]), Some(B256::repeat_byte(0x5b)));
    }

    #[test]
    fn test_find_redeem_scheduled_absent() {
        let noise = Log {
            address: Address::ZERO,
            data: LogData::new_unchecked(vec![B256::repeat_byte(0x99)], Bytes::new()),
        };
        assert_eq!(find_redeem_scheduled(&[noise]), None);
        assert_eq!(find_redeem_scheduled(std::iter::empty()), None);
    }
}
