//! In-memory providers and fixtures for testing the finder.

use crate::{ChildChainProvider, ChildReceipt, ParentChainProvider};
use alloc::{boxed::Box, vec, vec::Vec};
use alloy_primitives::{
    Address, B256, Bytes, ChainId, Log, U256,
    map::{HashMap, HashSet},
};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use retryable_protocol::{
    ARB_RETRYABLE_TX_ADDRESS, AccountingEvent, DeliveryEvent, InboxMessageDelivered,
    InboxMessageKind, MessageDelivered, RedeemScheduled, RetryablePair, RetryableSubmission,
};
use std::sync::Mutex;

/// The error returned by the mock providers.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("mock provider error: {0}")]
pub struct MockProviderError(pub String);

/// A sample submission with call data that varies with `seed`.
pub fn sample_submission(seed: u64) -> RetryableSubmission {
    RetryableSubmission {
        destination: Address::with_last_byte(0xde),
        child_call_value: U256::from(seed),
        call_value: U256::from(1_000_000_000_000_000u64),
        max_submission_fee: U256::from(500_000_000_000u64),
        excess_fee_refund_address: Address::with_last_byte(0x01),
        call_value_refund_address: Address::with_last_byte(0x02),
        gas_limit: U256::from(300_000u64),
        max_fee_per_gas: U256::from(100_000_000u64),
        data: Bytes::from(seed.to_be_bytes().to_vec()),
    }
}

/// A delivery and accounting event for a retryable with sequence number `seq`.
pub fn retryable_pair(seq: u64, block_number: u64) -> RetryablePair {
    let delivery = DeliveryEvent {
        sequence_number: U256::from(seq),
        data: sample_submission(seq).encode(),
        tx_hash: B256::from(U256::from(seq).to_be_bytes::<32>()),
        block_number,
    };
    let accounting = AccountingEvent {
        sequence_number: U256::from(seq),
        before_inbox_acc: B256::ZERO,
        inbox: Address::with_last_byte(0xaa),
        kind: InboxMessageKind::SubmitRetryable,
        sender: Address::with_last_byte(0x5e),
        message_data_hash: B256::ZERO,
        base_fee: U256::from(20_000_000_000u64),
        timestamp: 1_700_000_000 + seq,
        block_number,
    };
    RetryablePair { delivery, accounting }
}

/// Encodes the delivery event as an RPC log.
pub fn delivery_log(event: &DeliveryEvent, inbox: Address) -> alloy_rpc_types_eth::Log {
    let data = InboxMessageDelivered {
        messageNum: event.sequence_number,
        data: event.data.clone(),
    }
    .encode_log_data();
    alloy_rpc_types_eth::Log {
        inner: Log { address: inbox, data },
        block_number: Some(event.block_number),
        transaction_hash: Some(event.tx_hash),
        ..Default::default()
    }
}

/// Encodes the accounting event as an RPC log.
pub fn accounting_log(event: &AccountingEvent, bridge: Address) -> alloy_rpc_types_eth::Log {
    let data = MessageDelivered {
        messageIndex: event.sequence_number,
        beforeInboxAcc: event.before_inbox_acc,
        inbox: event.inbox,
        kind: event.kind.tag(),
        sender: event.sender,
        messageDataHash: event.message_data_hash,
        baseFeeL1: event.base_fee,
        timestamp: event.timestamp,
    }
    .encode_log_data();
    alloy_rpc_types_eth::Log {
        inner: Log { address: bridge, data },
        block_number: Some(event.block_number),
        transaction_hash: Some(B256::repeat_byte(0xbb)),
        ..Default::default()
    }
}

/// A `RedeemScheduled` log pointing at `retry_tx_hash`.
pub fn redeem_scheduled_log(ticket_id: B256, retry_tx_hash: B256) -> Log {
    let data = RedeemScheduled {
        ticketId: ticket_id,
        retryTxHash: retry_tx_hash,
        sequenceNum: 0,
        donatedGas: 300_000,
        gasDonor: Address::with_last_byte(0x01),
        maxRefund: U256::ZERO,
        submissionFeeRefund: U256::ZERO,
    }
    .encode_log_data();
    Log { address: ARB_RETRYABLE_TX_ADDRESS, data }
}

/// An in-memory parent chain.
#[derive(Debug, Default)]
pub struct MockParentProvider {
    /// The current block number.
    pub head: u64,
    /// Logs by emitting address.
    pub logs: HashMap<Address, Vec<alloy_rpc_types_eth::Log>>,
    /// Addresses whose log queries fail.
    pub failing: HashSet<Address>,
    /// Every `(from, to)` window queried.
    pub windows: Mutex<Vec<(u64, u64)>>,
}

impl MockParentProvider {
    /// Adds a log emitted by `address`.
    pub fn push_log(&mut self, address: Address, log: alloy_rpc_types_eth::Log) {
        self.logs.entry(address).or_default().push(log);
    }

    /// Returns the queried windows.
    pub fn windows(&self) -> Vec<(u64, u64)> {
        self.windows.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ParentChainProvider for MockParentProvider {
    type Error = MockProviderError;

    async fn block_number(&self) -> Result<u64, Self::Error> {
        Ok(self.head)
    }

    async fn logs(
        &self,
        address: Address,
        event: B256,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<alloy_rpc_types_eth::Log>, Self::Error> {
        if let Ok(mut windows) = self.windows.lock() {
            windows.push((from_block, to_block));
        }
        if self.failing.contains(&address) {
            return Err(MockProviderError(format!("logs unavailable for {address}")));
        }
        Ok(self
            .logs
            .get(&address)
            .into_iter()
            .flatten()
            .filter(|log| log.topic0() == Some(&event))
            .filter(|log| {
                log.block_number.is_some_and(|block| (from_block..=to_block).contains(&block))
            })
            .cloned()
            .collect())
    }
}

/// An in-memory child chain.
#[derive(Debug, Default)]
pub struct MockChildProvider {
    /// The chain id.
    pub chain_id: ChainId,
    /// Receipts by transaction hash.
    pub receipts: HashMap<B256, ChildReceipt>,
    /// Transactions whose lookups fail.
    pub failing: HashSet<B256>,
    /// Transactions whose lookups never resolve.
    pub stalled: HashSet<B256>,
    /// Every transaction hash looked up, in order.
    pub queries: Mutex<Vec<B256>>,
}

impl MockChildProvider {
    /// Adds a receipt.
    pub fn insert_receipt(&mut self, tx_hash: B256, status: bool, logs: Vec<Log>) {
        self.receipts.insert(tx_hash, ChildReceipt { tx_hash, status, logs });
    }

    /// Adds a successful creation receipt that schedules `retry_tx_hash`.
    pub fn insert_redeem_scheduled(&mut self, create_tx_hash: B256, retry_tx_hash: B256) {
        let logs = vec![
            Log::new_unchecked(Address::ZERO, vec![B256::repeat_byte(0x77)], Bytes::new()),
            redeem_scheduled_log(create_tx_hash, retry_tx_hash),
        ];
        self.insert_receipt(create_tx_hash, true, logs);
    }

    /// Makes lookups of `tx_hash` fail.
    pub fn fail_on(&mut self, tx_hash: B256) {
        self.failing.insert(tx_hash);
    }

    /// Makes lookups of `tx_hash` hang forever.
    pub fn stall_on(&mut self, tx_hash: B256) {
        self.stalled.insert(tx_hash);
    }

    /// Returns the looked up transaction hashes.
    pub fn queried(&self) -> Vec<B256> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChildChainProvider for MockChildProvider {
    type Error = MockProviderError;

    async fn chain_id(&self) -> Result<ChainId, Self::Error> {
        Ok(self.chain_id)
    }

    async fn transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> Result<Option<ChildReceipt>, Self::Error> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(tx_hash);
        }
        if self.stalled.contains(&tx_hash) {
            return futures::future::pending().await;
        }
        if self.failing.contains(&tx_hash) {
            return Err(MockProviderError(format!("receipt unavailable for {tx_hash}")));
        }
        Ok(self.receipts.get(&tx_hash).cloned())
    }
}
