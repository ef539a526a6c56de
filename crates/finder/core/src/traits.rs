//! Chain access consumed by the finder.

use alloc::{boxed::Box, vec::Vec};
use alloy_primitives::{Address, B256, ChainId, Log};
use async_trait::async_trait;
use core::error::Error;

/// A child chain receipt, reduced to what the classifier inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildReceipt {
    /// The transaction hash.
    pub tx_hash: B256,
    /// Whether the transaction succeeded.
    pub status: bool,
    /// The logs emitted by the transaction, in order.
    pub logs: Vec<Log>,
}

/// Read access to the parent chain.
#[async_trait]
pub trait ParentChainProvider {
    /// The error type for the [`ParentChainProvider`].
    type Error: Error + Send + Sync + 'static;

    /// Returns the current block number.
    async fn block_number(&self) -> Result<u64, Self::Error>;

    /// Returns the logs with topic0 `event` emitted by `address` in the inclusive block range.
    async fn logs(
        &self,
        address: Address,
        event: B256,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<alloy_rpc_types_eth::Log>, Self::Error>;
}

/// Read access to the child chain.
#[async_trait]
pub trait ChildChainProvider {
    /// The error type for the [`ChildChainProvider`].
    type Error: Error + Send + Sync + 'static;

    /// Returns the chain id.
    async fn chain_id(&self) -> Result<ChainId, Self::Error>;

    /// Returns the receipt of the given transaction, or `None` if the transaction is unknown.
    async fn transaction_receipt(&self, tx_hash: B256)
    -> Result<Option<ChildReceipt>, Self::Error>;
}
