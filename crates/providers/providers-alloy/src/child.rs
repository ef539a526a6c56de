//! Child chain access through an alloy [`RootProvider`].

use crate::AlloyProviderError;
use alloy_network::{AnyNetwork, AnyTransactionReceipt, ReceiptResponse};
use alloy_primitives::{B256, ChainId};
use alloy_provider::{Provider, RootProvider};
use async_trait::async_trait;
use retryable_finder::{ChildChainProvider, ChildReceipt};
use url::Url;

/// A [`ChildChainProvider`] backed by an alloy [`RootProvider`].
///
/// Uses [`AnyNetwork`] so that receipts of chain specific transaction types deserialize.
#[derive(Debug, Clone)]
pub struct AlloyChildChainProvider {
    /// The inner provider.
    pub inner: RootProvider<AnyNetwork>,
}

impl AlloyChildChainProvider {
    /// Creates a new [`AlloyChildChainProvider`] from a [`RootProvider`].
    pub const fn new(inner: RootProvider<AnyNetwork>) -> Self {
        Self { inner }
    }

    /// Creates a new [`AlloyChildChainProvider`] speaking HTTP to `url`.
    pub fn new_http(url: Url) -> Self {
        Self::new(RootProvider::new_http(url))
    }
}

/// Reduces an RPC receipt to a [`ChildReceipt`].
pub fn child_receipt(receipt: &AnyTransactionReceipt) -> ChildReceipt {
    ChildReceipt {
        tx_hash: receipt.transaction_hash,
        status: receipt.status(),
        logs: receipt.inner.inner.inner.receipt.logs.iter().map(|log| log.inner.clone()).collect(),
    }
}

#[async_trait]
impl ChildChainProvider for AlloyChildChainProvider {
    type Error = AlloyProviderError;

    async fn chain_id(&self) -> Result<ChainId, Self::Error> {
        self.inner.get_chain_id().await.map_err(|err| AlloyProviderError::rpc("eth_chainId", err))
    }

    async fn transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> Result<Option<ChildReceipt>, Self::Error> {
        let receipt = self
            .inner
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|err| AlloyProviderError::rpc("eth_getTransactionReceipt", err))?;
        Ok(receipt.as_ref().map(child_receipt))
    }
}
