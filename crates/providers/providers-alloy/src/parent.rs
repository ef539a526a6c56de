//! Parent chain access through an alloy [`RootProvider`].

use crate::AlloyProviderError;
use alloy_primitives::{Address, B256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::{Filter, Log};
use async_trait::async_trait;
use retryable_finder::ParentChainProvider;
use tracing::trace;
use url::Url;

/// A [`ParentChainProvider`] backed by an alloy [`RootProvider`].
#[derive(Debug, Clone)]
pub struct AlloyParentChainProvider {
    /// The inner provider.
    pub inner: RootProvider,
}

impl AlloyParentChainProvider {
    /// Creates a new [`AlloyParentChainProvider`] from a [`RootProvider`].
    pub const fn new(inner: RootProvider) -> Self {
        Self { inner }
    }

    /// Creates a new [`AlloyParentChainProvider`] speaking HTTP to `url`.
    pub fn new_http(url: Url) -> Self {
        Self::new(RootProvider::new_http(url))
    }
}

#[async_trait]
impl ParentChainProvider for AlloyParentChainProvider {
    type Error = AlloyProviderError;

    async fn block_number(&self) -> Result<u64, Self::Error> {
        self.inner
            .get_block_number()
            .await
            .map_err(|err| AlloyProviderError::rpc("eth_blockNumber", err))
    }

    async fn logs(
        &self,
        address: Address,
        event: B256,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Log>, Self::Error> {
        let filter = Filter::new()
            .address(address)
            .event_signature(event)
            .from_block(from_block)
            .to_block(to_block);
        trace!(target: "providers", %address, %event, from_block, to_block, "Querying logs");
        self.inner.get_logs(&filter).await.map_err(|err| AlloyProviderError::rpc("eth_getLogs", err))
    }
}
