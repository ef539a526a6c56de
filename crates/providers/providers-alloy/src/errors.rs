//! Errors for the alloy backed providers.

use alloy_transport::TransportError;

/// An error from an alloy backed provider.
#[derive(Debug, thiserror::Error)]
pub enum AlloyProviderError {
    /// The RPC request failed.
    #[error("{method} request failed: {source}")]
    Rpc {
        /// The RPC method.
        method: &'static str,
        /// The transport error.
        #[source]
        source: TransportError,
    },
}

impl AlloyProviderError {
    /// Wraps a transport error raised by `method`.
    pub const fn rpc(method: &'static str, source: TransportError) -> Self {
        Self::Rpc { method, source }
    }
}
