use std::future::Future;

use alloy_primitives::{Address, Bytes, TxHash, U256};

use crate::{ChainError, Receipt};

/// A state changing call, ready to be signed by the transport's identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxRequest {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: Option<u64>,
}

/// Network access plus one signing identity.
///
/// Futures are `Send` so relay handlers can stay generic over the transport.
/// The browser wallet satisfies that by pinning its futures to the UI thread.
pub trait ChainTransport: Send + Sync + 'static {
    fn chain_id(&self) -> impl Future<Output = Result<u64, ChainError>> + Send;

    /// Accounts the signer exposes, first one is the active identity.
    ///
    /// `reselect` asks an interactive wallet to let its holder pick again.
    fn accounts(
        &self,
        reselect: bool,
    ) -> impl Future<Output = Result<Vec<Address>, ChainError>> + Send;

    /// `eth_call` against the latest block.
    fn call(
        &self,
        to: Address,
        data: Bytes,
    ) -> impl Future<Output = Result<Bytes, ChainError>> + Send;

    fn send(&self, tx: TxRequest) -> impl Future<Output = Result<TxHash, ChainError>> + Send;

    /// Resolves once `hash` is mined, `ChainError::Timeout` past the bounded wait.
    fn wait(&self, hash: TxHash) -> impl Future<Output = Result<Receipt, ChainError>> + Send;

    fn balance(&self, of: Address) -> impl Future<Output = Result<U256, ChainError>> + Send;

    /// Timestamp of the latest block, when the transport can cheaply tell.
    fn latest_block_timestamp(
        &self,
    ) -> impl Future<Output = Result<Option<u64>, ChainError>> + Send {
        async { Ok(None) }
    }
}
