//! Local-key transport for the relay process.

use std::future::Future;

use alloy::{
    eips::BlockNumberOrTag,
    network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::{RpcError, TransportErrorKind},
};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use consts::{RECEIPT_POLL_INTERVAL, RECEIPT_TIMEOUT};

use crate::{ChainError, ChainTransport, Receipt, TxRequest};

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid signer key: {0}")]
    InvalidKey(String),
    #[error("invalid rpc url: {0}")]
    InvalidUrl(String),
}

/// JSON-RPC endpoint plus a private key that signs every write.
#[derive(Clone)]
pub struct RpcTransport {
    provider: DynProvider,
    signer: Address,
}

impl RpcTransport {
    pub fn connect(rpc_url: &str, private_key: &str) -> Result<Self, SetupError> {
        let key = private_key.trim();
        let signer = key
            .strip_prefix("0x")
            .unwrap_or(key)
            .parse::<PrivateKeySigner>()
            .map_err(|e| SetupError::InvalidKey(e.to_string()))?;
        let url =
            reqwest::Url::parse(rpc_url).map_err(|e| SetupError::InvalidUrl(e.to_string()))?;

        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            signer: address,
        })
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt, ChainError> {
        loop {
            if let Some(receipt) = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(classify)?
            {
                return Ok(Receipt {
                    tx_hash: hash,
                    block_number: receipt.block_number(),
                    success: receipt.status(),
                });
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}

fn classify(err: RpcError<TransportErrorKind>) -> ChainError {
    match err.as_error_resp() {
        Some(payload) => {
            let data = payload.as_revert_data();
            ChainError::from_rpc_parts(
                Some(payload.code),
                &payload.message,
                data.as_ref().map(|d| &d[..]),
            )
        }
        None => ChainError::Network(err.to_string()),
    }
}

impl ChainTransport for RpcTransport {
    fn chain_id(&self) -> impl Future<Output = Result<u64, ChainError>> + Send {
        async move { self.provider.get_chain_id().await.map_err(classify) }
    }

    /// Always the configured signer.
    fn accounts(
        &self,
        _reselect: bool,
    ) -> impl Future<Output = Result<Vec<Address>, ChainError>> + Send {
        async move { Ok(vec![self.signer]) }
    }

    fn call(
        &self,
        to: Address,
        data: Bytes,
    ) -> impl Future<Output = Result<Bytes, ChainError>> + Send {
        async move {
            let tx = TransactionRequest::default()
                .with_from(self.signer)
                .with_to(to)
                .with_input(data);
            self.provider.call(tx).await.map_err(classify)
        }
    }

    fn send(&self, tx: TxRequest) -> impl Future<Output = Result<TxHash, ChainError>> + Send {
        async move {
            let mut request = TransactionRequest::default()
                .with_from(self.signer)
                .with_to(tx.to)
                .with_input(tx.data)
                .with_value(tx.value);
            if let Some(gas) = tx.gas_limit {
                request = request.with_gas_limit(gas);
            }
            let pending = self
                .provider
                .send_transaction(request)
                .await
                .map_err(classify)?;
            Ok(*pending.tx_hash())
        }
    }

    fn wait(&self, hash: TxHash) -> impl Future<Output = Result<Receipt, ChainError>> + Send {
        async move {
            tokio::time::timeout(RECEIPT_TIMEOUT, self.wait_for_receipt(hash))
                .await
                .map_err(|_| ChainError::Timeout(hash))?
        }
    }

    fn balance(&self, of: Address) -> impl Future<Output = Result<U256, ChainError>> + Send {
        async move { self.provider.get_balance(of).await.map_err(classify) }
    }

    fn latest_block_timestamp(
        &self,
    ) -> impl Future<Output = Result<Option<u64>, ChainError>> + Send {
        async move {
            let block = self
                .provider
                .get_block_by_number(BlockNumberOrTag::Latest)
                .await
                .map_err(classify)?;
            Ok(block.map(|b| b.header.timestamp))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_without_prefix_is_accepted() {
        let key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let transport = RpcTransport::connect("http://localhost:8545", key).unwrap();
        let prefixed = RpcTransport::connect("http://localhost:8545", &format!("0x{key}")).unwrap();
        assert_eq!(transport.signer(), prefixed.signer());
    }

    #[test]
    fn garbage_key_is_rejected() {
        let err = RpcTransport::connect("http://localhost:8545", "not-a-key").err();
        assert!(matches!(err, Some(SetupError::InvalidKey(_))));
    }

    #[test]
    fn garbage_url_is_rejected() {
        let key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let err = RpcTransport::connect("not a url", key).err();
        assert!(matches!(err, Some(SetupError::InvalidUrl(_))));
    }
}
