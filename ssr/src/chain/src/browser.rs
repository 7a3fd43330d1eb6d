//! EIP-1193 wallet injected by a browser extension as `window.ethereum`.

use std::future::Future;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use consts::{RECEIPT_POLL_INTERVAL, RECEIPT_TIMEOUT};
use gloo::timers::future::TimeoutFuture;
use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Function, Object, Promise, Reflect};
use send_wrapper::SendWrapper;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_time::Instant;

use crate::{ChainError, ChainTransport, Receipt, TxRequest};

pub struct BrowserWallet {
    ethereum: SendWrapper<JsValue>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CallParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<Address>,
    to: Address,
    data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gas: Option<U256>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    block_number: Option<U256>,
    status: Option<U256>,
}

fn js_key(value: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// Revert payload, either a bare hex string or nested one level under `data`.
fn revert_data(err: &JsValue) -> Option<Vec<u8>> {
    let data = js_key(err, "data")?;
    let hex_str = data
        .as_string()
        .or_else(|| js_key(&data, "data").and_then(|d| d.as_string()))?;
    hex::decode(hex_str.trim_start_matches("0x")).ok()
}

fn js_error(err: JsValue) -> ChainError {
    let code = js_key(&err, "code")
        .and_then(|c| c.as_f64())
        .map(|c| c as i64);
    let message = js_key(&err, "message")
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "wallet request failed".to_string());
    let data = revert_data(&err);
    ChainError::from_rpc_parts(code, &message, data.as_deref())
}

fn decode<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, ChainError> {
    value
        .into_serde()
        .map_err(|e| ChainError::Decode(format!("{what}: {e}")))
}

impl BrowserWallet {
    /// `None` when no injected provider is present.
    pub fn detect() -> Option<Self> {
        let ethereum = js_key(&js_sys::global(), "ethereum")?;
        Some(Self {
            ethereum: SendWrapper::new(ethereum),
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<JsValue, ChainError> {
        let args = Object::new();
        let params = JsValue::from_serde(&params).map_err(|e| ChainError::Decode(e.to_string()))?;
        Reflect::set(&args, &"method".into(), &method.into()).map_err(js_error)?;
        Reflect::set(&args, &"params".into(), &params).map_err(js_error)?;

        let request: Function = Reflect::get(&self.ethereum, &"request".into())
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| ChainError::Network("wallet has no request method".into()))?;
        let promise: Promise = request
            .call1(&self.ethereum, &args)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| ChainError::Network("wallet request did not return a promise".into()))?;

        JsFuture::from(promise).await.map_err(js_error)
    }

    /// Invokes `on_change` with the new active account whenever the holder
    /// switches or disconnects. The listener lives for the page lifetime.
    pub fn on_accounts_changed(&self, on_change: impl Fn(Option<Address>) + 'static) {
        let listener = Closure::wrap(Box::new(move |accounts: JsValue| {
            let accounts: Vec<Address> = accounts.into_serde().unwrap_or_default();
            on_change(accounts.first().copied());
        }) as Box<dyn Fn(JsValue)>);

        let on = Reflect::get(&self.ethereum, &"on".into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());
        match on {
            Some(on) => {
                if let Err(e) = on.call2(
                    &self.ethereum,
                    &"accountsChanged".into(),
                    listener.as_ref().unchecked_ref(),
                ) {
                    log::warn!("failed to subscribe to account changes: {e:?}");
                }
            }
            None => log::warn!("wallet does not emit account changes"),
        }
        listener.forget();
    }

    async fn fetch_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, ChainError> {
        let raw = self
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?;
        if raw.is_null() || raw.is_undefined() {
            return Ok(None);
        }
        let raw: RawReceipt = decode(raw, "receipt")?;
        Ok(Some(Receipt {
            tx_hash: hash,
            block_number: raw.block_number.and_then(|n| u64::try_from(n).ok()),
            success: raw.status == Some(U256::from(1)),
        }))
    }
}

impl ChainTransport for BrowserWallet {
    fn chain_id(&self) -> impl Future<Output = Result<u64, ChainError>> + Send {
        SendWrapper::new(async move {
            let id: U256 = decode(self.request("eth_chainId", json!([])).await?, "chain id")?;
            u64::try_from(id).map_err(|_| ChainError::Decode("chain id does not fit in u64".into()))
        })
    }

    fn accounts(
        &self,
        reselect: bool,
    ) -> impl Future<Output = Result<Vec<Address>, ChainError>> + Send {
        SendWrapper::new(async move {
            if reselect {
                self.request("wallet_requestPermissions", json!([{ "eth_accounts": {} }]))
                    .await?;
            }
            let accounts: Vec<Address> =
                decode(self.request("eth_requestAccounts", json!([])).await?, "accounts")?;
            if accounts.is_empty() {
                return Err(ChainError::NoAccount);
            }
            Ok(accounts)
        })
    }

    fn call(
        &self,
        to: Address,
        data: Bytes,
    ) -> impl Future<Output = Result<Bytes, ChainError>> + Send {
        SendWrapper::new(async move {
            let params = CallParams {
                from: None,
                to,
                data,
                value: None,
                gas: None,
            };
            let out = self.request("eth_call", json!([params, "latest"])).await?;
            decode(out, "call result")
        })
    }

    fn send(&self, tx: TxRequest) -> impl Future<Output = Result<TxHash, ChainError>> + Send {
        SendWrapper::new(async move {
            let from = self
                .accounts(false)
                .await?
                .first()
                .copied()
                .ok_or(ChainError::NoAccount)?;
            let params = CallParams {
                from: Some(from),
                to: tx.to,
                data: tx.data,
                value: (!tx.value.is_zero()).then_some(tx.value),
                gas: tx.gas_limit.map(U256::from),
            };
            let hash = self
                .request("eth_sendTransaction", json!([params]))
                .await?;
            decode(hash, "transaction hash")
        })
    }

    fn wait(&self, hash: TxHash) -> impl Future<Output = Result<Receipt, ChainError>> + Send {
        SendWrapper::new(async move {
            let started = Instant::now();
            loop {
                if let Some(receipt) = self.fetch_receipt(hash).await? {
                    return Ok(receipt);
                }
                if started.elapsed() >= RECEIPT_TIMEOUT {
                    return Err(ChainError::Timeout(hash));
                }
                TimeoutFuture::new(RECEIPT_POLL_INTERVAL.as_millis() as u32).await;
            }
        })
    }

    fn balance(&self, of: Address) -> impl Future<Output = Result<U256, ChainError>> + Send {
        SendWrapper::new(async move {
            let wei = self
                .request("eth_getBalance", json!([of, "latest"]))
                .await?;
            decode(wei, "balance")
        })
    }
}
