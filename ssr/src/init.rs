use std::fmt;

use chain::{rpc::RpcTransport, Address, ChainTransport, TournamentContract};
use consts::{env, DEFAULT_ALLOWED_ORIGIN, SEPOLIA_CHAIN_ID};
use http::HeaderValue;
use leptos::prelude::LeptosOptions;
use leptos_axum::AxumRouteListing;
use state::server::{AppState, RelayState};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("{var} is not a valid address: {0}", var = env::CONTRACT_ADDRESS)]
    InvalidAddress(String),
    #[error("{var} is not a valid chain id: {0}", var = env::CHAIN_ID)]
    InvalidChainId(String),
    #[error("{var} is not a valid origin: {0}", var = env::ALLOWED_ORIGIN)]
    InvalidOrigin(String),
    #[error(transparent)]
    Signer(#[from] chain::rpc::SetupError),
}

pub struct RelayConfig {
    pub rpc_url: String,
    pub private_key: String,
    pub contract_address: Address,
    pub chain_id: u64,
    pub allowed_origin: HeaderValue,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("contract_address", &self.contract_address)
            .field("chain_id", &self.chain_id)
            .field("allowed_origin", &self.allowed_origin)
            .finish()
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let rpc_url = get(env::RPC_URL)
            .or_else(|| get(env::RPC_URL_ALIAS))
            .ok_or(ConfigError::Missing(env::RPC_URL))?;
        let private_key = required(env::PRIVATE_KEY)?;
        let contract_address = required(env::CONTRACT_ADDRESS)?;
        let contract_address = contract_address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(contract_address))?;
        let chain_id = match get(env::CHAIN_ID) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidChainId(raw))?,
            None => SEPOLIA_CHAIN_ID,
        };
        let origin = get(env::ALLOWED_ORIGIN).unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());
        let allowed_origin =
            HeaderValue::from_str(&origin).map_err(|_| ConfigError::InvalidOrigin(origin))?;

        Ok(Self {
            rpc_url,
            private_key,
            contract_address,
            chain_id,
            allowed_origin,
        })
    }
}

/// Logs, without failing, when the node or the contract disagree with the
/// configuration.
pub async fn check_deployment<T: ChainTransport>(relay: &RelayState<T>) {
    match relay.contract.transport().chain_id().await {
        Ok(id) if id != relay.chain_id => {
            tracing::warn!(expected = relay.chain_id, actual = id, "rpc node is on another chain")
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("could not read chain id: {e}"),
    }

    match relay.contract.owner().await {
        Ok(owner) if owner != relay.signer => tracing::warn!(
            %owner,
            signer = %relay.signer,
            "relay signer does not own the contract, owner-only endpoints will be refused"
        ),
        Ok(owner) => tracing::info!(%owner, "relay signer owns the contract"),
        Err(e) => tracing::warn!("could not read contract owner: {e}"),
    }
}

pub struct AppStateRes {
    pub app_state: AppState,
    pub allowed_origin: HeaderValue,
}

pub struct AppStateBuilder {
    leptos_options: LeptosOptions,
    routes: Vec<AxumRouteListing>,
    config: RelayConfig,
}

impl AppStateBuilder {
    pub fn new(
        leptos_options: LeptosOptions,
        routes: Vec<AxumRouteListing>,
        config: RelayConfig,
    ) -> Self {
        Self {
            leptos_options,
            routes,
            config,
        }
    }

    pub async fn build(self) -> Result<AppStateRes, ConfigError> {
        let RelayConfig {
            rpc_url,
            private_key,
            contract_address,
            chain_id,
            allowed_origin,
        } = self.config;

        let transport = RpcTransport::connect(&rpc_url, &private_key)?;
        let signer = transport.signer();
        tracing::info!(%signer, contract = %contract_address, chain_id, "relay signer loaded");

        let relay = RelayState::new(
            TournamentContract::new(transport, contract_address),
            signer,
            chain_id,
        );
        check_deployment(&relay).await;

        Ok(AppStateRes {
            app_state: AppState {
                leptos_options: self.leptos_options,
                routes: self.routes,
                relay,
            },
            allowed_origin,
        })
    }
}
