use std::sync::Arc;

use axum::extract::FromRef;
use chain::{rpc::RpcTransport, Address, ChainTransport, TournamentContract};
use leptos::prelude::LeptosOptions;
use leptos_axum::AxumRouteListing;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// What every relay handler shares: the contract bound to the one signer.
pub struct RelayState<T> {
    pub contract: Arc<TournamentContract<T>>,
    pub signer: Address,
    pub chain_id: u64,
    lane: Arc<Mutex<()>>,
}

impl<T> Clone for RelayState<T> {
    fn clone(&self) -> Self {
        Self {
            contract: self.contract.clone(),
            signer: self.signer,
            chain_id: self.chain_id,
            lane: self.lane.clone(),
        }
    }
}

impl<T: ChainTransport> RelayState<T> {
    pub fn new(contract: TournamentContract<T>, signer: Address, chain_id: u64) -> Self {
        Self {
            contract: Arc::new(contract),
            signer,
            chain_id,
            lane: Arc::new(Mutex::new(())),
        }
    }

    /// Held from submission until the receipt is in, so the signer never
    /// has two transactions in flight.
    pub async fn signer_lane(&self) -> OwnedMutexGuard<()> {
        self.lane.clone().lock_owned().await
    }
}

#[derive(FromRef, Clone)]
pub struct AppState {
    pub leptos_options: LeptosOptions,
    pub routes: Vec<AxumRouteListing>,
    pub relay: RelayState<RpcTransport>,
}
