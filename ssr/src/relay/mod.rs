//! JSON endpoints that send transactions with the relay's own key.

mod error;
mod guard;
mod handlers;
pub mod types;

#[cfg(test)]
mod tests;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use chain::ChainTransport;
use consts::routes;
use state::server::RelayState;

pub use error::RelayError;

pub fn router<T: ChainTransport>(state: RelayState<T>) -> Router {
    let owner_only = Router::new()
        .route(routes::SIMULATE_GAME, post(handlers::simulate_game::<T>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_owner::<T>,
        ));

    Router::new()
        .route(routes::SUBMIT_SCORE, post(handlers::submit_score::<T>))
        .route(
            routes::FINALIZE_TOURNAMENT,
            post(handlers::finalize_tournament::<T>),
        )
        .route(
            routes::CANCEL_TOURNAMENT,
            post(handlers::cancel_tournament::<T>),
        )
        .route(routes::CHAIN_CONFIG, get(handlers::chain_config::<T>))
        .route(routes::HEALTHZ, get(handlers::healthz))
        .merge(owner_only)
        .with_state(state)
}
