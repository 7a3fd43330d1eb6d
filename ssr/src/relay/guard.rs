use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chain::ChainTransport;
use state::server::RelayState;

use super::error::RelayError;

/// Lets the request through only while the relay signer owns the contract.
/// Ownership is read fresh on every request.
pub async fn require_owner<T: ChainTransport>(
    State(state): State<RelayState<T>>,
    req: Request,
    next: Next,
) -> Response {
    match state.contract.owner().await {
        Ok(owner) if owner == state.signer => next.run(req).await,
        Ok(owner) => {
            tracing::warn!(%owner, signer = %state.signer, "refusing owner-only request");
            RelayError::NotOwner.into_response()
        }
        Err(e) => RelayError::OwnerCheck(e).into_response(),
    }
}
