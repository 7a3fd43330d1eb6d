use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chain::{ChainError, TxHash};
use state::relay_api::RelayResponse;

pub const OWNER_ONLY: &str = "Only the contract owner can perform this action";
pub const OWNER_CHECK_FAILED: &str = "Failed to verify owner";
pub const SIMULATION_FAILED: &str = "Failed to simulate game";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),
    #[error("signer is not the contract owner")]
    NotOwner,
    #[error("owner lookup failed: {0}")]
    OwnerCheck(ChainError),
    /// Chain or transport failure, already phrased for the caller.
    #[error("{0}")]
    Chain(String),
    #[error("simulation stopped: {source}")]
    Simulation {
        source: ChainError,
        /// Transactions submitted before the failure. They are not rolled back.
        tx_hashes: Vec<TxHash>,
    },
}

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotOwner => StatusCode::FORBIDDEN,
            Self::OwnerCheck(_) | Self::Chain(_) | Self::Simulation { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn envelope(self) -> RelayResponse {
        match self {
            Self::Validation(message) | Self::Chain(message) => RelayResponse::failure(message),
            Self::NotOwner => RelayResponse::failure(OWNER_ONLY),
            Self::OwnerCheck(e) => RelayResponse {
                details: Some(e.to_string()),
                ..RelayResponse::failure(OWNER_CHECK_FAILED)
            },
            Self::Simulation { source, tx_hashes } => RelayResponse {
                details: Some(source.to_string()),
                reason: Some(source.reason().unwrap_or("Unknown error").to_string()),
                tx_hashes: Some(tx_hashes),
                ..RelayResponse::failure(SIMULATION_FAILED)
            },
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("relay request failed: {self}");
        }
        (status, Json(self.envelope())).into_response()
    }
}
