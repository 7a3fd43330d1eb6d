use std::future::Future;

use chain::{Address, TxHash};
use consts::routes;
use reqwest::Url;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Envelope every relay endpoint answers with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<TxHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hashes: Option<Vec<TxHash>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RelayResponse {
    pub fn tx(hash: TxHash) -> Self {
        Self {
            success: true,
            tx_hash: Some(hash),
            ..Default::default()
        }
    }

    pub fn txs(hashes: Vec<TxHash>) -> Self {
        Self {
            success: true,
            tx_hashes: Some(hashes),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_id: u64,
    pub contract_address: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    pub tournament_id: u64,
    /// Forwarded as typed, the relay validates it.
    pub player: String,
    pub score: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentIdRequest {
    pub tournament_id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulatedScore {
    pub address: String,
    pub score: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateGameRequest {
    pub tournament_id: u64,
    pub players: Vec<SimulatedScore>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RelayApiError {
    /// Non-2xx answer. `message` is the envelope error when the relay sent one.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Network(String),
}

/// Operator actions the dashboard delegates to the relay.
///
/// `Ok` carries any 2xx envelope, including `success: false`.
pub trait RelayApi {
    fn submit_score(
        &self,
        req: SubmitScoreRequest,
    ) -> impl Future<Output = Result<RelayResponse, RelayApiError>>;

    fn finalize_tournament(
        &self,
        tournament_id: u64,
    ) -> impl Future<Output = Result<RelayResponse, RelayApiError>>;

    fn cancel_tournament(
        &self,
        tournament_id: u64,
    ) -> impl Future<Output = Result<RelayResponse, RelayApiError>>;

    fn simulate_game(
        &self,
        req: SimulateGameRequest,
    ) -> impl Future<Output = Result<RelayResponse, RelayApiError>>;

    fn chain_config(&self) -> impl Future<Output = Result<ChainConfig, RelayApiError>>;
}

#[derive(Clone)]
pub struct RelayClient {
    base: Url,
    http: reqwest::Client,
}

impl Default for RelayClient {
    fn default() -> Self {
        Self::new(consts::RELAY_BASE_URL.clone())
    }
}

impl RelayClient {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, route: &str) -> Result<Url, RelayApiError> {
        self.base
            .join(route)
            .map_err(|e| RelayApiError::Network(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, RelayApiError> {
        let status = res.status();
        if status.is_success() {
            return res
                .json()
                .await
                .map_err(|e| RelayApiError::Network(e.to_string()));
        }
        let body: Option<RelayResponse> = res.json().await.ok();
        let message = body
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        Err(RelayApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn post<B: Serialize>(&self, route: &str, body: &B) -> Result<RelayResponse, RelayApiError> {
        let res = self
            .http
            .post(self.url(route)?)
            .json(body)
            .send()
            .await
            .map_err(|e| RelayApiError::Network(e.to_string()))?;
        Self::decode(res).await
    }
}

impl RelayApi for RelayClient {
    async fn submit_score(&self, req: SubmitScoreRequest) -> Result<RelayResponse, RelayApiError> {
        self.post(routes::SUBMIT_SCORE, &req).await
    }

    async fn finalize_tournament(&self, tournament_id: u64) -> Result<RelayResponse, RelayApiError> {
        self.post(routes::FINALIZE_TOURNAMENT, &TournamentIdRequest { tournament_id })
            .await
    }

    async fn cancel_tournament(&self, tournament_id: u64) -> Result<RelayResponse, RelayApiError> {
        self.post(routes::CANCEL_TOURNAMENT, &TournamentIdRequest { tournament_id })
            .await
    }

    async fn simulate_game(&self, req: SimulateGameRequest) -> Result<RelayResponse, RelayApiError> {
        self.post(routes::SIMULATE_GAME, &req).await
    }

    async fn chain_config(&self) -> Result<ChainConfig, RelayApiError> {
        let res = self
            .http
            .get(self.url(routes::CHAIN_CONFIG)?)
            .send()
            .await
            .map_err(|e| RelayApiError::Network(e.to_string()))?;
        Self::decode(res).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_omits_absent_fields() {
        let value = serde_json::to_value(RelayResponse::failure("Tournament ID required")).unwrap();
        assert_eq!(
            value,
            json!({ "success": false, "error": "Tournament ID required" })
        );
    }

    #[test]
    fn requests_use_camel_case() {
        let req = SubmitScoreRequest {
            tournament_id: 3,
            player: "0xabc".into(),
            score: "42".into(),
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({ "tournamentId": 3, "player": "0xabc", "score": "42" })
        );
    }

    #[test]
    fn chain_config_parses_relay_answer() {
        let cfg: ChainConfig = serde_json::from_value(json!({
            "chainId": 11155111,
            "contractAddress": "0x794F79EeB6Bdd24B20D78B7F34b72C2d2aB15d5e"
        }))
        .unwrap();
        assert_eq!(cfg.chain_id, consts::SEPOLIA_CHAIN_ID);
    }
}
