use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chain::{Address, ChainError, ChainTransport, TxHash, U256};
use serde_json::Value;
use state::{
    relay_api::{ChainConfig, RelayResponse},
    server::RelayState,
};
use tracing::instrument;

use super::{
    error::RelayError,
    types::{
        is_present, parse_address, parse_tournament_id, parse_uint, PlayerScore,
        SimulateGameBody, SubmitScoreBody, TournamentIdBody,
    },
};

type RelayResult = Result<Json<RelayResponse>, RelayError>;

const CANCEL_REVERTED: &str =
    "Transaction reverted: Check contract conditions (e.g., not owner, already canceled)";

/// An unreadable body is treated like an empty one, so the caller gets the
/// endpoint's own "required" message.
fn body_or_default<B: Default>(body: Result<Json<B>, JsonRejection>) -> B {
    match body {
        Ok(Json(body)) => body,
        Err(e) => {
            tracing::debug!("unreadable request body: {e}");
            B::default()
        }
    }
}

fn required_id(value: &Option<Value>, missing: &str) -> Result<u64, RelayError> {
    if !is_present(value) {
        return Err(RelayError::validation(missing));
    }
    value
        .as_ref()
        .and_then(parse_tournament_id)
        .ok_or_else(|| RelayError::validation("Invalid tournamentId"))
}

/// Sends one `submitScore` and waits for it while holding the signer lane.
async fn submit_one<T: ChainTransport>(
    state: &RelayState<T>,
    tournament_id: u64,
    player: Address,
    score: U256,
) -> Result<TxHash, ChainError> {
    let _lane = state.signer_lane().await;
    let pending = state
        .contract
        .submit_score(tournament_id, player, score)
        .await?;
    let receipt = state.contract.confirm(pending).await?;
    Ok(receipt.tx_hash)
}

#[instrument(skip(state))]
pub async fn submit_score<T: ChainTransport>(
    State(state): State<RelayState<T>>,
    body: Result<Json<SubmitScoreBody>, JsonRejection>,
) -> RelayResult {
    let body = body_or_default(body);
    if !(is_present(&body.tournament_id) && is_present(&body.player) && is_present(&body.score)) {
        return Err(RelayError::validation("All fields required"));
    }
    let tournament_id = required_id(&body.tournament_id, "All fields required")?;
    let player = body
        .player
        .as_ref()
        .and_then(parse_address)
        .ok_or_else(|| RelayError::validation("Invalid player address"))?;
    let score = body
        .score
        .as_ref()
        .and_then(parse_uint)
        .ok_or_else(|| RelayError::validation("Invalid score"))?;

    tracing::info!(tournament_id, %player, %score, "submitting score");
    let hash = submit_one(&state, tournament_id, player, score)
        .await
        .map_err(|e| RelayError::Chain(e.reason_or_message()))?;
    Ok(Json(RelayResponse::tx(hash)))
}

/// Logs what the contract will judge finalization on. Failures only warn.
async fn log_finalize_diagnostics<T: ChainTransport>(state: &RelayState<T>, tournament_id: u64) {
    let details = state.contract.tournament_details(tournament_id).await;
    let winners = state.contract.winners(tournament_id).await;
    let block_timestamp = state
        .contract
        .transport()
        .latest_block_timestamp()
        .await
        .ok()
        .flatten();

    match (details, winners) {
        (Ok(d), Ok(top_players)) => tracing::info!(
            tournament_id,
            signer = %state.signer,
            is_canceled = d.isCanceled,
            start_time = %d.startTime,
            submission_deadline = %d.submissionDeadline,
            player_count = %d.currentPlayerCount,
            rewards_assigned = d.rewardsAssigned,
            ?block_timestamp,
            ?top_players,
            "finalizing tournament"
        ),
        (details, winners) => tracing::warn!(
            tournament_id,
            details_error = ?details.err(),
            winners_error = ?winners.err(),
            "finalize diagnostics unavailable"
        ),
    }
}

#[instrument(skip(state))]
pub async fn finalize_tournament<T: ChainTransport>(
    State(state): State<RelayState<T>>,
    body: Result<Json<TournamentIdBody>, JsonRejection>,
) -> RelayResult {
    let body = body_or_default(body);
    let tournament_id = required_id(&body.tournament_id, "Tournament ID required")?;

    log_finalize_diagnostics(&state, tournament_id).await;

    let _lane = state.signer_lane().await;
    let finalized = async {
        let pending = state.contract.finalize_tournament(tournament_id).await?;
        state.contract.confirm(pending).await
    };
    match finalized.await {
        Ok(receipt) => Ok(Json(RelayResponse::tx(receipt.tx_hash))),
        Err(e) if e.is_revert() => Err(RelayError::Chain(format!(
            "Transaction reverted: {}",
            e.reason().unwrap_or("Check conditions")
        ))),
        Err(e) => Err(RelayError::Chain(e.reason_or_message())),
    }
}

#[instrument(skip(state))]
pub async fn cancel_tournament<T: ChainTransport>(
    State(state): State<RelayState<T>>,
    body: Result<Json<TournamentIdBody>, JsonRejection>,
) -> RelayResult {
    let body = body_or_default(body);
    let tournament_id = required_id(&body.tournament_id, "Tournament ID is required")?;
    tracing::info!(tournament_id, signer = %state.signer, "canceling tournament");

    let _lane = state.signer_lane().await;
    let canceled = async {
        let pending = state.contract.cancel_tournament(tournament_id).await?;
        state.contract.confirm(pending).await
    };
    match canceled.await {
        Ok(receipt) => Ok(Json(RelayResponse::tx(receipt.tx_hash))),
        Err(e) if e.is_revert() => Err(RelayError::Chain(CANCEL_REVERTED.to_string())),
        Err(e) => Err(RelayError::Chain(e.reason_or_message())),
    }
}

/// Entries are validated up front so a malformed one never leaves a
/// half-submitted batch behind.
fn parse_players(players: Vec<Value>) -> Result<Vec<(Address, U256)>, RelayError> {
    players
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let entry: PlayerScore = serde_json::from_value(entry)
                .map_err(|_| RelayError::validation(format!("Invalid player entry at index {idx}")))?;
            let address = parse_address(&entry.address).ok_or_else(|| {
                RelayError::validation(format!("Invalid player address at index {idx}"))
            })?;
            let score = parse_uint(&entry.score)
                .ok_or_else(|| RelayError::validation(format!("Invalid score at index {idx}")))?;
            Ok((address, score))
        })
        .collect()
}

/// Submits one score per entry, each confirmed before the next is sent.
#[instrument(skip(state))]
pub async fn simulate_game<T: ChainTransport>(
    State(state): State<RelayState<T>>,
    body: Result<Json<SimulateGameBody>, JsonRejection>,
) -> RelayResult {
    const MISSING: &str = "Missing tournamentId or players array";

    let body = body_or_default(body);
    let players = match body.players {
        Some(Value::Array(players)) if !players.is_empty() => players,
        _ => return Err(RelayError::validation(MISSING)),
    };
    let tournament_id = required_id(&body.tournament_id, MISSING)?;
    let entries = parse_players(players)?;

    let _lane = state.signer_lane().await;
    let mut tx_hashes = Vec::with_capacity(entries.len());
    for (player, score) in entries {
        let pending = match state.contract.submit_score(tournament_id, player, score).await {
            Ok(pending) => pending,
            Err(source) => return Err(RelayError::Simulation { source, tx_hashes }),
        };
        tx_hashes.push(pending.hash);
        tracing::debug!(tournament_id, %player, %score, hash = %pending.hash, "simulated score sent");
        if let Err(source) = state.contract.confirm(pending).await {
            return Err(RelayError::Simulation { source, tx_hashes });
        }
    }
    Ok(Json(RelayResponse::txs(tx_hashes)))
}

pub async fn chain_config<T: ChainTransport>(State(state): State<RelayState<T>>) -> Json<ChainConfig> {
    Json(ChainConfig {
        chain_id: state.chain_id,
        contract_address: state.contract.address(),
    })
}

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
