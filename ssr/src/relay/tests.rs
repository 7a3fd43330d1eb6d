use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use chain::{
    address,
    mock::{JournalEntry, MockChain, MockTournament},
    Address, TournamentContract, TxHash, U256,
};
use consts::{routes, SEPOLIA_CHAIN_ID};
use serde_json::{json, Value};
use state::{
    relay_api::{ChainConfig, RelayResponse},
    server::RelayState,
};
use tower::ServiceExt;

use super::router;

const CONTRACT: Address = address!("00000000000000000000000000000000000000c0");
const OWNER: Address = address!("00000000000000000000000000000000000000a1");
const STRANGER: Address = address!("00000000000000000000000000000000000000a2");
const ALICE: Address = address!("00000000000000000000000000000000000000b1");
const BOB: Address = address!("00000000000000000000000000000000000000b2");

fn relay(chain: MockChain) -> RelayState<MockChain> {
    RelayState::new(TournamentContract::new(chain, CONTRACT), OWNER, SEPOLIA_CHAIN_ID)
}

fn owned() -> MockChain {
    MockChain::new(OWNER, OWNER).with_block_time(1_000)
}

fn hash(n: u64) -> TxHash {
    TxHash::from(U256::from(n))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(state: &RelayState<MockChain>, path: &str, body: Value) -> (StatusCode, RelayResponse) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, json) = send(router(state.clone()), req).await;
    (status, serde_json::from_value(json).unwrap())
}

fn journal(state: &RelayState<MockChain>) -> Vec<JournalEntry> {
    state.contract.transport().journal()
}

#[tokio::test]
async fn submit_score_waits_for_the_receipt() {
    let state = relay(owned().with_tournament(MockTournament::open(0, 4).with_players(&[ALICE])));

    let (status, res) = post(
        &state,
        routes::SUBMIT_SCORE,
        json!({ "tournamentId": 1, "player": ALICE.to_string(), "score": "42" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(res, RelayResponse::tx(hash(1)));
    assert_eq!(
        journal(&state),
        vec![
            JournalEntry::Sent { method: "submitScore", hash: hash(1) },
            JournalEntry::Confirmed { hash: hash(1) },
        ]
    );
    let stored = state.contract.transport().tournament_state(1).unwrap();
    assert_eq!(stored.scores, vec![(ALICE, U256::from(42))]);
}

#[tokio::test]
async fn submit_score_rejects_missing_and_malformed_fields() {
    let state = relay(owned().with_tournament(MockTournament::open(0, 4)));

    let cases = [
        (json!({ "tournamentId": 1, "player": ALICE.to_string() }), "All fields required"),
        (json!({ "tournamentId": 1, "player": ALICE.to_string(), "score": 0 }), "All fields required"),
        (json!({ "tournamentId": 1, "player": "alice", "score": 5 }), "Invalid player address"),
        (json!({ "tournamentId": "one", "player": ALICE.to_string(), "score": 5 }), "Invalid tournamentId"),
        (json!({ "tournamentId": 1, "player": ALICE.to_string(), "score": "lots" }), "Invalid score"),
    ];
    for (body, message) in cases {
        let (status, res) = post(&state, routes::SUBMIT_SCORE, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(res.error.as_deref(), Some(message));
        assert!(!res.success);
    }
    assert_eq!(state.contract.transport().sent_count(), 0);
}

#[tokio::test]
async fn unreadable_body_counts_as_missing() {
    let state = relay(owned());
    let req = Request::builder()
        .method(Method::POST)
        .uri(routes::FINALIZE_TOURNAMENT)
        .body(Body::from("not json"))
        .unwrap();

    let (status, json) = send(router(state), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Tournament ID required");
}

#[tokio::test]
async fn finalize_ranks_the_submitted_scores() {
    let mut tournament = MockTournament::open(0, 4).with_players(&[ALICE, BOB]);
    tournament.scores = vec![(ALICE, U256::from(3)), (BOB, U256::from(9))];
    let state = relay(owned().with_tournament(tournament));

    let (status, res) = post(&state, routes::FINALIZE_TOURNAMENT, json!({ "tournamentId": "1" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(res.tx_hash, Some(hash(1)));
    let stored = state.contract.transport().tournament_state(1).unwrap();
    assert!(stored.rewards_assigned);
    assert_eq!(stored.winners, [BOB, ALICE, Address::ZERO]);
}

#[tokio::test]
async fn finalize_reports_the_revert_reason() {
    let state = relay(owned().with_tournament(MockTournament::open(0, 4)));

    let (status, res) = post(&state, routes::FINALIZE_TOURNAMENT, json!({ "tournamentId": 1 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.error.as_deref(),
        Some("Transaction reverted: Tournament not ready")
    );
}

#[tokio::test]
async fn finalize_without_reason_points_at_conditions() {
    let state = relay(
        owned()
            .with_tournament(MockTournament::open(0, 4).with_players(&[ALICE]))
            .revert_writes(None),
    );

    let (_, res) = post(&state, routes::FINALIZE_TOURNAMENT, json!({ "tournamentId": 1 })).await;

    assert_eq!(res.error.as_deref(), Some("Transaction reverted: Check conditions"));
}

#[tokio::test]
async fn cancel_twice_is_a_revert() {
    let state = relay(owned().with_tournament(MockTournament::open(5_000, 4).canceled()));

    let (status, res) = post(&state, routes::CANCEL_TOURNAMENT, json!({ "tournamentId": 1 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.error.as_deref(),
        Some("Transaction reverted: Check contract conditions (e.g., not owner, already canceled)")
    );

    let (status, res) = post(&state, routes::CANCEL_TOURNAMENT, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error.as_deref(), Some("Tournament ID is required"));
}

#[tokio::test]
async fn simulate_submits_in_order_one_at_a_time() {
    let state = relay(owned().with_tournament(MockTournament::open(0, 4).with_players(&[ALICE, BOB])));

    let (status, res) = post(
        &state,
        routes::SIMULATE_GAME,
        json!({
            "tournamentId": 1,
            "players": [
                { "address": ALICE.to_string(), "score": 10 },
                { "address": BOB.to_string(), "score": "20" },
            ],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(res, RelayResponse::txs(vec![hash(1), hash(2)]));
    assert_eq!(
        journal(&state),
        vec![
            JournalEntry::Sent { method: "submitScore", hash: hash(1) },
            JournalEntry::Confirmed { hash: hash(1) },
            JournalEntry::Sent { method: "submitScore", hash: hash(2) },
            JournalEntry::Confirmed { hash: hash(2) },
        ]
    );
}

#[tokio::test]
async fn simulate_failure_keeps_earlier_hashes() {
    let state = relay(
        owned()
            .with_tournament(MockTournament::open(0, 4).with_players(&[ALICE, BOB]))
            .revert_writes_after(1, Some("Score window closed")),
    );

    let (status, res) = post(
        &state,
        routes::SIMULATE_GAME,
        json!({
            "tournamentId": 1,
            "players": [
                { "address": ALICE.to_string(), "score": 10 },
                { "address": BOB.to_string(), "score": 20 },
            ],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.error.as_deref(), Some("Failed to simulate game"));
    assert_eq!(res.reason.as_deref(), Some("Score window closed"));
    assert_eq!(res.tx_hashes, Some(vec![hash(1)]));
    assert_eq!(state.contract.transport().sent_count(), 1);
}

#[tokio::test]
async fn simulate_validates_every_entry_before_sending() {
    let state = relay(owned().with_tournament(MockTournament::open(0, 4)));

    let (status, res) = post(
        &state,
        routes::SIMULATE_GAME,
        json!({
            "tournamentId": 1,
            "players": [
                { "address": ALICE.to_string(), "score": 10 },
                { "address": "bob", "score": 20 },
            ],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error.as_deref(), Some("Invalid player address at index 1"));
    assert_eq!(state.contract.transport().sent_count(), 0);

    let (status, res) = post(&state, routes::SIMULATE_GAME, json!({ "tournamentId": 1, "players": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error.as_deref(), Some("Missing tournamentId or players array"));
}

#[tokio::test]
async fn simulate_is_owner_only() {
    let state = relay(MockChain::new(STRANGER, OWNER).with_tournament(MockTournament::open(0, 4)));

    let (status, res) = post(
        &state,
        routes::SIMULATE_GAME,
        json!({ "tournamentId": 1, "players": [{ "address": ALICE.to_string(), "score": 1 }] }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        res.error.as_deref(),
        Some("Only the contract owner can perform this action")
    );
    assert_eq!(state.contract.transport().sent_count(), 0);
}

#[tokio::test]
async fn simulate_owner_check_runs_before_validation() {
    let state = relay(owned().fail_owner_read());

    let (status, res) = post(&state, routes::SIMULATE_GAME, json!({})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.error.as_deref(), Some("Failed to verify owner"));
    assert!(res.details.is_some());
}

#[tokio::test]
async fn chain_config_names_the_contract() {
    let state = relay(owned());
    let req = Request::builder()
        .uri(routes::CHAIN_CONFIG)
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(router(state), req).await;

    assert_eq!(status, StatusCode::OK);
    let config: ChainConfig = serde_json::from_value(json).unwrap();
    assert_eq!(
        config,
        ChainConfig {
            chain_id: SEPOLIA_CHAIN_ID,
            contract_address: CONTRACT,
        }
    );
}

#[tokio::test]
async fn concurrent_writes_take_turns_on_the_signer() {
    let state = relay(
        owned()
            .with_receipt_delay(3)
            .with_tournament(MockTournament::open(0, 4).with_players(&[ALICE, BOB])),
    );
    let score = |player: Address, score: u64| {
        json!({ "tournamentId": 1, "player": player.to_string(), "score": score })
    };

    let (first, second) = tokio::join!(
        post(&state, routes::SUBMIT_SCORE, score(ALICE, 5)),
        post(&state, routes::SUBMIT_SCORE, score(BOB, 7)),
    );

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);
    assert_eq!(
        journal(&state),
        vec![
            JournalEntry::Sent { method: "submitScore", hash: hash(1) },
            JournalEntry::Confirmed { hash: hash(1) },
            JournalEntry::Sent { method: "submitScore", hash: hash(2) },
            JournalEntry::Confirmed { hash: hash(2) },
        ]
    );
}

#[tokio::test]
async fn simulate_batch_is_not_interleaved_with_other_writes() {
    let state = relay(
        owned()
            .with_receipt_delay(3)
            .with_tournament(MockTournament::open(0, 4).with_players(&[ALICE, BOB])),
    );
    let batch = json!({
        "tournamentId": 1,
        "players": [
            { "address": ALICE.to_string(), "score": 10 },
            { "address": BOB.to_string(), "score": 20 },
        ],
    });
    let single = json!({ "tournamentId": 1, "player": BOB.to_string(), "score": 30 });

    let (simulated, submitted) = tokio::join!(
        post(&state, routes::SIMULATE_GAME, batch),
        post(&state, routes::SUBMIT_SCORE, single),
    );

    // Whichever request takes the signer first, the batch stays contiguous.
    let batch_hashes = simulated.1.tx_hashes.unwrap();
    let single_hash = submitted.1.tx_hash.unwrap();
    assert!(
        (batch_hashes == [hash(1), hash(2)] && single_hash == hash(3))
            || (single_hash == hash(1) && batch_hashes == [hash(2), hash(3)])
    );
    let order: Vec<JournalEntry> = (1..=3)
        .flat_map(|n| {
            [
                JournalEntry::Sent { method: "submitScore", hash: hash(n) },
                JournalEntry::Confirmed { hash: hash(n) },
            ]
        })
        .collect();
    assert_eq!(journal(&state), order);
}
