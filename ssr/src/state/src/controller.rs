//! Dashboard flows.
//!
//! Every flow resolves to the [`DashboardEvent`]s the caller applies to its
//! [`DashboardState`]. Failures end up on the status line, never as `Err`.

use chain::{
    Address, ChainError, ChainTransport, NewTournament, Tournament, TournamentContract, U256,
};
use futures::future::join_all;
use utils::format::{parse_ether_input, short_address};

use crate::{
    dashboard::{DashboardEvent, DashboardState},
    relay_api::{RelayApi, RelayResponse, SimulateGameRequest, SimulatedScore, SubmitScoreRequest},
};

pub const WRONG_NETWORK: &str = "Please switch to the required network in your wallet";
pub const CONNECTION_REJECTED: &str = "Connection rejected by user. Please approve in your wallet.";
pub const NO_WALLET: &str = "No browser wallet detected";
pub const ALL_FIELDS_REQUIRED: &str = "All fields required";
pub const INSUFFICIENT_BALANCE: &str = "Insufficient ETH balance to pay entry fee";

type Events = Vec<DashboardEvent>;

fn status(message: impl Into<String>) -> Events {
    vec![DashboardEvent::Status(message.into())]
}

/// Reason when the contract gave one, `Transaction reverted` for a bare revert.
fn describe(err: &ChainError) -> String {
    match err {
        ChainError::Reverted { reason: None } => "Transaction reverted".to_string(),
        other => other.reason_or_message(),
    }
}

/// Fields of the operator's create form, as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateTournamentForm {
    pub entry_fee: String,
    pub max_players: String,
    pub start_delay: String,
    pub game_type: String,
    pub cancel_delay: String,
}

impl CreateTournamentForm {
    fn parse(&self) -> Result<NewTournament, String> {
        let fields = [
            &self.entry_fee,
            &self.max_players,
            &self.start_delay,
            &self.game_type,
            &self.cancel_delay,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ALL_FIELDS_REQUIRED.to_string());
        }
        let number = |raw: &str, field: &str| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| format!("Creation failed: invalid {field}"))
        };
        Ok(NewTournament {
            entry_fee: parse_ether_input(&self.entry_fee)
                .ok_or_else(|| "Creation failed: invalid entry fee".to_string())?,
            max_players: number(&self.max_players, "max players")?,
            start_delay: number(&self.start_delay, "start delay")?,
            game_type: self.game_type.trim().to_string(),
            cancel_delay: number(&self.cancel_delay, "cancel delay")?,
        })
    }
}

pub struct DashboardClient<T, R> {
    contract: TournamentContract<T>,
    relay: R,
    expected_chain_id: u64,
}

impl<T: ChainTransport, R: RelayApi> DashboardClient<T, R> {
    pub fn new(contract: TournamentContract<T>, relay: R, expected_chain_id: u64) -> Self {
        Self {
            contract,
            relay,
            expected_chain_id,
        }
    }

    pub fn contract(&self) -> &TournamentContract<T> {
        &self.contract
    }

    /// Connects the wallet's active account. `reselect` lets the holder pick
    /// another account first.
    pub async fn connect(&self, reselect: bool) -> Events {
        match self.contract.transport().chain_id().await {
            Ok(chain_id) if chain_id == self.expected_chain_id => {}
            Ok(chain_id) => {
                log::warn!(
                    "wallet is on chain {chain_id}, expected {}",
                    self.expected_chain_id
                );
                return status(WRONG_NETWORK);
            }
            Err(e) => return status(format!("Connection failed: {e}")),
        }
        match self.identify(reselect).await {
            Ok(mut events) => {
                events.extend(self.refresh().await);
                events
            }
            Err(ChainError::Rejected) => status(CONNECTION_REJECTED),
            Err(e) => status(format!("Connection failed: {e}")),
        }
    }

    async fn identify(&self, reselect: bool) -> Result<Events, ChainError> {
        let account = self
            .contract
            .transport()
            .accounts(reselect)
            .await?
            .first()
            .copied()
            .ok_or(ChainError::NoAccount)?;
        let owner = self.contract.owner().await?;
        let is_owner = owner == account;
        let player_id = self.contract.player_id(account).await?;
        log::info!("connected {account}, owner {owner}, player id {player_id:?}");

        let mut message = format!("Connected: {}", short_address(&account));
        if let Some(id) = player_id {
            message.push_str(&format!(" | Player ID: {id}"));
        }
        if is_owner {
            message.push_str(" (Owner)");
        }

        Ok(vec![
            DashboardEvent::Connected {
                account,
                player_id,
                is_owner,
            },
            DashboardEvent::Status(message),
        ])
    }

    /// Wallet `accountsChanged` notification. Nothing from the previous
    /// identity survives, even when reconnecting fails.
    pub async fn accounts_changed(&self, active: Option<Address>) -> Events {
        match active {
            Some(_) => {
                let mut events = vec![DashboardEvent::Reset];
                events.extend(self.connect(false).await);
                events
            }
            None => vec![DashboardEvent::Disconnected],
        }
    }

    /// Reloads every tournament. One that fails to load is left out.
    pub async fn refresh(&self) -> Events {
        let count = match self.contract.tournament_count().await {
            Ok(count) => count,
            Err(e) => return status(format!("Failed to fetch tournaments: {e}")),
        };
        if count == 0 {
            return vec![
                DashboardEvent::TournamentsLoaded(vec![]),
                DashboardEvent::StatusIfEmpty("No tournaments available".into()),
            ];
        }

        let loads = (1..=count).map(|id| async move {
            self.contract
                .tournament(id)
                .await
                .inspect_err(|e| log::warn!("skipping tournament {id}: {e}"))
                .ok()
        });
        let tournaments: Vec<Tournament> = join_all(loads).await.into_iter().flatten().collect();

        vec![
            DashboardEvent::TournamentsLoaded(tournaments),
            DashboardEvent::StatusIfEmpty("Tournaments loaded".into()),
        ]
    }

    async fn then_refresh(&self, mut events: Events) -> Events {
        events.extend(self.refresh().await);
        events
    }

    pub async fn register(&self, state: &DashboardState) -> Events {
        let Some(account) = state.account else {
            return status("Connect wallet first");
        };
        match self.register_account(account).await {
            Ok(events) => events,
            Err(e) => status(format!("Registration failed: {}", describe(&e))),
        }
    }

    async fn register_account(&self, account: Address) -> Result<Events, ChainError> {
        if let Some(player_id) = self.contract.player_id(account).await? {
            return Ok(vec![
                DashboardEvent::Registered { player_id },
                DashboardEvent::Status(format!("Already registered with Player ID: {player_id}")),
            ]);
        }
        let pending = self.contract.register_player().await?;
        self.contract.confirm(pending).await?;
        let player_id = self
            .contract
            .player_id(account)
            .await?
            .ok_or_else(|| ChainError::Decode("player id still zero after registering".into()))?;
        Ok(vec![
            DashboardEvent::Registered { player_id },
            DashboardEvent::Status(format!("Registered successfully | Player ID: {player_id}")),
        ])
    }

    /// Pays the entry fee the contract currently asks for.
    pub async fn join(&self, state: &DashboardState, tournament_id: u64) -> Events {
        let Some(account) = state.account else {
            return status("Connect wallet first");
        };
        if state.player_id.is_none() {
            return status("Register first");
        }
        if state.tournament(tournament_id).is_some_and(Tournament::is_full) {
            return status("Join failed: Tournament is full");
        }
        match self.pay_entry(account, tournament_id).await {
            Ok(()) => {
                self.then_refresh(status(format!("Joined Tournament {tournament_id}")))
                    .await
            }
            Err(message) => status(format!("Join failed: {message}")),
        }
    }

    async fn pay_entry(&self, account: Address, tournament_id: u64) -> Result<(), String> {
        let fee = self
            .contract
            .entry_fee(tournament_id)
            .await
            .map_err(|e| describe(&e))?;
        let balance = self
            .contract
            .balance_of(account)
            .await
            .map_err(|e| describe(&e))?;
        log::debug!("joining {tournament_id}: fee {fee} wei, balance {balance} wei");
        if balance < fee {
            return Err(INSUFFICIENT_BALANCE.to_string());
        }
        let pending = self
            .contract
            .join_tournament(tournament_id, fee)
            .await
            .map_err(|e| describe(&e))?;
        self.contract
            .confirm(pending)
            .await
            .map_err(|e| describe(&e))?;
        Ok(())
    }

    pub async fn create_tournament(
        &self,
        state: &DashboardState,
        form: &CreateTournamentForm,
    ) -> Events {
        if !state.is_owner {
            return status("Only owner can create tournaments");
        }
        let params = match form.parse() {
            Ok(params) => params,
            Err(message) => return status(message),
        };
        let created = async {
            let pending = self.contract.create_tournament(params).await?;
            self.contract.confirm(pending).await
        };
        match created.await {
            Ok(_) => self.then_refresh(status("Tournament created")).await,
            Err(e) => status(format!("Creation failed: {}", describe(&e))),
        }
    }

    pub async fn submit_score(
        &self,
        state: &DashboardState,
        tournament_id: u64,
        player: &str,
        score: &str,
    ) -> Events {
        if !state.is_owner {
            return status("Only owner can submit scores");
        }
        if player.trim().is_empty() || score.trim().is_empty() {
            return status(ALL_FIELDS_REQUIRED);
        }
        let req = SubmitScoreRequest {
            tournament_id,
            player: player.trim().to_string(),
            score: score.trim().to_string(),
        };
        match self.relay.submit_score(req).await {
            Ok(res) => {
                let message = relayed(res, "Score submitted", "Submit failed");
                self.then_refresh(status(message)).await
            }
            Err(e) => status(format!("Error submitting score: {e}")),
        }
    }

    pub async fn finalize(&self, state: &DashboardState, tournament_id: u64) -> Events {
        if !state.is_owner {
            return status("Only owner can finalize");
        }
        log::debug!("finalizing {:?}", state.tournament(tournament_id));
        match self.relay.finalize_tournament(tournament_id).await {
            Ok(res) => {
                let message = relayed(res, "Tournament finalized", "Finalize failed");
                self.then_refresh(status(message)).await
            }
            Err(e) => status(format!("Error finalizing tournament: {e}")),
        }
    }

    pub async fn cancel(&self, state: &DashboardState, tournament_id: u64) -> Events {
        if !state.is_owner {
            return status("Only owner can cancel");
        }
        match self.relay.cancel_tournament(tournament_id).await {
            Ok(res) => {
                let message = relayed(res, "Tournament canceled", "Cancel failed");
                self.then_refresh(status(message)).await
            }
            Err(e) => status(format!("Error canceling tournament: {e}")),
        }
    }

    /// Submits a batch of scores through the relay, one line per `address:score`.
    pub async fn simulate_game(
        &self,
        state: &DashboardState,
        tournament_id: u64,
        lines: &str,
    ) -> Events {
        if !state.is_owner {
            return status("Only owner can simulate games");
        }
        let players: Option<Vec<SimulatedScore>> = lines
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| {
                let (address, score) = l.split_once(':')?;
                Some(SimulatedScore {
                    address: address.trim().to_string(),
                    score: score.trim().to_string(),
                })
            })
            .collect();
        let Some(players) = players.filter(|p| !p.is_empty()) else {
            return status("Simulation failed: expected one address:score per line");
        };

        let req = SimulateGameRequest {
            tournament_id,
            players,
        };
        match self.relay.simulate_game(req).await {
            Ok(res) if res.success => {
                let count = res.tx_hashes.map(|h| h.len()).unwrap_or_default();
                self.then_refresh(status(format!("Game simulated: {count} scores submitted")))
                    .await
            }
            Ok(res) => status(format!(
                "Simulation failed: {}",
                res.error.unwrap_or_else(|| "Unknown error from backend".into())
            )),
            Err(e) => status(format!("Simulation failed: {e}")),
        }
    }

    pub async fn claim_rewards(&self, state: &DashboardState, tournament_id: u64) -> Events {
        if !state.is_connected() {
            return status("Connect wallet first");
        }
        let claimed = async {
            let pending = self.contract.claim_rewards(tournament_id).await?;
            self.contract.confirm(pending).await
        };
        match claimed.await {
            Ok(_) => {
                self.then_refresh(status(format!(
                    "Rewards claimed for Tournament {tournament_id}"
                )))
                .await
            }
            Err(e) => status(format!("Claim failed: {}", describe(&e))),
        }
    }

    pub async fn claim_refund(&self, state: &DashboardState, tournament_id: u64) -> Events {
        if !state.is_connected() {
            return status("Connect wallet first");
        }
        let claimed = async {
            let pending = self.contract.claim_refund(tournament_id).await?;
            self.contract.confirm(pending).await
        };
        match claimed.await {
            Ok(_) => {
                self.then_refresh(status(format!(
                    "Refund claimed for Tournament {tournament_id}"
                )))
                .await
            }
            Err(e) => status(format!("Refund claim failed: {}", describe(&e))),
        }
    }

    pub async fn balance(&self, account: Address) -> Option<U256> {
        self.contract.balance_of(account).await.ok()
    }
}

fn relayed(res: RelayResponse, done: &str, failed: &str) -> String {
    if res.success {
        let hash = res.tx_hash.map(|h| h.to_string()).unwrap_or_default();
        format!("{done}: {hash}")
    } else {
        let error = res
            .error
            .unwrap_or_else(|| "Unknown error from backend".into());
        format!("{failed}: {error}")
    }
}
