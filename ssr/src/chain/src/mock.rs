//! In-memory stand-in for the deployed contract.
//!
//! Decodes the same calldata the real transports would send, applies a small
//! model of the contract rules and journals every write so tests can assert
//! submission order.

use std::{
    collections::{HashMap, HashSet},
    future::{ready, Future},
    sync::Mutex,
};

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::{SolInterface, SolValue};

use crate::{
    contract::{ITournamentPlatformCalls as Call, TournamentDetails},
    model::to_u64,
    ChainError, ChainTransport, Receipt, TxRequest,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JournalEntry {
    Sent { method: &'static str, hash: TxHash },
    Confirmed { hash: TxHash },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockTournament {
    pub entry_fee: U256,
    pub max_players: u64,
    pub start_time: u64,
    pub game_type: String,
    pub players: Vec<Address>,
    pub total_prize: U256,
    pub is_canceled: bool,
    pub rewards_assigned: bool,
    pub winners: [Address; 3],
    pub scores: Vec<(Address, U256)>,
}

impl MockTournament {
    pub fn open(start_time: u64, max_players: u64) -> Self {
        Self {
            entry_fee: U256::ZERO,
            max_players,
            start_time,
            game_type: "chess".into(),
            players: vec![],
            total_prize: U256::ZERO,
            is_canceled: false,
            rewards_assigned: false,
            winners: [Address::ZERO; 3],
            scores: vec![],
        }
    }

    pub fn with_fee(mut self, fee: U256) -> Self {
        self.entry_fee = fee;
        self
    }

    pub fn with_players(mut self, players: &[Address]) -> Self {
        self.players = players.to_vec();
        self.total_prize = self.entry_fee * U256::from(players.len());
        self
    }

    pub fn canceled(mut self) -> Self {
        self.is_canceled = true;
        self
    }

    pub fn finalized(mut self, winners: [Address; 3]) -> Self {
        self.rewards_assigned = true;
        self.winners = winners;
        self
    }

    fn details(&self) -> TournamentDetails {
        TournamentDetails {
            entryFee: self.entry_fee,
            maxPlayers: U256::from(self.max_players),
            startTime: U256::from(self.start_time),
            submissionDeadline: U256::from(self.start_time + 3600),
            gameType: self.game_type.clone(),
            isCanceled: self.is_canceled,
            rewardsAssigned: self.rewards_assigned,
            currentPlayerCount: U256::from(self.players.len()),
            totalPrize: self.total_prize,
        }
    }
}

#[derive(Default)]
struct Inner {
    player_ids: HashMap<Address, u64>,
    tournaments: Vec<MockTournament>,
    balances: HashMap<Address, U256>,
    failing_tournaments: HashSet<u64>,
    fail_owner_read: bool,
    fail_receipts: bool,
    /// Writes accepted before every further write reverts.
    revert_after: Option<(usize, Option<String>)>,
    sent: usize,
    receipts: HashMap<TxHash, bool>,
    journal: Vec<JournalEntry>,
}

pub struct MockChain {
    owner: Address,
    signer: Address,
    chain_id: u64,
    block_time: u64,
    /// Scheduler turns a receipt wait gives up before it resolves.
    receipt_delay: usize,
    inner: Mutex<Inner>,
}

impl MockChain {
    /// A contract owned by `owner`, driven by a wallet holding `signer`.
    pub fn new(owner: Address, signer: Address) -> Self {
        Self {
            owner,
            signer,
            chain_id: consts::SEPOLIA_CHAIN_ID,
            block_time: 0,
            receipt_delay: 0,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_block_time(mut self, block_time: u64) -> Self {
        self.block_time = block_time;
        self
    }

    /// Receipt waits yield to the scheduler `turns` times before resolving,
    /// so concurrent callers get a chance to interleave.
    pub fn with_receipt_delay(mut self, turns: usize) -> Self {
        self.receipt_delay = turns;
        self
    }

    pub fn with_player(mut self, player: Address, id: u64) -> Self {
        self.inner_mut().player_ids.insert(player, id);
        self
    }

    /// Tournaments get ids in insertion order, starting at 1.
    pub fn with_tournament(mut self, tournament: MockTournament) -> Self {
        self.inner_mut().tournaments.push(tournament);
        self
    }

    pub fn with_balance(mut self, account: Address, wei: U256) -> Self {
        self.inner_mut().balances.insert(account, wei);
        self
    }

    /// Every read about tournament `id` fails with a network error.
    pub fn fail_tournament(mut self, id: u64) -> Self {
        self.inner_mut().failing_tournaments.insert(id);
        self
    }

    pub fn fail_owner_read(mut self) -> Self {
        self.inner_mut().fail_owner_read = true;
        self
    }

    /// Transactions get mined but with a failed status.
    pub fn fail_receipts(mut self) -> Self {
        self.inner_mut().fail_receipts = true;
        self
    }

    /// Accepts `accepted` writes, then reverts every following one.
    pub fn revert_writes_after(mut self, accepted: usize, reason: Option<&str>) -> Self {
        self.inner_mut().revert_after = Some((accepted, reason.map(str::to_string)));
        self
    }

    pub fn revert_writes(self, reason: Option<&str>) -> Self {
        self.revert_writes_after(0, reason)
    }

    pub fn journal(&self) -> Vec<JournalEntry> {
        self.lock().journal.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.lock()
            .journal
            .iter()
            .filter(|e| matches!(e, JournalEntry::Sent { .. }))
            .count()
    }

    pub fn tournament_state(&self, id: u64) -> Option<MockTournament> {
        let idx = usize::try_from(id).ok()?.checked_sub(1)?;
        self.lock().tournaments.get(idx).cloned()
    }

    fn inner_mut(&mut self) -> &mut Inner {
        self.inner.get_mut().unwrap()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    fn answer(&self, data: &[u8]) -> Result<Bytes, ChainError> {
        let call = Call::abi_decode(data).map_err(|e| ChainError::Network(e.to_string()))?;
        let inner = self.lock();
        let out = match call {
            Call::owner(_) => {
                if inner.fail_owner_read {
                    return Err(ChainError::Network("owner lookup failed".into()));
                }
                self.owner.abi_encode()
            }
            Call::playerIds(c) => {
                let id = inner.player_ids.get(&c.player).copied().unwrap_or(0);
                U256::from(id).abi_encode()
            }
            Call::tournamentCount(_) => U256::from(inner.tournaments.len()).abi_encode(),
            Call::getTournamentDetails(c) => {
                lookup(&inner, c.tournamentId)?.details().abi_encode()
            }
            Call::getWinners(c) => lookup(&inner, c.tournamentId)?.winners.abi_encode(),
            Call::getTournamentPlayers(c) => {
                lookup(&inner, c.tournamentId)?.players.abi_encode()
            }
            Call::getEntryFee(c) => lookup(&inner, c.tournamentId)?.entry_fee.abi_encode(),
            _ => return Err(ChainError::Network("not a view function".into())),
        };
        Ok(out.into())
    }

    fn apply(&self, tx: TxRequest) -> Result<TxHash, ChainError> {
        let call = Call::abi_decode(&tx.data).map_err(|e| ChainError::Network(e.to_string()))?;
        let mut inner = self.lock();

        if let Some((accepted, reason)) = &inner.revert_after {
            if inner.sent >= *accepted {
                return Err(ChainError::Reverted {
                    reason: reason.clone(),
                });
            }
        }

        let sender = self.signer;
        let method = match call {
            Call::registerPlayer(_) => {
                if inner.player_ids.contains_key(&sender) {
                    return Err(revert("Already registered"));
                }
                let next = inner.player_ids.len() as u64 + 1;
                inner.player_ids.insert(sender, next);
                "registerPlayer"
            }
            Call::joinTournament(c) => {
                let t = lookup_mut(&mut inner, c.tournamentId)?;
                if t.is_canceled || t.players.len() as u64 >= t.max_players {
                    return Err(revert("Tournament not open"));
                }
                if tx.value < t.entry_fee {
                    return Err(revert("Incorrect entry fee"));
                }
                t.players.push(sender);
                t.total_prize += tx.value;
                "joinTournament"
            }
            Call::submitScore(c) => {
                let t = lookup_mut(&mut inner, c.tournamentId)?;
                t.scores.push((c.player, c.score));
                "submitScore"
            }
            Call::finalizeTournament(c) => {
                let t = lookup_mut(&mut inner, c.tournamentId)?;
                if t.players.is_empty() || t.rewards_assigned {
                    return Err(revert("Tournament not ready"));
                }
                let mut ranked = t.scores.clone();
                ranked.sort_by(|a, b| b.1.cmp(&a.1));
                for (slot, (player, _)) in t.winners.iter_mut().zip(ranked) {
                    *slot = player;
                }
                t.rewards_assigned = true;
                "finalizeTournament"
            }
            Call::cancelTournament(c) => {
                let t = lookup_mut(&mut inner, c.tournamentId)?;
                if t.is_canceled {
                    return Err(revert("Already canceled"));
                }
                t.is_canceled = true;
                "cancelTournament"
            }
            Call::claimRewards(_) => "claimRewards",
            Call::claimRefund(_) => "claimRefund",
            Call::createNewTournament(c) => {
                let start = self.block_time + to_u64(c.startDelay, "startDelay")?;
                let max_players = to_u64(c.maxPlayers, "maxPlayers")?;
                let mut t = MockTournament::open(start, max_players).with_fee(c.entryFee);
                t.game_type = c.gameType;
                inner.tournaments.push(t);
                "createNewTournament"
            }
            _ => return Err(ChainError::Network("not a write function".into())),
        };

        inner.sent += 1;
        let hash = TxHash::from(U256::from(inner.sent));
        let success = !inner.fail_receipts;
        inner.receipts.insert(hash, success);
        inner.journal.push(JournalEntry::Sent { method, hash });
        Ok(hash)
    }

    fn confirm(&self, hash: TxHash) -> Result<Receipt, ChainError> {
        let mut inner = self.lock();
        let Some(&success) = inner.receipts.get(&hash) else {
            return Err(ChainError::Timeout(hash));
        };
        inner.journal.push(JournalEntry::Confirmed { hash });
        Ok(Receipt {
            tx_hash: hash,
            block_number: Some(inner.sent as u64),
            success,
        })
    }
}

fn revert(reason: &str) -> ChainError {
    ChainError::Reverted {
        reason: Some(reason.to_string()),
    }
}

fn index(inner: &Inner, id: U256) -> Result<usize, ChainError> {
    let id = to_u64(id, "tournamentId")?;
    if inner.failing_tournaments.contains(&id) {
        return Err(ChainError::Network(format!("tournament {id} unavailable")));
    }
    let idx = (id as usize).wrapping_sub(1);
    if idx >= inner.tournaments.len() {
        return Err(revert("Tournament does not exist"));
    }
    Ok(idx)
}

fn lookup(inner: &Inner, id: U256) -> Result<&MockTournament, ChainError> {
    let idx = index(inner, id)?;
    Ok(&inner.tournaments[idx])
}

fn lookup_mut(inner: &mut Inner, id: U256) -> Result<&mut MockTournament, ChainError> {
    let idx = index(inner, id)?;
    Ok(&mut inner.tournaments[idx])
}

impl ChainTransport for MockChain {
    fn chain_id(&self) -> impl Future<Output = Result<u64, ChainError>> + Send {
        ready(Ok(self.chain_id))
    }

    fn accounts(
        &self,
        _reselect: bool,
    ) -> impl Future<Output = Result<Vec<Address>, ChainError>> + Send {
        ready(Ok(vec![self.signer]))
    }

    fn call(
        &self,
        _to: Address,
        data: Bytes,
    ) -> impl Future<Output = Result<Bytes, ChainError>> + Send {
        ready(self.answer(&data))
    }

    fn send(&self, tx: TxRequest) -> impl Future<Output = Result<TxHash, ChainError>> + Send {
        ready(self.apply(tx))
    }

    fn wait(&self, hash: TxHash) -> impl Future<Output = Result<Receipt, ChainError>> + Send {
        async move {
            for _ in 0..self.receipt_delay {
                tokio::task::yield_now().await;
            }
            self.confirm(hash)
        }
    }

    fn balance(&self, of: Address) -> impl Future<Output = Result<U256, ChainError>> + Send {
        let balance = self.lock().balances.get(&of).copied().unwrap_or_default();
        ready(Ok(balance))
    }

    fn latest_block_timestamp(
        &self,
    ) -> impl Future<Output = Result<Option<u64>, ChainError>> + Send {
        ready(Ok(Some(self.block_time)))
    }
}
