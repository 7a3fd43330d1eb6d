use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

use crate::{contract::TournamentDetails, ChainError};

/// Read-through snapshot of one tournament as the dashboard renders it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: u64,
    /// Entry fee in wei.
    pub entry_fee: U256,
    pub max_players: u64,
    /// Epoch seconds.
    pub start_time: u64,
    pub submission_deadline: u64,
    pub game_type: String,
    pub player_count: u64,
    /// Prize pool in wei.
    pub total_prize: U256,
    pub is_canceled: bool,
    pub rewards_assigned: bool,
    pub joined_players: Vec<Address>,
    /// Ranked 1st to 3rd, `None` for an empty slot.
    pub winners: [Option<Address>; 3],
}

impl Tournament {
    pub fn from_parts(
        id: u64,
        details: TournamentDetails,
        winners: [Address; 3],
        joined_players: Vec<Address>,
    ) -> Result<Self, ChainError> {
        Ok(Self {
            id,
            entry_fee: details.entryFee,
            max_players: to_u64(details.maxPlayers, "maxPlayers")?,
            start_time: to_u64(details.startTime, "startTime")?,
            submission_deadline: to_u64(details.submissionDeadline, "submissionDeadline")?,
            game_type: details.gameType,
            player_count: to_u64(details.currentPlayerCount, "currentPlayerCount")?,
            total_prize: details.totalPrize,
            is_canceled: details.isCanceled,
            rewards_assigned: details.rewardsAssigned,
            joined_players,
            winners: winners.map(|w| (!w.is_zero()).then_some(w)),
        })
    }

    pub fn is_finalized(&self) -> bool {
        self.rewards_assigned
    }

    pub fn is_full(&self) -> bool {
        self.player_count >= self.max_players
    }

    pub fn has_joined(&self, account: &Address) -> bool {
        self.joined_players.contains(account)
    }
}

/// Operator supplied parameters for `createNewTournament`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTournament {
    /// Entry fee in wei.
    pub entry_fee: U256,
    pub max_players: u64,
    /// Seconds from creation until the tournament starts.
    pub start_delay: u64,
    pub game_type: String,
    /// Seconds after which an unstarted tournament may be canceled.
    pub cancel_delay: u64,
}

/// Handle to a submitted, not yet confirmed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: TxHash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// Narrows a contract integer that is semantically a count or a timestamp.
pub fn to_u64(value: U256, field: &'static str) -> Result<u64, ChainError> {
    u64::try_from(value).map_err(|_| ChainError::Decode(format!("{field} does not fit in u64")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn details() -> TournamentDetails {
        TournamentDetails {
            entryFee: U256::from(10_000_000_000_000_000u64),
            maxPlayers: U256::from(5),
            startTime: U256::from(1_700_000_000u64),
            submissionDeadline: U256::from(1_700_003_600u64),
            gameType: "chess".into(),
            isCanceled: false,
            rewardsAssigned: false,
            currentPlayerCount: U256::from(3),
            totalPrize: U256::from(30_000_000_000_000_000u64),
        }
    }

    #[test]
    fn zero_winner_slots_are_empty() {
        let first = address!("0x00000000000000000000000000000000000000a1");
        let t = Tournament::from_parts(
            4,
            details(),
            [first, Address::ZERO, Address::ZERO],
            vec![first],
        )
        .unwrap();
        assert_eq!(t.winners, [Some(first), None, None]);
        assert_eq!(t.player_count, 3);
        assert!(t.has_joined(&first));
        assert!(!t.is_full());
    }

    #[test]
    fn oversized_counts_are_rejected() {
        let mut d = details();
        d.maxPlayers = U256::MAX;
        let err = Tournament::from_parts(1, d, [Address::ZERO; 3], vec![]).unwrap_err();
        assert!(matches!(err, ChainError::Decode(_)));
    }
}
