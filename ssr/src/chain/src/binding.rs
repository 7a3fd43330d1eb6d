use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use consts::limits::*;

use crate::{
    contract::*,
    model::{to_u64, NewTournament, PendingTx, Receipt, Tournament},
    ChainError, ChainTransport, TxRequest,
};

/// Typed handle to the deployed tournament contract.
///
/// Writes only submit; callers must [`confirm`](Self::confirm) every
/// [`PendingTx`] before treating the action as done.
pub struct TournamentContract<T> {
    transport: T,
    address: Address,
}

impl<T: ChainTransport> TournamentContract<T> {
    pub fn new(transport: T, address: Address) -> Self {
        Self { transport, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn read<C: SolCall>(&self, call: C) -> Result<C::Return, ChainError> {
        let data = call.abi_encode().into();
        let out = self.transport.call(self.address, data).await?;
        C::abi_decode_returns(&out)
            .map_err(|e| ChainError::Decode(format!("{}: {e}", C::SIGNATURE)))
    }

    pub async fn write<C: SolCall>(
        &self,
        call: C,
        value: U256,
        gas_limit: u64,
    ) -> Result<PendingTx, ChainError> {
        let tx = TxRequest {
            to: self.address,
            data: call.abi_encode().into(),
            value,
            gas_limit: Some(gas_limit),
        };
        let hash = self.transport.send(tx).await?;
        log::debug!("submitted {} as {hash}", C::SIGNATURE);
        Ok(PendingTx { hash })
    }

    /// Waits for inclusion. A mined but failed transaction is a revert.
    pub async fn confirm(&self, tx: PendingTx) -> Result<Receipt, ChainError> {
        let receipt = self.transport.wait(tx.hash).await?;
        if !receipt.success {
            return Err(ChainError::Reverted { reason: None });
        }
        Ok(receipt)
    }

    pub async fn owner(&self) -> Result<Address, ChainError> {
        self.read(ownerCall {}).await
    }

    /// `None` while the address is unregistered.
    pub async fn player_id(&self, player: Address) -> Result<Option<u64>, ChainError> {
        let id = self.read(playerIdsCall { player }).await?;
        let id = to_u64(id, "playerId")?;
        Ok((id > 0).then_some(id))
    }

    pub async fn tournament_count(&self) -> Result<u64, ChainError> {
        let count = self.read(tournamentCountCall {}).await?;
        to_u64(count, "tournamentCount")
    }

    pub async fn tournament_details(&self, id: u64) -> Result<TournamentDetails, ChainError> {
        self.read(getTournamentDetailsCall {
            tournamentId: U256::from(id),
        })
        .await
    }

    pub async fn winners(&self, id: u64) -> Result<[Address; 3], ChainError> {
        self.read(getWinnersCall {
            tournamentId: U256::from(id),
        })
        .await
    }

    pub async fn tournament_players(&self, id: u64) -> Result<Vec<Address>, ChainError> {
        self.read(getTournamentPlayersCall {
            tournamentId: U256::from(id),
        })
        .await
    }

    pub async fn entry_fee(&self, id: u64) -> Result<U256, ChainError> {
        self.read(getEntryFeeCall {
            tournamentId: U256::from(id),
        })
        .await
    }

    /// Details, then winners, then players, one after the other.
    pub async fn tournament(&self, id: u64) -> Result<Tournament, ChainError> {
        let details = self.tournament_details(id).await?;
        let winners = self.winners(id).await?;
        let players = self.tournament_players(id).await?;
        Tournament::from_parts(id, details, winners, players)
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, ChainError> {
        self.transport.balance(account).await
    }

    pub async fn register_player(&self) -> Result<PendingTx, ChainError> {
        self.write(registerPlayerCall {}, U256::ZERO, REGISTER_PLAYER_GAS)
            .await
    }

    pub async fn join_tournament(&self, id: u64, entry_fee: U256) -> Result<PendingTx, ChainError> {
        let call = joinTournamentCall {
            tournamentId: U256::from(id),
        };
        self.write(call, entry_fee, JOIN_TOURNAMENT_GAS).await
    }

    pub async fn submit_score(
        &self,
        id: u64,
        player: Address,
        score: U256,
    ) -> Result<PendingTx, ChainError> {
        let call = submitScoreCall {
            tournamentId: U256::from(id),
            player,
            score,
        };
        self.write(call, U256::ZERO, SUBMIT_SCORE_GAS).await
    }

    pub async fn finalize_tournament(&self, id: u64) -> Result<PendingTx, ChainError> {
        let call = finalizeTournamentCall {
            tournamentId: U256::from(id),
        };
        self.write(call, U256::ZERO, FINALIZE_TOURNAMENT_GAS).await
    }

    pub async fn cancel_tournament(&self, id: u64) -> Result<PendingTx, ChainError> {
        let call = cancelTournamentCall {
            tournamentId: U256::from(id),
        };
        self.write(call, U256::ZERO, CANCEL_TOURNAMENT_GAS).await
    }

    pub async fn claim_rewards(&self, id: u64) -> Result<PendingTx, ChainError> {
        let call = claimRewardsCall {
            tournamentId: U256::from(id),
        };
        self.write(call, U256::ZERO, CLAIM_GAS).await
    }

    pub async fn claim_refund(&self, id: u64) -> Result<PendingTx, ChainError> {
        let call = claimRefundCall {
            tournamentId: U256::from(id),
        };
        self.write(call, U256::ZERO, CLAIM_GAS).await
    }

    pub async fn create_tournament(&self, params: NewTournament) -> Result<PendingTx, ChainError> {
        let call = createNewTournamentCall {
            entryFee: params.entry_fee,
            maxPlayers: U256::from(params.max_players),
            startDelay: U256::from(params.start_delay),
            gameType: params.game_type,
            cancelDelay: U256::from(params.cancel_delay),
        };
        self.write(call, U256::ZERO, CREATE_TOURNAMENT_GAS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{JournalEntry, MockChain, MockTournament};
    use alloy_primitives::address;

    const OWNER: Address = address!("0x00000000000000000000000000000000000000aa");
    const PLAYER: Address = address!("0x00000000000000000000000000000000000000b1");
    const CONTRACT: Address = address!("0x00000000000000000000000000000000000000cc");

    #[tokio::test]
    async fn reads_decode_typed_values() {
        let chain = MockChain::new(OWNER, PLAYER).with_player(PLAYER, 9);
        let contract = TournamentContract::new(chain, CONTRACT);

        assert_eq!(contract.owner().await.unwrap(), OWNER);
        assert_eq!(contract.player_id(PLAYER).await.unwrap(), Some(9));
        assert_eq!(contract.player_id(OWNER).await.unwrap(), None);
        assert_eq!(contract.tournament_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn tournament_pipeline_assembles_snapshot() {
        let chain = MockChain::new(OWNER, PLAYER).with_tournament(
            MockTournament::open(1_000, 4)
                .with_players(&[PLAYER])
                .with_fee(U256::from(5)),
        );
        let contract = TournamentContract::new(chain, CONTRACT);

        let t = contract.tournament(1).await.unwrap();
        assert_eq!(t.id, 1);
        assert_eq!(t.player_count, 1);
        assert_eq!(t.entry_fee, U256::from(5));
        assert_eq!(t.joined_players, vec![PLAYER]);
        assert_eq!(t.winners, [None, None, None]);
    }

    #[tokio::test]
    async fn write_then_confirm_is_journaled_in_order() {
        let chain = MockChain::new(OWNER, PLAYER);
        let contract = TournamentContract::new(chain, CONTRACT);

        let pending = contract.register_player().await.unwrap();
        let receipt = contract.confirm(pending).await.unwrap();
        assert!(receipt.success);
        assert_eq!(contract.player_id(PLAYER).await.unwrap(), Some(1));

        let journal = contract.transport().journal();
        assert_eq!(
            journal,
            vec![
                JournalEntry::Sent {
                    method: "registerPlayer",
                    hash: pending.hash
                },
                JournalEntry::Confirmed { hash: pending.hash },
            ]
        );
    }

    #[tokio::test]
    async fn failed_receipt_is_a_revert() {
        let chain = MockChain::new(OWNER, PLAYER).fail_receipts();
        let contract = TournamentContract::new(chain, CONTRACT);

        let pending = contract.register_player().await.unwrap();
        let err = contract.confirm(pending).await.unwrap_err();
        assert_eq!(err, ChainError::Reverted { reason: None });
    }
}
