use std::rc::Rc;

use chain::{browser::BrowserWallet, Address, TournamentContract};
use component::{
    status_line::StatusLine, tournament_card::TournamentCard, wallet_header::WalletHeader,
};
use consts::REFRESH_INTERVAL;
use leptos::{either::Either, prelude::*};
use leptos_meta::Title;
use state::{
    controller::NO_WALLET,
    relay_api::{RelayApi, RelayClient},
    CreateTournamentForm, DashboardClient, DashboardEvent, DashboardState, TournamentAction,
    Viewer,
};
use utils::time::current_epoch_secs;

use crate::admin::AdminPanel;

type Client = DashboardClient<BrowserWallet, RelayClient>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Connect { reselect: bool },
    AccountsChanged(Option<Address>),
    Refresh,
    Register,
    Join(u64),
    Finalize(u64),
    Cancel(u64),
    ClaimRewards(u64),
    ClaimRefund(u64),
    SubmitScore {
        tournament_id: u64,
        player: String,
        score: String,
    },
    Create(CreateTournamentForm),
    Simulate {
        tournament_id: u64,
        lines: String,
    },
}

impl Command {
    /// The direct command behind a card button. Submit Score has none: it
    /// needs a player and score from the score form first.
    pub fn from_card(tournament_id: u64, action: TournamentAction) -> Option<Self> {
        match action {
            TournamentAction::Join => Some(Self::Join(tournament_id)),
            TournamentAction::Finalize => Some(Self::Finalize(tournament_id)),
            TournamentAction::Cancel => Some(Self::Cancel(tournament_id)),
            TournamentAction::ClaimRewards => Some(Self::ClaimRewards(tournament_id)),
            TournamentAction::ClaimRefund => Some(Self::ClaimRefund(tournament_id)),
            TournamentAction::SubmitScore => None,
        }
    }
}

/// Binds the injected wallet to the contract the relay is configured for.
async fn build_client() -> Result<Client, String> {
    let wallet = BrowserWallet::detect().ok_or_else(|| NO_WALLET.to_string())?;
    let relay = RelayClient::default();
    let config = relay
        .chain_config()
        .await
        .map_err(|e| format!("Failed to load chain config: {e}"))?;
    log::info!(
        "contract {} on chain {}",
        config.contract_address,
        config.chain_id
    );
    Ok(DashboardClient::new(
        TournamentContract::new(wallet, config.contract_address),
        relay,
        config.chain_id,
    ))
}

async fn run(client: &Client, state: &DashboardState, command: Command) -> Vec<DashboardEvent> {
    match command {
        Command::Connect { reselect } => client.connect(reselect).await,
        Command::AccountsChanged(active) => client.accounts_changed(active).await,
        Command::Refresh => client.refresh().await,
        Command::Register => client.register(state).await,
        Command::Join(id) => client.join(state, id).await,
        Command::Finalize(id) => client.finalize(state, id).await,
        Command::Cancel(id) => client.cancel(state, id).await,
        Command::ClaimRewards(id) => client.claim_rewards(state, id).await,
        Command::ClaimRefund(id) => client.claim_refund(state, id).await,
        Command::SubmitScore {
            tournament_id,
            player,
            score,
        } => {
            client
                .submit_score(state, tournament_id, &player, &score)
                .await
        }
        Command::Create(form) => client.create_tournament(state, &form).await,
        Command::Simulate {
            tournament_id,
            lines,
        } => client.simulate_game(state, tournament_id, &lines).await,
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = RwSignal::new(DashboardState::default());
    let client = StoredValue::new_local(None::<Rc<Client>>);
    let score_target = RwSignal::new(None::<u64>);

    let action = Action::new_local(move |command: &Command| {
        let command = command.clone();
        async move {
            let current = match client.get_value() {
                Some(current) => current,
                None => match build_client().await {
                    Ok(built) => {
                        let built = Rc::new(built);
                        client.set_value(Some(built.clone()));
                        built
                    }
                    Err(message) => {
                        state.update(|s| s.apply(DashboardEvent::Status(message)));
                        return;
                    }
                },
            };
            let snapshot = state.get_untracked();
            let events = run(&current, &snapshot, command).await;
            state.update(|s| s.apply_all(events));
        }
    });
    let busy = action.pending();
    let dispatch = Callback::new(move |command: Command| {
        action.dispatch(command);
    });

    Effect::new(move |_| {
        let tick = move || {
            if state.with_untracked(DashboardState::is_connected) && !busy.get_untracked() {
                action.dispatch(Command::Refresh);
            }
        };
        match set_interval_with_handle(tick, REFRESH_INTERVAL) {
            Ok(handle) => on_cleanup(move || handle.clear()),
            Err(e) => log::warn!("auto refresh disabled: {e:?}"),
        }

        if let Some(wallet) = BrowserWallet::detect() {
            wallet.on_accounts_changed(move |active| {
                action.dispatch(Command::AccountsChanged(active));
            });
        }
    });

    let on_action = Callback::new(move |(id, tournament_action): (u64, TournamentAction)| {
        match Command::from_card(id, tournament_action) {
            Some(command) => {
                action.dispatch(command);
            }
            None => score_target.set(Some(id)),
        }
    });

    let tournaments = move || {
        let now = current_epoch_secs();
        let (tournaments, viewer) = state.with(|s| {
            let viewer = Viewer {
                account: s.account,
                is_owner: s.is_owner,
            };
            (s.tournaments.clone(), viewer)
        });
        if tournaments.is_empty() {
            return Either::Left(view! { <p>"No tournaments available"</p> });
        }
        Either::Right(
            tournaments
                .into_iter()
                .map(|tournament| {
                    view! { <TournamentCard tournament viewer now busy on_action /> }
                })
                .collect_view(),
        )
    };

    view! {
        <Title text="Tournament Platform" />
        <div class="app">
            <WalletHeader
                account=Signal::derive(move || state.with(|s| s.account))
                is_owner=Signal::derive(move || state.with(|s| s.is_owner))
                busy
                on_connect=Callback::new(move |reselect| {
                    action.dispatch(Command::Connect { reselect });
                })
            />
            <StatusLine status=Signal::derive(move || state.with(|s| s.status.clone())) />
            <Show when=move || state.with(DashboardState::is_connected)>
                <div class="dashboard">
                    <section class="player-stats">
                        <h2>"Player Stats"</h2>
                        <p>
                            "Player ID: "
                            {move || {
                                state
                                    .with(|s| s.player_id)
                                    .map(|id| id.to_string())
                                    .unwrap_or_else(|| "Not Registered".to_string())
                            }}
                        </p>
                        <button
                            class="register-btn"
                            disabled=move || busy.get()
                            on:click=move |_| {
                                action.dispatch(Command::Register);
                            }
                        >
                            "Register"
                        </button>
                    </section>
                    <Show when=move || state.with(|s| s.is_owner)>
                        <AdminPanel busy score_target on_command=dispatch />
                    </Show>
                    <section class="tournaments">
                        <h2>"Tournaments"</h2>
                        {tournaments}
                    </section>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_score_goes_through_the_form() {
        assert_eq!(Command::from_card(4, TournamentAction::SubmitScore), None);
        assert_eq!(
            Command::from_card(4, TournamentAction::Join),
            Some(Command::Join(4))
        );
        assert_eq!(
            Command::from_card(2, TournamentAction::ClaimRefund),
            Some(Command::ClaimRefund(2))
        );
    }
}
