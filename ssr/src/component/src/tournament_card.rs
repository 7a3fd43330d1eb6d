use chain::Tournament;
use leptos::prelude::*;
use state::{permitted_actions, TournamentAction, TournamentStatus, Viewer};
use utils::{format::ether, time::format_start_time};

use crate::podium::Podium;

fn button_class(action: TournamentAction) -> &'static str {
    match action {
        TournamentAction::Join => "join-btn",
        TournamentAction::SubmitScore => "submit-btn",
        TournamentAction::Finalize => "finalize-btn",
        TournamentAction::Cancel => "cancel-btn",
        TournamentAction::ClaimRewards => "claim-rewards-btn",
        TournamentAction::ClaimRefund => "claim-refund-btn",
    }
}

#[component]
pub fn TournamentCard(
    tournament: Tournament,
    viewer: Viewer,
    now: u64,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] on_action: Callback<(u64, TournamentAction)>,
) -> impl IntoView {
    let id = tournament.id;
    let status = TournamentStatus::of(&tournament, now);
    let actions = permitted_actions(&tournament, &viewer, now);
    let podium = tournament
        .is_finalized()
        .then(|| view! { <Podium winners=tournament.winners /> });

    view! {
        <div class="tournament">
            <p>
                <strong>{format!("#{id} - {}", tournament.game_type)}</strong>
            </p>
            <p>{format!("Fee: {} ETH", ether(tournament.entry_fee))}</p>
            <p>{format!("Players: {}/{}", tournament.player_count, tournament.max_players)}</p>
            <p>{format!("Start: {}", format_start_time(tournament.start_time))}</p>
            <p>{format!("Status: {status}")}</p>
            <p>{format!("Prize: {} ETH", ether(tournament.total_prize))}</p>
            {podium}
            <div class="tournament-actions">
                {actions
                    .into_iter()
                    .map(|action| {
                        view! {
                            <button
                                class=button_class(action)
                                disabled=move || busy.get()
                                on:click=move |_| on_action.run((id, action))
                            >
                                {action.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
