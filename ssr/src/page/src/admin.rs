use leptos::prelude::*;
use state::CreateTournamentForm;

use crate::dashboard::Command;

#[component]
fn Field(label: &'static str, value: RwSignal<String>) -> impl IntoView {
    view! {
        <label class="field">
            <span>{label}</span>
            <input type="text" bind:value=value />
        </label>
    }
}

/// Operator tools: create a tournament, submit a score, batch simulate.
#[component]
pub fn AdminPanel(
    #[prop(into)] busy: Signal<bool>,
    /// Tournament picked through a card's Submit Score button.
    score_target: RwSignal<Option<u64>>,
    #[prop(into)] on_command: Callback<Command>,
) -> impl IntoView {
    let entry_fee = RwSignal::new(String::new());
    let max_players = RwSignal::new(String::new());
    let start_delay = RwSignal::new(String::new());
    let game_type = RwSignal::new(String::new());
    let cancel_delay = RwSignal::new(String::new());

    let create = move |_| {
        on_command.run(Command::Create(CreateTournamentForm {
            entry_fee: entry_fee.get_untracked(),
            max_players: max_players.get_untracked(),
            start_delay: start_delay.get_untracked(),
            game_type: game_type.get_untracked(),
            cancel_delay: cancel_delay.get_untracked(),
        }));
    };

    let player = RwSignal::new(String::new());
    let score = RwSignal::new(String::new());
    let submit_score = move |_| {
        if let Some(tournament_id) = score_target.get_untracked() {
            on_command.run(Command::SubmitScore {
                tournament_id,
                player: player.get_untracked(),
                score: score.get_untracked(),
            });
            score_target.set(None);
        }
    };

    let simulate_id = RwSignal::new(String::new());
    let simulate_lines = RwSignal::new(String::new());
    let simulate = move |_| {
        let Ok(tournament_id) = simulate_id.get_untracked().trim().parse() else {
            log::warn!("simulate needs a numeric tournament id");
            return;
        };
        on_command.run(Command::Simulate {
            tournament_id,
            lines: simulate_lines.get_untracked(),
        });
    };

    view! {
        <section class="admin-actions">
            <h2>"Admin Actions"</h2>
            <div class="create-form">
                <Field label="Entry Fee (ETH)" value=entry_fee />
                <Field label="Max Players" value=max_players />
                <Field label="Start Delay (seconds)" value=start_delay />
                <Field label="Game Type" value=game_type />
                <Field label="Cancel Delay (seconds)" value=cancel_delay />
                <button class="create-btn" disabled=move || busy.get() on:click=create>
                    "Create Tournament"
                </button>
            </div>
            <Show when=move || score_target.get().is_some()>
                <div class="score-form">
                    <h3>
                        {move || {
                            format!("Submit score for #{}", score_target.get().unwrap_or_default())
                        }}
                    </h3>
                    <Field label="Player Address" value=player />
                    <Field label="Score" value=score />
                    <button class="submit-btn" disabled=move || busy.get() on:click=submit_score>
                        "Submit"
                    </button>
                    <button on:click=move |_| score_target.set(None)>"Close"</button>
                </div>
            </Show>
            <div class="simulate-form">
                <Field label="Tournament ID" value=simulate_id />
                <label class="field">
                    <span>"Scores (address:score per line)"</span>
                    <textarea bind:value=simulate_lines></textarea>
                </label>
                <button class="simulate-btn" disabled=move || busy.get() on:click=simulate>
                    "Simulate Game"
                </button>
            </div>
        </section>
    }
}
