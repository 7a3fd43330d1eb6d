use chain::Address;
use consts::PRIZE_SPLIT_PERCENT;
use leptos::prelude::*;
use utils::format::address_prefix;

const PLACES: [&str; 3] = ["1st", "2nd", "3rd"];

/// `1st: 0x1234... (50%)`, `N/A` for an empty slot.
pub fn podium_rows(winners: &[Option<Address>; 3]) -> Vec<String> {
    winners
        .iter()
        .zip(PLACES)
        .zip(PRIZE_SPLIT_PERCENT)
        .map(|((winner, place), share)| {
            let holder = winner
                .as_ref()
                .map(address_prefix)
                .unwrap_or_else(|| "N/A".to_string());
            format!("{place}: {holder} ({share}%)")
        })
        .collect()
}

#[component]
pub fn Podium(winners: [Option<Address>; 3]) -> impl IntoView {
    let rows = podium_rows(&winners);
    view! {
        <div class="leaderboard">
            <p class="leaderboard-title">"Leaderboard:"</p>
            {rows.into_iter().map(|row| view! { <p>{row}</p> }).collect_view()}
        </div>
    }
}
