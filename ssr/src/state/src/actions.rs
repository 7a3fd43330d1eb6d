use std::fmt;

use chain::{Address, Tournament};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TournamentAction {
    Join,
    SubmitScore,
    Finalize,
    Cancel,
    ClaimRewards,
    ClaimRefund,
}

impl TournamentAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Join => "Join",
            Self::SubmitScore => "Submit Score",
            Self::Finalize => "Finalize",
            Self::Cancel => "Cancel",
            Self::ClaimRewards => "Claim Rewards",
            Self::ClaimRefund => "Claim Refund",
        }
    }

    pub fn owner_only(self) -> bool {
        matches!(self, Self::SubmitScore | Self::Finalize | Self::Cancel)
    }
}

/// Who is looking at the tournament.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewer {
    pub account: Option<Address>,
    pub is_owner: bool,
}

/// Actions offered for `t` at `now` (epoch seconds), in display order.
///
/// A tournament is open for joins strictly before its start time and open
/// for scoring from the start time on.
pub fn permitted_actions(t: &Tournament, viewer: &Viewer, now: u64) -> Vec<TournamentAction> {
    let started = now >= t.start_time;
    let live = !t.is_canceled && !t.rewards_assigned;

    let candidates = [
        (TournamentAction::Join, live && !t.is_full() && !started),
        (TournamentAction::SubmitScore, live && started),
        (TournamentAction::Finalize, live && started && t.player_count > 0),
        (TournamentAction::Cancel, live && !started),
        (
            TournamentAction::ClaimRewards,
            t.rewards_assigned && !t.is_canceled,
        ),
        (
            TournamentAction::ClaimRefund,
            t.is_canceled && viewer.account.is_some_and(|a| t.has_joined(&a)),
        ),
    ];

    candidates
        .into_iter()
        .filter(|(action, allowed)| *allowed && (viewer.is_owner || !action.owner_only()))
        .map(|(action, _)| action)
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TournamentStatus {
    Canceled,
    Finished,
    Upcoming,
    Active,
}

impl TournamentStatus {
    pub fn of(t: &Tournament, now: u64) -> Self {
        if t.is_canceled {
            Self::Canceled
        } else if t.rewards_assigned {
            Self::Finished
        } else if now < t.start_time {
            Self::Upcoming
        } else {
            Self::Active
        }
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Canceled => "Canceled",
            Self::Finished => "Finished",
            Self::Upcoming => "Upcoming",
            Self::Active => "Active",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain::{address, U256};
    use TournamentAction::*;

    const NOW: u64 = 1_700_000_000;
    const ALICE: Address = address!("0x00000000000000000000000000000000000000a1");
    const BOB: Address = address!("0x00000000000000000000000000000000000000b2");

    fn tournament(start_time: u64) -> Tournament {
        Tournament {
            id: 1,
            entry_fee: U256::from(10u64),
            max_players: 5,
            start_time,
            submission_deadline: start_time + 3600,
            game_type: "chess".into(),
            player_count: 3,
            total_prize: U256::from(30u64),
            is_canceled: false,
            rewards_assigned: false,
            joined_players: vec![ALICE],
            winners: [None; 3],
        }
    }

    fn owner() -> Viewer {
        Viewer {
            account: Some(ALICE),
            is_owner: true,
        }
    }

    fn player(account: Address) -> Viewer {
        Viewer {
            account: Some(account),
            is_owner: false,
        }
    }

    #[test]
    fn upcoming_tournament_accepts_joins() {
        let t = tournament(NOW + 100);
        assert_eq!(permitted_actions(&t, &player(BOB), NOW), vec![Join]);
        assert_eq!(permitted_actions(&t, &owner(), NOW), vec![Join, Cancel]);
        assert_eq!(TournamentStatus::of(&t, NOW), TournamentStatus::Upcoming);
    }

    #[test]
    fn started_tournament_accepts_scores() {
        let t = tournament(NOW - 100);
        assert_eq!(permitted_actions(&t, &player(BOB), NOW), vec![]);
        assert_eq!(
            permitted_actions(&t, &owner(), NOW),
            vec![SubmitScore, Finalize]
        );
        assert_eq!(TournamentStatus::of(&t, NOW), TournamentStatus::Active);
    }

    #[test]
    fn start_instant_counts_as_started() {
        let t = tournament(NOW);
        assert_eq!(
            permitted_actions(&t, &owner(), NOW),
            vec![SubmitScore, Finalize]
        );
    }

    #[test]
    fn full_tournament_refuses_joins() {
        let mut t = tournament(NOW + 100);
        t.player_count = 5;
        assert!(!permitted_actions(&t, &player(BOB), NOW).contains(&Join));
    }

    #[test]
    fn empty_tournament_cannot_be_finalized() {
        let mut t = tournament(NOW - 100);
        t.player_count = 0;
        assert_eq!(permitted_actions(&t, &owner(), NOW), vec![SubmitScore]);
    }

    #[test]
    fn finished_tournament_only_pays_out() {
        let mut t = tournament(NOW - 100);
        t.rewards_assigned = true;
        assert_eq!(permitted_actions(&t, &owner(), NOW), vec![ClaimRewards]);
        assert_eq!(permitted_actions(&t, &player(BOB), NOW), vec![ClaimRewards]);
        assert_eq!(TournamentStatus::of(&t, NOW).to_string(), "Finished");
    }

    #[test]
    fn refunds_are_for_joined_players() {
        let mut t = tournament(NOW + 100);
        t.is_canceled = true;
        assert_eq!(permitted_actions(&t, &player(ALICE), NOW), vec![ClaimRefund]);
        assert_eq!(permitted_actions(&t, &player(BOB), NOW), vec![]);
        assert_eq!(permitted_actions(&t, &Viewer::default(), NOW), vec![]);
        assert_eq!(TournamentStatus::of(&t, NOW), TournamentStatus::Canceled);
    }
}
