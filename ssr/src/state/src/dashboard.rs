use chain::{Address, Tournament};

/// Everything the dashboard renders. Only [`DashboardState::apply`] mutates it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub account: Option<Address>,
    /// `None` while the account is unregistered.
    pub player_id: Option<u64>,
    pub is_owner: bool,
    pub tournaments: Vec<Tournament>,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DashboardEvent {
    Connected {
        account: Address,
        player_id: Option<u64>,
        is_owner: bool,
    },
    /// The wallet exposes no account anymore.
    Disconnected,
    /// The active account changed. Drops everything but the status line.
    Reset,
    Registered {
        player_id: u64,
    },
    TournamentsLoaded(Vec<Tournament>),
    Status(String),
    /// Only lands when nothing more specific is on the status line.
    StatusIfEmpty(String),
}

pub const WALLET_DISCONNECTED: &str = "Wallet disconnected";

impl DashboardState {
    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Connected {
                account,
                player_id,
                is_owner,
            } => {
                self.account = Some(account);
                self.player_id = player_id;
                self.is_owner = is_owner;
            }
            DashboardEvent::Disconnected => {
                *self = Self {
                    status: WALLET_DISCONNECTED.to_string(),
                    ..Self::default()
                };
            }
            DashboardEvent::Reset => {
                *self = Self {
                    status: std::mem::take(&mut self.status),
                    ..Self::default()
                };
            }
            DashboardEvent::Registered { player_id } => self.player_id = Some(player_id),
            DashboardEvent::TournamentsLoaded(tournaments) => self.tournaments = tournaments,
            DashboardEvent::Status(status) => self.status = status,
            DashboardEvent::StatusIfEmpty(status) => {
                if self.status.is_empty() {
                    self.status = status;
                }
            }
        }
    }

    pub fn apply_all(&mut self, events: impl IntoIterator<Item = DashboardEvent>) {
        events.into_iter().for_each(|e| self.apply(e));
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn tournament(&self, id: u64) -> Option<&Tournament> {
        self.tournaments.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain::address;

    const ACCOUNT: Address = address!("0x00000000000000000000000000000000000000b1");

    #[test]
    fn disconnect_clears_identity() {
        let mut state = DashboardState::default();
        state.apply(DashboardEvent::Connected {
            account: ACCOUNT,
            player_id: Some(3),
            is_owner: true,
        });
        assert!(state.is_connected());

        state.apply(DashboardEvent::Disconnected);
        assert_eq!(state.account, None);
        assert_eq!(state.player_id, None);
        assert!(!state.is_owner);
        assert_eq!(state.status, WALLET_DISCONNECTED);
    }

    #[test]
    fn reset_keeps_only_the_status_line() {
        let mut state = DashboardState::default();
        state.apply_all([
            DashboardEvent::Connected {
                account: ACCOUNT,
                player_id: Some(3),
                is_owner: true,
            },
            DashboardEvent::Status("Joined Tournament 1".into()),
        ]);

        state.apply(DashboardEvent::Reset);
        assert_eq!(
            state,
            DashboardState {
                status: "Joined Tournament 1".into(),
                ..DashboardState::default()
            }
        );
    }

    #[test]
    fn fallback_status_keeps_existing_message() {
        let mut state = DashboardState::default();
        state.apply(DashboardEvent::StatusIfEmpty("Tournaments loaded".into()));
        assert_eq!(state.status, "Tournaments loaded");

        state.apply_all([
            DashboardEvent::Status("Joined Tournament 2".into()),
            DashboardEvent::StatusIfEmpty("Tournaments loaded".into()),
        ]);
        assert_eq!(state.status, "Joined Tournament 2");
    }
}
