pub mod actions;
pub mod controller;
pub mod dashboard;
pub mod relay_api;
#[cfg(feature = "ssr")]
pub mod server;

pub use actions::{permitted_actions, TournamentAction, TournamentStatus, Viewer};
pub use controller::{CreateTournamentForm, DashboardClient};
pub use dashboard::{DashboardEvent, DashboardState};
