use once_cell::sync::Lazy;
use reqwest::Url;

/// Base URL of the relay service as seen from the browser.
///
/// Baked in at compile time through `TOURNAMENT_RELAY_URL`, falling back to
/// the local relay address.
pub static RELAY_BASE_URL: Lazy<Url> = Lazy::new(|| {
    let raw = option_env!("TOURNAMENT_RELAY_URL").unwrap_or("http://localhost:3001");
    Url::parse(raw).unwrap()
});

/// Origin of the standalone dashboard dev server, allowed by CORS by default.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

pub mod routes {
    pub const SUBMIT_SCORE: &str = "/submit-score";
    pub const FINALIZE_TOURNAMENT: &str = "/finalize-tournament";
    pub const CANCEL_TOURNAMENT: &str = "/cancel-tournament";
    pub const SIMULATE_GAME: &str = "/simulate-game";
    pub const CHAIN_CONFIG: &str = "/chain-config";
    pub const HEALTHZ: &str = "/healthz";
}
