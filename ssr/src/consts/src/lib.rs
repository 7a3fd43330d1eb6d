pub mod limits;
mod remote;

pub use remote::*;

use web_time::Duration;

/// Sepolia, the network the tournament contract is deployed on.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// How long a caller waits for a submitted transaction to be mined.
pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);
/// Receipt polling cadence for the browser wallet.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(1500);
/// Dashboard auto refresh cadence while a wallet is connected.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Share of the prize pool for 1st, 2nd and 3rd place, in percent.
pub const PRIZE_SPLIT_PERCENT: [u8; 3] = [50, 30, 20];

pub mod env {
    pub const RPC_URL: &str = "RPC_URL";
    /// Older deployments only set the Sepolia specific name.
    pub const RPC_URL_ALIAS: &str = "SEPOLIA_RPC_URL";
    pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
    pub const CONTRACT_ADDRESS: &str = "CONTRACT_ADDRESS";
    pub const CHAIN_ID: &str = "CHAIN_ID";
    pub const ALLOWED_ORIGIN: &str = "ALLOWED_ORIGIN";
}
