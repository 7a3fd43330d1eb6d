mod binding;
pub mod browser;
pub mod contract;
mod error;
pub mod model;
mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(feature = "ssr")]
pub mod rpc;

pub use binding::TournamentContract;
pub use error::{ChainError, USER_REJECTED_CODE};
pub use model::{NewTournament, PendingTx, Receipt, Tournament};
pub use transport::{ChainTransport, TxRequest};

pub use alloy_primitives::{address, utils::format_ether, utils::parse_ether, Address, TxHash, U256};
