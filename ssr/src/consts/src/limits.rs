//! Gas limits attached to each contract write.

pub const REGISTER_PLAYER_GAS: u64 = 100_000;
pub const JOIN_TOURNAMENT_GAS: u64 = 300_000;
pub const CREATE_TOURNAMENT_GAS: u64 = 500_000;
pub const SUBMIT_SCORE_GAS: u64 = 200_000;
pub const FINALIZE_TOURNAMENT_GAS: u64 = 300_000;
pub const CANCEL_TOURNAMENT_GAS: u64 = 200_000;
pub const CLAIM_GAS: u64 = 300_000;
