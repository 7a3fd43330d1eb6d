pub mod podium;
pub mod status_line;
pub mod tournament_card;
pub mod wallet_header;
