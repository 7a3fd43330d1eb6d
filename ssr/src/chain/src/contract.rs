//! ABI of the tournament platform contract.
//!
//! Only the surface the dashboard and the relay touch is declared here. The
//! contract itself is deployed and owned elsewhere.

use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct TournamentDetails {
        uint256 entryFee;
        uint256 maxPlayers;
        uint256 startTime;
        uint256 submissionDeadline;
        string gameType;
        bool isCanceled;
        bool rewardsAssigned;
        uint256 currentPlayerCount;
        uint256 totalPrize;
    }

    interface ITournamentPlatform {
        function owner() external view returns (address owner);
        function playerIds(address player) external view returns (uint256 playerId);
        function tournamentCount() external view returns (uint256 count);
        function getTournamentDetails(uint256 tournamentId) external view returns (TournamentDetails details);
        function getWinners(uint256 tournamentId) external view returns (address[3] winners);
        function getTournamentPlayers(uint256 tournamentId) external view returns (address[] players);
        function getEntryFee(uint256 tournamentId) external view returns (uint256 entryFee);

        function registerPlayer() external;
        function joinTournament(uint256 tournamentId) external payable;
        function submitScore(uint256 tournamentId, address player, uint256 score) external;
        function finalizeTournament(uint256 tournamentId) external;
        function cancelTournament(uint256 tournamentId) external;
        function claimRewards(uint256 tournamentId) external;
        function claimRefund(uint256 tournamentId) external;
        function createNewTournament(
            uint256 entryFee,
            uint256 maxPlayers,
            uint256 startDelay,
            string gameType,
            uint256 cancelDelay
        ) external;
    }
}

pub use ITournamentPlatform::*;
