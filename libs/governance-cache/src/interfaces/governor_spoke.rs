use alloy_sol_types::sol;

sol! {
    interface IGovernorSpoke {
        /// Votes cast on this spoke chain for a hub proposal
        function proposalVotes(uint256 proposalId) external view returns (uint256 againstVotes, uint256 forVotes, uint256 abstainVotes);
    }
}
