use alloy_primitives::B256;
use alloy_sol_types::{sol, SolEvent};

sol! {
    /// Emitted by the hub governor when a proposal is submitted
    #[allow(missing_docs)]
    event ProposalCreated(
        uint256 proposalId,
        address proposer,
        address[] targets,
        uint256[] values,
        string[] signatures,
        bytes[] calldatas,
        uint256 voteStart,
        uint256 voteEnd,
        string description
    );

    interface IGovernorHub {
        /// Lifecycle state of a proposal, reverts for unknown ids
        function state(uint256 proposalId) external view returns (uint8);

        /// Votes counted on the hub, including spoke tallies once collected
        function proposalVotes(uint256 proposalId) external view returns (uint256 againstVotes, uint256 forVotes, uint256 abstainVotes);

        /// Quorum required at the given timepoint
        function quorum(uint256 timepoint) external view returns (uint256);

        /// Whether the hub has received the vote tallies of every spoke
        function collectionFinished(uint256 proposalId) external view returns (bool);
    }
}

/// Resolve a hub event by name or full signature to its topic hash.
///
/// Only events the scanner knows how to decode are resolvable.
pub fn resolve_event(name: &str) -> Option<B256> {
    let name = name.trim();
    if name == "ProposalCreated" || name == ProposalCreated::SIGNATURE {
        Some(ProposalCreated::SIGNATURE_HASH)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_event_by_name_and_signature() {
        assert_eq!(
            resolve_event("ProposalCreated"),
            Some(ProposalCreated::SIGNATURE_HASH)
        );
        assert_eq!(
            resolve_event(ProposalCreated::SIGNATURE),
            Some(ProposalCreated::SIGNATURE_HASH)
        );
    }

    #[test]
    fn test_resolve_unknown_event() {
        assert_eq!(resolve_event("ProposalQueued"), None);
        assert_eq!(resolve_event(""), None);
    }
}
