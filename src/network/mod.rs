//! Networking: peer registry, consensus and node assembly

pub mod consensus;
pub mod node;
pub mod peer;

pub use consensus::{
    select_longest_valid, ChainFetcher, ChainResponse, Consensus, ConsensusError,
    ConsensusOutcome, HttpChainFetcher, DEFAULT_PEER_TIMEOUT,
};
pub use node::{generate_node_id, Node, NodeConfig, NodeError};
pub use peer::{normalize_address, PeerError, PeerRegistry, Registration, DEFAULT_SCHEME};
