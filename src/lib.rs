//! PoW Ledger Node: a single node's view of an append-only ledger
//!
//! This crate provides:
//! - Transactions and blocks with canonical SHA-256 hashing
//! - Proof of Work mining over a pending transaction pool
//! - Whole-chain validation
//! - A deduplicated peer registry
//! - Longest-valid-chain consensus against peers
//! - An HTTP API exposing all of the above
//!
//! # Example
//!
//! ```rust
//! use pow_ledger_node::core::Blockchain;
//!
//! let mut blockchain = Blockchain::with_difficulty(2);
//! blockchain.submit_transaction("Alice", "Bob", 50).unwrap();
//!
//! let block = blockchain.mine("node-id");
//! assert_eq!(block.index, 1);
//! assert_eq!(block.transactions.len(), 2);
//! assert!(blockchain.is_valid());
//! ```

pub mod api;
pub mod core;
pub mod crypto;
pub mod mining;
pub mod network;

// Re-export commonly used types
pub use api::{create_router, ApiState};
pub use core::{is_valid_chain, Block, Blockchain, BlockchainError, Transaction};
pub use mining::{Miner, ProofOfWork, DEFAULT_DIFFICULTY};
pub use network::{Consensus, Node, NodeConfig, PeerRegistry};
