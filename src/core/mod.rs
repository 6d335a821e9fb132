//! Core ledger components
//!
//! This module contains the fundamental building blocks:
//! - Transactions (sender, recipient, positive amount)
//! - Blocks (canonical hashing, genesis)
//! - Blockchain (chain plus pending pool, mining, validation, replacement)

pub mod block;
pub mod blockchain;
pub mod transaction;

pub use block::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use blockchain::{
    is_valid_chain, validate_chain, Blockchain, BlockchainError, ChainValidationError,
};
pub use transaction::{Transaction, TransactionError, MINING_REWARD, REWARD_SENDER};
