//! Mining module: proof-of-work search and block production

pub mod miner;
pub mod pow;

pub use miner::{Miner, MiningStats};
pub use pow::{ProofOfWork, DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
