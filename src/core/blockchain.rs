//! Blockchain implementation
//!
//! The chain of blocks and the pool of pending transactions change together,
//! so both live in one struct. Callers share it behind a single lock.

use crate::core::block::Block;
use crate::core::transaction::{Transaction, TransactionError};
use crate::mining::pow::{ProofOfWork, DEFAULT_DIFFICULTY};
use thiserror::Error;

/// Blockchain-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockchainError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(#[from] TransactionError),
    #[error("Invalid chain: {0}")]
    InvalidChain(#[from] ChainValidationError),
}

/// Reasons a chain fails validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainValidationError {
    #[error("chain is empty")]
    Empty,
    #[error("block {0} does not link to the hash of its predecessor")]
    BrokenLink(u64),
    #[error("block {0} carries an invalid proof of work")]
    InvalidProof(u64),
}

/// Check a whole chain, reporting the first failing block
///
/// For every adjacent pair the later block must reference the hash of the
/// earlier one, and its proof must verify against the earlier block's proof and
/// `previous_hash`.
pub fn validate_chain(chain: &[Block], pow: &ProofOfWork) -> Result<(), ChainValidationError> {
    if chain.is_empty() {
        return Err(ChainValidationError::Empty);
    }

    for pair in chain.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        if current.previous_hash != previous.hash() {
            return Err(ChainValidationError::BrokenLink(current.index));
        }

        if !pow.verify(previous.proof, current.proof, &previous.previous_hash) {
            return Err(ChainValidationError::InvalidProof(current.index));
        }
    }

    Ok(())
}

/// Whether a chain passes [`validate_chain`]
pub fn is_valid_chain(chain: &[Block], pow: &ProofOfWork) -> bool {
    validate_chain(chain, pow).is_ok()
}

/// The node's chain together with its pending transaction pool
#[derive(Debug, Clone)]
pub struct Blockchain {
    /// The chain of blocks, never empty
    blocks: Vec<Block>,
    /// Transactions waiting for the next block
    pending: Vec<Transaction>,
    /// Proof-of-work engine used for mining and validation
    pow: ProofOfWork,
}

impl Blockchain {
    /// Create a new blockchain with genesis block
    pub fn new() -> Self {
        Self::with_difficulty(DEFAULT_DIFFICULTY)
    }

    /// Create a blockchain with custom difficulty
    pub fn with_difficulty(difficulty: usize) -> Self {
        Self {
            blocks: vec![Block::genesis()],
            pending: Vec::new(),
            pow: ProofOfWork::new(difficulty),
        }
    }

    /// Get the latest block
    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .expect("Blockchain should have at least genesis block")
    }

    /// Number of blocks, genesis included
    pub fn length(&self) -> usize {
        self.blocks.len()
    }

    /// Get blockchain height
    pub fn height(&self) -> u64 {
        self.tip().index
    }

    /// Borrow the chain
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Transactions waiting to be mined
    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending
    }

    /// The proof-of-work engine this chain mines and validates with
    pub fn proof_of_work(&self) -> ProofOfWork {
        self.pow
    }

    /// Current mining difficulty
    pub fn difficulty(&self) -> usize {
        self.pow.difficulty()
    }

    /// Queue a transaction for the next block
    ///
    /// Returns the index of the block the transaction is expected to land in.
    pub fn submit_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: i64,
    ) -> Result<u64, BlockchainError> {
        let tx = Transaction::new(sender, recipient, amount)?;
        self.pending.push(tx);
        Ok(self.tip().index + 1)
    }

    /// Mine a block paying the reward to `miner`
    pub fn mine(&mut self, miner: &str) -> Block {
        self.mine_with_attempts(miner).0
    }

    /// Mine a block, also returning the number of proof candidates tried
    ///
    /// Solves against the tip, credits the reward, drains the pool into a new
    /// block linked to the tip's hash and appends it.
    pub fn mine_with_attempts(&mut self, miner: &str) -> (Block, u64) {
        let (proof, attempts, previous_hash) = {
            let tip = self.tip();
            let (proof, attempts) = self
                .pow
                .solve_with_attempts(tip.proof, &tip.previous_hash);
            (proof, attempts, tip.hash())
        };

        self.pending.push(Transaction::reward(miner));

        let block = Block::new(
            self.blocks.len() as u64,
            std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        );
        self.blocks.push(block.clone());

        (block, attempts)
    }

    /// Copy of the full chain
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    /// Substitute the whole chain, leaving the pool untouched
    ///
    /// The replacement must itself be a valid chain.
    pub fn replace(&mut self, chain: Vec<Block>) -> Result<(), BlockchainError> {
        validate_chain(&chain, &self.pow)?;
        self.adopt_validated(chain);
        Ok(())
    }

    /// Substitute a chain the caller has already run through `validate_chain`
    /// against this store's difficulty
    pub(crate) fn adopt_validated(&mut self, chain: Vec<Block>) {
        debug_assert!(!chain.is_empty(), "adopted chain must contain genesis");
        self.blocks = chain;
    }

    /// Validate the entire local chain
    pub fn is_valid(&self) -> bool {
        is_valid_chain(&self.blocks, &self.pow)
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}
