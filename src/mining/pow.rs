//! Proof-of-work engine
//!
//! A proof for the block following `B` is a number `p` such that
//! `sha256(B.proof ‖ p ‖ reference)` starts with `difficulty` zero hex
//! characters. The reference passed by the chain is `B.previous_hash`, not the
//! hash of `B` itself, so the proof binds one link further back than the block
//! hash does. Search and verification share one predicate.

use crate::crypto::{meets_difficulty, sha256_hex};

/// Default number of leading `'0'` hex characters required
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Upper bound on difficulty (a SHA-256 hex digest has 64 characters)
pub const MAX_DIFFICULTY: usize = 64;

/// Proof-of-work search and verification at a fixed difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl ProofOfWork {
    /// Create an engine; difficulty is clamped to [`MAX_DIFFICULTY`]
    pub fn new(difficulty: usize) -> Self {
        Self {
            difficulty: difficulty.min(MAX_DIFFICULTY),
        }
    }

    /// Number of leading zero characters required
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Find the first proof accepted by [`ProofOfWork::verify`]
    pub fn solve(&self, last_proof: u64, reference_hash: &str) -> u64 {
        self.solve_with_attempts(last_proof, reference_hash).0
    }

    /// Find the first valid proof, also returning how many candidates were hashed
    ///
    /// Blocks the calling thread until a proof is found.
    pub fn solve_with_attempts(&self, last_proof: u64, reference_hash: &str) -> (u64, u64) {
        let mut proof = 0u64;

        loop {
            if self.verify(last_proof, proof, reference_hash) {
                return (proof, proof + 1);
            }
            proof += 1;
        }
    }

    /// Check whether `proof` satisfies the difficulty against `last_proof`
    pub fn verify(&self, last_proof: u64, proof: u64, reference_hash: &str) -> bool {
        let guess = format!("{}{}{}", last_proof, proof, reference_hash);
        meets_difficulty(&sha256_hex(guess.as_bytes()), self.difficulty)
    }
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_produces_verifiable_proof() {
        let pow = ProofOfWork::new(2);
        let proof = pow.solve(100, "1");

        assert!(pow.verify(100, proof, "1"));
        assert!(sha256_hex(format!("100{}1", proof).as_bytes()).starts_with("00"));
    }

    #[test]
    fn test_solve_returns_first_valid_candidate() {
        let pow = ProofOfWork::new(2);
        let (proof, attempts) = pow.solve_with_attempts(7, "deadbeef");

        assert_eq!(attempts, proof + 1);
        assert!((0..proof).all(|p| !pow.verify(7, p, "deadbeef")));
    }

    #[test]
    fn test_default_difficulty() {
        let pow = ProofOfWork::default();
        assert_eq!(pow.difficulty(), DEFAULT_DIFFICULTY);

        let proof = pow.solve(100, "1");
        assert!(pow.verify(100, proof, "1"));
    }

    #[test]
    fn test_zero_difficulty_accepts_anything() {
        let pow = ProofOfWork::new(0);
        assert_eq!(pow.solve(42, "x"), 0);
        assert!(pow.verify(42, 12345, "x"));
    }

    #[test]
    fn test_verify_hashes_undelimited_concatenation() {
        let pow = ProofOfWork::new(1);

        for proof in 0..64 {
            let digest = sha256_hex(format!("12{}ab", proof).as_bytes());
            assert_eq!(pow.verify(12, proof, "ab"), digest.starts_with('0'));
        }
    }

    #[test]
    fn test_difficulty_is_clamped() {
        assert_eq!(ProofOfWork::new(500).difficulty(), MAX_DIFFICULTY);
    }
}
