//! Cryptographic utilities for the ledger
//!
//! This module provides SHA-256 hashing and the hex difficulty predicate.

pub mod hash;

pub use hash::{meets_difficulty, sha256, sha256_hex};
