//! Peer registry
//!
//! Tracks the set of peer nodes consulted during consensus. Addresses are
//! normalized to `scheme://host[:port]` and deduplicated by that string.

use axum::http::Uri;
use std::collections::HashSet;
use thiserror::Error;

/// Scheme assumed when an address has none, and the only one the chain
/// fetcher can speak
pub const DEFAULT_SCHEME: &str = "http";

/// Peer registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeerError {
    #[error("Invalid peer address: {0:?}")]
    InvalidAddress(String),
}

/// Normalize a raw peer address
///
/// `localhost:5001` becomes `http://localhost:5001`; paths are dropped.
/// Only plain `http` peers are accepted since consensus fetches without TLS.
pub fn normalize_address(raw: &str) -> Result<String, PeerError> {
    let invalid = || PeerError::InvalidAddress(raw.to_string());

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{}://{}", DEFAULT_SCHEME, trimmed)
    };

    let uri: Uri = candidate.parse().map_err(|_| invalid())?;

    let scheme = uri.scheme_str().ok_or_else(invalid)?.to_ascii_lowercase();
    if scheme != DEFAULT_SCHEME {
        return Err(invalid());
    }

    let authority = uri.authority().ok_or_else(invalid)?;
    let host = authority.host().to_ascii_lowercase();
    if host.is_empty() {
        return Err(invalid());
    }

    Ok(match authority.port_u16() {
        Some(port) => format!("{}://{}:{}", scheme, host, port),
        None => format!("{}://{}", scheme, host),
    })
}

/// Outcome of registering a batch of addresses
#[derive(Debug, Clone, Default)]
pub struct Registration {
    /// Normalized addresses that were accepted
    pub added: Vec<String>,
    /// Raw addresses that failed to parse
    pub rejected: Vec<String>,
}

/// Set of known peer addresses
#[derive(Debug, Clone, Default)]
pub struct PeerRegistry {
    peers: HashSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one address, returning its normalized form
    ///
    /// Registering a known address is a no-op that still succeeds.
    pub fn register(&mut self, raw: &str) -> Result<String, PeerError> {
        let address = normalize_address(raw)?;
        if self.peers.insert(address.clone()) {
            log::info!("Registered peer {}", address);
        }
        Ok(address)
    }

    /// Register several addresses; invalid ones are skipped
    pub fn register_all<I, S>(&mut self, raws: I) -> Registration
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registration = Registration::default();

        for raw in raws {
            let raw = raw.as_ref();
            match self.register(raw) {
                Ok(address) => registration.added.push(address),
                Err(e) => {
                    log::warn!("Skipping peer: {}", e);
                    registration.rejected.push(raw.to_string());
                }
            }
        }

        registration
    }

    /// Known peers, sorted for stable output
    pub fn list(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.peers.iter().cloned().collect();
        peers.sort();
        peers
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
