//! Peer consensus
//!
//! Fetches every known peer's chain and adopts the longest one that is both
//! strictly longer than the local chain and valid. Peers are trusted to be
//! honest; any valid longer chain wins.

use crate::core::{is_valid_chain, Block, Blockchain};
use crate::mining::ProofOfWork;
use crate::network::peer::PeerRegistry;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Default time allowed for a single peer fetch
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Consensus errors
#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error("Peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },
    #[error("Malformed response from peer {peer}: {reason}")]
    MalformedPeerResponse { peer: String, reason: String },
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Body of `GET /chain`, served locally and fetched from peers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl ChainResponse {
    pub fn new(chain: Vec<Block>) -> Self {
        let length = chain.len();
        Self { chain, length }
    }
}

/// Transport used to obtain a peer's chain
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    /// Fetch the full chain held by `peer`
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, ConsensusError>;
}

/// Fetches peer chains over HTTP from `{peer}/chain`
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ConsensusError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pow-ledger-node/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, ConsensusError> {
        let url = format!("{}/chain", peer.trim_end_matches('/'));
        log::debug!("Fetching chain from {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            ConsensusError::PeerUnreachable {
                peer: peer.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConsensusError::PeerUnreachable {
                peer: peer.to_string(),
                reason: format!("status {}", status),
            });
        }

        let body: ChainResponse =
            response
                .json()
                .await
                .map_err(|e| ConsensusError::MalformedPeerResponse {
                    peer: peer.to_string(),
                    reason: e.to_string(),
                })?;

        if body.length != body.chain.len() {
            return Err(ConsensusError::MalformedPeerResponse {
                peer: peer.to_string(),
                reason: format!(
                    "reported length {} but sent {} blocks",
                    body.length,
                    body.chain.len()
                ),
            });
        }

        Ok(body.chain)
    }
}

/// Result of a consensus round
#[derive(Debug, Clone)]
pub struct ConsensusOutcome {
    /// Whether the local chain was replaced
    pub replaced: bool,
    /// The local chain after the round
    pub chain: Vec<Block>,
}

/// Pick the longest valid candidate strictly longer than `local_length`
///
/// Candidates are considered in order; a later one only wins if it is strictly
/// longer than the best so far, so ties keep the earlier candidate.
pub fn select_longest_valid<I>(
    local_length: usize,
    candidates: I,
    pow: &ProofOfWork,
) -> Option<(String, Vec<Block>)>
where
    I: IntoIterator<Item = (String, Vec<Block>)>,
{
    let mut best_length = local_length;
    let mut best = None;

    for (peer, chain) in candidates {
        if chain.len() <= best_length {
            continue;
        }
        if !is_valid_chain(&chain, pow) {
            log::warn!(
                "Ignoring invalid chain of length {} from {}",
                chain.len(),
                peer
            );
            continue;
        }

        best_length = chain.len();
        best = Some((peer, chain));
    }

    best
}

/// Resolves conflicts between the local chain and peer chains
pub struct Consensus {
    blockchain: Arc<RwLock<Blockchain>>,
    peers: Arc<RwLock<PeerRegistry>>,
    fetcher: Arc<dyn ChainFetcher>,
}

impl Consensus {
    pub fn new(
        blockchain: Arc<RwLock<Blockchain>>,
        peers: Arc<RwLock<PeerRegistry>>,
        fetcher: Arc<dyn ChainFetcher>,
    ) -> Self {
        Self {
            blockchain,
            peers,
            fetcher,
        }
    }

    /// Run one consensus round against every registered peer
    ///
    /// Fetches run concurrently; the decision is taken over the results in
    /// peer order once all fetches have finished. No lock is held while
    /// waiting on peers.
    pub async fn resolve(&self) -> ConsensusOutcome {
        let peers = self.peers.read().await.list();
        let (local_length, pow) = {
            let chain = self.blockchain.read().await;
            (chain.length(), chain.proof_of_work())
        };

        log::info!(
            "Running consensus against {} peers (local length {})",
            peers.len(),
            local_length
        );

        let fetches = peers.iter().map(|peer| async move {
            (peer.clone(), self.fetcher.fetch_chain(peer).await)
        });
        let results = join_all(fetches).await;

        let candidates = results
            .into_iter()
            .filter_map(|(peer, result)| match result {
                Ok(chain) => Some((peer, chain)),
                Err(e) => {
                    log::warn!("Skipping peer during consensus: {}", e);
                    None
                }
            });

        // Validation happens here, outside the write lock
        let best = select_longest_valid(local_length, candidates, &pow);

        let mut chain = self.blockchain.write().await;
        if let Some((peer, candidate)) = best {
            // The local chain may have grown while peers were being fetched
            if candidate.len() > chain.length() {
                let length = candidate.len();
                chain.adopt_validated(candidate);
                log::info!("Chain replaced by {} (new length {})", peer, length);
                return ConsensusOutcome {
                    replaced: true,
                    chain: chain.snapshot(),
                };
            } else {
                log::info!(
                    "Local chain grew to {} during consensus, keeping it",
                    chain.length()
                );
            }
        }

        ConsensusOutcome {
            replaced: false,
            chain: chain.snapshot(),
        }
    }
}
