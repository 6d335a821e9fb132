//! Node assembly
//!
//! Owns the shared chain, the peer registry and the consensus resolver, and
//! serves them over the HTTP API.

use crate::api::{create_router, ApiState};
use crate::core::Blockchain;
use crate::mining::DEFAULT_DIFFICULTY;
use crate::network::consensus::{
    ChainFetcher, Consensus, ConsensusError, HttpChainFetcher, DEFAULT_PEER_TIMEOUT,
};
use crate::network::peer::PeerRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

/// Node errors
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Consensus setup failed: {0}")]
    Consensus(#[from] ConsensusError),
}

/// Node configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Interface to bind the API to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Leading zero hex characters required by proof of work
    pub difficulty: usize,
    /// Peers registered at startup
    pub bootstrap_peers: Vec<String>,
    /// Time allowed for each peer chain fetch
    pub peer_timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            difficulty: DEFAULT_DIFFICULTY,
            bootstrap_peers: Vec::new(),
            peer_timeout: DEFAULT_PEER_TIMEOUT,
        }
    }
}

impl NodeConfig {
    /// Address the API binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Generate a random node identity (32 lowercase hex characters)
pub fn generate_node_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

/// A running ledger node
pub struct Node {
    pub config: NodeConfig,
    pub node_id: String,
    pub blockchain: Arc<RwLock<Blockchain>>,
    pub peers: Arc<RwLock<PeerRegistry>>,
    pub consensus: Arc<Consensus>,
}

impl Node {
    /// Create a node that fetches peer chains over HTTP
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let fetcher = HttpChainFetcher::new(config.peer_timeout)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a node with a custom chain transport
    pub fn with_fetcher(config: NodeConfig, fetcher: Arc<dyn ChainFetcher>) -> Self {
        let node_id = generate_node_id();

        let mut registry = PeerRegistry::new();
        let registration = registry.register_all(&config.bootstrap_peers);
        if !registration.rejected.is_empty() {
            log::warn!(
                "Ignored {} invalid bootstrap peers: {:?}",
                registration.rejected.len(),
                registration.rejected
            );
        }

        let blockchain = Arc::new(RwLock::new(Blockchain::with_difficulty(config.difficulty)));
        let peers = Arc::new(RwLock::new(registry));
        let consensus = Arc::new(Consensus::new(blockchain.clone(), peers.clone(), fetcher));

        Self {
            config,
            node_id,
            blockchain,
            peers,
            consensus,
        }
    }

    /// Shared state handed to the API handlers
    pub fn api_state(&self) -> ApiState {
        ApiState {
            node_id: self.node_id.clone(),
            blockchain: self.blockchain.clone(),
            peers: self.peers.clone(),
            consensus: self.consensus.clone(),
        }
    }

    /// Bind to the configured address and serve until the process exits
    pub async fn start(self) -> Result<(), NodeError> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        self.serve(listener).await
    }

    /// Serve the API on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<(), NodeError> {
        let addr: SocketAddr = listener.local_addr()?;
        log::info!(
            "Node {} listening on http://{} (difficulty {}, {} peers)",
            self.node_id,
            addr,
            self.config.difficulty,
            self.peers.read().await.len()
        );

        let app = create_router(self.api_state());
        axum::serve(listener, app).await?;
        Ok(())
    }
}
