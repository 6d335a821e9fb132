//! REST API handlers for ledger operations

use crate::core::{validate_chain, Block, Blockchain, BlockchainError, Transaction};
use crate::mining::Miner;
use crate::network::{ChainResponse, Consensus, PeerRegistry};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub node_id: String,
    pub blockchain: Arc<RwLock<Blockchain>>,
    pub peers: Arc<RwLock<PeerRegistry>>,
    pub consensus: Arc<Consensus>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCreatedResponse {
    pub message: String,
    pub transaction: Transaction,
    pub block_index: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: usize,
    pub added_nodes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected_nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ConsensusResponse {
    pub message: String,
    pub length: usize,
    pub chain: Vec<Block>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingResponse {
    pub pending_transactions: usize,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub valid: bool,
    pub blocks_checked: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

fn api_error(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            error: error.into(),
        }),
    )
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct CreateTransactionRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: i64,
}

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub urls: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /mine - Mine a new block from the pending pool
pub async fn mine_block(State(state): State<ApiState>) -> ApiResult<Json<MineResponse>> {
    let blockchain = state.blockchain.clone();
    let miner = Miner::new(&state.node_id);

    // The write guard is held for the whole search so mining, submissions and
    // chain replacement never interleave.
    let (block, _stats) = tokio::task::spawn_blocking(move || {
        let mut chain = blockchain.blocking_write();
        miner.mine_block(&mut chain)
    })
    .await
    .map_err(|e| {
        log::error!("Mining task failed: {}", e);
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Mining failed: {}", e),
        )
    })?;

    Ok(Json(MineResponse {
        message: "New block forged".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}

/// GET /chain - Full chain and its length
pub async fn get_chain(State(state): State<ApiState>) -> Json<ChainResponse> {
    let chain = state.blockchain.read().await;
    Json(ChainResponse::new(chain.snapshot()))
}

/// GET /chain/validate - Validate the local chain
pub async fn validate_local_chain(State(state): State<ApiState>) -> Json<ValidationResponse> {
    let chain = state.blockchain.read().await;
    let result = validate_chain(chain.blocks(), &chain.proof_of_work());
    let blocks_checked = chain.length();

    Json(ValidationResponse {
        valid: result.is_ok(),
        blocks_checked,
        message: match result {
            Ok(()) => format!("Chain is valid ({} blocks verified)", blocks_checked),
            Err(e) => format!("Chain validation failed: {}", e),
        },
    })
}

/// POST /transactions/create - Queue a transaction for the next block
pub async fn create_transaction(
    State(state): State<ApiState>,
    Json(req): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionCreatedResponse>)> {
    let mut chain = state.blockchain.write().await;

    match chain.submit_transaction(&req.sender, &req.recipient, req.amount) {
        Ok(block_index) => {
            let transaction = chain
                .pending_transactions()
                .last()
                .cloned()
                .ok_or_else(|| {
                    api_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Transaction missing from pool",
                    )
                })?;

            Ok((
                StatusCode::CREATED,
                Json(TransactionCreatedResponse {
                    message: format!("Transaction will be added to Block {}", block_index),
                    transaction,
                    block_index,
                }),
            ))
        }
        Err(e @ BlockchainError::InvalidTransaction(_)) => {
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

/// GET /transactions/pending - Transactions waiting for the next block
pub async fn get_pending(State(state): State<ApiState>) -> Json<PendingResponse> {
    let chain = state.blockchain.read().await;
    let transactions = chain.pending_transactions().to_vec();

    Json(PendingResponse {
        pending_transactions: transactions.len(),
        transactions,
    })
}

/// POST /nodes/register - Register peer nodes
pub async fn register_nodes(
    State(state): State<ApiState>,
    Json(req): Json<RegisterNodesRequest>,
) -> ApiResult<(StatusCode, Json<RegisterNodesResponse>)> {
    if req.urls.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Please supply a valid list of nodes",
        ));
    }

    let mut peers = state.peers.write().await;
    let registration = peers.register_all(&req.urls);

    if registration.added.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("No valid node addresses in {:?}", registration.rejected),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterNodesResponse {
            message: "New nodes have been added".to_string(),
            total_nodes: peers.len(),
            added_nodes: registration.added,
            rejected_nodes: registration.rejected,
        }),
    ))
}

/// GET /nodes - List registered peers
pub async fn list_nodes(State(state): State<ApiState>) -> Json<NodesResponse> {
    let peers = state.peers.read().await;
    let nodes = peers.list();

    Json(NodesResponse {
        total: nodes.len(),
        nodes,
    })
}

/// GET /nodes/consensus - Reconcile with peers
pub async fn resolve_conflicts(State(state): State<ApiState>) -> Json<ConsensusResponse> {
    let outcome = state.consensus.resolve().await;

    let message = if outcome.replaced {
        "chain was replaced"
    } else {
        "chain is authoritative"
    };

    Json(ConsensusResponse {
        message: message.to_string(),
        length: outcome.chain.len(),
        chain: outcome.chain,
    })
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{ChainFetcher, ConsensusError};
    use async_trait::async_trait;

    struct NoPeers;

    #[async_trait]
    impl ChainFetcher for NoPeers {
        async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, ConsensusError> {
            Err(ConsensusError::PeerUnreachable {
                peer: peer.to_string(),
                reason: "offline".to_string(),
            })
        }
    }

    fn test_state() -> ApiState {
        let blockchain = Arc::new(RwLock::new(Blockchain::with_difficulty(1)));
        let peers = Arc::new(RwLock::new(PeerRegistry::new()));
        let consensus = Arc::new(Consensus::new(
            blockchain.clone(),
            peers.clone(),
            Arc::new(NoPeers),
        ));

        ApiState {
            node_id: "test-node".to_string(),
            blockchain,
            peers,
            consensus,
        }
    }

    fn tx_request(sender: &str, recipient: &str, amount: i64) -> CreateTransactionRequest {
        CreateTransactionRequest {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
        }
    }

    #[tokio::test]
    async fn test_transaction_then_mine() {
        let state = test_state();

        let (status, Json(created)) = create_transaction(
            State(state.clone()),
            Json(tx_request("Alice", "Bob", 50)),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.block_index, 1);
        assert_eq!(created.message, "Transaction will be added to Block 1");

        let Json(mined) = mine_block(State(state.clone())).await.unwrap();
        assert_eq!(mined.index, 1);
        assert_eq!(mined.transactions.len(), 2);
        assert_eq!(mined.transactions[0].sender, "Alice");
        assert_eq!(mined.transactions[1].recipient, "test-node");

        let Json(pending) = get_pending(State(state.clone())).await;
        assert_eq!(pending.pending_transactions, 0);

        let Json(chain) = get_chain(State(state)).await;
        assert_eq!(chain.length, 2);
    }

    #[tokio::test]
    async fn test_invalid_transaction_is_bad_request() {
        let state = test_state();

        let (status, Json(err)) =
            create_transaction(State(state.clone()), Json(tx_request("Alice", "Bob", -1)))
                .await
                .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err.error.contains("Amount must be positive"));
        assert!(state.blockchain.read().await.pending_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_register_nodes() {
        let state = test_state();
        let req = RegisterNodesRequest {
            urls: vec!["localhost:5001".to_string(), "localhost:5002".to_string()],
        };

        let (status, Json(registered)) = register_nodes(State(state.clone()), Json(req))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(registered.total_nodes, 2);
        assert_eq!(
            registered.added_nodes,
            vec!["http://localhost:5001", "http://localhost:5002"]
        );

        let Json(nodes) = list_nodes(State(state)).await;
        assert_eq!(nodes.total, 2);
    }

    #[tokio::test]
    async fn test_register_requires_urls() {
        let state = test_state();

        let empty = RegisterNodesRequest { urls: Vec::new() };
        let (status, _) = register_nodes(State(state.clone()), Json(empty))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let garbage = RegisterNodesRequest {
            urls: vec!["not a url".to_string()],
        };
        let (status, _) = register_nodes(State(state), Json(garbage))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_consensus_with_unreachable_peer_is_authoritative() {
        let state = test_state();
        state.peers.write().await.register("localhost:5999").unwrap();

        let Json(response) = resolve_conflicts(State(state)).await;

        assert_eq!(response.message, "chain is authoritative");
        assert_eq!(response.length, 1);
        assert_eq!(response.chain.len(), 1);
    }

    #[tokio::test]
    async fn test_health_and_validate() {
        let state = test_state();

        let Json(health) = health_check(State(state.clone())).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.node_id, "test-node");

        let Json(validation) = validate_local_chain(State(state)).await;
        assert!(validation.valid);
        assert_eq!(validation.blocks_checked, 1);
    }
}
