//! REST API module
//!
//! HTTP surface of a ledger node. Peers also use `GET /chain` during consensus.
//!
//! # Endpoints
//!
//! ## Chain
//! - `GET /chain` - Full chain and length
//! - `GET /chain/validate` - Validate the local chain
//!
//! ## Mining
//! - `POST /mine` - Mine a new block from the pending pool
//!
//! ## Transactions
//! - `POST /transactions/create` - Queue a transaction
//! - `GET /transactions/pending` - List pending transactions
//!
//! ## Peers
//! - `GET /nodes` - List registered peers
//! - `POST /nodes/register` - Register peers
//! - `GET /nodes/consensus` - Adopt the longest valid peer chain
//!
//! ## Health
//! - `GET /health` - Status and node identity

pub mod handlers;
pub mod routes;

pub use handlers::ApiState;
pub use routes::create_router;
