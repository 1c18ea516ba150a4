//! Request/response channel to the consensus node.

mod http;

use async_trait::async_trait;
use signer::Address;

use crate::error::TransportError;
use crate::types::{AccountInfo, BroadcastResponse, TxResponse};

pub use http::HttpTransport;

#[async_trait]
pub trait NodeTransport: Send + Sync {
    /// Current account number and sequence of `address`, plus the chain id.
    async fn query_account(&self, address: &Address) -> Result<AccountInfo, TransportError>;

    /// Hand signed transaction bytes to the node's mempool.
    async fn broadcast_tx(&self, tx_bytes: &[u8]) -> Result<BroadcastResponse, TransportError>;

    /// Look up a committed transaction. `None` while it is not yet in a block.
    async fn get_tx(&self, tx_hash: &str) -> Result<Option<TxResponse>, TransportError>;
}
