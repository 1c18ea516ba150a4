use serde::{Deserialize, Serialize};

/// Account state and chain metadata needed to sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
    pub chain_id: String,
}

/// Mempool admission result for a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub tx_hash: String,
    pub code: u32,
    pub codespace: String,
    pub raw_log: String,
}

/// Final outcome of a submitted transaction.
///
/// A non-zero `code` is a rejection by the node, qualified by `codespace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    pub height: u64,
    pub tx_hash: String,
    pub code: u32,
    pub codespace: String,
    pub raw_log: String,
    pub gas_wanted: u64,
    pub gas_used: u64,
}

impl TxResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == 0
    }
}

impl From<BroadcastResponse> for TxResponse {
    fn from(response: BroadcastResponse) -> Self {
        Self {
            height: 0,
            tx_hash: response.tx_hash,
            code: response.code,
            codespace: response.codespace,
            raw_log: response.raw_log,
            gas_wanted: 0,
            gas_used: 0,
        }
    }
}
