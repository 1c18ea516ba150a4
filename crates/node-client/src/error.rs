use std::time::Duration;

/// Failures talking to the node.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {reason}")]
    Http { status: i32, reason: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("RPC returned neither result nor error")]
    EmptyResponse,
}

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Failed to set up signer for account {address}")]
    SignerSetup {
        address: String,
        #[source]
        source: TransportError,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("No blobs to submit")]
    NoBlobs,

    #[error("Failed to sign transaction")]
    Sign(#[from] signer::SignerError),

    #[error("Transaction {tx_hash} was not confirmed within {after:?}")]
    Timeout { tx_hash: String, after: Duration },

    #[error("Transport error")]
    Transport(#[from] TransportError),
}
