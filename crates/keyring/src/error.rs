use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum KeyringError {
    #[error("Cannot access key store {path}: {reason}")]
    StoreAccess { path: PathBuf, reason: String },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Key already exists: {0}")]
    KeyExists(String),

    #[error("Invalid key name: '{0}'")]
    InvalidKeyName(String),

    #[error("Unknown keyring backend: '{0}'")]
    UnknownBackend(String),

    #[error("Key record '{0}' was written by a different backend")]
    BackendMismatch(String),

    #[error("Failed to decrypt key '{0}': wrong passphrase or corrupted record")]
    Decrypt(String),

    #[error("Failed to encrypt key '{0}'")]
    Encrypt(String),

    #[error("Key derivation failed: {0}")]
    Kdf(String),

    #[error("Failed to read passphrase")]
    Passphrase(#[source] std::io::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Malformed key record")]
    Record(#[from] serde_json::Error),

    #[error("Malformed hex in key record")]
    Hex(#[from] hex::FromHexError),

    #[error("Signer error")]
    Signer(#[from] signer::SignerError),
}
