use crate::config::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::KeyringError),

    #[error("Blob error: {0}")]
    Blob(#[from] blob::BlobError),

    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Client error: {0}")]
    Client(#[from] node_client::ClientError),

    #[error("Submit error: {0}")]
    Submit(#[from] node_client::SubmitError),
}
