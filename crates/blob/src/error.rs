#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    #[error("Unsupported namespace version: {0}")]
    UnsupportedVersion(u8),

    #[error("Namespace id too long: expected at most {max} bytes, got {got}")]
    IdTooLong { max: usize, got: usize },

    #[error("Invalid namespace length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Version 0 namespace id must start with {0} zero bytes")]
    InvalidPrefix(usize),

    #[error("Namespace {0} is reserved")]
    ReservedNamespace(String),

    #[error("Blob data is empty")]
    EmptyData,
}
