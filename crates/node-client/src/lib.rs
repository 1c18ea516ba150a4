#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod tx_signer;
pub mod types;

pub use client::{SubmissionState, TxClient};
pub use config::ClientConfig;
pub use error::{ClientError, SubmitError, TransportError};
pub use transport::{HttpTransport, NodeTransport};
pub use tx_signer::TxSigner;
pub use types::{AccountInfo, BroadcastResponse, TxResponse};
