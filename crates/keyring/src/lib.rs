#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod backend;
pub mod error;
pub mod passphrase;
pub mod record;
pub mod store;

pub use backend::Backend;
pub use error::KeyringError;
pub use passphrase::{PassphraseProvider, PromptPassphrase, StaticPassphrase};
pub use store::{Identity, KeyInfo, Keyring};
