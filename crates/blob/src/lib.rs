#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod blob;
pub mod error;
pub mod gas;
pub mod namespace;

pub use blob::{Blob, ShareVersion};
pub use error::BlobError;
pub use gas::{DEFAULT_GAS_PER_BLOB_BYTE, PFB_GAS_FIXED_COST, estimate_gas, shares_needed};
pub use namespace::Namespace;
