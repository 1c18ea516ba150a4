#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod tx;

use std::fmt;
use std::str::FromStr;

use secp256k1::ecdsa::Signature;
use secp256k1::{Keypair, Message, PublicKey, SECP256K1, SecretKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use tx::{BlobTx, Coin, FEE_DENOM, Fee, MsgPayForBlobs, SignDoc, SignedTx, TxOptions};

#[derive(thiserror::Error, Debug)]
pub enum SignerError {
    #[error("Invalid secret length: expected 32 bytes, got {0}")]
    InvalidSecretLength(usize),

    #[error("Invalid secret key")]
    InvalidSecretKey(#[from] secp256k1::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Blob of {0} bytes exceeds the maximum size")]
    BlobTooLarge(usize),

    #[error("Failed to encode transaction")]
    Encode(#[from] bincode::error::EncodeError),
}

/// Account address derived from a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address([u8; Address::LEN]);

impl Address {
    pub const LEN: usize = 20;

    #[must_use]
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let digest = Sha256::digest(public_key.serialize());

        let mut bytes = [0u8; Self::LEN];
        bytes.copy_from_slice(&digest[..Self::LEN]);

        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| SignerError::InvalidAddress(e.to_string()))?;

        let bytes: [u8; Self::LEN] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| SignerError::InvalidAddress(format!("expected {} bytes, got {}", Self::LEN, b.len())))?;

        Ok(Self(bytes))
    }
}

#[derive(Clone)]
pub struct Signer {
    keypair: Keypair,
}

impl Signer {
    pub const SECRET_LEN: usize = secp256k1::constants::SECRET_KEY_SIZE;

    pub fn from_secret(secret: &[u8]) -> Result<Self, SignerError> {
        if secret.len() != Self::SECRET_LEN {
            return Err(SignerError::InvalidSecretLength(secret.len()));
        }

        let secret_key = SecretKey::from_slice(secret)?;

        let keypair = Keypair::from_secret_key(SECP256K1, &secret_key);

        Ok(Self { keypair })
    }

    #[must_use]
    pub fn generate() -> Self {
        let (secret_key, _) = SECP256K1.generate_keypair(&mut secp256k1::rand::thread_rng());

        Self {
            keypair: Keypair::from_secret_key(SECP256K1, &secret_key),
        }
    }

    #[must_use]
    pub fn secret_bytes(&self) -> [u8; Self::SECRET_LEN] {
        self.keypair.secret_bytes()
    }

    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    #[must_use]
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key())
    }

    /// Sign the sha256 digest of `payload`.
    #[must_use]
    pub fn sign(&self, payload: &[u8]) -> Signature {
        let digest: [u8; 32] = Sha256::digest(payload).into();

        SECP256K1.sign_ecdsa(&Message::from_digest(digest), &self.keypair.secret_key())
    }

    pub fn verify(public_key: &PublicKey, payload: &[u8], signature: &Signature) -> bool {
        let digest: [u8; 32] = Sha256::digest(payload).into();

        SECP256K1
            .verify_ecdsa(&Message::from_digest(digest), signature, public_key)
            .is_ok()
    }

    pub fn print_details(&self) {
        println!("Public Key: {}", self.public_key());
        println!("Address: {}", self.address());
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").field("address", &self.address()).finish_non_exhaustive()
    }
}
