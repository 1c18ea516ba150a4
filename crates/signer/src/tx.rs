//! Pay-for-blob transaction model and signing.

use blob::{Blob, Namespace};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, Signer, SignerError};

/// Denomination fees are paid in.
pub const FEE_DENOM: &str = "utia";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas_limit: u64,
}

impl Fee {
    /// Fee of `ceil(gas_limit * gas_price)` in [`FEE_DENOM`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn from_gas_price(gas_limit: u64, gas_price: f64) -> Self {
        let amount = (gas_limit as f64 * gas_price).ceil().max(0.0) as u64;

        Self {
            amount: vec![Coin {
                denom: FEE_DENOM.to_string(),
                amount,
            }],
            gas_limit,
        }
    }
}

/// Per-transaction options.
#[derive(Debug, Clone, PartialEq)]
pub struct TxOptions {
    gas_limit: Option<u64>,
    gas_price: f64,
    memo: String,
}

impl TxOptions {
    pub const DEFAULT_GAS_PRICE: f64 = 0.1;

    #[must_use]
    pub fn new() -> Self {
        Self {
            gas_limit: None,
            gas_price: Self::DEFAULT_GAS_PRICE,
            memo: String::new(),
        }
    }

    #[must_use]
    pub const fn with_gas_limit_and_price(mut self, gas_limit: u64, gas_price: f64) -> Self {
        self.gas_limit = Some(gas_limit);
        self.gas_price = gas_price;
        self
    }

    #[must_use]
    pub const fn with_gas_price(mut self, gas_price: f64) -> Self {
        self.gas_price = gas_price;
        self
    }

    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    #[must_use]
    pub const fn gas_limit(&self) -> Option<u64> {
        self.gas_limit
    }

    #[must_use]
    pub const fn gas_price(&self) -> f64 {
        self.gas_price
    }

    #[must_use]
    pub fn memo(&self) -> &str {
        &self.memo
    }
}

impl Default for TxOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Message paying for the inclusion of one or more blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgPayForBlobs {
    pub signer: Address,
    pub namespaces: Vec<Namespace>,
    pub blob_sizes: Vec<u32>,
    pub share_commitments: Vec<[u8; 32]>,
    pub share_versions: Vec<u8>,
}

impl MsgPayForBlobs {
    pub fn new(signer: Address, blobs: &[Blob]) -> Result<Self, SignerError> {
        let mut blob_sizes = Vec::with_capacity(blobs.len());
        for blob in blobs {
            let size = u32::try_from(blob.len()).map_err(|_| SignerError::BlobTooLarge(blob.len()))?;
            blob_sizes.push(size);
        }

        Ok(Self {
            signer,
            namespaces: blobs.iter().map(|b| *b.namespace()).collect(),
            blob_sizes,
            share_commitments: blobs.iter().map(share_commitment).collect(),
            share_versions: blobs.iter().map(|b| b.share_version().as_u8()).collect(),
        })
    }
}

/// Commitment binding a message to the blob it pays for.
fn share_commitment(blob: &Blob) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(blob.namespace().to_bytes());
    hasher.update([blob.share_version().as_u8()]);
    hasher.update(blob.data());
    hasher.finalize().into()
}

/// Everything the signature covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignDoc {
    pub chain_id: String,
    pub account_number: u64,
    pub sequence: u64,
    pub fee: Fee,
    pub memo: String,
    pub msg: MsgPayForBlobs,
}

impl SignDoc {
    pub fn to_bytes(&self) -> Result<Vec<u8>, SignerError> {
        Ok(bincode::serde::encode_to_vec(self, bincode::config::standard())?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTx {
    pub doc: SignDoc,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

impl SignedTx {
    pub fn sign(doc: SignDoc, signer: &Signer) -> Result<Self, SignerError> {
        let signature = signer.sign(&doc.to_bytes()?);

        Ok(Self {
            doc,
            public_key: signer.public_key().serialize().to_vec(),
            signature: signature.serialize_compact().to_vec(),
        })
    }
}

/// Signed transaction bundled with the blobs it pays for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobTx {
    pub tx: SignedTx,
    pub blobs: Vec<Blob>,
}

impl BlobTx {
    pub fn to_bytes(&self) -> Result<Vec<u8>, SignerError> {
        Ok(bincode::serde::encode_to_vec(self, bincode::config::standard())?)
    }

    /// Upper-case hex sha256 of the encoded transaction, the form nodes index it by.
    #[must_use]
    pub fn hash(bytes: &[u8]) -> String {
        hex::encode_upper(Sha256::digest(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use blob::ShareVersion;
    use secp256k1::PublicKey;
    use secp256k1::ecdsa::Signature;

    /// Check the signature against the embedded public key.
    fn verify(tx: &SignedTx) -> bool {
        let Ok(public_key) = PublicKey::from_slice(&tx.public_key) else {
            return false;
        };
        let Ok(signature) = Signature::from_compact(&tx.signature) else {
            return false;
        };

        Signer::verify(&public_key, &tx.doc.to_bytes().unwrap(), &signature)
    }

    fn test_blob(data: &str) -> Blob {
        Blob::new(Namespace::new_v0(b"1234567890").unwrap(), data, ShareVersion::Zero).unwrap()
    }

    fn test_doc(signer: &Signer, blobs: &[Blob]) -> SignDoc {
        SignDoc {
            chain_id: "private".to_string(),
            account_number: 7,
            sequence: 3,
            fee: Fee::from_gas_price(80_000, 0.1),
            memo: String::new(),
            msg: MsgPayForBlobs::new(signer.address(), blobs).unwrap(),
        }
    }

    #[test]
    fn test_fee_rounds_up() {
        let fee = Fee::from_gas_price(79_796, 0.1);

        assert_eq!(fee.gas_limit, 79_796);
        assert_eq!(fee.amount[0].denom, FEE_DENOM);
        assert_eq!(fee.amount[0].amount, 7_980);
    }

    #[test]
    fn test_default_options() {
        let options = TxOptions::default();

        assert_eq!(options.gas_limit(), None);
        assert!((options.gas_price() - TxOptions::DEFAULT_GAS_PRICE).abs() < f64::EPSILON);
        assert!(options.memo().is_empty());

        let options = options.with_gas_limit_and_price(100, 0.2).with_memo("hello");
        assert_eq!(options.gas_limit(), Some(100));
        assert_eq!(options.memo(), "hello");
    }

    #[test]
    fn test_msg_describes_blobs() {
        let signer = Signer::generate();
        let blobs = [test_blob("some data"), test_blob("more data here")];

        let msg = MsgPayForBlobs::new(signer.address(), &blobs).unwrap();

        assert_eq!(msg.signer, signer.address());
        assert_eq!(msg.blob_sizes, vec![9, 14]);
        assert_eq!(msg.share_versions, vec![0, 0]);
        assert_ne!(msg.share_commitments[0], msg.share_commitments[1]);
    }

    #[test]
    fn test_signed_tx_verifies() {
        let signer = Signer::generate();
        let blobs = [test_blob("some data")];

        let tx = SignedTx::sign(test_doc(&signer, &blobs), &signer).unwrap();
        assert!(verify(&tx));

        let mut tampered = tx.clone();
        tampered.doc.sequence += 1;
        assert!(!verify(&tampered));
    }

    #[test]
    fn test_blob_tx_hash_is_stable() {
        let signer = Signer::generate();
        let blobs = vec![test_blob("some data")];
        let tx = SignedTx::sign(test_doc(&signer, &blobs), &signer).unwrap();

        let bytes = BlobTx { tx, blobs }.to_bytes().unwrap();

        assert_eq!(BlobTx::hash(&bytes), BlobTx::hash(&bytes));
        assert_eq!(BlobTx::hash(&bytes).len(), 64);
    }
}
