//! On-disk key record format.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use signer::Signer;

use crate::backend::Backend;
use crate::error::KeyringError;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KeyRecord {
    Plain {
        name: String,
        address: String,
        secret_key: String,
    },
    Encrypted {
        name: String,
        address: String,
        salt: String,
        nonce: String,
        ciphertext: String,
    },
}

impl KeyRecord {
    #[must_use]
    pub fn plain(name: &str, signer: &Signer) -> Self {
        Self::Plain {
            name: name.to_string(),
            address: signer.address().to_string(),
            secret_key: hex::encode(signer.secret_bytes()),
        }
    }

    pub fn seal(name: &str, signer: &Signer, passphrase: &str) -> Result<Self, KeyringError> {
        let salt: [u8; SALT_LEN] = rand::random();
        let nonce: [u8; NONCE_LEN] = rand::random();

        let cipher = cipher(passphrase, &salt)?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), signer.secret_bytes().as_slice())
            .map_err(|_| KeyringError::Encrypt(name.to_string()))?;

        Ok(Self::Encrypted {
            name: name.to_string(),
            address: signer.address().to_string(),
            salt: hex::encode(salt),
            nonce: hex::encode(nonce),
            ciphertext: hex::encode(ciphertext),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Plain { name, .. } | Self::Encrypted { name, .. } => name,
        }
    }

    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::Plain { address, .. } | Self::Encrypted { address, .. } => address,
        }
    }

    #[must_use]
    pub const fn backend(&self) -> Backend {
        match self {
            Self::Plain { .. } => Backend::Test,
            Self::Encrypted { .. } => Backend::File,
        }
    }

    /// Recover the signer. `passphrase` is only consulted for encrypted records.
    pub fn open(&self, passphrase: impl FnOnce() -> Result<String, KeyringError>) -> Result<Signer, KeyringError> {
        match self {
            Self::Plain { secret_key, .. } => Ok(Signer::from_secret(&hex::decode(secret_key)?)?),
            Self::Encrypted {
                name,
                salt,
                nonce,
                ciphertext,
                ..
            } => {
                let salt = hex::decode(salt)?;
                let nonce = hex::decode(nonce)?;
                let ciphertext = hex::decode(ciphertext)?;

                if nonce.len() != NONCE_LEN {
                    return Err(KeyringError::Decrypt(name.clone()));
                }

                let cipher = cipher(&passphrase()?, &salt)?;
                let secret = cipher
                    .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
                    .map_err(|_| KeyringError::Decrypt(name.clone()))?;

                Ok(Signer::from_secret(&secret)?)
            }
        }
    }
}

fn cipher(passphrase: &str, salt: &[u8]) -> Result<Aes256Gcm, KeyringError> {
    let mut key = [0u8; KEY_LEN];

    Argon2::default()
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| KeyringError::Kdf(e.to_string()))?;

    Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_record_opens_without_passphrase() {
        let signer = Signer::generate();
        let record = KeyRecord::plain("alice", &signer);

        let opened = record
            .open(|| panic!("plain records must not ask for a passphrase"))
            .unwrap();

        assert_eq!(opened.address(), signer.address());
        assert_eq!(record.backend(), Backend::Test);
        assert_eq!(record.address(), signer.address().to_string());
    }

    #[test]
    fn test_sealed_record() {
        let signer = Signer::generate();
        let record = KeyRecord::seal("bob", &signer, "correct horse").unwrap();

        assert_eq!(record.name(), "bob");
        assert_eq!(record.backend(), Backend::File);

        let opened = record.open(|| Ok("correct horse".to_string())).unwrap();
        assert_eq!(opened.address(), signer.address());

        let result = record.open(|| Ok("battery staple".to_string()));
        assert!(matches!(result, Err(KeyringError::Decrypt(name)) if name == "bob"));
    }

    #[test]
    fn test_record_json_shape() {
        let signer = Signer::generate();
        let json = serde_json::to_value(KeyRecord::plain("alice", &signer)).unwrap();

        assert_eq!(json["type"], "plain");
        assert_eq!(json["name"], "alice");
        assert_eq!(json["secret_key"].as_str().unwrap().len(), 64);
    }
}
