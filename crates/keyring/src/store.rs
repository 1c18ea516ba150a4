use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use signer::{Address, Signer};
use tracing::instrument;

use crate::backend::Backend;
use crate::error::KeyringError;
use crate::passphrase::PassphraseProvider;
use crate::record::KeyRecord;

const RECORD_EXTENSION: &str = "json";

/// A named signing identity loaded from the keyring.
#[derive(Debug, Clone)]
pub struct Identity {
    name: String,
    signer: Signer,
}

impl Identity {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    #[must_use]
    pub const fn signer(&self) -> &Signer {
        &self.signer
    }

    #[must_use]
    pub fn into_signer(self) -> Signer {
        self.signer
    }
}

/// Public part of a stored key, readable without a passphrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub name: String,
    pub address: String,
}

pub struct Keyring {
    dir: PathBuf,
    backend: Backend,
    passphrase: Arc<dyn PassphraseProvider>,
}

impl Keyring {
    /// Open the keyring kept under `store_path`.
    ///
    /// The store directory must already exist; the backend directory inside it
    /// is created on the first write.
    #[instrument(skip(passphrase), level = "debug", err)]
    pub fn open(
        store_path: impl AsRef<Path> + std::fmt::Debug,
        backend: Backend,
        passphrase: Arc<dyn PassphraseProvider>,
    ) -> Result<Self, KeyringError> {
        let store_path = store_path.as_ref();

        let metadata = fs::metadata(store_path).map_err(|e| KeyringError::StoreAccess {
            path: store_path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !metadata.is_dir() {
            return Err(KeyringError::StoreAccess {
                path: store_path.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let dir = store_path.join(backend.dir_name());
        if dir.exists() && !dir.is_dir() {
            return Err(KeyringError::StoreAccess {
                path: dir,
                reason: "not a directory".to_string(),
            });
        }

        tracing::debug!(dir = %dir.display(), %backend, "Opened keyring");

        Ok(Self {
            dir,
            backend,
            passphrase,
        })
    }

    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Look up an identity by name.
    #[instrument(skip(self), level = "debug", err)]
    pub fn key(&self, name: &str) -> Result<Identity, KeyringError> {
        let record = self.read_record(name)?;

        if record.backend() != self.backend {
            return Err(KeyringError::BackendMismatch(name.to_string()));
        }

        let signer = record.open(|| {
            self.passphrase
                .passphrase(&format!("Enter passphrase for key '{name}': "))
                .map_err(KeyringError::Passphrase)
        })?;

        Ok(Identity {
            name: name.to_string(),
            signer,
        })
    }

    /// Generate a new key and store it under `name`.
    #[instrument(skip(self), level = "debug", err)]
    pub fn add(&self, name: &str) -> Result<Identity, KeyringError> {
        self.store(name, Signer::generate())
    }

    /// Store an existing 32-byte secret under `name`.
    #[instrument(skip(self, secret), level = "debug", err)]
    pub fn import(&self, name: &str, secret: &[u8]) -> Result<Identity, KeyringError> {
        self.store(name, Signer::from_secret(secret)?)
    }

    /// All keys of this backend, sorted by name.
    pub fn list(&self) -> Result<Vec<KeyInfo>, KeyringError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }

            let record: KeyRecord = serde_json::from_str(&fs::read_to_string(&path)?)?;
            keys.push(KeyInfo {
                name: record.name().to_string(),
                address: record.address().to_string(),
            });
        }

        keys.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(keys)
    }

    fn store(&self, name: &str, signer: Signer) -> Result<Identity, KeyringError> {
        let path = self.record_path(name)?;
        if path.exists() {
            return Err(KeyringError::KeyExists(name.to_string()));
        }

        let record = match self.backend {
            Backend::Test => KeyRecord::plain(name, &signer),
            Backend::File => {
                let passphrase = self
                    .passphrase
                    .passphrase(&format!("Enter passphrase to encrypt key '{name}': "))
                    .map_err(KeyringError::Passphrase)?;
                KeyRecord::seal(name, &signer, &passphrase)?
            }
        };

        fs::create_dir_all(&self.dir)?;
        fs::write(&path, serde_json::to_string_pretty(&record)?)?;

        tracing::info!(name, address = %signer.address(), path = %path.display(), "Stored key");

        Ok(Identity {
            name: name.to_string(),
            signer,
        })
    }

    fn read_record(&self, name: &str) -> Result<KeyRecord, KeyringError> {
        let path = self.record_path(name)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(KeyringError::KeyNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }

    fn record_path(&self, name: &str) -> Result<PathBuf, KeyringError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if !valid {
            return Err(KeyringError::InvalidKeyName(name.to_string()));
        }

        Ok(self.dir.join(format!("{name}.{RECORD_EXTENSION}")))
    }
}

impl std::fmt::Debug for Keyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyring")
            .field("dir", &self.dir)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::passphrase::StaticPassphrase;

    fn open(dir: &Path, backend: Backend) -> Keyring {
        Keyring::open(dir, backend, Arc::new(StaticPassphrase::new("secret"))).unwrap()
    }

    #[test]
    fn test_open_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let result = Keyring::open(&missing, Backend::Test, Arc::new(StaticPassphrase::new("")));
        assert!(matches!(result, Err(KeyringError::StoreAccess { .. })));
    }

    #[test]
    fn test_open_file_as_store() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, b"not a dir").unwrap();

        let result = Keyring::open(&file, Backend::Test, Arc::new(StaticPassphrase::new("")));
        assert!(matches!(result, Err(KeyringError::StoreAccess { .. })));
    }

    #[test]
    fn test_add_and_key() {
        let dir = tempfile::tempdir().unwrap();
        let keyring = open(dir.path(), Backend::Test);

        let added = keyring.add("my_celes_key").unwrap();
        let loaded = keyring.key("my_celes_key").unwrap();

        assert_eq!(loaded.name(), "my_celes_key");
        assert_eq!(loaded.address(), added.address());
        assert!(dir.path().join("keyring-test/my_celes_key.json").exists());
    }

    #[test]
    fn test_key_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let keyring = open(dir.path(), Backend::Test);

        assert!(matches!(keyring.key("nobody"), Err(KeyringError::KeyNotFound(name)) if name == "nobody"));
    }

    #[test]
    fn test_add_existing_key() {
        let dir = tempfile::tempdir().unwrap();
        let keyring = open(dir.path(), Backend::Test);

        keyring.add("alice").unwrap();
        assert!(matches!(keyring.add("alice"), Err(KeyringError::KeyExists(_))));
    }

    #[test]
    fn test_invalid_key_names() {
        let dir = tempfile::tempdir().unwrap();
        let keyring = open(dir.path(), Backend::Test);

        for name in ["", "..", "a/b", "a\\b", "key name"] {
            assert!(matches!(keyring.key(name), Err(KeyringError::InvalidKeyName(_))));
        }
    }

    #[test]
    fn test_import_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let keyring = open(dir.path(), Backend::Test);
        let secret = [7u8; 32];

        let imported = keyring.import("imported", &secret).unwrap();

        assert_eq!(imported.address(), Signer::from_secret(&secret).unwrap().address());
        assert_eq!(keyring.key("imported").unwrap().signer().secret_bytes(), secret);
    }

    #[test]
    fn test_file_backend_uses_passphrase() {
        let dir = tempfile::tempdir().unwrap();
        let keyring = open(dir.path(), Backend::File);

        let added = keyring.add("sealed").unwrap();
        assert_eq!(keyring.key("sealed").unwrap().address(), added.address());

        let wrong = Keyring::open(dir.path(), Backend::File, Arc::new(StaticPassphrase::new("wrong"))).unwrap();
        assert!(matches!(wrong.key("sealed"), Err(KeyringError::Decrypt(_))));
    }

    #[test]
    fn test_backends_are_separate() {
        let dir = tempfile::tempdir().unwrap();

        open(dir.path(), Backend::Test).add("alice").unwrap();

        let file_keyring = open(dir.path(), Backend::File);
        assert!(matches!(file_keyring.key("alice"), Err(KeyringError::KeyNotFound(_))));
    }

    #[test]
    fn test_list_keys() {
        let dir = tempfile::tempdir().unwrap();
        let keyring = open(dir.path(), Backend::Test);

        assert!(keyring.list().unwrap().is_empty());

        let bob = keyring.add("bob").unwrap();
        keyring.add("alice").unwrap();

        let keys = keyring.list().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].name, "alice");
        assert_eq!(keys[1].name, "bob");
        assert_eq!(keys[1].address, bob.address().to_string());
    }
}
