//! Sources of passphrases for encrypted key records.

use std::io;

/// Supplies passphrases to the keyring when a record needs one.
pub trait PassphraseProvider: Send + Sync {
    fn passphrase(&self, prompt: &str) -> io::Result<String>;
}

/// Reads the passphrase from the terminal without echo.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptPassphrase;

impl PassphraseProvider for PromptPassphrase {
    fn passphrase(&self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}

/// Always answers with the same passphrase.
#[derive(Clone)]
pub struct StaticPassphrase(String);

impl StaticPassphrase {
    #[must_use]
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self(passphrase.into())
    }
}

impl PassphraseProvider for StaticPassphrase {
    fn passphrase(&self, _prompt: &str) -> io::Result<String> {
        Ok(self.0.clone())
    }
}

impl std::fmt::Debug for StaticPassphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticPassphrase(..)")
    }
}
