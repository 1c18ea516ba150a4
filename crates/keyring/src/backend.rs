use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyringError;

/// How key records are kept on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Unencrypted records, for local development and tests.
    #[default]
    Test,
    /// Records sealed with a passphrase.
    File,
}

impl Backend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::File => "file",
        }
    }

    /// Directory under the store root holding this backend's records.
    #[must_use]
    pub fn dir_name(self) -> String {
        format!("keyring-{}", self.as_str())
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = KeyringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "file" => Ok(Self::File),
            other => Err(KeyringError::UnknownBackend(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!("test".parse::<Backend>().unwrap(), Backend::Test);
        assert_eq!("FILE".parse::<Backend>().unwrap(), Backend::File);
        assert!(matches!("os".parse::<Backend>(), Err(KeyringError::UnknownBackend(_))));
    }

    #[test]
    fn test_dir_name() {
        assert_eq!(Backend::Test.dir_name(), "keyring-test");
        assert_eq!(Backend::File.dir_name(), "keyring-file");
    }
}
