use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BlobError;

/// Fixed-width identifier partitioning blob data on the ledger.
///
/// Encoded as one version byte followed by [`Namespace::ID_SIZE`] id bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct Namespace {
    version: u8,
    id: [u8; Self::ID_SIZE],
}

impl Namespace {
    pub const VERSION_SIZE: usize = 1;
    pub const ID_SIZE: usize = 28;
    pub const SIZE: usize = Self::VERSION_SIZE + Self::ID_SIZE;

    pub const VERSION_ZERO: u8 = 0;
    /// Leading zero bytes every version 0 id starts with.
    pub const VERSION_ZERO_PREFIX_SIZE: usize = 18;
    /// User-controlled tail of a version 0 id.
    pub const VERSION_ZERO_ID_SIZE: usize = Self::ID_SIZE - Self::VERSION_ZERO_PREFIX_SIZE;

    /// Highest namespace reserved for protocol use.
    pub const MAX_PRIMARY_RESERVED: Self = {
        let mut id = [0u8; Self::ID_SIZE];
        id[Self::ID_SIZE - 1] = 0xFF;
        Self {
            version: Self::VERSION_ZERO,
            id,
        }
    };

    /// Build a version 0 namespace, left-padding `sub_id` with zeros.
    pub fn new_v0(sub_id: &[u8]) -> Result<Self, BlobError> {
        if sub_id.len() > Self::VERSION_ZERO_ID_SIZE {
            return Err(BlobError::IdTooLong {
                max: Self::VERSION_ZERO_ID_SIZE,
                got: sub_id.len(),
            });
        }

        let mut id = [0u8; Self::ID_SIZE];
        id[Self::ID_SIZE - sub_id.len()..].copy_from_slice(sub_id);

        Ok(Self {
            version: Self::VERSION_ZERO,
            id,
        })
    }

    /// Decode a namespace from its [`Namespace::SIZE`]-byte form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlobError> {
        if bytes.len() != Self::SIZE {
            return Err(BlobError::InvalidLength {
                expected: Self::SIZE,
                got: bytes.len(),
            });
        }

        let version = bytes[0];
        if version != Self::VERSION_ZERO {
            return Err(BlobError::UnsupportedVersion(version));
        }

        let mut id = [0u8; Self::ID_SIZE];
        id.copy_from_slice(&bytes[Self::VERSION_SIZE..]);

        if id[..Self::VERSION_ZERO_PREFIX_SIZE].iter().any(|b| *b != 0) {
            return Err(BlobError::InvalidPrefix(Self::VERSION_ZERO_PREFIX_SIZE));
        }

        Ok(Self { version, id })
    }

    #[must_use]
    pub const fn version(&self) -> u8 {
        self.version
    }

    #[must_use]
    pub const fn id(&self) -> &[u8; Self::ID_SIZE] {
        &self.id
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0] = self.version;
        bytes[Self::VERSION_SIZE..].copy_from_slice(&self.id);
        bytes
    }

    #[must_use]
    pub fn is_reserved(&self) -> bool {
        *self <= Self::MAX_PRIMARY_RESERVED
    }

    /// Check the namespace may carry user blobs.
    pub fn validate_for_blob(&self) -> Result<(), BlobError> {
        if self.version != Self::VERSION_ZERO {
            return Err(BlobError::UnsupportedVersion(self.version));
        }
        if self.is_reserved() {
            return Err(BlobError::ReservedNamespace(self.to_string()));
        }
        Ok(())
    }
}

impl From<Namespace> for Vec<u8> {
    fn from(namespace: Namespace) -> Self {
        namespace.to_bytes().to_vec()
    }
}

impl TryFrom<Vec<u8>> for Namespace {
    type Error = BlobError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v0_pads_short_id() {
        let ns = Namespace::new_v0(b"abc").unwrap();
        let bytes = ns.to_bytes();

        assert_eq!(bytes.len(), Namespace::SIZE);
        assert_eq!(bytes[0], Namespace::VERSION_ZERO);
        assert!(bytes[1..Namespace::SIZE - 3].iter().all(|b| *b == 0));
        assert_eq!(&bytes[Namespace::SIZE - 3..], b"abc");
    }

    #[test]
    fn test_new_v0_default_flag_value() {
        let ns = Namespace::new_v0(b"1234567890").unwrap();

        assert_eq!(&ns.id()[Namespace::VERSION_ZERO_PREFIX_SIZE..], b"1234567890");
        assert!(!ns.is_reserved());
        assert!(ns.validate_for_blob().is_ok());
    }

    #[test]
    fn test_serde_uses_byte_form() {
        let ns = Namespace::new_v0(b"1234567890").unwrap();

        let json = serde_json::to_string(&ns).unwrap();
        assert_eq!(serde_json::from_str::<Namespace>(&json).unwrap(), ns);

        let mut versioned = ns.to_bytes();
        versioned[0] = 1;
        let json = serde_json::to_string(&versioned.to_vec()).unwrap();
        assert!(serde_json::from_str::<Namespace>(&json).is_err());

        assert!(serde_json::from_str::<Namespace>("[0, 1, 2]").is_err());
    }

    #[test]
    fn test_new_v0_rejects_long_id() {
        let result = Namespace::new_v0(b"12345678901");

        assert_eq!(result, Err(BlobError::IdTooLong { max: 10, got: 11 }));
    }

    #[test]
    fn test_reserved_namespaces() {
        let lowest = Namespace::new_v0(&[]).unwrap();
        let highest_reserved = Namespace::new_v0(&[0xFF]).unwrap();
        let first_user = Namespace::new_v0(&[0x01, 0x00]).unwrap();

        assert!(lowest.is_reserved());
        assert!(highest_reserved.is_reserved());
        assert_eq!(highest_reserved, Namespace::MAX_PRIMARY_RESERVED);
        assert!(!first_user.is_reserved());
        assert!(matches!(
            highest_reserved.validate_for_blob(),
            Err(BlobError::ReservedNamespace(_))
        ));
    }

    #[test]
    fn test_from_bytes() {
        let ns = Namespace::new_v0(b"data").unwrap();

        assert_eq!(Namespace::from_bytes(&ns.to_bytes()).unwrap(), ns);
        assert!(matches!(
            Namespace::from_bytes(&[0u8; 10]),
            Err(BlobError::InvalidLength { expected: 29, got: 10 })
        ));

        let mut versioned = ns.to_bytes();
        versioned[0] = 1;
        assert_eq!(Namespace::from_bytes(&versioned), Err(BlobError::UnsupportedVersion(1)));
    }

    #[test]
    fn test_display_is_hex() {
        let ns = Namespace::new_v0(&[0xAB]).unwrap();

        assert_eq!(ns.to_string().len(), Namespace::SIZE * 2);
        assert!(ns.to_string().ends_with("ab"));
    }
}
