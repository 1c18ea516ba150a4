use serde::{Deserialize, Serialize};

use crate::error::BlobError;
use crate::namespace::Namespace;

/// Share layout version a blob is encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShareVersion {
    #[default]
    Zero,
}

impl ShareVersion {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Zero => 0,
        }
    }
}

/// A namespaced chunk of data submitted for inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBlob")]
pub struct Blob {
    namespace: Namespace,
    data: Vec<u8>,
    share_version: ShareVersion,
}

#[derive(Deserialize)]
struct RawBlob {
    namespace: Namespace,
    data: Vec<u8>,
    share_version: ShareVersion,
}

impl TryFrom<RawBlob> for Blob {
    type Error = BlobError;

    fn try_from(raw: RawBlob) -> Result<Self, Self::Error> {
        Self::new(raw.namespace, raw.data, raw.share_version)
    }
}

impl Blob {
    pub fn new(namespace: Namespace, data: impl Into<Vec<u8>>, share_version: ShareVersion) -> Result<Self, BlobError> {
        let data = data.into();

        namespace.validate_for_blob()?;

        if data.is_empty() {
            return Err(BlobError::EmptyData);
        }

        Ok(Self {
            namespace,
            data,
            share_version,
        })
    }

    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub const fn share_version(&self) -> ShareVersion {
        self.share_version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_blob() {
        let ns = Namespace::new_v0(b"1234567890").unwrap();
        let blob = Blob::new(ns, "some data", ShareVersion::Zero).unwrap();

        assert_eq!(blob.namespace(), &ns);
        assert_eq!(blob.data(), b"some data");
        assert_eq!(blob.len(), 9);
        assert_eq!(blob.share_version().as_u8(), 0);
    }

    #[test]
    fn test_empty_data_rejected() {
        let ns = Namespace::new_v0(b"1234567890").unwrap();

        assert_eq!(Blob::new(ns, Vec::new(), ShareVersion::Zero), Err(BlobError::EmptyData));
    }

    #[test]
    fn test_reserved_namespace_rejected() {
        let ns = Namespace::new_v0(&[0x01]).unwrap();

        assert!(matches!(
            Blob::new(ns, "payload", ShareVersion::Zero),
            Err(BlobError::ReservedNamespace(_))
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ns = Namespace::new_v0(b"1234567890").unwrap();
        let blob = Blob::new(ns, "some data", ShareVersion::Zero).unwrap();
        let json = serde_json::to_value(&blob).unwrap();

        assert_eq!(serde_json::from_value::<Blob>(json.clone()).unwrap(), blob);

        let mut empty = json.clone();
        empty["data"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Blob>(empty).is_err());

        let mut reserved = json;
        reserved["namespace"] = serde_json::to_value(Namespace::new_v0(&[0x01]).unwrap()).unwrap();
        assert!(serde_json::from_value::<Blob>(reserved).is_err());
    }
}
