//! Package pointer files.
//!
//! A pointer stands in for a package binary kept in a remote artifact store:
//!
//! ```json
//! {"source": "jfrogart", "oid": {"kind": "sha256", "value": "3f5a..."}}
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Source tag of pointers resolved through JFrog Artifactory.
pub const ARTIFACTORY_SOURCE: &str = "jfrogart";

/// Files larger than this are never pointers.
const MAX_POINTER_SIZE: u64 = 64 * 1024;

/// Identifier of an object in the artifact store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectId {
    /// Kind of identifier, used as the query field (e.g. `sha256`).
    pub kind: String,
    /// Identifier value.
    pub value: String,
}

/// Contents of a package pointer file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaPointer {
    /// Tag of the store holding the artifact.
    pub source: String,
    /// Identifier of the artifact in that store.
    pub oid: ObjectId,
}

impl MetaPointer {
    /// Parse pointer contents. Returns `None` if `data` is not a pointer.
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        let pointer: MetaPointer = serde_json::from_slice(data).ok()?;
        if pointer.oid.kind.is_empty() || pointer.oid.value.is_empty() {
            return None;
        }
        Some(pointer)
    }

    /// Read a pointer from disk. Returns `Ok(None)` if the file exists but is
    /// not a pointer, e.g. an actual package binary.
    pub async fn from_file(path: &Path) -> Result<Option<Self>> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::io(path, e))?;
        if metadata.len() > MAX_POINTER_SIZE {
            return Ok(None);
        }

        let data = tokio::fs::read(path).await.map_err(|e| Error::io(path, e))?;
        Ok(Self::from_slice(&data))
    }

    /// Whether the pointer can be resolved through Artifactory.
    pub fn is_artifactory(&self) -> bool {
        self.source == ARTIFACTORY_SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_pointer() {
        let pointer = MetaPointer::from_slice(
            br#"{"source": "jfrogart", "oid": {"kind": "sha256", "value": "abcd"}}"#,
        )
        .unwrap();
        assert!(pointer.is_artifactory());
        assert_eq!(pointer.oid.kind, "sha256");
        assert_eq!(pointer.oid.value, "abcd");
    }

    #[test]
    fn test_not_a_pointer() {
        assert_eq!(MetaPointer::from_slice(b"!<arch>\ndebian-binary"), None);
        assert_eq!(MetaPointer::from_slice(br#"{"source": "jfrogart"}"#), None);
        assert_eq!(
            MetaPointer::from_slice(br#"{"source": "jfrogart", "oid": {"kind": "", "value": "x"}}"#),
            None
        );
    }

    #[test]
    fn test_other_source() {
        let pointer =
            MetaPointer::from_slice(br#"{"source": "s3", "oid": {"kind": "md5", "value": "1"}}"#)
                .unwrap();
        assert!(!pointer.is_artifactory());
    }

    #[tokio::test]
    async fn test_from_file() {
        let td = TempDir::new().unwrap();
        let path = td.path().join("a.deb");
        std::fs::write(
            &path,
            r#"{"source": "jfrogart", "oid": {"kind": "sha1", "value": "ff"}}"#,
        )
        .unwrap();
        let pointer = MetaPointer::from_file(&path).await.unwrap().unwrap();
        assert_eq!(pointer.oid.kind, "sha1");

        let big = td.path().join("big.deb");
        std::fs::write(&big, vec![b' '; (MAX_POINTER_SIZE + 1) as usize]).unwrap();
        assert_eq!(MetaPointer::from_file(&big).await.unwrap(), None);

        assert!(MetaPointer::from_file(&td.path().join("missing.deb"))
            .await
            .is_err());
    }
}
