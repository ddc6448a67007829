//! Lockfile model
//!
//! The lockfile is the declarative source of import descriptors. Its JSON
//! shape follows the lockfiles written by apko:
//!
//! ```json
//! {
//!   "version": "v1",
//!   "contents": {
//!     "keyring": [{ "name": "...", "url": "..." }],
//!     "repositories": [{ "name": "...", "url": ".../APKINDEX.tar.gz", "architecture": "x86_64" }],
//!     "packages": [{
//!       "name": "...", "version": "...", "url": "...", "architecture": "...",
//!       "signature": { "range": "bytes=0-668", "checksum": "sha1-..." },
//!       "control": { "range": "bytes=669-1082", "checksum": "sha1-..." },
//!       "data": { "range": "bytes=1083-5000", "checksum": "sha256-..." }
//!     }]
//!   }
//! }
//! ```

use crate::{ByteRange, IndexImport, KeyringImport, PackageImport, SegmentSpec};
use apkfetch_errors::{Error, LockfileError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub contents: LockContents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockContents {
    #[serde(default)]
    pub keyring: Vec<LockKeyring>,
    #[serde(default)]
    pub repositories: Vec<LockRepository>,
    #[serde(default)]
    pub packages: Vec<LockPackage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockKeyring {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRepository {
    pub name: String,
    pub url: String,
    pub architecture: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSegment {
    pub range: ByteRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockPackage {
    pub name: String,
    pub version: String,
    pub url: String,
    pub architecture: String,
    pub signature: LockSegment,
    pub control: LockSegment,
    pub data: LockSegment,
}

impl Lockfile {
    /// Read and parse a lockfile from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid lockfile.
    pub async fn from_path(path: &Path) -> Result<Self, Error> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| LockfileError::NotFound {
                path: path.display().to_string(),
            })?;
        contents.parse()
    }

    /// Index imports for every repository entry
    #[must_use]
    pub fn index_imports(&self) -> Vec<IndexImport> {
        self.contents
            .repositories
            .iter()
            .map(|repo| IndexImport {
                name: repo.name.clone(),
                url: repo.url.clone(),
                architecture: repo.architecture.clone(),
            })
            .collect()
    }

    /// Keyring imports for every key entry
    #[must_use]
    pub fn keyring_imports(&self) -> Vec<KeyringImport> {
        self.contents
            .keyring
            .iter()
            .map(|key| KeyringImport {
                name: key.name.clone(),
                url: key.url.clone(),
            })
            .collect()
    }

    /// Package imports for every package entry
    ///
    /// # Errors
    ///
    /// Returns an error if a package lacks the control or data checksum.
    pub fn package_imports(&self) -> Result<Vec<PackageImport>, Error> {
        self.contents
            .packages
            .iter()
            .map(PackageImport::try_from)
            .collect()
    }
}

impl FromStr for Lockfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(Into::into)
    }
}

impl TryFrom<&LockPackage> for PackageImport {
    type Error = Error;

    fn try_from(package: &LockPackage) -> Result<Self, Self::Error> {
        let required = |segment: &LockSegment, field: &str| -> Result<SegmentSpec, Error> {
            let digest = segment.checksum.clone().ok_or_else(|| LockfileError::MissingField {
                package: package.name.clone(),
                field: field.to_string(),
            })?;
            Ok(SegmentSpec::new(segment.range, Some(digest)))
        };

        Ok(Self {
            name: package.name.clone(),
            version: package.version.clone(),
            architecture: package.architecture.clone(),
            url: package.url.clone(),
            // Signature checksums are not stable across repository re-signing.
            signature: SegmentSpec::new(package.signature.range, None),
            control: required(&package.control, "control.checksum")?,
            data: required(&package.data, "data.checksum")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCK: &str = r#"{
      "version": "v1",
      "contents": {
        "keyring": [
          { "name": "packages.example.dev/os/example-signing.rsa.pub",
            "url": "https://packages.example.dev/os/example-signing.rsa.pub" }
        ],
        "repositories": [
          { "name": "packages.example.dev/os/x86_64",
            "url": "https://packages.example.dev/os/x86_64/APKINDEX.tar.gz",
            "architecture": "x86_64" }
        ],
        "packages": [
          { "name": "busybox", "version": "1.36.1-r2",
            "url": "https://packages.example.dev/os/x86_64/busybox-1.36.1-r2.apk",
            "architecture": "x86_64",
            "signature": { "range": "bytes=0-668", "checksum": "sha1-AAAA" },
            "control": { "range": "bytes=669-1082", "checksum": "sha1-kDFMQXbuRr9l3ZqqLdubL5cT7sY=" },
            "data": { "range": "bytes=1083-5000", "checksum": "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=" } }
        ]
      }
    }"#;

    #[test]
    fn test_parse_lockfile() {
        let lock: Lockfile = LOCK.parse().unwrap();
        assert_eq!(lock.version, "v1");
        assert_eq!(lock.keyring_imports().len(), 1);
        assert_eq!(lock.index_imports()[0].architecture, "x86_64");

        let packages = lock.package_imports().unwrap();
        assert_eq!(packages.len(), 1);
        let busybox = &packages[0];
        assert_eq!(busybox.signature.range.to_string(), "bytes=0-668");
        assert!(busybox.signature.digest.is_none());
        assert_eq!(busybox.data.range.len(), Some(3918));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let lock: Lockfile = r#"{"contents": {}}"#.parse().unwrap();
        assert!(lock.contents.packages.is_empty());
        assert!(lock.index_imports().is_empty());
    }

    #[test]
    fn test_missing_data_checksum_is_rejected() {
        let lock: Lockfile = LOCK.replace(
            r#""checksum": "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=""#,
            r#""checksum": null"#,
        )
        .parse()
        .unwrap();
        let err = lock.package_imports().unwrap_err();
        assert!(matches!(
            err,
            Error::Lockfile(LockfileError::MissingField { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!("{ not json".parse::<Lockfile>().is_err());
    }
}
