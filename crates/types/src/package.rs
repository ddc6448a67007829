//! Package references and import descriptors

use crate::ByteRange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three logical parts stored back-to-back in one `.apk` object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Signature,
    Control,
    Data,
}

impl SegmentKind {
    /// Assembly order: signature, then control, then data
    pub const ORDER: [SegmentKind; 3] = [Self::Signature, Self::Control, Self::Data];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signature => "signature",
            Self::Control => "control",
            Self::Data => "data",
        }
    }

    /// File name of the staged segment inside the package's parts directory
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Signature => "signature.tar.gz",
            Self::Control => "control.tar.gz",
            Self::Data => "data.tar.gz",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range and optional expected digest of one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub range: ByteRange,
    /// Digest in any accepted encoding; normalized before use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl SegmentSpec {
    #[must_use]
    pub fn new(range: ByteRange, digest: Option<String>) -> Self {
        Self { range, digest }
    }
}

/// Identity of a package inside a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageReference {
    pub repository_url: String,
    pub architecture: String,
    pub package_name: String,
    pub version: String,
}

impl PackageReference {
    /// `{name}-{version}.apk`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}-{}.apk", self.package_name, self.version)
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} ({})",
            self.package_name, self.version, self.architecture
        )
    }
}

/// Everything needed to import one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageImport {
    pub name: String,
    pub version: String,
    pub architecture: String,
    pub url: String,
    pub signature: SegmentSpec,
    pub control: SegmentSpec,
    pub data: SegmentSpec,
}

impl PackageImport {
    #[must_use]
    pub fn segment(&self, kind: SegmentKind) -> &SegmentSpec {
        match kind {
            SegmentKind::Signature => &self.signature,
            SegmentKind::Control => &self.control,
            SegmentKind::Data => &self.data,
        }
    }

    /// `{name}-{version}`, used in log lines and events
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

/// Import of a repository index (`APKINDEX.tar.gz`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexImport {
    pub name: String,
    pub url: String,
    pub architecture: String,
}

/// Import of a single public signing key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyringImport {
    pub name: String,
    pub url: String,
}
