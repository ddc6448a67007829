//! Report types returned by operations

use apkfetch_events::ImportKind;
use serde::Serialize;
use std::path::PathBuf;

/// What one import produced
#[derive(Clone, Debug, Serialize)]
pub struct ImportReport {
    pub kind: ImportKind,
    pub name: String,
    pub url: String,
    /// The artifact under the cache root
    pub path: PathBuf,
    pub bytes: u64,
    /// Build descriptor written next to the artifact
    pub descriptor: PathBuf,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProbeReport {
    pub url: String,
    pub strategy: String,
    pub verified: bool,
}
