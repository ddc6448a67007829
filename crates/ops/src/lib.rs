#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for apkfetch
//!
//! This crate sits between the CLI and the specialised crates. It wires the
//! network, store and event pieces into the four imports (package, index,
//! keyring, whole lockfile) and the stand-alone range probe.

mod artifacts;
mod context;
mod descriptor;
mod import;
mod lock;
mod types;

pub use artifacts::LockedArtifactSet;
pub use context::{OpsContextBuilder, OpsCtx};
pub use descriptor::BuildDescriptor;
pub use import::{import_index, import_keyring, import_package, probe_repository};
pub use lock::import_lockfile;
pub use types::{ImportReport, ProbeReport};

use apkfetch_errors::Error;
use serde::Serialize;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// A single package, index or keyring import
    Import(ImportReport),
    /// Everything materialized from a lockfile
    Locked(LockedArtifactSet),
    /// Outcome of a range-support probe
    Probe(ProbeReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::internal(e.to_string()))
    }
}
