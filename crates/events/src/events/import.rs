use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// What an import materializes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Package,
    Index,
    Keyring,
}

/// Import lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImportEvent {
    Started {
        kind: ImportKind,
        name: String,
        url: String,
    },

    /// One of the three package segments is on disk and verified
    SegmentFetched {
        name: String,
        segment: String,
        bytes: u64,
        verified: bool,
    },

    /// Segments concatenated into the final artifact
    Assembled { name: String, path: PathBuf, bytes: u64 },

    Completed {
        kind: ImportKind,
        name: String,
        path: PathBuf,
    },

    Failed {
        kind: ImportKind,
        name: String,
        failure: FailureContext,
    },
}
