use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Download-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Request sent; `range` is the header value when a range was asked for
    Started { url: String, range: Option<String> },

    /// Body fully written and, when requested, verified
    Completed { url: String, bytes: u64 },

    Failed { url: String, failure: FailureContext },
}
