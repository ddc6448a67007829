use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Setup probe events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProbeEvent {
    Started { url: String },

    /// The host answered a 1-byte range with exactly one byte
    Verified { url: String },

    Failed { url: String, failure: FailureContext },
}
