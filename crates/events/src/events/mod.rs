use serde::{Deserialize, Serialize};

use apkfetch_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FailureContext {
    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self {
            code: error.user_code().map(Into::into),
            message: error.user_message().into_owned(),
            hint: error.user_hint().map(Into::into),
        }
    }
}

pub mod download;
pub mod general;
pub mod import;
pub mod probe;

pub use download::DownloadEvent;
pub use general::GeneralEvent;
pub use import::{ImportEvent, ImportKind};
pub use probe::ProbeEvent;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (debug output, warnings, operations)
    General(GeneralEvent),

    /// Single range or full fetches
    Download(DownloadEvent),

    /// Package, index and keyring imports
    Import(ImportEvent),

    /// Range-support probe of a repository
    Probe(ProbeEvent),
}

impl AppEvent {
    /// Log level the CLI should use for this event
    #[must_use]
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            Self::General(GeneralEvent::DebugLog { .. }) | Self::Download(DownloadEvent::Started { .. }) => {
                tracing::Level::DEBUG
            }
            Self::General(GeneralEvent::Warning { .. }) => tracing::Level::WARN,
            Self::Download(DownloadEvent::Failed { .. })
            | Self::Import(ImportEvent::Failed { .. })
            | Self::Probe(ProbeEvent::Failed { .. }) => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }

    /// Serialize for `--json` output
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
