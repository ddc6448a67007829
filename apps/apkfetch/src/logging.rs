//! Structured logging integration for events
//!
//! Every event is also written to the tracing subscriber with structured
//! fields, so `--debug` and `--json` runs keep a full record of what happened.

use apkfetch_events::{AppEvent, DownloadEvent, GeneralEvent, ImportEvent, ProbeEvent};
use tracing::{debug, error, info, warn};

/// Log an `AppEvent` at its level with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::Warning { message } => warn!(message = %message, "warning"),
            GeneralEvent::DebugLog { message } => debug!(message = %message, "debug"),
            GeneralEvent::OperationStarted { operation } => {
                info!(operation = %operation, "operation started");
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(operation = %operation, success, "operation completed");
            }
        },

        AppEvent::Download(download) => match download {
            DownloadEvent::Started { url, range } => {
                debug!(url = %url, range = ?range, "download started");
            }
            DownloadEvent::Completed { url, bytes } => {
                info!(url = %url, bytes, "download completed");
            }
            DownloadEvent::Failed { url, failure } => {
                error!(
                    url = %url,
                    code = ?failure.code,
                    message = %failure.message,
                    "download failed"
                );
            }
        },

        AppEvent::Import(import) => match import {
            ImportEvent::Started { kind, name, url } => {
                info!(kind = ?kind, name = %name, url = %url, "import started");
            }
            ImportEvent::SegmentFetched {
                name,
                segment,
                bytes,
                verified,
            } => {
                info!(name = %name, segment = %segment, bytes, verified, "segment fetched");
            }
            ImportEvent::Assembled { name, path, bytes } => {
                info!(name = %name, path = %path.display(), bytes, "package assembled");
            }
            ImportEvent::Completed { kind, name, path } => {
                info!(kind = ?kind, name = %name, path = %path.display(), "import completed");
            }
            ImportEvent::Failed {
                kind,
                name,
                failure,
            } => {
                error!(
                    kind = ?kind,
                    name = %name,
                    code = ?failure.code,
                    message = %failure.message,
                    "import failed"
                );
            }
        },

        AppEvent::Probe(probe) => match probe {
            ProbeEvent::Started { url } => info!(url = %url, "range probe started"),
            ProbeEvent::Verified { url } => info!(url = %url, "range probe verified"),
            ProbeEvent::Failed { url, failure } => {
                error!(url = %url, code = ?failure.code, "range probe failed");
            }
        },
    }
}
