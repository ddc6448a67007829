//! One-time check that the transport honours range requests
//!
//! A host (or a proxy in front of it) that ignores ranges answers every
//! segment fetch with the full object. Rather than let that surface as a
//! broken archive at assembly time, the first index fetch per repository is
//! preceded by a `bytes=0-0` request that must yield exactly one byte.

use crate::download::{RangeDownloader, ResponsePolicy};
use apkfetch_errors::{Error, SetupError};
use apkfetch_events::{AppEvent, EventEmitter, EventSender, FailureContext, ProbeEvent};
use apkfetch_types::ByteRange;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Probe outcome for one URL
#[derive(Debug, Clone)]
pub enum ProbeState {
    NotChecked,
    Verified,
    /// Terminal; later calls return the same error without probing again
    Aborted(Error),
}

/// Outcome cell of one URL, filled by the first caller to get there
type Outcome = Arc<OnceCell<Result<(), Error>>>;

/// Runs and remembers range-support probes
///
/// Each URL has its own cell: callers for the same URL wait for a single
/// probe, while probes of different URLs run side by side.
#[derive(Debug, Clone)]
pub struct SetupProbe {
    downloader: RangeDownloader,
    outcomes: Arc<Mutex<HashMap<String, Outcome>>>,
    tx: Option<EventSender>,
}

impl EventEmitter for SetupProbe {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl SetupProbe {
    #[must_use]
    pub fn new(downloader: RangeDownloader) -> Self {
        Self {
            downloader,
            outcomes: Arc::new(Mutex::new(HashMap::new())),
            tx: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Current state for `url`
    pub async fn state(&self, url: &str) -> ProbeState {
        let cell = self.outcomes.lock().await.get(url).cloned();
        match cell.as_deref().and_then(OnceCell::get) {
            None => ProbeState::NotChecked,
            Some(Ok(())) => ProbeState::Verified,
            Some(Err(e)) => ProbeState::Aborted(e.clone()),
        }
    }

    /// Probe `url` unless it has been probed already
    ///
    /// # Errors
    ///
    /// Returns `SetupError::EnvironmentMisconfigured` when the host answered
    /// a 1-byte range with any other number of bytes, or the transport error
    /// that stopped the probe. Either outcome is remembered.
    pub async fn ensure(&self, url: &str) -> Result<(), Error> {
        // The map lock is only held to look up the cell, never across a fetch.
        let cell = Arc::clone(
            self.outcomes
                .lock()
                .await
                .entry(url.to_string())
                .or_default(),
        );

        cell.get_or_init(|| self.run(url)).await.clone()
    }

    async fn run(&self, url: &str) -> Result<(), Error> {
        self.emit(AppEvent::Probe(ProbeEvent::Started {
            url: url.to_string(),
        }));

        let result = self.probe(url).await;
        match &result {
            Ok(()) => self.emit(AppEvent::Probe(ProbeEvent::Verified {
                url: url.to_string(),
            })),
            Err(e) => self.emit(AppEvent::Probe(ProbeEvent::Failed {
                url: url.to_string(),
                failure: FailureContext::from_error(e),
            })),
        }
        result
    }

    async fn probe(&self, url: &str) -> Result<(), Error> {
        let scratch = tempfile::tempdir()?;
        let dest = scratch.path().join("probe");

        let result = self
            .downloader
            .fetch(
                url,
                Some(&ByteRange::first_byte()),
                &dest,
                None,
                ResponsePolicy::Lenient,
            )
            .await?;

        tracing::debug!(url, received = result.bytes, "range probe answered");
        if result.bytes != 1 {
            return Err(SetupError::EnvironmentMisconfigured {
                url: url.to_string(),
                received: result.bytes,
            }
            .into());
        }
        Ok(())
    }
}
