//! Verified byte-range downloads
//!
//! Every fetch streams into a uniquely named `.part` file beside `<dest>`,
//! checks status, length and digest, and only then renames into place.
//! Racing fetches of one destination each write their own file; the last
//! rename wins and readers never see partial bytes.

mod stream;
mod validation;

use crate::client::NetClient;
use crate::range::{FetchRequest, RangeStrategy};
use apkfetch_errors::Error;
use apkfetch_events::{AppEvent, DownloadEvent, EventEmitter, EventSender, FailureContext};
use apkfetch_hash::{Digest, SegmentVerifier};
use apkfetch_types::ByteRange;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use validation::ResponsePolicy;

/// Outcome of a completed download
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub url: String,
    pub path: PathBuf,
    pub bytes: u64,
    /// Present when an expected digest was checked
    pub digest: Option<Digest>,
}

/// Fetches byte ranges or whole objects through the selected range strategy
#[derive(Clone)]
pub struct RangeDownloader {
    client: NetClient,
    strategy: Arc<dyn RangeStrategy>,
    tx: Option<EventSender>,
}

impl EventEmitter for RangeDownloader {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl std::fmt::Debug for RangeDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeDownloader")
            .field("strategy", &self.strategy.name())
            .finish_non_exhaustive()
    }
}

impl RangeDownloader {
    #[must_use]
    pub fn new(client: NetClient, strategy: Arc<dyn RangeStrategy>) -> Self {
        Self {
            client,
            strategy,
            tx: None,
        }
    }

    /// Report download progress on `tx`
    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn strategy(&self) -> &dyn RangeStrategy {
        self.strategy.as_ref()
    }

    /// Fetch `range` of `url` into `dest`, verifying `expected` when given
    ///
    /// The host must answer `206 Partial Content` with exactly the requested
    /// number of bytes.
    ///
    /// # Errors
    ///
    /// Returns a network error for transport failures and unusable range
    /// responses, and an integrity error when the digest does not match. No
    /// file is left at `dest` on failure.
    pub async fn download_range(
        &self,
        url: &str,
        range: &ByteRange,
        dest: &Path,
        expected: Option<&Digest>,
    ) -> Result<DownloadResult, Error> {
        self.fetch(url, Some(range), dest, expected, ResponsePolicy::Strict)
            .await
    }

    /// Fetch the whole object at `url` into `dest`
    ///
    /// # Errors
    ///
    /// Returns a network error for transport failures or non-2xx answers, and
    /// an integrity error when the digest does not match.
    pub async fn download_full(
        &self,
        url: &str,
        dest: &Path,
        expected: Option<&Digest>,
    ) -> Result<DownloadResult, Error> {
        self.fetch(url, None, dest, expected, ResponsePolicy::Strict)
            .await
    }

    /// Fetch with an explicit response policy
    ///
    /// # Errors
    ///
    /// See [`RangeDownloader::download_range`].
    pub async fn fetch(
        &self,
        url: &str,
        range: Option<&ByteRange>,
        dest: &Path,
        expected: Option<&Digest>,
        policy: ResponsePolicy,
    ) -> Result<DownloadResult, Error> {
        self.emit_download_started(url, range.map(ByteRange::header_value));

        match self.fetch_inner(url, range, dest, expected, policy).await {
            Ok(result) => {
                self.emit_download_completed(url, result.bytes);
                Ok(result)
            }
            Err(e) => {
                self.emit(AppEvent::Download(DownloadEvent::Failed {
                    url: url.to_string(),
                    failure: FailureContext::from_error(&e),
                }));
                Err(e)
            }
        }
    }

    async fn fetch_inner(
        &self,
        url: &str,
        range: Option<&ByteRange>,
        dest: &Path,
        expected: Option<&Digest>,
        policy: ResponsePolicy,
    ) -> Result<DownloadResult, Error> {
        let request = match range {
            Some(range) => self.strategy.prepare(url, range),
            None => FetchRequest {
                url: url.to_string(),
                header_range: None,
            },
        };

        let response = self
            .client
            .get_range(&request.url, request.header_range.as_ref())
            .await?;
        validation::check_status(&response, url, range, policy)?;

        let expected_len = match policy {
            ResponsePolicy::Strict => range.and_then(ByteRange::len),
            ResponsePolicy::Lenient => None,
        };
        let verifier = expected.cloned().map(SegmentVerifier::new);

        let written = stream::stream_to_file(
            response,
            dest,
            stream::StreamChecks {
                url,
                range,
                expected_len,
                verifier,
            },
        )
        .await?;

        tracing::debug!(
            url,
            dest = %dest.display(),
            bytes = written.bytes,
            verified = written.digest.is_some(),
            "download complete"
        );

        Ok(DownloadResult {
            url: url.to_string(),
            path: dest.to_path_buf(),
            bytes: written.bytes,
            digest: written.digest,
        })
    }
}
