//! Operations context for dependency injection

use apkfetch_config::Config;
use apkfetch_errors::Error;
use apkfetch_events::{EventEmitter, EventSender};
use apkfetch_net::{strategy_for, NetClient, RangeDownloader, SetupProbe};
use apkfetch_store::ArtifactStore;

/// Operations context providing access to all components of an invocation
///
/// Built once; the range strategy, the probe cache and the store are shared
/// by every import that runs through it.
#[derive(Debug, Clone)]
pub struct OpsCtx {
    /// Artifact cache
    pub store: ArtifactStore,
    /// Range-aware downloader
    pub downloader: RangeDownloader,
    /// Range-support probe, remembered per index URL
    pub probe: SetupProbe,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// System configuration
    pub config: Config,
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl OpsCtx {
    /// Assemble a context from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_AUTH` is malformed, the host version is not
    /// valid semver, or the HTTP client cannot be created.
    pub fn from_config(config: Config, tx: EventSender) -> Result<Self, Error> {
        let net = NetClient::from_config(&config)?;
        let strategy = strategy_for(config.host_capability()?);
        tracing::debug!(strategy = strategy.name(), "selected range strategy");

        OpsContextBuilder::new()
            .with_store(ArtifactStore::new(config.cache_root()))
            .with_downloader(RangeDownloader::new(net, strategy))
            .with_event_sender(tx)
            .with_config(config)
            .build()
    }
}

/// Builder for operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    store: Option<ArtifactStore>,
    downloader: Option<RangeDownloader>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set artifact store
    #[must_use]
    pub fn with_store(mut self, store: ArtifactStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Set downloader
    #[must_use]
    pub fn with_downloader(mut self, downloader: RangeDownloader) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// The downloader and probe are wired to the event sender here.
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let store = self.store.ok_or_else(|| missing("store"))?;
        let downloader = self.downloader.ok_or_else(|| missing("downloader"))?;
        let tx = self.tx.ok_or_else(|| missing("event_sender"))?;
        let config = self.config.unwrap_or_default();

        let downloader = downloader.with_events(tx.clone());
        let probe = SetupProbe::new(downloader.clone()).with_events(tx.clone());

        Ok(OpsCtx {
            store,
            downloader,
            probe,
            tx,
            config,
        })
    }
}

fn missing(component: &str) -> Error {
    Error::internal(format!("operations context is missing its {component}"))
}
