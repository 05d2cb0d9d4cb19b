//! Market snapshot tracker service
//!
//! Polls the provider on a fixed interval and publishes results to the
//! [`SnapshotStore`] and to a broadcast channel of [`MarketEvent`]s.

use crate::{
    config::DashboardConfig,
    constants::EVENT_CHANNEL_CAPACITY,
    error::{FetchError, ProviderError},
    provider::MarketDataProvider,
    providers::CoinGeckoProvider,
    store::{FetchState, SnapshotStore},
    types::{MarketEvent, MarketSnapshot, MarketsRequest},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Everything one fetch needs, cheap to clone into a task
#[derive(Clone)]
struct Fetcher {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<SnapshotStore>,
    request: MarketsRequest,
    events: broadcast::Sender<MarketEvent>,
}

impl Fetcher {
    /// Fetches one page from the provider and publishes the outcome.
    /// Failures are terminal for this attempt; there is no retry.
    async fn fetch_and_update(&self) -> Result<(), FetchError> {
        let start = Instant::now();
        self.store.begin_fetch().await;
        let _ = self.events.send(MarketEvent::FetchStarted {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
        });

        match self.provider.fetch_markets(&self.request).await {
            Ok(coins) => {
                let coin_count = coins.len();
                tracing::debug!(
                    count = coin_count,
                    provider = self.provider.provider_name(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Successfully fetched markets"
                );
                self.store
                    .replace(MarketSnapshot::new(
                        coins,
                        self.provider.provider_name().to_string(),
                    ))
                    .await;
                let _ = self.events.send(MarketEvent::SnapshotUpdated {
                    id: Uuid::new_v4(),
                    coin_count,
                    timestamp: Utc::now(),
                });
                Ok(())
            }
            Err(e) => {
                let error = FetchError::from(e);
                tracing::warn!(
                    kind = error.kind(),
                    error = %error,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Failed to fetch markets"
                );
                self.store.record_failure(error.clone()).await;
                let _ = self.events.send(MarketEvent::FetchFailed {
                    id: Uuid::new_v4(),
                    kind: error.kind().to_string(),
                    error_message: error.to_string(),
                    timestamp: Utc::now(),
                });
                Err(error)
            }
        }
    }
}

/// Market snapshot tracker
///
/// Owns the provider, the store and the event channel. Call [`start`] to
/// begin polling; the returned [`PollerHandle`] stops the timer when dropped.
///
/// [`start`]: MarketTracker::start
///
/// # Example
/// ```no_run
/// use market_dashboard::{DashboardConfig, MarketTracker};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tracker = MarketTracker::new(&DashboardConfig::default())?;
/// let _poller = tracker.start();
/// let mut events = tracker.subscribe();
/// while let Ok(event) = events.recv().await {
///     println!("{}", event);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MarketTracker {
    fetcher: Fetcher,
    refresh_interval: Duration,
}

impl MarketTracker {
    /// Creates a tracker backed by CoinGecko, configured from `config`
    pub fn new(config: &DashboardConfig) -> Result<Self, ProviderError> {
        let provider = CoinGeckoProvider::with_options(&config.api_base_url, config.request_timeout)?;
        Ok(Self::with_provider(
            Arc::new(provider),
            config.markets_request(),
            config.refresh_interval,
        ))
    }

    /// Creates a tracker with a custom provider
    ///
    /// This is primarily for testing with mock providers.
    pub fn with_provider(
        provider: Arc<dyn MarketDataProvider>,
        request: MarketsRequest,
        refresh_interval: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            fetcher: Fetcher {
                provider,
                store: Arc::new(SnapshotStore::new()),
                request,
                events,
            },
            refresh_interval,
        }
    }

    /// Starts polling: one fetch now, then one per refresh interval
    ///
    /// Every tick spawns its own fetch task. A slow fetch is not cancelled
    /// when the next tick fires, so completions may land out of order.
    pub fn start(&self) -> PollerHandle {
        let fetcher = self.fetcher.clone();
        let refresh_interval = self.refresh_interval;

        let task = tokio::spawn(async move {
            tracing::info!(
                refresh_interval_secs = refresh_interval.as_secs(),
                provider = fetcher.provider.provider_name(),
                "Starting market poller"
            );

            let mut ticker = tokio::time::interval(refresh_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let fetcher = fetcher.clone();
                tokio::spawn(async move {
                    let _ = fetcher.fetch_and_update().await;
                });
            }
        });

        PollerHandle { task }
    }

    /// Forces an immediate fetch and waits for it
    pub async fn refresh_now(&self) -> Result<(), FetchError> {
        self.fetcher.fetch_and_update().await
    }

    /// Starts an immediate fetch in the background
    pub fn spawn_refresh(&self) {
        let fetcher = self.fetcher.clone();
        tokio::spawn(async move {
            let _ = fetcher.fetch_and_update().await;
        });
    }

    /// Subscribes to fetch events
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.fetcher.events.subscribe()
    }

    /// Gets the current fetch state
    pub async fn current(&self) -> FetchState {
        self.fetcher.store.current().await
    }

    /// Returns the shared store
    pub fn store(&self) -> Arc<SnapshotStore> {
        self.fetcher.store.clone()
    }

    /// Returns the name of the current provider
    pub fn provider_name(&self) -> &str {
        self.fetcher.provider.provider_name()
    }

    /// Quote currency of every price in the snapshot
    pub fn vs_currency(&self) -> &str {
        &self.fetcher.request.vs_currency
    }
}

/// Handle on the polling timer; dropping it cancels the timer
///
/// Fetches already in flight are not cancelled and still publish their
/// result when they complete.
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stops the timer
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
