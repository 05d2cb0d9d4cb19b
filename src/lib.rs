//! # Market Dashboard
//!
//! Terminal dashboard for live cryptocurrency market data from CoinGecko.
//!
//! The top 100 coins by market cap are polled every 60 seconds. The user
//! searches, filters and sorts the list locally and opens a detail view for
//! any coin.
//!
//! ## Architecture
//!
//! ```text
//! MarketTracker (polls every 60s)
//!     ↓
//! MarketDataProvider (CoinGecko)
//!     ↓
//! SnapshotStore (in-memory, last write wins)
//!     ↓
//! pipeline::derive (search → rank → sign → movers → bracket → sort)
//!     ↓
//! ui::render
//! ```
//!
//! ## Usage
//!
//! The derivation pipeline can be used on its own:
//!
//! ```no_run
//! use market_dashboard::{DashboardConfig, MarketTracker, Query, derive};
//! use market_dashboard::filters::MoversMode;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = MarketTracker::new(&DashboardConfig::default())?;
//! tracker.refresh_now().await?;
//!
//! let mut query = Query::default();
//! query.filters.movers = MoversMode::TopGainers;
//!
//! if let Some(snapshot) = tracker.store().snapshot().await {
//!     for coin in derive(&snapshot.coins, &query) {
//!         println!("{}: {:?}%", coin.symbol, coin.price_change_percentage_24h);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fetch failures are classified into a [`FetchError`] and shown in place of
//! the data until the next successful fetch. Nothing is retried
//! automatically.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod filters;
pub mod pipeline;
pub mod provider;
pub mod providers;
pub mod store;
pub mod tracker;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use error::{ConfigError, FetchError, ProviderError};
pub use pipeline::{derive, Query};
pub use tracker::{MarketTracker, PollerHandle};
pub use types::{CoinRecord, MarketEvent, MarketSnapshot, MarketsRequest};
