//! Constants for the market dashboard
//!
//! Defaults for every tunable live here. `DashboardConfig::from_env` can
//! override a handful of them at startup; everything else is fixed at
//! compile time.

/// How often to poll the market endpoint (in seconds)
pub const REFRESH_INTERVAL_SECS: u64 = 60;

/// HTTP request timeout when fetching markets (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint listing coins with market data
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Quote currency for all prices
pub const DEFAULT_VS_CURRENCY: &str = "inr";

/// Upstream ordering for the markets listing
pub const MARKETS_ORDER: &str = "market_cap_desc";

/// Number of assets requested per poll
pub const MARKETS_PER_PAGE: u32 = 100;

/// Page requested per poll
pub const MARKETS_PAGE: u32 = 1;

/// Size of the gainers / losers slice
pub const TOP_MOVERS_LIMIT: usize = 10;

/// Upper bound (exclusive) of the low price bracket
pub const LOW_PRICE_CEILING: f64 = 100.0;

/// Upper bound (inclusive) of the medium price bracket
pub const HIGH_PRICE_FLOOR: f64 = 10_000.0;

/// Capacity of the tracker event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// How often the UI redraws when nothing else happens (in milliseconds)
pub const UI_TICK_MS: u64 = 1000;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "market-dashboard/0.1.0";
