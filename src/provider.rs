//! Provider abstraction for fetching market listings from external APIs

use crate::{
    error::ProviderError,
    types::{CoinRecord, MarketsRequest},
};
use async_trait::async_trait;

/// Trait for market data providers
///
/// Implementations fetch a page of coins with market data from some source
/// (CoinGecko today).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches one page of the markets listing
    ///
    /// # Arguments
    /// * `request` - Currency, ordering and paging for the listing
    ///
    /// # Returns
    /// The coins in upstream order, or a transport/protocol error
    async fn fetch_markets(
        &self,
        request: &MarketsRequest,
    ) -> Result<Vec<CoinRecord>, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// A scripted reply, consumed in order
    pub enum MockReply {
        Coins(Vec<CoinRecord>),
        Error(ProviderError),
        /// Wait before replying with coins
        Delayed(Duration, Vec<CoinRecord>),
    }

    /// Mock provider for testing
    pub struct MockProvider {
        replies: Arc<Mutex<VecDeque<MockReply>>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl Default for MockProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                replies: Arc::new(Mutex::new(VecDeque::new())),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn push_coins(&self, coins: Vec<CoinRecord>) {
            self.replies.lock().unwrap().push_back(MockReply::Coins(coins));
        }

        pub fn push_error(&self, error: ProviderError) {
            self.replies.lock().unwrap().push_back(MockReply::Error(error));
        }

        pub fn push_delayed(&self, delay: Duration, coins: Vec<CoinRecord>) {
            self.replies
                .lock()
                .unwrap()
                .push_back(MockReply::Delayed(delay, coins));
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    /// Minimal coin for tests
    pub fn coin(id: &str, rank: u32, price: f64, change: f64) -> CoinRecord {
        CoinRecord {
            id: id.to_string(),
            symbol: id.to_string(),
            name: id.to_uppercase(),
            image: None,
            current_price: Some(price),
            market_cap: Some(price * 1_000.0),
            market_cap_rank: Some(rank),
            total_volume: Some(price * 10.0),
            high_24h: Some(price * 1.1),
            low_24h: Some(price * 0.9),
            price_change_percentage_24h: Some(change),
            last_updated: None,
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn fetch_markets(
            &self,
            _request: &MarketsRequest,
        ) -> Result<Vec<CoinRecord>, ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some(MockReply::Coins(coins)) => Ok(coins),
                Some(MockReply::Error(err)) => Err(err),
                Some(MockReply::Delayed(delay, coins)) => {
                    tokio::time::sleep(delay).await;
                    Ok(coins)
                }
                None => Err(ProviderError::ServiceUnavailable),
            }
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
