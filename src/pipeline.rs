//! Derives the display list from the raw snapshot
//!
//! ```text
//! raw list
//!     ↓ search (name / symbol, case-insensitive)
//!     ↓ rank ceiling
//!     ↓ 24h change sign
//!     ↓ gainers / losers (top 10 slice)
//!     ↓ price bracket
//!     ↓ sort
//! derived list
//! ```
//!
//! Every stage produces a new sequence of borrows; the raw list is never
//! touched.

use crate::constants::TOP_MOVERS_LIMIT;
use crate::filters::{is_gaining, is_losing, FilterState, MoversMode, SortState};
use crate::types::CoinRecord;
use std::cmp::Ordering;

/// Everything the user controls that shapes the derived list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub search: String,
    pub filters: FilterState,
    pub sort: SortState,
}

/// Runs the full pipeline over `raw`
pub fn derive<'a>(raw: &'a [CoinRecord], query: &Query) -> Vec<&'a CoinRecord> {
    let needle = query.search.to_lowercase();
    let filters = &query.filters;

    let filtered: Vec<&CoinRecord> = raw
        .iter()
        .filter(|coin| needle.is_empty() || matches_search(coin, &needle))
        .filter(|coin| filters.rank.admits(coin))
        .filter(|coin| filters.change.admits(coin))
        .collect();

    let mut result: Vec<&CoinRecord> = top_movers(filtered, filters.movers)
        .into_iter()
        .filter(|coin| filters.bracket.admits(coin))
        .collect();

    sort_records(&mut result, &query.sort);
    result
}

/// `needle` must already be lowercase
fn matches_search(coin: &CoinRecord, needle: &str) -> bool {
    coin.name.to_lowercase().contains(needle) || coin.symbol.to_lowercase().contains(needle)
}

/// Applies the gainers / losers override; `All` passes the set through
pub fn top_movers(coins: Vec<&CoinRecord>, mode: MoversMode) -> Vec<&CoinRecord> {
    let change = |c: &CoinRecord| c.price_change_percentage_24h.unwrap_or_default();

    let mut movers: Vec<&CoinRecord> = match mode {
        MoversMode::All => return coins,
        MoversMode::TopGainers => coins.into_iter().filter(|c| is_gaining(c)).collect(),
        MoversMode::TopLosers => coins.into_iter().filter(|c| is_losing(c)).collect(),
    };

    movers.sort_by(|a, b| {
        let ord = change(*a).partial_cmp(&change(*b)).unwrap_or(Ordering::Equal);
        match mode {
            MoversMode::TopGainers => ord.reverse(),
            _ => ord,
        }
    });
    movers.truncate(TOP_MOVERS_LIMIT);
    movers
}

/// Stable sort on the selected field
pub fn sort_records(coins: &mut [&CoinRecord], sort: &SortState) {
    coins.sort_by(|a, b| sort.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{
        PriceBracket, PriceChange, RankCeiling, SortDirection, SortField,
    };

    fn coin(id: &str, rank: u32, price: f64, change: f64) -> CoinRecord {
        CoinRecord {
            id: id.to_string(),
            symbol: id.to_string(),
            name: format!("{} coin", id.to_uppercase()),
            image: None,
            current_price: Some(price),
            market_cap: Some(price * 1_000.0),
            market_cap_rank: Some(rank),
            total_volume: None,
            high_24h: None,
            low_24h: None,
            price_change_percentage_24h: Some(change),
            last_updated: None,
        }
    }

    fn ids(coins: &[&CoinRecord]) -> Vec<String> {
        coins.iter().map(|c| c.id.clone()).collect()
    }

    fn sample() -> Vec<CoinRecord> {
        vec![
            coin("btc", 1, 5_000_000.0, 1.5),
            coin("eth", 2, 250_000.0, -2.0),
            coin("sol", 5, 12_000.0, 7.25),
            coin("doge", 9, 12.0, -8.0),
            coin("ada", 11, 40.0, 0.0),
            coin("link", 14, 1_200.0, 3.0),
        ]
    }

    #[test]
    fn test_reference_example() {
        let raw = vec![coin("a", 1, 50.0, 5.0), coin("b", 2, 200.0, -3.0)];
        let mut query = Query {
            sort: SortState {
                field: SortField::MarketCapRank,
                direction: SortDirection::Asc,
            },
            ..Query::default()
        };
        assert_eq!(ids(&derive(&raw, &query)), vec!["a", "b"]);

        query.filters.movers = MoversMode::TopGainers;
        assert_eq!(ids(&derive(&raw, &query)), vec!["a"]);
    }

    #[test]
    fn test_search_matches_name_or_symbol_case_insensitively() {
        let raw = sample();
        let query = Query {
            search: "ETH".to_string(),
            ..Query::default()
        };
        assert_eq!(ids(&derive(&raw, &query)), vec!["eth"]);

        let query = Query {
            search: "Coin".to_string(),
            ..Query::default()
        };
        let derived = derive(&raw, &query);
        assert_eq!(derived.len(), raw.len());
        for c in derived {
            assert!(c.name.to_lowercase().contains("coin") || c.symbol.contains("coin"));
        }
    }

    #[test]
    fn test_search_keeps_surrounding_whitespace() {
        let mut bitcoin = coin("bitcoin", 1, 5_000_000.0, 1.0);
        bitcoin.symbol = "btc".to_string();
        bitcoin.name = "Bitcoin".to_string();
        let mut cash = coin("bitcoin-cash", 20, 30_000.0, 2.0);
        cash.symbol = "bch".to_string();
        cash.name = "Bitcoin Cash".to_string();
        let raw = vec![bitcoin, cash];

        let query = Query {
            search: "bitcoin ".to_string(),
            ..Query::default()
        };
        let derived = derive(&raw, &query);
        assert_eq!(ids(&derived), vec!["bitcoin-cash"]);
        for c in &derived {
            assert!(c.name.to_lowercase().contains("bitcoin ") || c.symbol.contains("bitcoin "));
        }

        let query = Query {
            search: "  ".to_string(),
            ..Query::default()
        };
        assert!(derive(&raw, &query).is_empty());
    }

    #[test]
    fn test_rank_ceiling_bounds_every_record() {
        let raw = sample();
        let mut query = Query::default();
        query.filters.rank = RankCeiling::Top10;
        let derived = derive(&raw, &query);
        assert_eq!(derived.len(), 4);
        assert!(derived.iter().all(|c| c.market_cap_rank.unwrap() <= 10));
    }

    #[test]
    fn test_gainers_and_losers() {
        let mut raw = sample();
        for i in 0..15 {
            raw.push(coin(&format!("g{}", i), 20 + i, 1.0, 0.5 + i as f64));
        }

        let gainers = top_movers(raw.iter().collect(), MoversMode::TopGainers);
        assert_eq!(gainers.len(), 10);
        assert!(gainers.iter().all(|c| c.price_change_percentage_24h.unwrap() > 0.0));
        assert!(gainers.windows(2).all(|w| {
            w[0].price_change_percentage_24h >= w[1].price_change_percentage_24h
        }));

        let losers = top_movers(raw.iter().collect(), MoversMode::TopLosers);
        assert_eq!(ids(&losers), vec!["doge", "eth"]);
    }

    #[test]
    fn test_bracket_applies_after_movers() {
        let raw = sample();
        let mut query = Query::default();
        query.filters.movers = MoversMode::TopGainers;
        query.filters.bracket = PriceBracket::Medium;
        assert_eq!(ids(&derive(&raw, &query)), vec!["link"]);
    }

    #[test]
    fn test_filters_compose() {
        let raw = sample();
        let mut query = Query::default();
        query.filters.rank = RankCeiling::Top10;
        query.filters.change = PriceChange::Negative;
        query.sort = SortState::cleared();
        assert_eq!(ids(&derive(&raw, &query)), vec!["eth", "doge"]);
    }

    #[test]
    fn test_final_sort_orders_numerically() {
        let raw = sample();
        let mut query = Query::default();
        query.sort = SortState {
            field: SortField::PriceChange24h,
            direction: SortDirection::Desc,
        };
        let derived = derive(&raw, &query);
        assert_eq!(ids(&derived), vec!["sol", "link", "btc", "ada", "eth", "doge"]);

        query.sort.direction = SortDirection::Asc;
        let derived = derive(&raw, &query);
        assert_eq!(derived.first().map(|c| c.id.as_str()), Some("doge"));
    }

    #[test]
    fn test_derive_leaves_raw_untouched() {
        let raw = sample();
        let before = raw.clone();
        let query = Query {
            sort: SortState::cleared(),
            ..Query::default()
        };
        let _ = derive(&raw, &query);
        assert_eq!(raw, before);
    }
}
