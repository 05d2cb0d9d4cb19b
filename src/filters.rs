//! Filter and sort settings that drive the derivation pipeline

use crate::constants::{HIGH_PRICE_FLOOR, LOW_PRICE_CEILING};
use crate::types::CoinRecord;
use std::cmp::Ordering;

/// Keep only coins ranked at or above a ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankCeiling {
    #[default]
    All,
    Top10,
    Top50,
    Top100,
}

impl RankCeiling {
    /// The inclusive rank limit, or `None` when unbounded
    pub fn limit(&self) -> Option<u32> {
        match self {
            RankCeiling::All => None,
            RankCeiling::Top10 => Some(10),
            RankCeiling::Top50 => Some(50),
            RankCeiling::Top100 => Some(100),
        }
    }

    pub fn next(self) -> Self {
        match self {
            RankCeiling::All => RankCeiling::Top10,
            RankCeiling::Top10 => RankCeiling::Top50,
            RankCeiling::Top50 => RankCeiling::Top100,
            RankCeiling::Top100 => RankCeiling::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RankCeiling::All => "All Ranks",
            RankCeiling::Top10 => "Top 10",
            RankCeiling::Top50 => "Top 50",
            RankCeiling::Top100 => "Top 100",
        }
    }

    /// Absent ranks never pass a bounded ceiling
    pub fn admits(&self, coin: &CoinRecord) -> bool {
        match self.limit() {
            None => true,
            Some(limit) => coin.market_cap_rank.is_some_and(|rank| rank <= limit),
        }
    }
}

/// Keep only coins whose 24h change has a given sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceChange {
    #[default]
    All,
    Positive,
    Negative,
}

impl PriceChange {
    pub fn next(self) -> Self {
        match self {
            PriceChange::All => PriceChange::Positive,
            PriceChange::Positive => PriceChange::Negative,
            PriceChange::Negative => PriceChange::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceChange::All => "All Changes",
            PriceChange::Positive => "Positive (+)",
            PriceChange::Negative => "Negative (-)",
        }
    }

    pub fn admits(&self, coin: &CoinRecord) -> bool {
        match self {
            PriceChange::All => true,
            PriceChange::Positive => is_gaining(coin),
            PriceChange::Negative => is_losing(coin),
        }
    }
}

/// Keep only coins whose price falls in a bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBracket {
    #[default]
    All,
    /// Below 100
    Low,
    /// 100 to 10,000 inclusive
    Medium,
    /// Above 10,000
    High,
}

impl PriceBracket {
    pub fn next(self) -> Self {
        match self {
            PriceBracket::All => PriceBracket::Low,
            PriceBracket::Low => PriceBracket::Medium,
            PriceBracket::Medium => PriceBracket::High,
            PriceBracket::High => PriceBracket::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceBracket::All => "All Prices",
            PriceBracket::Low => "Under 100",
            PriceBracket::Medium => "100 - 10,000",
            PriceBracket::High => "Above 10,000",
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        match self {
            PriceBracket::All => true,
            PriceBracket::Low => price < LOW_PRICE_CEILING,
            PriceBracket::Medium => (LOW_PRICE_CEILING..=HIGH_PRICE_FLOOR).contains(&price),
            PriceBracket::High => price > HIGH_PRICE_FLOOR,
        }
    }

    /// Absent prices never pass a bounded bracket
    pub fn admits(&self, coin: &CoinRecord) -> bool {
        match self {
            PriceBracket::All => true,
            _ => coin.current_price.is_some_and(|price| self.contains(price)),
        }
    }
}

/// Replace the filtered set with the biggest movers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoversMode {
    #[default]
    All,
    TopGainers,
    TopLosers,
}

impl MoversMode {
    pub fn next(self) -> Self {
        match self {
            MoversMode::All => MoversMode::TopGainers,
            MoversMode::TopGainers => MoversMode::TopLosers,
            MoversMode::TopLosers => MoversMode::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoversMode::All => "All",
            MoversMode::TopGainers => "Top Gainers",
            MoversMode::TopLosers => "Top Losers",
        }
    }
}

pub(crate) fn is_gaining(coin: &CoinRecord) -> bool {
    coin.price_change_percentage_24h.is_some_and(|c| c > 0.0)
}

pub(crate) fn is_losing(coin: &CoinRecord) -> bool {
    coin.price_change_percentage_24h.is_some_and(|c| c < 0.0)
}

/// The four filter dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub rank: RankCeiling,
    pub change: PriceChange,
    pub bracket: PriceBracket,
    pub movers: MoversMode,
}

impl FilterState {
    /// True when every dimension is unbounded
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Fields the final sort can order by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CurrentPrice,
    MarketCap,
    PriceChange24h,
    MarketCapRank,
}

impl SortField {
    /// Fields the user can pick; rank is only ever the initial order
    pub const SELECTABLE: [SortField; 3] = [
        SortField::CurrentPrice,
        SortField::MarketCap,
        SortField::PriceChange24h,
    ];

    pub fn is_selectable(&self) -> bool {
        Self::SELECTABLE.contains(self)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::CurrentPrice => "Price",
            SortField::MarketCap => "Market Cap",
            SortField::PriceChange24h => "24h Change",
            SortField::MarketCapRank => "Rank",
        }
    }

    /// Read this field from a coin
    pub fn value(&self, coin: &CoinRecord) -> Option<f64> {
        match self {
            SortField::CurrentPrice => coin.current_price,
            SortField::MarketCap => coin.market_cap,
            SortField::PriceChange24h => coin.price_change_percentage_24h,
            SortField::MarketCapRank => coin.market_cap_rank.map(f64::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// Upstream order: rank ascending
    fn default() -> Self {
        Self {
            field: SortField::MarketCapRank,
            direction: SortDirection::Asc,
        }
    }
}

impl SortState {
    /// The order restored by "clear filters"
    pub fn cleared() -> Self {
        Self {
            field: SortField::MarketCap,
            direction: SortDirection::Desc,
        }
    }

    /// Re-selecting the active field flips direction; a new field starts descending.
    /// Non-selectable fields are ignored.
    pub fn select(self, field: SortField) -> Self {
        if !field.is_selectable() {
            return self;
        }
        if self.field == field {
            Self {
                field,
                direction: self.direction.flip(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Desc,
            }
        }
    }

    /// Compare two coins on the active field. Absent values sort last in
    /// either direction.
    pub fn compare(&self, a: &CoinRecord, b: &CoinRecord) -> Ordering {
        match (self.field.value(a), self.field.value(b)) {
            (Some(x), Some(y)) => {
                let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                match self.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
