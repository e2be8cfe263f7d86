//! Tradeable assets and the global market regime.

use serde::{Deserialize, Serialize};

use crate::{MarketTrend, Price, Sector, Timestamp};

/// Maximum retained price-history entries per asset.
pub const HISTORY_CAP: usize = 100;

/// Volatility bounds (percent) enforced at asset creation.
pub const VOLATILITY_MIN: f64 = 0.1;
pub const VOLATILITY_MAX: f64 = 50.0;

/// Kind of instrument, for display grouping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Stock,
    Crypto,
    Commodity,
}

/// A single retained price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: Price,
    pub recorded_at: Timestamp,
}

/// A tradeable asset.
///
/// `history` is most-recent-first and capped at [`HISTORY_CAP`]; the
/// prior price is appended before every overwrite of `price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub price: Price,
    /// Per-tick volatility as a percentage (bounds 0.1 - 50).
    pub volatility: f64,
    pub kind: AssetKind,
    pub sector: Sector,
    pub history: Vec<PricePoint>,
}

impl Asset {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price: Price,
        volatility: f64,
        kind: AssetKind,
        sector: Sector,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price,
            volatility,
            kind,
            sector,
            history: Vec::new(),
        }
    }

    /// Record the current price into history (most-recent-first, capped),
    /// then overwrite it with the new quote.
    pub fn record_price(&mut self, new_price: Price, now: Timestamp) {
        self.history.insert(
            0,
            PricePoint {
                price: self.price,
                recorded_at: now,
            },
        );
        self.history.truncate(HISTORY_CAP);
        self.price = new_price;
    }

    /// Fractional change against the previous retained price, as a
    /// percentage. `None` until at least one history entry exists.
    pub fn change_pct(&self) -> Option<f64> {
        let prev = self.history.first()?.price;
        if prev.raw() == 0 {
            return None;
        }
        Some((self.price.raw() - prev.raw()) as f64 / prev.raw() as f64 * 100.0)
    }
}

/// Process-wide market regime, set by administrative action and read by
/// every per-tick price update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    pub trend: MarketTrend,
    /// Signed bias intensity; positive in bull regimes, negative in bear.
    pub strength: f64,
    /// Multiplier applied to background-asset volatility.
    pub volatility: f64,
    pub last_update: Timestamp,
}

impl Default for MarketState {
    fn default() -> Self {
        Self {
            trend: MarketTrend::Random,
            strength: 0.0,
            volatility: 1.0,
            last_update: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_price_appends_prior() {
        let mut asset = Asset::new(
            "AAPL",
            "Apple Inc.",
            Price(175_000),
            8.0,
            AssetKind::Stock,
            Sector::Technology,
        );
        asset.record_price(Price(176_000), 1);
        assert_eq!(asset.price, Price(176_000));
        assert_eq!(asset.history[0].price, Price(175_000));
    }

    #[test]
    fn test_history_cap() {
        let mut asset = Asset::new(
            "BTC",
            "Bitcoin",
            Price(1_000),
            25.0,
            AssetKind::Crypto,
            Sector::Cryptocurrency,
        );
        for i in 0..150 {
            asset.record_price(Price(1_000 + i), i as Timestamp);
        }
        assert_eq!(asset.history.len(), HISTORY_CAP);
        // Most recent first: head is the price prior to the last write.
        assert_eq!(asset.history[0].price, Price(1_000 + 148));
    }

    #[test]
    fn test_change_pct() {
        let mut asset = Asset::new(
            "GOLD",
            "Gold",
            Price(1_000),
            3.0,
            AssetKind::Commodity,
            Sector::Commodities,
        );
        assert_eq!(asset.change_pct(), None);
        asset.record_price(Price(1_010), 1);
        let change = asset.change_pct().unwrap();
        assert!((change - 1.0).abs() < 1e-9);
    }
}
