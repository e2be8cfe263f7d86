//! Core types for the option-arcade trading venue.
//!
//! This crate provides the shared data model used across the venue:
//! fixed-unit monetary values, assets and the market regime, candles,
//! accounts, positions, and money-movement requests. Every
//! string-dispatched concept of the domain (trade direction, transaction
//! kind, market trend) is a closed enum so matches are checked at compile
//! time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod account;
mod asset;
mod candle;
mod money;

pub use account::{
    AdminCredential, SessionUser, Settings, Trade, TradeResult, TradeStatus, Transaction,
    TransactionKind, TransactionStatus, User,
};
pub use asset::{
    Asset, AssetKind, HISTORY_CAP, MarketState, PricePoint, VOLATILITY_MAX, VOLATILITY_MIN,
};
pub use candle::Candle;
pub use money::{Cash, Price};

// =============================================================================
// Core ID Types (Newtypes for type safety)
// =============================================================================

/// Unique identifier for users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User({})", self.0)
    }
}

/// Unique identifier for trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct TradeId(pub u64);

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trade({})", self.0)
    }
}

/// Unique identifier for deposit/withdraw requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Txn({})", self.0)
    }
}

// =============================================================================
// Symbol and Time Types
// =============================================================================

/// Asset ticker symbol (e.g. "AAPL", "BTC").
pub type Symbol = String;

/// Wall clock timestamp in milliseconds since epoch.
pub type Timestamp = u64;

// =============================================================================
// Direction
// =============================================================================

/// Which way a binary-options position bets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

// =============================================================================
// Market Trend
// =============================================================================

/// Administratively selected global drift regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketTrend {
    #[default]
    Random,
    Up,
    Down,
}

impl fmt::Display for MarketTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketTrend::Random => write!(f, "random"),
            MarketTrend::Up => write!(f, "up"),
            MarketTrend::Down => write!(f, "down"),
        }
    }
}

// =============================================================================
// Sector
// =============================================================================

/// Industry sector, used for correlated drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Sector {
    Technology,
    Cryptocurrency,
    Automotive,
    Commodities,
    #[default]
    Other,
}

impl Sector {
    /// How strongly this sector amplifies (or damps) the global trend.
    pub fn trend_multiplier(self) -> f64 {
        match self {
            Sector::Technology => 1.2,
            Sector::Cryptocurrency => 1.5,
            Sector::Automotive => 0.8,
            Sector::Commodities => 0.5,
            Sector::Other => 1.0,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sector::Technology => "Technology",
            Sector::Cryptocurrency => "Cryptocurrency",
            Sector::Automotive => "Automotive",
            Sector::Commodities => "Commodities",
            Sector::Other => "Other",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Timeframe
// =============================================================================

/// Candle bucket duration for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[default]
    M1,
    M5,
    M15,
    H1,
}

impl Timeframe {
    /// Bucket duration in milliseconds.
    pub fn duration_ms(self) -> u64 {
        match self {
            Timeframe::M1 => 60_000,
            Timeframe::M5 => 300_000,
            Timeframe::M15 => 900_000,
            Timeframe::H1 => 3_600_000,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::M1 => write!(f, "1m"),
            Timeframe::M5 => write!(f, "5m"),
            Timeframe::M15 => write!(f, "15m"),
            Timeframe::H1 => write!(f, "1h"),
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Timeframe::M1),
            "5m" => Ok(Timeframe::M5),
            "15m" => Ok(Timeframe::M15),
            "1h" => Ok(Timeframe::H1),
            other => Err(format!("unknown timeframe: {other}")),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
