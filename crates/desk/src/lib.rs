//! Service layer for the option-arcade venue.
//!
//! Thin, stateless functions over the document store: registration and
//! login, trade placement and deferred settlement, deposit/withdraw
//! review, and the administrative surface. The only stateful pieces are
//! the [`MarketEngine`] (chart + price path + news) and the
//! [`SettlementScheduler`] (task table of unexpired positions), both
//! owned by the caller and polled from a single cooperative loop.
//!
//! Every function takes the [`storage::Store`] by reference; there is no
//! global state anywhere in the crate.

pub mod admin;
pub mod auth;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod stats;
pub mod trading;
pub mod transactions;

pub use engine::{ChartOverlays, MarketEngine, TickReport};
pub use error::{DeskError, DeskResult};
pub use scheduler::{PendingSettlement, SettlementScheduler};
pub use stats::{PerformanceTier, UserStats, user_stats};
pub use trading::{SettlementOutcome, place_trade, settle_trade};
