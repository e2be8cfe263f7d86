//! Price simulation for the option-arcade venue.
//!
//! This crate owns the synthetic market: the per-tick price-path
//! generator (global trend bias, sector correlation, momentum, clamping)
//! and the transient news shocks layered onto the focal asset.
//!
//! # Tick shape
//!
//! ```text
//! Tick N:
//!   1. NewsDesk::advance()          spawn/decay the news overlay
//!   2. PricePath::focal_move()      full formula for the charted asset
//!   3. PricePath::background_move() cheap formula for everything else
//!   4. apply_move()                 floor at 1, round to the unit
//! ```
//!
//! Both generators are seeded and deterministic, so a fixed seed replays
//! the same path.

pub mod news;
pub mod path;

pub use news::{NewsDesk, NewsEvent};
pub use path::{PricePath, apply_move, assign_strength};
