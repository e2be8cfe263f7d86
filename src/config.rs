//! Run configuration for the demo session.

use std::path::PathBuf;

use types::{Cash, Symbol, Timeframe};

/// Configuration for one demo run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Database path; `None` runs against an in-memory store.
    pub db_path: Option<PathBuf>,
    /// Total ticks to run.
    pub ticks: u64,
    /// Simulated milliseconds per tick.
    pub tick_ms: u64,
    /// Seed for the price path, news desk, and candle seeding.
    pub seed: u64,
    /// Candle bucket duration for the focal chart.
    pub timeframe: Timeframe,
    /// Asset shown on the chart (full price formula).
    pub focal: Symbol,
    /// Stake for each demo position.
    pub demo_stake: Cash,
    /// Duration of the first demo position; the second runs twice as long.
    pub demo_duration_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            ticks: 120,
            tick_ms: 1_000,
            seed: 42,
            timeframe: Timeframe::M1,
            focal: "AAPL".to_string(),
            demo_stake: Cash(25_000),
            demo_duration_secs: 30,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    pub fn focal(mut self, focal: impl Into<Symbol>) -> Self {
        self.focal = focal.into();
        self
    }

    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    /// Simulated run length in milliseconds.
    pub fn run_length_ms(&self) -> u64 {
        self.ticks * self.tick_ms
    }
}
