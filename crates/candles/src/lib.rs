//! Candle aggregation for the focal asset's chart.
//!
//! One mutable in-progress candle plus a FIFO window of closed candles,
//! capped at [`WINDOW_CAP`]. Price samples extend the current candle's
//! envelope; once the bucket clock reaches the timeframe duration the
//! candle is closed into the window and a fresh one is seeded from the
//! latest price. Switching asset or timeframe resets the whole window.

use rand::Rng;

use types::{Candle, Price, Timeframe, Timestamp};

/// Maximum number of closed candles retained; oldest evicted first.
pub const WINDOW_CAP: usize = 50;

/// Number of closed candles the momentum signal looks back over.
const MOMENTUM_LOOKBACK: usize = 5;

/// Synthetic volume accumulated per unit of absolute price move.
const VOLUME_PER_MOVE: f64 = 5_000.0;

/// Sample a plausible seed candle around a base price.
///
/// Used both to back-fill the window on reset and to open each fresh
/// bucket. The envelope invariant holds by construction: high is drawn at
/// or above the open, low at or below it, and the close lands between
/// them.
fn seed_candle<R: Rng>(
    rng: &mut R,
    base: Price,
    volatility_pct: f64,
    opened_at: Timestamp,
) -> Candle {
    let v = volatility_pct / 100.0;
    let open = base.to_float();
    let high = open * (1.0 + rng.random_range(0.0..1.0) * v * 2.0);
    let low = open * (1.0 - rng.random_range(0.0..1.0) * v * 2.0);
    let close = low + rng.random_range(0.0..1.0) * (high - low);

    Candle {
        open: Price::from_float(open),
        high: Price::from_float(high).max(base),
        low: Price::from_float(low).min(base),
        close: Price::from_float(close.clamp(low, high)),
        volume: rng.random_range(1_000.0..11_000.0),
        opened_at,
    }
}

/// Rolling candlestick chart state for one asset/timeframe.
#[derive(Debug)]
pub struct CandleChart {
    timeframe: Timeframe,
    /// Asset volatility percentage, used when seeding candles.
    volatility_pct: f64,
    /// Closed candles, oldest first.
    closed: Vec<Candle>,
    current: Candle,
    /// Elapsed time inside the current bucket.
    bucket_elapsed_ms: u64,
}

impl CandleChart {
    /// Build a chart seeded with a full window of synthetic history.
    pub fn seeded<R: Rng>(
        rng: &mut R,
        price: Price,
        volatility_pct: f64,
        timeframe: Timeframe,
        now: Timestamp,
    ) -> Self {
        let mut chart = Self {
            timeframe,
            volatility_pct,
            closed: Vec::with_capacity(WINDOW_CAP + 1),
            current: Candle::at(price, now),
            bucket_elapsed_ms: 0,
        };
        chart.reseed(rng, price, now);
        chart
    }

    fn reseed<R: Rng>(&mut self, rng: &mut R, price: Price, now: Timestamp) {
        self.closed.clear();
        for _ in 0..WINDOW_CAP {
            self.closed
                .push(seed_candle(rng, price, self.volatility_pct, now));
        }
        self.current = seed_candle(rng, price, self.volatility_pct, now);
        self.bucket_elapsed_ms = 0;
    }

    /// Reset the window for a new focal asset.
    pub fn reset<R: Rng>(
        &mut self,
        rng: &mut R,
        price: Price,
        volatility_pct: f64,
        now: Timestamp,
    ) {
        self.volatility_pct = volatility_pct;
        self.reseed(rng, price, now);
    }

    /// Switch bucket duration; resets the window.
    pub fn set_timeframe<R: Rng>(
        &mut self,
        rng: &mut R,
        timeframe: Timeframe,
        price: Price,
        now: Timestamp,
    ) {
        self.timeframe = timeframe;
        self.reseed(rng, price, now);
    }

    /// Fold a price sample into the current candle.
    ///
    /// `move_fraction` drives the synthetic volume. Returns `true` when
    /// the bucket elapsed and the candle rolled into the window.
    pub fn apply<R: Rng>(
        &mut self,
        rng: &mut R,
        price: Price,
        move_fraction: f64,
        tick_ms: u64,
        now: Timestamp,
    ) -> bool {
        self.current
            .update(price, move_fraction.abs() * VOLUME_PER_MOVE);
        self.bucket_elapsed_ms += tick_ms;

        if self.bucket_elapsed_ms < self.timeframe.duration_ms() {
            return false;
        }

        let finished = std::mem::replace(
            &mut self.current,
            seed_candle(rng, price, self.volatility_pct, now),
        );
        self.closed.push(finished);
        if self.closed.len() > WINDOW_CAP {
            self.closed.remove(0);
        }
        self.bucket_elapsed_ms = 0;
        true
    }

    /// Closed candles, oldest first.
    pub fn closed(&self) -> &[Candle] {
        &self.closed
    }

    /// The mutable in-progress candle.
    pub fn current(&self) -> &Candle {
        &self.current
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Fractional close-price change over the last
    /// [`MOMENTUM_LOOKBACK`] closed candles; 0 until enough exist.
    pub fn momentum(&self) -> f64 {
        if self.closed.len() < MOMENTUM_LOOKBACK {
            return 0.0;
        }
        let recent = &self.closed[self.closed.len() - MOMENTUM_LOOKBACK..];
        let first = recent[0].close.to_float();
        let last = recent[recent.len() - 1].close.to_float();
        if first == 0.0 {
            return 0.0;
        }
        (last - first) / first
    }
}
