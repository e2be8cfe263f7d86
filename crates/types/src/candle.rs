//! OHLCV candle data.

use serde::{Deserialize, Serialize};

use crate::{Price, Timestamp};

/// OHLCV aggregate over a fixed time bucket.
///
/// A candle is mutable only while it is the chart's current bucket; once
/// its bucket elapses it is pushed into the rolling window and never
/// touched again. The envelope invariant `high >= max(open, close)` and
/// `low <= min(open, close)` holds after construction and after every
/// [`Candle::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Opening price.
    pub open: Price,
    /// Highest price during the bucket.
    pub high: Price,
    /// Lowest price during the bucket.
    pub low: Price,
    /// Closing price (latest sample while the bucket is open).
    pub close: Price,
    /// Accumulated synthetic volume.
    pub volume: f64,
    /// Wall clock time the bucket opened (ms since epoch).
    pub opened_at: Timestamp,
}

impl Candle {
    /// Open a flat candle at the given price.
    pub fn at(price: Price, opened_at: Timestamp) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 0.0,
            opened_at,
        }
    }

    /// Fold a new price sample into the candle.
    pub fn update(&mut self, price: Price, volume_delta: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += volume_delta;
    }

    /// Candle range (high - low).
    #[inline]
    pub fn range(&self) -> Price {
        self.high - self.low
    }

    /// Close above open.
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close below open.
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Whether the OHLC envelope invariant holds.
    pub fn envelope_ok(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_candle() {
        let c = Candle::at(Price(1_000), 0);
        assert_eq!(c.open, Price(1_000));
        assert_eq!(c.high, Price(1_000));
        assert_eq!(c.low, Price(1_000));
        assert_eq!(c.close, Price(1_000));
        assert!(c.envelope_ok());
    }

    #[test]
    fn test_update_maintains_envelope() {
        let mut c = Candle::at(Price(1_000), 0);
        c.update(Price(1_050), 10.0);
        c.update(Price(980), 5.0);
        c.update(Price(1_010), 2.0);

        assert_eq!(c.high, Price(1_050));
        assert_eq!(c.low, Price(980));
        assert_eq!(c.close, Price(1_010));
        assert_eq!(c.volume, 17.0);
        assert!(c.envelope_ok());
    }

    #[test]
    fn test_bullish_bearish() {
        let mut c = Candle::at(Price(1_000), 0);
        c.update(Price(1_100), 1.0);
        assert!(c.is_bullish());
        c.update(Price(900), 1.0);
        assert!(c.is_bearish());
    }
}
