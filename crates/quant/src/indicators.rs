//! Technical indicators over the closed-candle window.
//!
//! All indicators are pure functions of the close-price sequence and are
//! recomputed on demand from the chart's window; nothing here holds
//! state. Each comes in two forms: the latest value via the [`Indicator`]
//! trait, and an input-aligned series (`Vec<Option<f64>>`) for overlay
//! rendering, where `None` marks positions before the indicator's
//! minimum sample count.

use types::Candle;

use crate::IndicatorKind;

/// Trait for technical indicators.
///
/// Candles are expected ordered oldest to newest. `calculate` returns
/// `None` while there is insufficient data.
pub trait Indicator: Send + Sync {
    /// The kind of this indicator (for identification and factories).
    fn kind(&self) -> IndicatorKind;

    /// Latest indicator value over the candle window.
    fn calculate(&self, candles: &[Candle]) -> Option<f64>;

    /// Minimum number of candles for a defined output.
    fn required_periods(&self) -> usize;
}

fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close.to_float()).collect()
}

// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================

/// Simple Moving Average: arithmetic mean of the trailing `period`
/// closes. The chart overlays SMA(14) by default.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub const DEFAULT_PERIOD: usize = 14;

    /// # Panics
    /// Panics if period is 0.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self { period }
    }

    /// Input-aligned SMA series; `None` until `period` samples exist.
    pub fn series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
        let mut out = vec![None; prices.len()];
        if period == 0 {
            return out;
        }
        for i in (period - 1)..prices.len() {
            let window = &prices[i + 1 - period..=i];
            out[i] = Some(window.iter().sum::<f64>() / period as f64);
        }
        out
    }

    /// Latest SMA over a price slice.
    pub fn latest(prices: &[f64], period: usize) -> Option<f64> {
        if period == 0 || prices.len() < period {
            return None;
        }
        let sum: f64 = prices.iter().rev().take(period).sum();
        Some(sum / period as f64)
    }
}

impl Indicator for Sma {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Sma(self.period)
    }

    fn calculate(&self, candles: &[Candle]) -> Option<f64> {
        Sma::latest(&closes(candles), self.period)
    }

    fn required_periods(&self) -> usize {
        self.period
    }
}

// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================

/// Exponential Moving Average, seeded with the SMA of the first `period`
/// closes, then `ema = (close - prev) * k + prev` with
/// `k = 2 / (period + 1)`. The chart overlays EMA(12) by default.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
}

impl Ema {
    pub const DEFAULT_PERIOD: usize = 12;

    /// # Panics
    /// Panics if period is 0.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "EMA period must be > 0");
        Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
        }
    }

    /// Input-aligned EMA series; `None` until `period` samples exist.
    pub fn series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
        let mut out = vec![None; prices.len()];
        if period == 0 || prices.len() < period {
            return out;
        }

        let multiplier = 2.0 / (period as f64 + 1.0);
        let mut ema = prices.iter().take(period).sum::<f64>() / period as f64;
        out[period - 1] = Some(ema);

        for i in period..prices.len() {
            ema = (prices[i] - ema) * multiplier + ema;
            out[i] = Some(ema);
        }
        out
    }

    /// Latest EMA over a price slice.
    pub fn latest(prices: &[f64], period: usize) -> Option<f64> {
        Self::series(prices, period).last().copied().flatten()
    }
}

impl Indicator for Ema {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Ema(self.period)
    }

    fn calculate(&self, candles: &[Candle]) -> Option<f64> {
        let prices = closes(candles);
        if prices.len() < self.period {
            return None;
        }
        let mut ema = prices.iter().take(self.period).sum::<f64>() / self.period as f64;
        for price in prices.iter().skip(self.period) {
            ema = (price - ema) * self.multiplier + ema;
        }
        Some(ema)
    }

    fn required_periods(&self) -> usize {
        self.period
    }
}

// =============================================================================
// Relative Strength Index (RSI)
// =============================================================================

/// Relative Strength Index on a 0-100 scale.
///
/// Deliberately the per-window simple-average variant, not Wilder's
/// smoothing: each output averages the gains and losses of the trailing
/// `period` close-to-close deltas independently. Exactly 100 when the
/// trailing average loss is zero; undefined until `period + 1` closes.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub const DEFAULT_PERIOD: usize = 14;

    /// # Panics
    /// Panics if period is 0.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self { period }
    }

    fn from_window(deltas: &[f64], period: usize) -> f64 {
        let avg_gain = deltas.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
        let avg_loss = -deltas.iter().filter(|d| **d < 0.0).sum::<f64>() / period as f64;

        if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
        }
    }

    /// Input-aligned RSI series; `None` until `period + 1` samples exist.
    pub fn series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
        let mut out = vec![None; prices.len()];
        if period == 0 || prices.len() < period + 1 {
            return out;
        }
        let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
        for i in period..prices.len() {
            out[i] = Some(Self::from_window(&deltas[i - period..i], period));
        }
        out
    }

    /// Latest RSI over a price slice.
    pub fn latest(prices: &[f64], period: usize) -> Option<f64> {
        if period == 0 || prices.len() < period + 1 {
            return None;
        }
        let deltas: Vec<f64> = prices[prices.len() - period - 1..]
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect();
        Some(Self::from_window(&deltas, period))
    }
}

impl Indicator for Rsi {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Rsi(self.period)
    }

    fn calculate(&self, candles: &[Candle]) -> Option<f64> {
        Rsi::latest(&closes(candles), self.period)
    }

    fn required_periods(&self) -> usize {
        self.period + 1
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Create an indicator from its kind specification.
pub fn create_indicator(kind: IndicatorKind) -> Box<dyn Indicator> {
    match kind {
        IndicatorKind::Sma(p) => Box::new(Sma::new(p)),
        IndicatorKind::Ema(p) => Box::new(Ema::new(p)),
        IndicatorKind::Rsi(p) => Box::new(Rsi::new(p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Price;

    /// Helper to create test candles with given close prices.
    fn make_candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let mut candle = Candle::at(Price::from_float(close), i as u64);
                candle.update(Price::from_float(close), 1_000.0);
                candle
            })
            .collect()
    }

    #[test]
    fn test_sma_latest() {
        let candles = make_candles(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let sma = Sma::new(3);
        // (12 + 13 + 14) / 3 = 13
        assert!((sma.calculate(&candles).unwrap() - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_sma_undefined_below_period() {
        let candles = make_candles(&[10.0, 11.0]);
        assert!(Sma::new(5).calculate(&candles).is_none());
        let series = Sma::series(&[10.0, 11.0, 12.0], 3);
        assert_eq!(series[0], None);
        assert_eq!(series[1], None);
        assert!(series[2].is_some());
    }

    #[test]
    fn test_ema_seeds_with_sma() {
        let prices = [2.0, 4.0, 6.0, 8.0];
        let series = Ema::series(&prices, 3);
        // Seed = SMA of first 3 = 4; k = 0.5; next = (8-4)*0.5 + 4 = 6.
        assert_eq!(series[1], None);
        assert!((series[2].unwrap() - 4.0).abs() < 1e-9);
        assert!((series[3].unwrap() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_ema_trait_matches_series() {
        // Whole-unit closes so the candle round-trip is lossless.
        let closes = [2_227.0, 2_219.0, 2_208.0, 2_217.0, 2_218.0, 2_213.0, 2_223.0, 2_243.0];
        let candles = make_candles(&closes);
        let trait_value = Ema::new(5).calculate(&candles).unwrap();
        let series_value = Ema::latest(&closes, 5).unwrap();
        assert!((trait_value - series_value).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..16).map(|i| 1.0 + i as f64).collect();
        let rsi = Rsi::latest(&prices, 14).unwrap();
        assert!((rsi - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_bounded() {
        let prices: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        for value in Rsi::series(&prices, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_needs_period_plus_one() {
        let prices: Vec<f64> = (0..14).map(|i| i as f64).collect();
        assert!(Rsi::latest(&prices, 14).is_none());
        let prices: Vec<f64> = (0..15).map(|i| i as f64).collect();
        assert!(Rsi::latest(&prices, 14).is_some());
    }

    #[test]
    fn test_rsi_known_window() {
        // Deltas: +1, -1, +1, -1 -> avg gain 0.5, avg loss 0.5 -> RSI 50.
        let prices = [10.0, 11.0, 10.0, 11.0, 10.0];
        let rsi = Rsi::latest(&prices, 4).unwrap();
        assert!((rsi - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_factory_required_periods() {
        assert_eq!(create_indicator(IndicatorKind::Sma(14)).required_periods(), 14);
        assert_eq!(create_indicator(IndicatorKind::Ema(12)).required_periods(), 12);
        assert_eq!(create_indicator(IndicatorKind::Rsi(14)).required_periods(), 15);
    }
}
