//! Technical analysis for the option-arcade chart.
//!
//! Pull-based indicator calculators over the closed-candle window:
//! recomputed from scratch on every redraw, never cached, because the
//! window is capped at 50 candles and the math is trivial at that size.

use serde::{Deserialize, Serialize};

pub mod indicators;

pub use indicators::{Ema, Indicator, Rsi, Sma, create_indicator};

/// Kind of technical indicator, with its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
}

impl IndicatorKind {
    /// Minimum closed candles before the indicator is defined.
    pub fn required_periods(&self) -> usize {
        match self {
            IndicatorKind::Sma(p) | IndicatorKind::Ema(p) => *p,
            IndicatorKind::Rsi(p) => *p + 1,
        }
    }
}
