//! Synthetic price-path generation.
//!
//! Two formulas coexist deliberately. The focal asset (the one on the
//! chart) gets the full treatment: redrawn trend strength, candle
//! momentum, and news impact, clamped to a tenth of its volatility. Every
//! background asset gets a cheaper update driven by the stored market
//! strength and the global volatility multiplier, clamped at 0.15x. The
//! divergence matches the source system and is kept as-is.

use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use types::{MarketState, MarketTrend, Price, Sector};

/// Per-tick price-move generator.
///
/// Deterministic given the same seed, enabling reproducible paths for
/// testing and debugging.
pub struct PricePath {
    rng: StdRng,
}

impl PricePath {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw the per-tick trend strength for the focal formula.
    ///
    /// Up: [0.4, 0.7). Down: (-0.7, -0.4]. Random: [-0.1, 0.1).
    fn trend_strength(&mut self, trend: MarketTrend) -> f64 {
        match trend {
            MarketTrend::Up => self.rng.random_range(0.4..0.7),
            MarketTrend::Down => -self.rng.random_range(0.4..0.7),
            MarketTrend::Random => self.rng.random_range(-0.1..0.1),
        }
    }

    /// Fractional move for the focal asset.
    ///
    /// `volatility_pct` is the asset's volatility percentage, `momentum`
    /// the fractional close change over the last five closed candles, and
    /// `news_impact` the decayed strength of the active news event (0 when
    /// none is active). The result is clamped to `±volatility * 0.1`.
    pub fn focal_move(
        &mut self,
        volatility_pct: f64,
        sector: Sector,
        market: &MarketState,
        momentum: f64,
        news_impact: f64,
    ) -> f64 {
        let v = volatility_pct / 100.0;
        let trend_bias = self.trend_strength(market.trend) * sector.trend_multiplier();

        let noise = self.rng.random_range(-0.5..0.5) * v * 0.5;
        let raw = trend_bias * v + noise + momentum * 0.2 + news_impact;

        let cap = v * 0.1;
        raw.clamp(-cap, cap)
    }

    /// Fractional move for a background asset.
    ///
    /// Uses the stored market strength (no per-tick redraw), scales the
    /// asset volatility by the global multiplier, and skips momentum and
    /// news. Clamped to `±adjusted_volatility * 0.15`.
    pub fn background_move(
        &mut self,
        volatility_pct: f64,
        sector: Sector,
        market: &MarketState,
    ) -> f64 {
        let adjusted = (volatility_pct / 100.0) * market.volatility;
        let bias = market.strength * sector.trend_multiplier();

        let raw = bias * adjusted + self.rng.random_range(-0.5..0.5) * adjusted;

        let cap = adjusted * 0.15;
        raw.clamp(-cap, cap)
    }
}

/// Apply a fractional move to a price: floor at 1, round to the unit.
pub fn apply_move(price: Price, move_fraction: f64) -> Price {
    Price::from_float(price.to_float() * (1.0 + move_fraction)).max(Price::FLOOR)
}

/// Derive the stored strength for a newly selected trend.
///
/// This is the administrative counterpart of the per-tick draw: bull and
/// bear regimes persist a strong bias (|0.6 - 0.9|) that background
/// updates read every tick, while random keeps a small residual drift.
pub fn assign_strength<R: Rng>(rng: &mut R, trend: MarketTrend) -> f64 {
    match trend {
        MarketTrend::Up => 0.6 + rng.random_range(0.0..0.3),
        MarketTrend::Down => -(0.6 + rng.random_range(0.0..0.3)),
        MarketTrend::Random => rng.random_range(-0.1..0.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(trend: MarketTrend, strength: f64, volatility: f64) -> MarketState {
        MarketState {
            trend,
            strength,
            volatility,
            last_update: 0,
        }
    }

    #[test]
    fn test_focal_move_clamped() {
        let mut path = PricePath::new(7);
        let state = market(MarketTrend::Up, 0.8, 1.0);
        let cap = 15.0 / 100.0 * 0.1;
        for _ in 0..1_000 {
            let m = path.focal_move(15.0, Sector::Cryptocurrency, &state, 0.05, 0.1);
            assert!(m.abs() <= cap + 1e-12, "move {m} exceeds clamp {cap}");
        }
    }

    #[test]
    fn test_background_move_clamped() {
        let mut path = PricePath::new(7);
        let state = market(MarketTrend::Down, -0.8, 2.0);
        let cap = 8.0 / 100.0 * 2.0 * 0.15;
        for _ in 0..1_000 {
            let m = path.background_move(8.0, Sector::Technology, &state);
            assert!(m.abs() <= cap + 1e-12);
        }
    }

    #[test]
    fn test_trend_up_biases_positive() {
        let mut path = PricePath::new(42);
        let state = market(MarketTrend::Up, 0.8, 1.0);
        let mean: f64 = (0..2_000)
            .map(|_| path.focal_move(8.0, Sector::Other, &state, 0.0, 0.0))
            .sum::<f64>()
            / 2_000.0;
        assert!(mean > 0.0, "expected positive drift, got {mean}");
    }

    #[test]
    fn test_trend_down_biases_negative() {
        let mut path = PricePath::new(42);
        let state = market(MarketTrend::Down, -0.8, 1.0);
        let mean: f64 = (0..2_000)
            .map(|_| path.focal_move(8.0, Sector::Other, &state, 0.0, 0.0))
            .sum::<f64>()
            / 2_000.0;
        assert!(mean < 0.0, "expected negative drift, got {mean}");
    }

    #[test]
    fn test_background_trend_direction() {
        let mut path = PricePath::new(9);
        let bull = market(MarketTrend::Up, 0.75, 1.0);
        let mean: f64 = (0..2_000)
            .map(|_| path.background_move(8.0, Sector::Technology, &bull))
            .sum::<f64>()
            / 2_000.0;
        assert!(mean > 0.0);
    }

    #[test]
    fn test_apply_move_floor_and_rounding() {
        assert_eq!(apply_move(Price(1), -0.9), Price(1));
        assert_eq!(apply_move(Price(1_000), 0.0123), Price(1_012));
        assert_eq!(apply_move(Price(2), -0.99), Price(1));
    }

    #[test]
    fn test_deterministic_given_seed() {
        let state = market(MarketTrend::Random, 0.0, 1.0);
        let mut a = PricePath::new(123);
        let mut b = PricePath::new(123);
        for _ in 0..100 {
            let ma = a.focal_move(8.0, Sector::Technology, &state, 0.0, 0.0);
            let mb = b.focal_move(8.0, Sector::Technology, &state, 0.0, 0.0);
            assert_eq!(ma, mb);
        }
    }

    #[test]
    fn test_assign_strength_ranges() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let up = assign_strength(&mut rng, MarketTrend::Up);
            assert!((0.6..0.9).contains(&up));
            let down = assign_strength(&mut rng, MarketTrend::Down);
            assert!((-0.9..=-0.6).contains(&down));
            let random = assign_strength(&mut rng, MarketTrend::Random);
            assert!(random.abs() <= 0.1);
        }
    }
}
