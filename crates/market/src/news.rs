//! Transient news shocks applied to the focal asset's drift.
//!
//! At most one event is active at a time. While idle, each tick has a
//! small probability of spawning an event with a random signed strength
//! and duration; the event's impact decays linearly with its remaining
//! time and the event deactivates once it runs out.

use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Spawn probability per tick while no event is active.
const SPAWN_PROBABILITY: f64 = 0.03;

/// Headlines shown for positive-strength events.
const BULLISH_HEADLINES: &[&str] = &[
    "BREAKING: Positive earnings report!",
    "Strong demand driving prices up!",
    "Analyst upgrades price target!",
    "Institutional buying detected!",
];

/// Headlines shown for negative-strength events.
const BEARISH_HEADLINES: &[&str] = &[
    "Weak economic data released!",
    "Profit taking pressure!",
    "Technical breakdown occurring!",
    "Selling pressure intensifies!",
];

/// A live market-news shock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsEvent {
    /// Signed drift contribution at full strength, in [-0.15, 0.15).
    pub strength: f64,
    /// Total lifetime in milliseconds.
    pub duration_ms: u64,
    /// Remaining lifetime; the event dies at zero.
    pub remaining_ms: u64,
    pub headline: String,
}

impl NewsEvent {
    /// Decayed drift contribution: strength scaled by remaining lifetime.
    pub fn impact(&self) -> f64 {
        self.strength * self.remaining_ms as f64 / self.duration_ms as f64
    }

    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.strength > 0.0
    }
}

/// Spawns and decays news events for the focal asset.
pub struct NewsDesk {
    rng: StdRng,
    active: Option<NewsEvent>,
}

impl NewsDesk {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            active: None,
        }
    }

    /// Advance the desk by one tick of `tick_ms` milliseconds.
    ///
    /// Spawns a new event with [`SPAWN_PROBABILITY`] when idle, then
    /// decays whatever is active. Returns the freshly spawned event, if
    /// any, so the caller can surface the headline.
    pub fn advance(&mut self, tick_ms: u64) -> Option<NewsEvent> {
        let mut spawned = None;

        if self.active.is_none() && self.rng.random_bool(SPAWN_PROBABILITY) {
            let strength = self.rng.random_range(-0.15..0.15);
            let duration_ms = self.rng.random_range(3_000..10_000);
            let pool = if strength > 0.0 {
                BULLISH_HEADLINES
            } else {
                BEARISH_HEADLINES
            };
            let headline = pool[self.rng.random_range(0..pool.len())].to_string();

            let event = NewsEvent {
                strength,
                duration_ms,
                remaining_ms: duration_ms,
                headline,
            };
            spawned = Some(event.clone());
            self.active = Some(event);
        }

        if let Some(event) = &mut self.active {
            event.remaining_ms = event.remaining_ms.saturating_sub(tick_ms);
            if event.remaining_ms == 0 {
                self.active = None;
            }
        }

        spawned
    }

    pub fn active(&self) -> Option<&NewsEvent> {
        self.active.as_ref()
    }

    /// Drift contribution of the active event, 0 when idle.
    pub fn impact(&self) -> f64 {
        self.active.as_ref().map_or(0.0, NewsEvent::impact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_decay() {
        let event = NewsEvent {
            strength: 0.1,
            duration_ms: 8_000,
            remaining_ms: 4_000,
            headline: "x".to_string(),
        };
        assert!((event.impact() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_event_expires() {
        let mut desk = NewsDesk::new(0);
        // Force an event regardless of the spawn roll.
        desk.active = Some(NewsEvent {
            strength: -0.1,
            duration_ms: 3_000,
            remaining_ms: 3_000,
            headline: "x".to_string(),
        });
        desk.advance(1_000);
        assert!(desk.active().is_some());
        desk.advance(1_000);
        desk.advance(1_000);
        assert!(desk.active().is_none());
        assert_eq!(desk.impact(), 0.0);
    }

    #[test]
    fn test_spawn_rate_roughly_three_percent() {
        let mut desk = NewsDesk::new(42);
        let mut spawns = 0;
        for _ in 0..20_000 {
            if desk.advance(100_000).is_some() {
                // Tick far longer than any duration so the desk is idle
                // again next round and every tick is a fresh spawn roll.
                spawns += 1;
            }
        }
        let rate = spawns as f64 / 20_000.0;
        assert!((0.02..0.04).contains(&rate), "spawn rate {rate}");
    }

    #[test]
    fn test_spawned_fields_in_range() {
        let mut desk = NewsDesk::new(7);
        for _ in 0..10_000 {
            if let Some(event) = desk.advance(100_000) {
                assert!((-0.15..0.15).contains(&event.strength));
                assert!((3_000..10_000).contains(&event.duration_ms));
                assert_eq!(
                    event.is_bullish(),
                    BULLISH_HEADLINES.contains(&event.headline.as_str())
                );
            }
        }
    }

    #[test]
    fn test_no_overlapping_events() {
        let mut desk = NewsDesk::new(11);
        let mut active_count = 0;
        for _ in 0..5_000 {
            desk.advance(500);
            active_count += usize::from(desk.active().is_some());
            // advance never yields a spawn while another event is live
            if desk.active().is_some() {
                assert!(desk.advance(0).is_none());
            }
        }
        assert!(active_count > 0);
    }
}
