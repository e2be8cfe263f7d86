//! The per-tick market engine.
//!
//! Ties the price path, news desk, and candle chart together over the
//! store. One call to [`MarketEngine::tick`] advances the whole market:
//! the focal asset gets the full price formula and feeds the chart,
//! every other asset gets the cheap background update. The engine and
//! the settlement poll interleave on one thread of control; there is no
//! preemption, so each step sees a consistent snapshot.

use rand::SeedableRng;
use rand::rngs::StdRng;

use candles::CandleChart;
use market::{NewsDesk, NewsEvent, PricePath, apply_move};
use quant::{Ema, Rsi, Sma};
use storage::Store;
use types::{Price, Symbol, Timeframe, Timestamp};

use crate::error::{DeskError, DeskResult};

/// Indicator overlay values for the current window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartOverlays {
    pub sma: Option<f64>,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
}

/// What one tick did, for the caller's display loop.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub focal: Symbol,
    pub price: Price,
    pub move_fraction: f64,
    /// A candle bucket elapsed and rolled into the window.
    pub candle_closed: bool,
    /// A news event spawned this tick.
    pub news: Option<NewsEvent>,
}

/// Drives the synthetic market against the store.
pub struct MarketEngine {
    focal: Symbol,
    tick_ms: u64,
    chart: CandleChart,
    news: NewsDesk,
    path: PricePath,
    /// Drives candle seeding only; the path and news desk own their own
    /// generators so the three streams stay independent under one seed.
    rng: StdRng,
}

impl MarketEngine {
    pub fn new(
        store: &Store,
        focal: Symbol,
        timeframe: Timeframe,
        tick_ms: u64,
        seed: u64,
        now: Timestamp,
    ) -> DeskResult<Self> {
        let asset = store
            .asset(&focal)?
            .ok_or_else(|| DeskError::AssetNotFound(focal.clone()))?;

        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(2));
        let chart = CandleChart::seeded(&mut rng, asset.price, asset.volatility, timeframe, now);

        Ok(Self {
            focal,
            tick_ms,
            chart,
            news: NewsDesk::new(seed.wrapping_add(1)),
            path: PricePath::new(seed),
            rng,
        })
    }

    /// Advance the market by one tick.
    pub fn tick(&mut self, store: &Store, now: Timestamp) -> DeskResult<TickReport> {
        let market = store.market()?;
        let news = self.news.advance(self.tick_ms);
        if let Some(event) = &news {
            tracing::info!(
                headline = %event.headline,
                strength = event.strength,
                "market news"
            );
        }

        // Focal asset: full formula, feeds the chart.
        let focal = store
            .asset(&self.focal)?
            .ok_or_else(|| DeskError::AssetNotFound(self.focal.clone()))?;
        let move_fraction = self.path.focal_move(
            focal.volatility,
            focal.sector,
            &market,
            self.chart.momentum(),
            self.news.impact(),
        );
        let price = apply_move(focal.price, move_fraction);
        store.update_asset_price(&self.focal, price, now)?;
        let candle_closed = self
            .chart
            .apply(&mut self.rng, price, move_fraction, self.tick_ms, now);

        // Background assets: cheap update, no momentum or news.
        for asset in store.assets()? {
            if asset.symbol == self.focal {
                continue;
            }
            let background = self
                .path
                .background_move(asset.volatility, asset.sector, &market);
            store.update_asset_price(&asset.symbol, apply_move(asset.price, background), now)?;
        }

        Ok(TickReport {
            focal: self.focal.clone(),
            price,
            move_fraction,
            candle_closed,
            news,
        })
    }

    /// Switch the charted asset; resets and reseeds the window.
    pub fn set_focal(&mut self, store: &Store, symbol: Symbol, now: Timestamp) -> DeskResult<()> {
        let asset = store
            .asset(&symbol)?
            .ok_or_else(|| DeskError::AssetNotFound(symbol.clone()))?;
        self.focal = symbol;
        self.chart
            .reset(&mut self.rng, asset.price, asset.volatility, now);
        Ok(())
    }

    /// Switch the candle bucket duration; resets the window.
    pub fn set_timeframe(
        &mut self,
        store: &Store,
        timeframe: Timeframe,
        now: Timestamp,
    ) -> DeskResult<()> {
        let asset = store
            .asset(&self.focal)?
            .ok_or_else(|| DeskError::AssetNotFound(self.focal.clone()))?;
        self.chart
            .set_timeframe(&mut self.rng, timeframe, asset.price, now);
        Ok(())
    }

    /// Latest indicator values over the closed window, recomputed on
    /// every call (pull-based).
    pub fn overlays(&self) -> ChartOverlays {
        let closes: Vec<f64> = self
            .chart
            .closed()
            .iter()
            .map(|c| c.close.to_float())
            .collect();
        ChartOverlays {
            sma: Sma::latest(&closes, Sma::DEFAULT_PERIOD),
            ema: Ema::latest(&closes, Ema::DEFAULT_PERIOD),
            rsi: Rsi::latest(&closes, Rsi::DEFAULT_PERIOD),
        }
    }

    pub fn focal(&self) -> &Symbol {
        &self.focal
    }

    pub fn chart(&self) -> &CandleChart {
        &self.chart
    }

    pub fn active_news(&self) -> Option<&NewsEvent> {
        self.news.active()
    }
}
