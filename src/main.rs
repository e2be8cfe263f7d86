//! option-arcade - demo CLI
//!
//! Runs a headless demo session against the venue: seeds the store, logs
//! in the demo account, places one BUY and one SELL position, then
//! drives the market tick loop until both settle.
//!
//! The clock is simulated: each tick advances time by `--tick-ms`
//! without sleeping, so a two-minute session finishes instantly. Point
//! `--db` at a file to keep state across runs; active positions are
//! re-scheduled from the store on startup and past-due ones settle on
//! the first poll.

mod config;

use std::error::Error;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use desk::{MarketEngine, SettlementScheduler, auth, place_trade, settle_trade, user_stats};
use storage::{Store, init_defaults};
use types::{Direction, Timeframe, Timestamp, TradeResult};

pub use config::RunConfig;

/// option-arcade - simulated binary-options venue
#[derive(Parser, Debug)]
#[command(name = "option-arcade")]
#[command(about = "A simulated binary-options venue with a synthetic price engine")]
#[command(version)]
struct Args {
    /// Database path (in-memory when omitted)
    #[arg(long, env = "ARCADE_DB")]
    db: Option<PathBuf>,

    /// Total ticks to run
    #[arg(long, env = "ARCADE_TICKS")]
    ticks: Option<u64>,

    /// Simulated milliseconds per tick
    #[arg(long, env = "ARCADE_TICK_MS")]
    tick_ms: Option<u64>,

    /// Seed for the price path and news desk
    #[arg(long, env = "ARCADE_SEED")]
    seed: Option<u64>,

    /// Chart timeframe: 1m, 5m, 15m or 1h
    #[arg(long, env = "ARCADE_TIMEFRAME")]
    timeframe: Option<Timeframe>,

    /// Focal asset shown on the chart
    #[arg(long, env = "ARCADE_FOCAL")]
    focal: Option<String>,
}

fn build_config(args: &Args) -> RunConfig {
    let mut config = RunConfig::new();
    if let Some(db) = &args.db {
        config = config.db_path(db);
    }
    if let Some(ticks) = args.ticks {
        config = config.ticks(ticks);
    }
    if let Some(tick_ms) = args.tick_ms {
        config = config.tick_ms(tick_ms.max(1));
    }
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if let Some(timeframe) = args.timeframe {
        config = config.timeframe(timeframe);
    }
    if let Some(focal) = &args.focal {
        config = config.focal(focal.clone());
    }
    config
}

fn wall_clock_ms() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as Timestamp
}

fn run(config: RunConfig) -> Result<(), Box<dyn Error>> {
    let store = match &config.db_path {
        Some(path) => Store::open(path)?,
        None => Store::open_in_memory()?,
    };
    let start = wall_clock_ms();
    if init_defaults(&store, start)? {
        tracing::info!("store seeded with launch roster");
    }

    // Rebuild the settlement table from persisted positions; anything
    // past due fires on the first poll below.
    let mut scheduler = SettlementScheduler::new();
    scheduler.restore(&store)?;

    let mut engine = MarketEngine::new(
        &store,
        config.focal.clone(),
        config.timeframe,
        config.tick_ms,
        config.seed,
        start,
    )?;

    let session = auth::login(&store, "user1", "1234")?;
    let user_id = session.user_id.expect("demo session is a user session");

    let buy = place_trade(
        &store,
        &mut scheduler,
        user_id,
        &config.focal,
        Direction::Buy,
        config.demo_stake,
        config.demo_duration_secs,
        start,
    )?;
    let sell = place_trade(
        &store,
        &mut scheduler,
        user_id,
        &"BTC".to_string(),
        Direction::Sell,
        config.demo_stake,
        config.demo_duration_secs * 2,
        start,
    )?;
    eprintln!(
        "  Placed {} {} on {} and {} {} on BTC",
        buy.direction, buy.amount, buy.symbol, sell.direction, sell.amount
    );

    let mut wins = 0u32;
    let mut losses = 0u32;
    for i in 1..=config.ticks {
        let now = start + i * config.tick_ms;
        let report = engine.tick(&store, now)?;

        if let Some(event) = &report.news {
            let tone = if event.is_bullish() { "+" } else { "-" };
            eprintln!("  [news {tone}] {}", event.headline);
        }

        for pending in scheduler.due(now) {
            match settle_trade(&store, pending.user_id, pending.trade_id, now) {
                Ok(Some(outcome)) => {
                    match outcome.result {
                        TradeResult::Win => wins += 1,
                        TradeResult::Loss => losses += 1,
                    }
                    eprintln!(
                        "  [settled] {} {} on {}: entry {} -> {} = {:?} ({})",
                        outcome.direction,
                        outcome.amount,
                        outcome.symbol,
                        outcome.entry_price,
                        outcome.settlement_price,
                        outcome.result,
                        outcome.payout,
                    );
                }
                Ok(None) => {}
                // A stale entry (e.g. its owner was deleted between runs)
                // is dropped, not fatal.
                Err(e) => tracing::warn!(trade = %pending.trade_id, error = %e, "settlement skipped"),
            }
        }
    }

    // Final summary.
    let user = store
        .user(user_id)?
        .ok_or("demo user vanished mid-session")?;
    let stats = user_stats(&user);
    let overlays = engine.overlays();

    eprintln!();
    eprintln!("╔══════════════════════════════════════════════════════════════╗");
    eprintln!("║  Session Complete                                            ║");
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    eprintln!(
        "║  Ticks: {:6}  │  Settled: {:2} win / {:2} loss               ║",
        config.ticks, wins, losses
    );
    eprintln!(
        "║  Balance: {:>12}  │  Record: {:>5.1}% ({})         ║",
        user.balance.to_string(),
        stats.win_rate,
        stats.tier
    );
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    for asset in store.assets()? {
        let change = asset.change_pct().unwrap_or(0.0);
        eprintln!(
            "║  {:<6} {:>14}  {:>+7.2}%                             ║",
            asset.symbol,
            asset.price.to_string(),
            change
        );
    }
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    eprintln!(
        "║  {} chart [{}]: SMA {}  EMA {}  RSI {}  ║",
        engine.focal(),
        engine.chart().timeframe(),
        fmt_overlay(overlays.sma),
        fmt_overlay(overlays.ema),
        fmt_overlay(overlays.rsi),
    );
    eprintln!("╚══════════════════════════════════════════════════════════════╝");

    auth::logout(&store)?;
    Ok(())
}

fn fmt_overlay(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "n/a".to_string(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args);

    eprintln!("╔══════════════════════════════════════════════════════════════╗");
    eprintln!("║  option-arcade - demo session                                ║");
    eprintln!("╠══════════════════════════════════════════════════════════════╣");
    eprintln!(
        "║  Focal: {:<6} │ Timeframe: {:<3} │ Ticks: {:6} x {:4}ms   ║",
        config.focal,
        config.timeframe.to_string(),
        config.ticks,
        config.tick_ms
    );
    eprintln!("╚══════════════════════════════════════════════════════════════╝");

    if let Err(e) = run(config) {
        eprintln!("session failed: {e}");
        std::process::exit(1);
    }
}
