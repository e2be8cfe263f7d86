//! First-run seed data for the venue.

use types::{
    AdminCredential, Asset, AssetKind, Cash, MarketState, Price, Sector, Settings, Timestamp, User,
    UserId,
};

use crate::error::Result;
use crate::store::Store;

/// Balance granted to every newly registered account.
pub const STARTING_BALANCE: Cash = Cash(1_000_000);

/// Seed the store with the launch roster unless users already exist.
///
/// Returns true when seeding ran.
pub fn init_defaults(store: &Store, now: Timestamp) -> Result<bool> {
    if !store.users()?.is_empty() {
        return Ok(false);
    }

    store.save_users(&[User::new(
        UserId(1),
        "user1",
        "1234",
        STARTING_BALANCE,
        now,
    )])?;

    store.save_admin(&AdminCredential {
        username: "acep".to_string(),
        password: "17".to_string(),
    })?;

    store.save_assets(&launch_assets())?;
    store.save_settings(&Settings::default())?;
    store.save_market(&MarketState {
        last_update: now,
        ..MarketState::default()
    })?;
    store.save_transactions(&[])?;

    Ok(true)
}

/// The five launch assets.
fn launch_assets() -> Vec<Asset> {
    vec![
        Asset::new(
            "AAPL",
            "Apple Inc.",
            Price(175_000),
            8.0,
            AssetKind::Stock,
            Sector::Technology,
        ),
        Asset::new(
            "TSLA",
            "Tesla Inc.",
            Price(245_000),
            15.0,
            AssetKind::Stock,
            Sector::Automotive,
        ),
        Asset::new(
            "BTC",
            "Bitcoin",
            Price(825_000_000),
            25.0,
            AssetKind::Crypto,
            Sector::Cryptocurrency,
        ),
        Asset::new(
            "ETH",
            "Ethereum",
            Price(45_000_000),
            20.0,
            AssetKind::Crypto,
            Sector::Cryptocurrency,
        ),
        Asset::new(
            "GOLD",
            "Gold",
            Price(1_200_000),
            3.0,
            AssetKind::Commodity,
            Sector::Commodities,
        ),
    ]
}
