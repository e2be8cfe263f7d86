//! Administrative operations: asset and user management, market
//! controls, venue settings, and overview statistics.

use rand::Rng;

use market::assign_strength;
use storage::Store;
use types::{
    Asset, AssetKind, Cash, MarketState, MarketTrend, Price, Sector, Settings, Symbol, Timestamp,
    TransactionKind, TransactionStatus, UserId, VOLATILITY_MAX, VOLATILITY_MIN,
};

use crate::error::{DeskError, DeskResult};

/// Create a new tradeable asset.
pub fn create_asset(
    store: &Store,
    symbol: &str,
    name: &str,
    price: Price,
    volatility: f64,
    kind: AssetKind,
    sector: Sector,
) -> DeskResult<Asset> {
    if price < Price::FLOOR {
        return Err(DeskError::Validation(
            "price must be at least 1".to_string(),
        ));
    }
    if !(VOLATILITY_MIN..=VOLATILITY_MAX).contains(&volatility) {
        return Err(DeskError::Validation(format!(
            "volatility must be between {VOLATILITY_MIN}% and {VOLATILITY_MAX}%"
        )));
    }

    let mut assets = store.assets()?;
    if assets.iter().any(|a| a.symbol == symbol) {
        return Err(DeskError::Validation(format!(
            "asset symbol {symbol} already exists"
        )));
    }

    let asset = Asset::new(symbol, name, price, volatility, kind, sector);
    assets.push(asset.clone());
    store.save_assets(&assets)?;
    tracing::info!(symbol, "asset created");
    Ok(asset)
}

/// Delete an asset; deleting an unknown symbol is a silent no-op.
pub fn delete_asset(store: &Store, symbol: &str) -> DeskResult<bool> {
    let mut assets = store.assets()?;
    let before = assets.len();
    assets.retain(|a| a.symbol != symbol);
    if assets.len() == before {
        return Ok(false);
    }
    store.save_assets(&assets)?;
    tracing::info!(symbol, "asset deleted");
    Ok(true)
}

/// Create an account directly, without opening a session.
pub fn create_user(
    store: &Store,
    username: &str,
    password: &str,
    now: Timestamp,
) -> DeskResult<types::User> {
    let mut users = store.users()?;
    if users.iter().any(|u| u.username == username) {
        return Err(DeskError::Validation(format!(
            "username {username} already exists"
        )));
    }
    let id = UserId(users.iter().map(|u| u.id.0).max().unwrap_or(0) + 1);
    let user = types::User::new(id, username, password, storage::STARTING_BALANCE, now);
    users.push(user.clone());
    store.save_users(&users)?;
    tracing::info!(username, "user created");
    Ok(user)
}

/// Delete a user and their trade history; unknown ids are a silent no-op.
pub fn delete_user(store: &Store, user_id: UserId) -> DeskResult<bool> {
    let mut users = store.users()?;
    let before = users.len();
    users.retain(|u| u.id != user_id);
    if users.len() == before {
        return Ok(false);
    }
    store.save_users(&users)?;
    tracing::info!(%user_id, "user deleted");
    Ok(true)
}

/// Select the global trend; the stored strength is auto-derived from the
/// regime (strong bias for bull/bear, small residual drift for random).
pub fn set_market_trend<R: Rng>(
    store: &Store,
    rng: &mut R,
    trend: MarketTrend,
    now: Timestamp,
) -> DeskResult<MarketState> {
    let mut market = store.market()?;
    market.trend = trend;
    market.strength = assign_strength(rng, trend);
    market.last_update = now;
    store.save_market(&market)?;
    tracing::info!(%trend, strength = market.strength, "market trend set");
    Ok(market)
}

/// Set the global volatility multiplier applied to background assets.
pub fn set_market_volatility(
    store: &Store,
    multiplier: f64,
    now: Timestamp,
) -> DeskResult<MarketState> {
    if multiplier <= 0.0 {
        return Err(DeskError::Validation(
            "volatility multiplier must be positive".to_string(),
        ));
    }
    let mut market = store.market()?;
    market.volatility = multiplier;
    market.last_update = now;
    store.save_market(&market)?;
    Ok(market)
}

/// Pin an asset to an exact price, keeping its history trail.
pub fn set_manual_price(
    store: &Store,
    symbol: &Symbol,
    price: Price,
    now: Timestamp,
) -> DeskResult<()> {
    if price < Price::FLOOR {
        return Err(DeskError::Validation(
            "price must be at least 1".to_string(),
        ));
    }
    if !store.update_asset_price(symbol, price, now)? {
        return Err(DeskError::AssetNotFound(symbol.clone()));
    }
    tracing::info!(symbol = %symbol, price = %price, "manual price set");
    Ok(())
}

/// Replace the venue settings.
pub fn update_settings(store: &Store, settings: Settings) -> DeskResult<Settings> {
    if settings.min_trade_amount < Cash(1_000) {
        return Err(DeskError::Validation(
            "minimum trade amount must be at least Rp 1.0K".to_string(),
        ));
    }
    if settings.max_trade_duration_secs < 10 {
        return Err(DeskError::Validation(
            "maximum trade duration must be at least 10 seconds".to_string(),
        ));
    }
    store.save_settings(&settings)?;
    Ok(settings)
}

/// Venue-wide totals for the admin overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemStats {
    pub total_users: usize,
    /// Sum of approved deposits.
    pub total_deposits: Cash,
    /// Sum of approved withdrawals.
    pub total_withdrawals: Cash,
    /// Deposits minus withdrawals.
    pub system_balance: Cash,
}

pub fn system_stats(store: &Store) -> DeskResult<SystemStats> {
    let users = store.users()?;
    let transactions = store.transactions()?;

    let sum_of = |kind: TransactionKind| -> Cash {
        transactions
            .iter()
            .filter(|t| t.kind == kind && t.status == TransactionStatus::Approved)
            .map(|t| t.amount)
            .sum()
    };
    let total_deposits = sum_of(TransactionKind::Deposit);
    let total_withdrawals = sum_of(TransactionKind::Withdraw);

    Ok(SystemStats {
        total_users: users.len(),
        total_deposits,
        total_withdrawals,
        system_balance: total_deposits - total_withdrawals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use storage::init_defaults;

    fn setup() -> Store {
        let store = Store::open_in_memory().unwrap();
        init_defaults(&store, 0).unwrap();
        store
    }

    #[test]
    fn test_create_asset_validation() {
        let store = setup();
        assert!(matches!(
            create_asset(
                &store,
                "X",
                "X",
                Price(0),
                5.0,
                AssetKind::Stock,
                Sector::Other
            ),
            Err(DeskError::Validation(_))
        ));
        assert!(matches!(
            create_asset(
                &store,
                "X",
                "X",
                Price(100),
                55.0,
                AssetKind::Stock,
                Sector::Other
            ),
            Err(DeskError::Validation(_))
        ));
        assert!(matches!(
            create_asset(
                &store,
                "AAPL",
                "Duplicate",
                Price(100),
                5.0,
                AssetKind::Stock,
                Sector::Technology
            ),
            Err(DeskError::Validation(_))
        ));
        assert_eq!(store.assets().unwrap().len(), 5);

        create_asset(
            &store,
            "DOGE",
            "Dogecoin",
            Price(3_000),
            35.0,
            AssetKind::Crypto,
            Sector::Cryptocurrency,
        )
        .unwrap();
        assert_eq!(store.assets().unwrap().len(), 6);
    }

    #[test]
    fn test_delete_is_silent_noop_when_missing() {
        let store = setup();
        assert!(delete_asset(&store, "AAPL").unwrap());
        assert!(!delete_asset(&store, "AAPL").unwrap());
        assert!(delete_user(&store, UserId(1)).unwrap());
        assert!(!delete_user(&store, UserId(99)).unwrap());
    }

    #[test]
    fn test_create_user() {
        let store = setup();
        let user = create_user(&store, "bob", "4321", 5).unwrap();
        assert_eq!(user.id, UserId(2));
        assert_eq!(user.balance, storage::STARTING_BALANCE);
        assert!(matches!(
            create_user(&store, "bob", "4321", 6),
            Err(DeskError::Validation(_))
        ));
        // No session was opened.
        assert!(store.session().unwrap().is_none());
    }

    #[test]
    fn test_set_market_trend_derives_strength() {
        let store = setup();
        let mut rng = StdRng::seed_from_u64(1);

        let market = set_market_trend(&store, &mut rng, MarketTrend::Up, 5).unwrap();
        assert_eq!(market.trend, MarketTrend::Up);
        assert!((0.6..0.9).contains(&market.strength));
        assert_eq!(store.market().unwrap(), market);

        let market = set_market_trend(&store, &mut rng, MarketTrend::Down, 6).unwrap();
        assert!((-0.9..=-0.6).contains(&market.strength));

        let market = set_market_trend(&store, &mut rng, MarketTrend::Random, 7).unwrap();
        assert!(market.strength.abs() <= 0.1);
    }

    #[test]
    fn test_set_volatility_and_manual_price() {
        let store = setup();
        assert!(matches!(
            set_market_volatility(&store, 0.0, 0),
            Err(DeskError::Validation(_))
        ));
        let market = set_market_volatility(&store, 1.5, 1).unwrap();
        assert_eq!(market.volatility, 1.5);

        set_manual_price(&store, &"AAPL".to_string(), Price(200_000), 2).unwrap();
        let asset = store.asset("AAPL").unwrap().unwrap();
        assert_eq!(asset.price, Price(200_000));
        assert_eq!(asset.history[0].price, Price(175_000));

        assert!(matches!(
            set_manual_price(&store, &"NOPE".to_string(), Price(100), 3),
            Err(DeskError::AssetNotFound(_))
        ));
    }

    #[test]
    fn test_settings_validation() {
        let store = setup();
        let bad = Settings {
            min_trade_amount: Cash(500),
            ..Settings::default()
        };
        assert!(matches!(
            update_settings(&store, bad),
            Err(DeskError::Validation(_))
        ));

        let bad = Settings {
            max_trade_duration_secs: 5,
            ..Settings::default()
        };
        assert!(matches!(
            update_settings(&store, bad),
            Err(DeskError::Validation(_))
        ));

        let good = Settings {
            min_trade_amount: Cash(20_000),
            max_trade_duration_secs: 600,
            auto_approval: true,
        };
        update_settings(&store, good).unwrap();
        assert_eq!(store.settings().unwrap(), good);
    }

    #[test]
    fn test_system_stats() {
        let store = setup();
        let deposit = transactions::request_deposit(&store, UserId(1), Cash(100_000), 0).unwrap();
        transactions::approve(&store, deposit.id, 1).unwrap();
        let withdraw = transactions::request_withdraw(&store, UserId(1), Cash(40_000), 2).unwrap();
        transactions::approve(&store, withdraw.id, 3).unwrap();
        // A pending request does not count.
        transactions::request_deposit(&store, UserId(1), Cash(500_000), 4).unwrap();

        let stats = system_stats(&store).unwrap();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_deposits, Cash(100_000));
        assert_eq!(stats.total_withdrawals, Cash(40_000));
        assert_eq!(stats.system_balance, Cash(60_000));
    }
}
