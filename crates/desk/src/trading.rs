//! Placing and settling binary-options positions.

use storage::Store;
use types::{
    Cash, Direction, Price, Symbol, Timestamp, Trade, TradeId, TradeResult, TradeStatus, User,
    UserId,
};

use crate::error::{DeskError, DeskResult};
use crate::scheduler::SettlementScheduler;

/// Resolved settlement, returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementOutcome {
    pub trade_id: TradeId,
    pub user_id: UserId,
    pub symbol: Symbol,
    pub direction: Direction,
    pub amount: Cash,
    pub entry_price: Price,
    pub settlement_price: Price,
    pub result: TradeResult,
    /// Amount credited back; zero on a loss.
    pub payout: Cash,
}

/// Place a position: validate, debit the stake, record the trade, and
/// schedule its settlement.
///
/// Validation order: asset exists, stake at or above the configured
/// minimum, duration within the configured maximum, stake covered by the
/// balance. Any failure leaves every document untouched.
pub fn place_trade(
    store: &Store,
    scheduler: &mut SettlementScheduler,
    user_id: UserId,
    symbol: &Symbol,
    direction: Direction,
    amount: Cash,
    duration_secs: u64,
    now: Timestamp,
) -> DeskResult<Trade> {
    let settings = store.settings()?;
    let asset = store
        .asset(symbol)?
        .ok_or_else(|| DeskError::AssetNotFound(symbol.clone()))?;

    if amount < settings.min_trade_amount {
        return Err(DeskError::Validation(format!(
            "minimum trade amount is {}",
            settings.min_trade_amount
        )));
    }
    if duration_secs == 0 || duration_secs > settings.max_trade_duration_secs {
        return Err(DeskError::Validation(format!(
            "trade duration must be between 1 and {} seconds",
            settings.max_trade_duration_secs
        )));
    }

    let mut users = store.users()?;
    let trade_id = next_trade_id(&users);
    let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
        return Err(DeskError::UserNotFound(user_id));
    };
    if amount > user.balance {
        return Err(DeskError::InsufficientBalance);
    }

    let trade = Trade {
        id: trade_id,
        user_id,
        symbol: symbol.clone(),
        direction,
        amount,
        duration_secs,
        entry_price: asset.price,
        status: TradeStatus::Active,
        result: None,
        created_at: now,
        completed_at: None,
    };

    user.balance -= amount;
    user.trades.insert(0, trade.clone());
    store.save_users(&users)?;
    scheduler.schedule(trade.id, user_id, trade.due_at());

    tracing::info!(
        %trade_id,
        symbol = %trade.symbol,
        direction = %direction,
        stake = %amount,
        "trade placed"
    );
    Ok(trade)
}

/// Settle an expired position.
///
/// Idempotent-guarded: settling a trade that is no longer `Active` is a
/// no-op and returns `Ok(None)`. If the asset has since been deleted the
/// settlement price falls back to the entry price, which is a guaranteed
/// loss (ties lose for both directions). A win credits twice the stake;
/// a loss credits nothing, the stake was forfeited at placement.
pub fn settle_trade(
    store: &Store,
    user_id: UserId,
    trade_id: TradeId,
    now: Timestamp,
) -> DeskResult<Option<SettlementOutcome>> {
    let mut users = store.users()?;
    let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
        return Err(DeskError::UserNotFound(user_id));
    };
    let Some(trade) = user.trade_mut(trade_id) else {
        return Err(DeskError::TradeNotFound(trade_id));
    };
    if !trade.is_active() {
        return Ok(None);
    }

    let settlement_price = store
        .asset(&trade.symbol)?
        .map(|a| a.price)
        .unwrap_or(trade.entry_price);

    let result = match trade.direction {
        Direction::Buy if settlement_price > trade.entry_price => TradeResult::Win,
        Direction::Sell if settlement_price < trade.entry_price => TradeResult::Win,
        _ => TradeResult::Loss,
    };

    trade.status = TradeStatus::Completed;
    trade.result = Some(result);
    trade.completed_at = Some(now);

    let payout = match result {
        TradeResult::Win => trade.payout(),
        TradeResult::Loss => Cash::ZERO,
    };
    let outcome = SettlementOutcome {
        trade_id,
        user_id,
        symbol: trade.symbol.clone(),
        direction: trade.direction,
        amount: trade.amount,
        entry_price: trade.entry_price,
        settlement_price,
        result,
        payout,
    };

    user.balance += payout;
    store.save_users(&users)?;

    tracing::info!(
        %trade_id,
        result = ?result,
        entry = %outcome.entry_price,
        settled = %settlement_price,
        "trade settled"
    );
    Ok(Some(outcome))
}

fn next_trade_id(users: &[User]) -> TradeId {
    let max = users
        .iter()
        .flat_map(|u| u.trades.iter())
        .map(|t| t.id.0)
        .max()
        .unwrap_or(0);
    TradeId(max + 1)
}
