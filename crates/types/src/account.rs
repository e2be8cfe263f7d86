//! Users, positions, and money-movement requests.

use serde::{Deserialize, Serialize};

use crate::{Cash, Direction, Price, Timestamp, TradeId, TransactionId, UserId};

/// Lifecycle of a binary-options position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Active,
    Completed,
}

/// Outcome of a settled position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Win,
    Loss,
}

/// A binary-options position.
///
/// The stake is debited at placement; settlement is the single
/// `Active -> Completed` transition and is irreversible. Trades are never
/// deleted, they stay in the owner's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub user_id: UserId,
    pub symbol: String,
    pub direction: Direction,
    pub amount: Cash,
    pub duration_secs: u64,
    pub entry_price: Price,
    pub status: TradeStatus,
    pub result: Option<TradeResult>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl Trade {
    /// When this position expires and must be settled.
    #[inline]
    pub fn due_at(&self) -> Timestamp {
        self.created_at + self.duration_secs * 1_000
    }

    /// Amount credited on a win: the stake back plus equal profit.
    #[inline]
    pub fn payout(&self) -> Cash {
        Cash(self.amount.raw() * 2)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == TradeStatus::Active
    }
}

/// A registered account.
///
/// `trades` is most-recent-first. The balance is debited by trade
/// placement and withdrawal approval, credited by settlement wins and
/// deposit approval; it is not hard-clamped at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub balance: Cash,
    pub created_at: Timestamp,
    pub trades: Vec<Trade>,
}

impl User {
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        password: impl Into<String>,
        balance: Cash,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            balance,
            created_at,
            trades: Vec::new(),
        }
    }

    pub fn trade(&self, id: TradeId) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == id)
    }

    pub fn trade_mut(&mut self, id: TradeId) -> Option<&mut Trade> {
        self.trades.iter_mut().find(|t| t.id == id)
    }

    pub fn active_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.is_active())
    }
}

/// Direction of a money-movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

/// Review state of a money-movement request.
///
/// `Pending -> Approved` and `Pending -> Rejected` are the only
/// transitions, both terminal; approval applies the balance delta exactly
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
}

/// A deposit or withdrawal request awaiting administrative review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    /// Denormalized for review listings.
    pub username: String,
    pub kind: TransactionKind,
    pub amount: Cash,
    pub status: TransactionStatus,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

impl Transaction {
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }
}

/// Venue-wide trading limits, editable by the admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub min_trade_amount: Cash,
    pub max_trade_duration_secs: u64,
    /// When set, deposit/withdraw requests are approved on submission.
    pub auto_approval: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_trade_amount: Cash(10_000),
            max_trade_duration_secs: 300,
            auto_approval: false,
        }
    }
}

/// The single administrative credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredential {
    pub username: String,
    pub password: String,
}

/// The persisted current-session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// `None` for the admin session.
    pub user_id: Option<UserId>,
    pub username: String,
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(amount: i64, duration_secs: u64) -> Trade {
        Trade {
            id: TradeId(1),
            user_id: UserId(1),
            symbol: "AAPL".to_string(),
            direction: Direction::Buy,
            amount: Cash(amount),
            duration_secs,
            entry_price: Price(175_000),
            status: TradeStatus::Active,
            result: None,
            created_at: 10_000,
            completed_at: None,
        }
    }

    #[test]
    fn test_due_at() {
        assert_eq!(trade(25_000, 30).due_at(), 40_000);
    }

    #[test]
    fn test_payout_doubles_stake() {
        assert_eq!(trade(25_000, 30).payout(), Cash(50_000));
    }

    #[test]
    fn test_user_trade_lookup() {
        let mut user = User::new(UserId(1), "user1", "1234", Cash(1_000_000), 0);
        user.trades.push(trade(25_000, 30));
        assert!(user.trade(TradeId(1)).is_some());
        assert!(user.trade(TradeId(2)).is_none());
        assert_eq!(user.active_trades().count(), 1);
    }
}
