//! Per-user performance statistics over completed trades.

use std::fmt;

use types::{Cash, TradeResult, TradeStatus, User};

/// Qualitative rating derived from the win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PerformanceTier {
    Beginner,
    Novice,
    Intermediate,
    Advanced,
    Expert,
}

impl PerformanceTier {
    fn from_win_rate(win_rate: f64) -> Self {
        if win_rate >= 70.0 {
            PerformanceTier::Expert
        } else if win_rate >= 60.0 {
            PerformanceTier::Advanced
        } else if win_rate >= 50.0 {
            PerformanceTier::Intermediate
        } else if win_rate >= 40.0 {
            PerformanceTier::Novice
        } else {
            PerformanceTier::Beginner
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PerformanceTier::Beginner => "Beginner",
            PerformanceTier::Novice => "Novice",
            PerformanceTier::Intermediate => "Intermediate",
            PerformanceTier::Advanced => "Advanced",
            PerformanceTier::Expert => "Expert",
        };
        write!(f, "{name}")
    }
}

/// Aggregated trading record for one account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage of completed trades won.
    pub win_rate: f64,
    /// Winnings minus forfeited stakes.
    pub net_profit: Cash,
    /// Largest single winning stake.
    pub best_win: Cash,
    pub tier: PerformanceTier,
}

/// Compute stats over the user's completed trades.
pub fn user_stats(user: &User) -> UserStats {
    let completed: Vec<_> = user
        .trades
        .iter()
        .filter(|t| t.status == TradeStatus::Completed)
        .collect();

    if completed.is_empty() {
        return UserStats {
            total_trades: 0,
            wins: 0,
            losses: 0,
            win_rate: 0.0,
            net_profit: Cash::ZERO,
            best_win: Cash::ZERO,
            tier: PerformanceTier::Beginner,
        };
    }

    let wins: Vec<_> = completed
        .iter()
        .filter(|t| t.result == Some(TradeResult::Win))
        .collect();
    let win_total: Cash = wins.iter().map(|t| t.amount).sum();
    let loss_total: Cash = completed
        .iter()
        .filter(|t| t.result == Some(TradeResult::Loss))
        .map(|t| t.amount)
        .sum();

    let win_rate = wins.len() as f64 / completed.len() as f64 * 100.0;

    UserStats {
        total_trades: completed.len(),
        wins: wins.len(),
        losses: completed.len() - wins.len(),
        win_rate,
        net_profit: win_total - loss_total,
        best_win: wins.iter().map(|t| t.amount).max().unwrap_or(Cash::ZERO),
        tier: PerformanceTier::from_win_rate(win_rate),
    }
}
