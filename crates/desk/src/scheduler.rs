//! Deferred settlement scheduling.
//!
//! Positions expire at `created_at + duration`. Instead of live timers,
//! the desk keeps a task table keyed by trade id and polls it from the
//! tick loop; pending entries can be cancelled, and the whole table can
//! be re-derived from persisted state after a restart, with past-due
//! trades firing on the first poll.

use std::collections::HashMap;

use storage::Store;
use types::{Timestamp, TradeId, UserId};

use crate::error::DeskResult;

/// One scheduled settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSettlement {
    pub trade_id: TradeId,
    pub user_id: UserId,
    pub due_at: Timestamp,
}

/// Task table of not-yet-settled positions.
#[derive(Debug, Default)]
pub struct SettlementScheduler {
    pending: HashMap<TradeId, PendingSettlement>,
}

impl SettlementScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a settlement; re-scheduling the same trade replaces the
    /// prior entry.
    pub fn schedule(&mut self, trade_id: TradeId, user_id: UserId, due_at: Timestamp) {
        self.pending.insert(
            trade_id,
            PendingSettlement {
                trade_id,
                user_id,
                due_at,
            },
        );
    }

    /// Drop a scheduled settlement, e.g. when the owning view goes away.
    pub fn cancel(&mut self, trade_id: TradeId) -> bool {
        self.pending.remove(&trade_id).is_some()
    }

    /// Remove and return every settlement due at `now`, earliest first.
    pub fn due(&mut self, now: Timestamp) -> Vec<PendingSettlement> {
        let mut fired: Vec<PendingSettlement> = self
            .pending
            .values()
            .filter(|p| p.due_at <= now)
            .copied()
            .collect();
        fired.sort_by_key(|p| (p.due_at, p.trade_id));
        for entry in &fired {
            self.pending.remove(&entry.trade_id);
        }
        fired
    }

    /// Rebuild the table from persisted active trades.
    ///
    /// Due times are recomputed from stored creation timestamps, so a
    /// position whose expiry passed while the process was down becomes
    /// immediately due. Returns the number of restored entries.
    pub fn restore(&mut self, store: &Store) -> DeskResult<usize> {
        self.pending.clear();
        for user in store.users()? {
            for trade in user.active_trades() {
                self.schedule(trade.id, user.id, trade.due_at());
            }
        }
        tracing::debug!(restored = self.pending.len(), "settlement table rebuilt");
        Ok(self.pending.len())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_removes_and_orders() {
        let mut scheduler = SettlementScheduler::new();
        scheduler.schedule(TradeId(1), UserId(1), 5_000);
        scheduler.schedule(TradeId(2), UserId(1), 3_000);
        scheduler.schedule(TradeId(3), UserId(2), 9_000);

        let fired = scheduler.due(5_000);
        assert_eq!(
            fired.iter().map(|p| p.trade_id).collect::<Vec<_>>(),
            vec![TradeId(2), TradeId(1)]
        );
        assert_eq!(scheduler.len(), 1);

        // Second poll at the same instant fires nothing.
        assert!(scheduler.due(5_000).is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = SettlementScheduler::new();
        scheduler.schedule(TradeId(1), UserId(1), 5_000);
        assert!(scheduler.cancel(TradeId(1)));
        assert!(!scheduler.cancel(TradeId(1)));
        assert!(scheduler.due(10_000).is_empty());
    }

    #[test]
    fn test_reschedule_replaces() {
        let mut scheduler = SettlementScheduler::new();
        scheduler.schedule(TradeId(1), UserId(1), 5_000);
        scheduler.schedule(TradeId(1), UserId(1), 8_000);
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.due(5_000).is_empty());
        assert_eq!(scheduler.due(8_000).len(), 1);
    }
}
