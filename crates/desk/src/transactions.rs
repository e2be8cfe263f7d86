//! Deposit and withdrawal requests with administrative review.

use storage::Store;
use types::{
    Cash, Timestamp, Transaction, TransactionId, TransactionKind, TransactionStatus, UserId,
};

use crate::error::{DeskError, DeskResult};

/// Smallest deposit or withdrawal the venue accepts.
pub const MIN_TRANSACTION: Cash = Cash(10_000);

/// File a deposit request.
pub fn request_deposit(
    store: &Store,
    user_id: UserId,
    amount: Cash,
    now: Timestamp,
) -> DeskResult<Transaction> {
    request(store, user_id, TransactionKind::Deposit, amount, now)
}

/// File a withdrawal request; bounded by the current balance.
pub fn request_withdraw(
    store: &Store,
    user_id: UserId,
    amount: Cash,
    now: Timestamp,
) -> DeskResult<Transaction> {
    request(store, user_id, TransactionKind::Withdraw, amount, now)
}

fn request(
    store: &Store,
    user_id: UserId,
    kind: TransactionKind,
    amount: Cash,
    now: Timestamp,
) -> DeskResult<Transaction> {
    if amount < MIN_TRANSACTION {
        return Err(DeskError::Validation(format!(
            "minimum transaction amount is {MIN_TRANSACTION}"
        )));
    }
    let Some(user) = store.user(user_id)? else {
        return Err(DeskError::UserNotFound(user_id));
    };
    if kind == TransactionKind::Withdraw && amount > user.balance {
        return Err(DeskError::InsufficientBalance);
    }

    let mut transactions = store.transactions()?;
    let id = next_transaction_id(&transactions);
    let transaction = Transaction {
        id,
        user_id,
        username: user.username,
        kind,
        amount,
        status: TransactionStatus::Pending,
        created_at: now,
        resolved_at: None,
    };
    transactions.push(transaction.clone());
    store.save_transactions(&transactions)?;
    tracing::info!(%id, ?kind, amount = %amount, "transaction requested");

    if store.settings()?.auto_approval {
        return approve(store, id, now);
    }
    Ok(transaction)
}

/// Approve a pending request, applying the balance delta exactly once.
///
/// A request that is no longer pending is rejected, so a second approval
/// cannot double-apply the delta.
pub fn approve(store: &Store, id: TransactionId, now: Timestamp) -> DeskResult<Transaction> {
    let mut transactions = store.transactions()?;
    let Some(transaction) = transactions.iter_mut().find(|t| t.id == id) else {
        return Err(DeskError::TransactionNotFound(id));
    };
    if !transaction.is_pending() {
        return Err(DeskError::TransactionNotPending(id));
    }

    transaction.status = TransactionStatus::Approved;
    transaction.resolved_at = Some(now);
    let resolved = transaction.clone();

    let mut users = store.users()?;
    if let Some(user) = users.iter_mut().find(|u| u.id == resolved.user_id) {
        match resolved.kind {
            TransactionKind::Deposit => user.balance += resolved.amount,
            TransactionKind::Withdraw => user.balance -= resolved.amount,
        }
        store.save_users(&users)?;
    }
    store.save_transactions(&transactions)?;
    tracing::info!(%id, "transaction approved");
    Ok(resolved)
}

/// Reject a pending request; terminal and balance-neutral.
pub fn reject(store: &Store, id: TransactionId, now: Timestamp) -> DeskResult<Transaction> {
    let mut transactions = store.transactions()?;
    let Some(transaction) = transactions.iter_mut().find(|t| t.id == id) else {
        return Err(DeskError::TransactionNotFound(id));
    };
    if !transaction.is_pending() {
        return Err(DeskError::TransactionNotPending(id));
    }

    transaction.status = TransactionStatus::Rejected;
    transaction.resolved_at = Some(now);
    let resolved = transaction.clone();
    store.save_transactions(&transactions)?;
    Ok(resolved)
}

/// Pending requests of one kind, for the review queue.
pub fn pending(store: &Store, kind: TransactionKind) -> DeskResult<Vec<Transaction>> {
    Ok(store
        .transactions()?
        .into_iter()
        .filter(|t| t.kind == kind && t.is_pending())
        .collect())
}

fn next_transaction_id(transactions: &[Transaction]) -> TransactionId {
    TransactionId(transactions.iter().map(|t| t.id.0).max().unwrap_or(0) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::init_defaults;

    const USER: UserId = UserId(1);

    fn setup() -> Store {
        let store = Store::open_in_memory().unwrap();
        init_defaults(&store, 0).unwrap();
        store
    }

    #[test]
    fn test_deposit_approval_applies_once() {
        let store = setup();
        let txn = request_deposit(&store, USER, Cash(50_000), 1_000).unwrap();
        assert!(txn.is_pending());
        // The request alone moves no money.
        assert_eq!(store.user(USER).unwrap().unwrap().balance, Cash(1_000_000));

        let approved = approve(&store, txn.id, 2_000).unwrap();
        assert_eq!(approved.status, TransactionStatus::Approved);
        assert_eq!(store.user(USER).unwrap().unwrap().balance, Cash(1_050_000));

        // Approving again is rejected and moves nothing.
        assert!(matches!(
            approve(&store, txn.id, 3_000),
            Err(DeskError::TransactionNotPending(_))
        ));
        assert_eq!(store.user(USER).unwrap().unwrap().balance, Cash(1_050_000));
    }

    #[test]
    fn test_withdraw_flow() {
        let store = setup();
        let txn = request_withdraw(&store, USER, Cash(200_000), 1_000).unwrap();
        approve(&store, txn.id, 2_000).unwrap();
        assert_eq!(store.user(USER).unwrap().unwrap().balance, Cash(800_000));
    }

    #[test]
    fn test_withdraw_bounded_by_balance() {
        let store = setup();
        assert!(matches!(
            request_withdraw(&store, USER, Cash(2_000_000), 0),
            Err(DeskError::InsufficientBalance)
        ));
        assert!(store.transactions().unwrap().is_empty());
    }

    #[test]
    fn test_minimum_amount() {
        let store = setup();
        assert!(matches!(
            request_deposit(&store, USER, Cash(9_999), 0),
            Err(DeskError::Validation(_))
        ));
    }

    #[test]
    fn test_reject_is_terminal_and_neutral() {
        let store = setup();
        let txn = request_deposit(&store, USER, Cash(50_000), 0).unwrap();
        let rejected = reject(&store, txn.id, 1_000).unwrap();
        assert_eq!(rejected.status, TransactionStatus::Rejected);
        assert_eq!(store.user(USER).unwrap().unwrap().balance, Cash(1_000_000));
        assert!(matches!(
            approve(&store, txn.id, 2_000),
            Err(DeskError::TransactionNotPending(_))
        ));
    }

    #[test]
    fn test_auto_approval() {
        let store = setup();
        let mut settings = store.settings().unwrap();
        settings.auto_approval = true;
        store.save_settings(&settings).unwrap();

        let txn = request_deposit(&store, USER, Cash(30_000), 0).unwrap();
        assert_eq!(txn.status, TransactionStatus::Approved);
        assert_eq!(store.user(USER).unwrap().unwrap().balance, Cash(1_030_000));
    }

    #[test]
    fn test_pending_queue_filters() {
        let store = setup();
        request_deposit(&store, USER, Cash(30_000), 0).unwrap();
        request_withdraw(&store, USER, Cash(20_000), 0).unwrap();
        assert_eq!(pending(&store, TransactionKind::Deposit).unwrap().len(), 1);
        assert_eq!(pending(&store, TransactionKind::Withdraw).unwrap().len(), 1);
    }
}
