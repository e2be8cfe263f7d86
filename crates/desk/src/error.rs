//! Unified error handling for the desk services.
//!
//! Every variant is a user-visible, non-fatal message: the operation did
//! not proceed, no state was mutated, and the caller may simply
//! re-submit. Nothing here aborts the process.

use storage::StorageError;
use types::{Symbol, TradeId, TransactionId, UserId};

/// Service error with a user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    /// The requested asset does not exist.
    #[error("asset not found: {0}")]
    AssetNotFound(Symbol),

    /// The requested user does not exist.
    #[error("{0} not found")]
    UserNotFound(UserId),

    /// The requested trade does not exist.
    #[error("{0} not found")]
    TradeNotFound(TradeId),

    /// The requested transaction does not exist.
    #[error("{0} not found")]
    TransactionNotFound(TransactionId),

    /// The transaction was already approved or rejected.
    #[error("{0} is no longer pending")]
    TransactionNotPending(TransactionId),

    /// Registration with a username that is already taken.
    #[error("username is already taken")]
    UsernameTaken,

    /// Login with a wrong username/password pair.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The account balance does not cover the requested amount.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// An input failed validation before any state mutation.
    #[error("{0}")]
    Validation(String),

    /// The document store failed; the prior persisted value is intact.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type alias for desk services.
pub type DeskResult<T> = Result<T, DeskError>;
