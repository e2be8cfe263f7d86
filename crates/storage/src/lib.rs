//! Persistence layer for the option-arcade venue.
//!
//! One SQLite table of whole JSON documents, one fixed key per concern
//! (users, assets, transactions, settings, market, admin, session).
//! Every read and write moves an entire document, so a failed write
//! leaves the previous value intact; there is no partial-update path and
//! no corruption recovery. This is explicitly a single-writer design.

mod defaults;
mod error;
mod store;

pub use defaults::{STARTING_BALANCE, init_defaults};
pub use error::{Result, StorageError};
pub use store::{Store, keys};
