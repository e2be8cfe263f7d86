//! Key/document store over SQLite.
//!
//! Every record is a whole JSON document under a fixed key; reads and
//! writes always move the entire document. That discipline is only safe
//! with a single writer, which this venue guarantees by construction
//! (one process, one cooperative thread of control).

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use types::{
    AdminCredential, Asset, MarketState, Price, SessionUser, Settings, Symbol, Timestamp,
    Transaction, User, UserId,
};

use crate::error::{Result, StorageError};

/// Fixed document keys, one record per concern.
pub mod keys {
    pub const USERS: &str = "users";
    pub const ADMIN: &str = "admin";
    pub const ASSETS: &str = "assets";
    pub const TRANSACTIONS: &str = "transactions";
    pub const SETTINGS: &str = "settings";
    pub const MARKET: &str = "market";
    pub const SESSION: &str = "session";
}

/// The persistent document store.
///
/// Passed by reference into every service function; there is no global
/// instance. Uses interior mutability (Mutex) because callers share it
/// immutably across the tick loop and settlement callbacks.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Generic document access
    // ─────────────────────────────────────────────────────────────────────

    /// Read and decode the whole document under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>> {
        let conn = self.conn.lock();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| StorageError::Decode { key, source }),
            None => Ok(None),
        }
    }

    /// Replace the whole document under `key`.
    pub fn put<T: Serialize>(&self, key: &'static str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value).map_err(StorageError::Encode)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO documents (key, value) VALUES (?1, ?2)",
            params![key, text],
        )?;
        Ok(())
    }

    /// Delete the document under `key`, if present.
    pub fn remove(&self, key: &'static str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM documents WHERE key = ?1", params![key])?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────

    pub fn users(&self) -> Result<Vec<User>> {
        Ok(self.get(keys::USERS)?.unwrap_or_default())
    }

    pub fn save_users(&self, users: &[User]) -> Result<()> {
        self.put(keys::USERS, &users)
    }

    pub fn user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users()?.into_iter().find(|u| u.id == id))
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users()?.into_iter().find(|u| u.username == username))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Assets
    // ─────────────────────────────────────────────────────────────────────

    pub fn assets(&self) -> Result<Vec<Asset>> {
        Ok(self.get(keys::ASSETS)?.unwrap_or_default())
    }

    pub fn save_assets(&self, assets: &[Asset]) -> Result<()> {
        self.put(keys::ASSETS, &assets)
    }

    pub fn asset(&self, symbol: &str) -> Result<Option<Asset>> {
        Ok(self.assets()?.into_iter().find(|a| a.symbol == symbol))
    }

    /// Quote update: append the prior price to the asset's bounded
    /// history, then overwrite. Returns false when the symbol is unknown.
    pub fn update_asset_price(
        &self,
        symbol: &Symbol,
        new_price: Price,
        now: Timestamp,
    ) -> Result<bool> {
        let mut assets = self.assets()?;
        let Some(asset) = assets.iter_mut().find(|a| &a.symbol == symbol) else {
            return Ok(false);
        };
        asset.record_price(new_price, now);
        self.save_assets(&assets)?;
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────

    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.get(keys::TRANSACTIONS)?.unwrap_or_default())
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        self.put(keys::TRANSACTIONS, &transactions)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Settings / market / admin / session
    // ─────────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> Result<Settings> {
        Ok(self.get(keys::SETTINGS)?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.put(keys::SETTINGS, settings)
    }

    pub fn market(&self) -> Result<MarketState> {
        Ok(self.get(keys::MARKET)?.unwrap_or_default())
    }

    pub fn save_market(&self, market: &MarketState) -> Result<()> {
        self.put(keys::MARKET, market)
    }

    pub fn admin(&self) -> Result<Option<AdminCredential>> {
        self.get(keys::ADMIN)
    }

    pub fn save_admin(&self, admin: &AdminCredential) -> Result<()> {
        self.put(keys::ADMIN, admin)
    }

    pub fn session(&self) -> Result<Option<SessionUser>> {
        self.get(keys::SESSION)
    }

    pub fn set_session(&self, session: &SessionUser) -> Result<()> {
        self.put(keys::SESSION, session)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.remove(keys::SESSION)
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}
