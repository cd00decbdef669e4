//! SQLite-backed storage for restaurant records
//!
//! A [`Database`] owns the single connection used for the whole session.
//! Operations are split across submodules by concern:
//! - `init`: table creation and first-run seeding
//! - `records`: generic CRUD over the editable tables
//! - `dishes`: sorted and filtered dish listings

mod dishes;
mod init;
mod records;
pub mod schema_gen;

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

pub use dishes::{DishOrder, DishQuery};
pub use init::InitReport;
pub use records::{editable_table, Record};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the restaurant database
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file and make sure every table exists
    pub fn open(db_path: &Path) -> Result<(Self, InitReport)> {
        let conn = Connection::open(db_path)?;
        tracing::debug!(path = %db_path.display(), "opened database");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database, created and seeded
    pub fn open_in_memory() -> Result<(Self, InitReport)> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<(Self, InitReport)> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mut db = Self { conn };
        let report = db.initialize()?;
        Ok((db, report))
    }

    /// Number of rows currently stored in a known table
    pub fn count(&self, table: &str) -> Result<i64> {
        let schema = crate::schema::get_table(table)
            .ok_or_else(|| crate::error::StoreError::UnknownTable(table.to_string()))?;
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", schema.name),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
