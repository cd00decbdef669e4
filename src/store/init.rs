use rusqlite::OptionalExtension;

use crate::error::Result;
use crate::schema::{seed_rows, TableSchema, ALL_TABLES, USERS};

use super::schema_gen::{generate_create_table, generate_insert};
use super::Database;

/// What the initializer did on open
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InitReport {
    /// Tables that did not exist before
    pub created: Vec<&'static str>,
    /// Tables that received seed rows, with the number of rows written
    pub seeded: Vec<(&'static str, usize)>,
}

impl InitReport {
    pub fn is_fresh(&self) -> bool {
        !self.created.is_empty()
    }
}

impl Database {
    /// Create missing tables and seed them
    ///
    /// A table is seeded only when this call created it. The users table is
    /// also reseeded whenever it is empty so that a login is always possible.
    pub(super) fn initialize(&mut self) -> Result<InitReport> {
        let mut report = InitReport::default();

        for schema in ALL_TABLES {
            let existed = self.table_exists(schema.name)?;
            if !existed {
                self.conn.execute(&generate_create_table(schema), [])?;
                tracing::info!(table = schema.name, "created table");
                report.created.push(schema.name);
            }

            let needs_seed = !existed || (schema.name == USERS.name && self.count(schema.name)? == 0);
            if needs_seed {
                let rows = self.seed_table(schema)?;
                report.seeded.push((schema.name, rows));
            }
        }

        Ok(report)
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn seed_table(&mut self, schema: &TableSchema) -> Result<usize> {
        let rows = seed_rows(schema);
        let sql = generate_insert(schema);

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for row in &rows {
                for (idx, value) in row.iter().enumerate() {
                    value.bind_to(idx + 1, &mut stmt)?;
                }
                stmt.raw_execute()?;
            }
        }
        tx.commit()?;

        tracing::info!(table = schema.name, rows = rows.len(), "seeded table");
        Ok(rows.len())
    }
}
