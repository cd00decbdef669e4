use rusqlite::OptionalExtension;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::auth::Session;
use crate::error::{Result, StoreError};
use crate::parser::{check_value, SqlValue};
use crate::schema::{get_table, TableSchema, ID_COLUMN};

use super::schema_gen::{generate_insert, generate_update};
use super::Database;

/// A row read from one of the editable tables
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    /// Column name and value pairs, in the table's declared order
    pub fields: Vec<(&'static str, SqlValue)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.fields.iter().find(|(name, _)| *name == column).map(|(_, v)| v)
    }

    /// Values without the id, ready to pass back to `insert`
    pub fn values(&self) -> Vec<SqlValue> {
        self.fields.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Full field map including the id, ready to pass to `update`
    pub fn to_update(&self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        fields.push((ID_COLUMN, SqlValue::Integer(self.id)));
        fields.extend(self.fields.iter().cloned());
        fields
    }

    pub(crate) fn from_row(schema: &TableSchema, row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let id = row.get(0)?;
        let mut fields = Vec::with_capacity(schema.columns.len());
        for (idx, col) in schema.columns.iter().enumerate() {
            let value: rusqlite::types::Value = row.get(idx + 1)?;
            fields.push((col.name, SqlValue::from(value)));
        }
        Ok(Self { id, fields })
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(ID_COLUMN, &self.id)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Resolve a table reachable through the generic store
pub fn editable_table(name: &str) -> Result<&'static TableSchema> {
    get_table(name)
        .filter(|t| t.editable)
        .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
}

impl Database {
    /// Every row of a table in storage order
    pub fn list_all(&self, table: &str) -> Result<Vec<Record>> {
        let schema = editable_table(table)?;
        let sql = format!("SELECT {} FROM {}", schema.select_list(), schema.name);

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map([], |row| Record::from_row(schema, row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Point lookup by id
    pub fn get(&self, table: &str, id: i64) -> Result<Option<Record>> {
        let schema = editable_table(table)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            schema.select_list(),
            schema.name,
            ID_COLUMN
        );

        let record = self
            .conn
            .query_row(&sql, [id], |row| Record::from_row(schema, row))
            .optional()?;
        Ok(record)
    }

    /// Insert a row from values in declared column order; returns the new id
    pub fn insert(&self, session: &Session, table: &str, values: &[SqlValue]) -> Result<i64> {
        session.require_write(format!("insert into {}", table))?;
        let schema = editable_table(table)?;

        if values.len() != schema.columns.len() {
            return Err(StoreError::validation(
                schema.name,
                format!("expected {} values, got {}", schema.columns.len(), values.len()),
            ));
        }

        let checked = schema
            .columns
            .iter()
            .zip(values)
            .map(|(col, value)| check_value(col, value.clone()))
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare_cached(&generate_insert(schema))?;
        for (idx, value) in checked.iter().enumerate() {
            value.bind_to(idx + 1, &mut stmt)?;
        }
        stmt.raw_execute()?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(table = schema.name, id, user = %session.user().username, "inserted row");
        Ok(id)
    }

    /// Overwrite the supplied fields of the row named by the `id` field
    ///
    /// Fields are written verbatim; columns that are not supplied keep their
    /// stored value. Fails with `NotFound` when no row has that id.
    pub fn update<K: AsRef<str>>(&self, session: &Session, table: &str, fields: &[(K, SqlValue)]) -> Result<()> {
        session.require_write(format!("update {}", table))?;
        let schema = editable_table(table)?;

        let mut id = None;
        let mut updates: Vec<(usize, SqlValue)> = Vec::with_capacity(fields.len());

        for (name, value) in fields {
            let name: &str = name.as_ref();
            if name == ID_COLUMN {
                id = Some(
                    value
                        .as_i64()
                        .ok_or_else(|| StoreError::validation(ID_COLUMN, "id must be an integer"))?,
                );
                continue;
            }

            let idx = schema
                .column_index(name)
                .ok_or_else(|| StoreError::validation(name, format!("no such column in {}", schema.name)))?;
            if updates.iter().any(|(i, _)| *i == idx) {
                return Err(StoreError::validation(name, "supplied more than once"));
            }
            updates.push((idx, check_value(&schema.columns[idx], value.clone())?));
        }

        let id = id.ok_or_else(|| StoreError::validation(ID_COLUMN, "required to update a row"))?;
        if updates.is_empty() {
            return Err(StoreError::validation(schema.name, "no fields to update"));
        }

        updates.sort_by_key(|(idx, _)| *idx);
        let columns: Vec<&str> = updates.iter().map(|(idx, _)| schema.columns[*idx].name).collect();

        let mut stmt = self.conn.prepare_cached(&generate_update(schema, &columns))?;
        for (pos, (_, value)) in updates.iter().enumerate() {
            value.bind_to(pos + 1, &mut stmt)?;
        }
        stmt.raw_bind_parameter(updates.len() + 1, id)?;
        let changed = stmt.raw_execute()?;

        if changed == 0 {
            return Err(StoreError::NotFound {
                table: schema.name,
                id,
            });
        }

        tracing::info!(table = schema.name, id, user = %session.user().username, "updated row");
        Ok(())
    }

    /// Remove a row; returns whether anything was deleted
    pub fn delete(&self, session: &Session, table: &str, id: i64) -> Result<bool> {
        session.require_write(format!("delete from {}", table))?;
        let schema = editable_table(table)?;

        let sql = format!("DELETE FROM {} WHERE {} = ?1", schema.name, ID_COLUMN);
        let changed = self.conn.execute(&sql, [id])?;

        if changed == 0 {
            tracing::debug!(table = schema.name, id, "delete matched no row");
        } else {
            tracing::info!(table = schema.name, id, user = %session.user().username, "deleted row");
        }
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(db: &Database) -> Session {
        db.login("admin", "admin").unwrap().unwrap()
    }

    fn dish(name: &str, price: f64) -> Vec<SqlValue> {
        vec![
            name.into(),
            SqlValue::Null,
            "вода".into(),
            price.into(),
            "Напитки".into(),
        ]
    }

    #[test]
    fn test_users_table_not_reachable() {
        let (db, _) = Database::open_in_memory().unwrap();
        assert!(matches!(db.list_all("users"), Err(StoreError::UnknownTable(_))));
        assert!(matches!(db.list_all("menu"), Err(StoreError::UnknownTable(_))));
    }

    #[test]
    fn test_insert_then_get() {
        let (db, _) = Database::open_in_memory().unwrap();
        let session = admin(&db);

        let id = db.insert(&session, "dishes", &dish("Квас", 120.0)).unwrap();
        let record = db.get("dishes", id).unwrap().unwrap();
        assert_eq!(record.get("name"), Some(&SqlValue::Text("Квас".to_string())));
        assert_eq!(record.get("description"), Some(&SqlValue::Null));
        assert_eq!(record.values(), dish("Квас", 120.0));
    }

    #[test]
    fn test_insert_wrong_arity() {
        let (db, _) = Database::open_in_memory().unwrap();
        let session = admin(&db);
        let err = db.insert(&session, "ingredients", &["Соль".into()]).unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[test]
    fn test_update_writes_in_place() {
        let (db, _) = Database::open_in_memory().unwrap();
        let session = admin(&db);

        db.update(&session, "ingredients", &[("id", SqlValue::Integer(1)), ("quantity", SqlValue::Integer(7))])
            .unwrap();
        let record = db.get("ingredients", 1).unwrap().unwrap();
        assert_eq!(record.get("quantity"), Some(&SqlValue::Integer(7)));
        assert_eq!(record.get("name"), Some(&SqlValue::Text("Курица".to_string())));
    }

    #[test]
    fn test_update_errors() {
        let (db, _) = Database::open_in_memory().unwrap();
        let session = admin(&db);

        let missing = db.update(&session, "staff", &[("id", SqlValue::Integer(999)), ("name", "Кто-то".into())]);
        assert!(matches!(missing, Err(StoreError::NotFound { table: "staff", id: 999 })));

        let no_id = db.update(&session, "staff", &[("name", SqlValue::from("Кто-то"))]);
        assert!(matches!(no_id, Err(StoreError::Validation { ref field, .. }) if field == "id"));

        let bad_column = db.update(&session, "staff", &[("id", SqlValue::Integer(1)), ("id; --", "x".into())]);
        assert!(matches!(bad_column, Err(StoreError::Validation { .. })));
    }

    #[test]
    fn test_delete_twice() {
        let (db, _) = Database::open_in_memory().unwrap();
        let session = admin(&db);

        assert!(db.delete(&session, "reservations", 2).unwrap());
        assert!(db.get("reservations", 2).unwrap().is_none());
        assert!(!db.delete(&session, "reservations", 2).unwrap());
        assert_eq!(db.count("reservations").unwrap(), 5);
    }

    #[test]
    fn test_record_serializes_as_map() {
        let (db, _) = Database::open_in_memory().unwrap();
        let record = db.get("ingredients", 5).unwrap().unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["name"], "Яйца");
        assert_eq!(json["quantity"], 200);
        assert_eq!(json["unit"], "шт");
    }
}
