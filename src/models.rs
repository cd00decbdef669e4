//! Typed views over the editable tables
//!
//! Each entity knows its table schema and how to read itself from a row
//! selected with [`TableSchema::select_list`], so callers can work with
//! structs instead of raw [`Record`](crate::store::Record) values.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::error::Result;
use crate::parser::SqlValue;
use crate::schema::{TableSchema, DISHES, INGREDIENTS, RESERVATIONS, STAFF};
use crate::store::Database;

/// A typed row of one of the editable tables
pub trait Entity: Sized {
    fn schema() -> &'static TableSchema;

    /// Read from a row whose columns follow `schema().select_list()`
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self>;

    /// Values in declared column order, without the id
    fn values(&self) -> Vec<SqlValue>;
}

fn opt_text(value: &Option<String>) -> SqlValue {
    value.clone().map(SqlValue::Text).unwrap_or(SqlValue::Null)
}

fn not_a_number(idx: usize, value: &Value) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, value.data_type(), Box::from("stored value is not a number"))
}

/// Read a REAL column, accepting integers and numeric text such as `12,5`
/// that SQLite's type affinity left as TEXT
fn real_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<f64> {
    let value: Value = row.get(idx)?;
    match &value {
        Value::Integer(i) => Ok(*i as f64),
        Value::Real(f) => Ok(*f),
        Value::Text(s) => s
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| not_a_number(idx, &value)),
        _ => Err(not_a_number(idx, &value)),
    }
}

/// Read an INTEGER column, accepting whole REAL values and numeric text
fn integer_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<i64> {
    let value: Value = row.get(idx)?;
    match &value {
        Value::Integer(i) => Ok(*i),
        Value::Real(f) if f.fract() == 0.0 => Ok(*f as i64),
        Value::Text(s) => s.trim().parse::<i64>().map_err(|_| not_a_number(idx, &value)),
        _ => Err(not_a_number(idx, &value)),
    }
}

/// Collect decoded rows, skipping rows whose stored values cannot be
/// converted to the entity's field types
pub(crate) fn collect_rows<T>(
    table: &str,
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> rusqlite::Result<Vec<T>> {
    let mut out = Vec::new();
    for row in rows {
        match row {
            Ok(entity) => out.push(entity),
            Err(rusqlite::Error::FromSqlConversionFailure(idx, data_type, err)) => {
                tracing::warn!(table, column = idx, %data_type, error = %err, "skipped row with unreadable value");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub price: f64,
    pub category: Option<String>,
}

impl Entity for Dish {
    fn schema() -> &'static TableSchema {
        &DISHES
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            ingredients: row.get(3)?,
            price: real_at(row, 4)?,
            category: row.get(5)?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.name.clone()),
            opt_text(&self.description),
            opt_text(&self.ingredients),
            SqlValue::Real(self.price),
            opt_text(&self.category),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub customer_name: String,
    pub reservation_date: String,
    pub number_of_guests: i64,
    pub table_number: i64,
}

impl Entity for Reservation {
    fn schema() -> &'static TableSchema {
        &RESERVATIONS
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            customer_name: row.get(1)?,
            reservation_date: row.get(2)?,
            number_of_guests: integer_at(row, 3)?,
            table_number: integer_at(row, 4)?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.customer_name.clone()),
            SqlValue::Text(self.reservation_date.clone()),
            SqlValue::Integer(self.number_of_guests),
            SqlValue::Integer(self.table_number),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub salary: f64,
    pub hire_date: String,
}

impl Entity for Staff {
    fn schema() -> &'static TableSchema {
        &STAFF
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            position: row.get(2)?,
            salary: real_at(row, 3)?,
            hire_date: row.get(4)?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.name.clone()),
            SqlValue::Text(self.position.clone()),
            SqlValue::Real(self.salary),
            SqlValue::Text(self.hire_date.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientStock {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
}

impl Entity for IngredientStock {
    fn schema() -> &'static TableSchema {
        &INGREDIENTS
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            quantity: integer_at(row, 2)?,
            unit: row.get(3)?,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.name.clone()),
            SqlValue::Integer(self.quantity),
            SqlValue::Text(self.unit.clone()),
        ]
    }
}

impl Database {
    /// All rows of an entity's table, decoded
    pub fn list<T: Entity>(&self) -> Result<Vec<T>> {
        let schema = T::schema();
        let sql = format!("SELECT {} FROM {}", schema.select_list(), schema.name);

        let mut stmt = self.conn().prepare_cached(&sql)?;
        let rows = collect_rows(schema.name, stmt.query_map([], |row| T::from_row(row))?)?;
        Ok(rows)
    }

    /// Insert an entity, ignoring its `id`; returns the assigned id
    pub fn insert_entity<T: Entity>(&self, session: &Session, entity: &T) -> Result<i64> {
        self.insert(session, T::schema().name, &entity.values())
    }
}
