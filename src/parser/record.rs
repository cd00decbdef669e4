use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::schema::{Column, ColumnType, NumericCheck, TableSchema, ID_COLUMN};

/// A single column value as stored in SQLite
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Integer(i) => Some(*i as f64),
            SqlValue::Real(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<rusqlite::types::Value> for SqlValue {
    fn from(value: rusqlite::types::Value) -> Self {
        use rusqlite::types::Value;
        match value {
            Value::Null => SqlValue::Null,
            Value::Integer(i) => SqlValue::Integer(i),
            Value::Real(f) => SqlValue::Real(f),
            Value::Text(s) => SqlValue::Text(s),
            Value::Blob(b) => SqlValue::Text(String::from_utf8_lossy(&b).into_owned()),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        SqlValue::Integer(i)
    }
}

impl From<f64> for SqlValue {
    fn from(f: f64) -> Self {
        SqlValue::Real(f)
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => Ok(()),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{}", r),
            SqlValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Parse a raw form field into a value of the column's type
///
/// Empty input becomes NULL for optional columns and is rejected for
/// required ones.
pub fn parse_field(column: &Column, raw: &str) -> Result<SqlValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return check_value(column, SqlValue::Null);
    }

    let value = match column.col_type {
        ColumnType::Text => SqlValue::Text(raw.to_string()),
        ColumnType::Integer => trimmed
            .parse::<i64>()
            .map(SqlValue::Integer)
            .map_err(|_| StoreError::validation(column.name, format!("'{}' is not a whole number", trimmed)))?,
        ColumnType::Real => trimmed
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(SqlValue::Real)
            .ok_or_else(|| StoreError::validation(column.name, format!("'{}' is not a number", trimmed)))?,
    };

    check_value(column, value)
}

/// Validate an already-typed value against a column definition
///
/// Integers are widened to REAL for real columns; anything else of the wrong
/// type is rejected rather than left to SQLite's type affinity.
pub fn check_value(column: &Column, value: SqlValue) -> Result<SqlValue> {
    let value = match (column.col_type, value) {
        (_, SqlValue::Null) => {
            if column.nullable {
                return Ok(SqlValue::Null);
            }
            return Err(StoreError::validation(column.name, "value is required"));
        }
        (ColumnType::Text, SqlValue::Text(s)) => {
            if !column.nullable && s.trim().is_empty() {
                return Err(StoreError::validation(column.name, "value is required"));
            }
            SqlValue::Text(s)
        }
        (ColumnType::Integer, SqlValue::Integer(i)) => SqlValue::Integer(i),
        (ColumnType::Real, SqlValue::Integer(i)) => SqlValue::Real(i as f64),
        (ColumnType::Real, SqlValue::Real(f)) if f.is_finite() => SqlValue::Real(f),
        (col_type, other) => {
            return Err(StoreError::validation(
                column.name,
                format!("expected {}, got {:?}", col_type.sql_type(), other),
            ));
        }
    };

    if let Some(n) = value.as_f64() {
        match column.check {
            NumericCheck::NonNegative if n < 0.0 => {
                return Err(StoreError::validation(column.name, "must not be negative"));
            }
            NumericCheck::Positive if n <= 0.0 => {
                return Err(StoreError::validation(column.name, "must be greater than zero"));
            }
            _ => {}
        }
    }

    Ok(value)
}

/// Parse `field=value` assignments into typed values for the named columns
///
/// `id` is accepted as an integer field so the result can feed an update.
pub fn parse_assignments(schema: &TableSchema, assignments: &[String]) -> Result<Vec<(String, SqlValue)>> {
    let mut fields = Vec::with_capacity(assignments.len());

    for assignment in assignments {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| StoreError::validation(assignment.as_str(), "expected field=value"))?;
        let name = name.trim();

        let value = if name == ID_COLUMN {
            raw.trim()
                .parse::<i64>()
                .map(SqlValue::Integer)
                .map_err(|_| StoreError::validation(ID_COLUMN, "id must be a whole number"))?
        } else {
            let column = schema
                .column(name)
                .ok_or_else(|| StoreError::validation(name, format!("no such column in {}", schema.name)))?;
            parse_field(column, raw)?
        };

        fields.push((name.to_string(), value));
    }

    Ok(fields)
}

/// Arrange named fields into the table's declared column order for an
/// insert; columns not supplied become NULL
pub fn ordered_values(schema: &TableSchema, fields: Vec<(String, SqlValue)>) -> Result<Vec<SqlValue>> {
    let mut values = vec![SqlValue::Null; schema.columns.len()];

    for (name, value) in fields {
        let idx = schema
            .column_index(&name)
            .ok_or_else(|| StoreError::validation(name.as_str(), format!("cannot be set on insert into {}", schema.name)))?;
        values[idx] = value;
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{DISHES, INGREDIENTS, RESERVATIONS};

    fn col(schema: &TableSchema, name: &str) -> &'static Column {
        schema.column(name).unwrap()
    }

    #[test]
    fn test_parse_price() {
        let price = col(&DISHES, "price");
        assert_eq!(parse_field(price, "350").unwrap(), SqlValue::Real(350.0));
        assert_eq!(parse_field(price, " 12,5 ").unwrap(), SqlValue::Real(12.5));
        assert_eq!(parse_field(price, "0").unwrap(), SqlValue::Real(0.0));
    }

    #[test]
    fn test_non_numeric_price_names_field() {
        let err = parse_field(col(&DISHES, "price"), "дорого").unwrap_err();
        match err {
            StoreError::Validation { field, .. } => assert_eq!(field, "price"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(parse_field(col(&DISHES, "price"), "NaN").is_err());
    }

    #[test]
    fn test_range_checks() {
        assert!(parse_field(col(&DISHES, "price"), "-1").is_err());
        assert!(parse_field(col(&INGREDIENTS, "quantity"), "-3").is_err());
        assert!(parse_field(col(&INGREDIENTS, "quantity"), "0").is_ok());
        assert!(parse_field(col(&RESERVATIONS, "number_of_guests"), "0").is_err());
        assert!(parse_field(col(&RESERVATIONS, "table_number"), "2.5").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_field(col(&DISHES, "description"), "").unwrap(), SqlValue::Null);
        assert!(parse_field(col(&DISHES, "name"), "   ").is_err());
    }

    #[test]
    fn test_check_value_types() {
        let price = col(&DISHES, "price");
        assert_eq!(check_value(price, SqlValue::Integer(5)).unwrap(), SqlValue::Real(5.0));
        assert!(check_value(price, "abc".into()).is_err());
        assert!(check_value(col(&DISHES, "name"), SqlValue::Integer(1)).is_err());
    }

    #[test]
    fn test_display_keeps_precision() {
        assert_eq!(SqlValue::Real(12.345).to_string(), "12.345");
        assert_eq!(SqlValue::Real(350.0).to_string(), "350");
        assert_eq!(SqlValue::Null.to_string(), "");
    }

    #[test]
    fn test_parse_assignments() {
        let fields = parse_assignments(
            &DISHES,
            &["id=3".to_string(), "name=Уха".to_string(), "price=420".to_string()],
        )
        .unwrap();
        assert_eq!(fields[0], ("id".to_string(), SqlValue::Integer(3)));
        assert_eq!(fields[1], ("name".to_string(), SqlValue::Text("Уха".to_string())));
        assert_eq!(fields[2], ("price".to_string(), SqlValue::Real(420.0)));

        assert!(parse_assignments(&DISHES, &["colour=red".to_string()]).is_err());
        assert!(parse_assignments(&DISHES, &["name".to_string()]).is_err());
    }

    #[test]
    fn test_ordered_values() {
        let values = ordered_values(
            &INGREDIENTS,
            vec![
                ("unit".to_string(), "кг".into()),
                ("name".to_string(), "Соль".into()),
            ],
        )
        .unwrap();
        assert_eq!(values, vec![SqlValue::from("Соль"), SqlValue::Null, SqlValue::from("кг")]);

        assert!(ordered_values(&INGREDIENTS, vec![("id".to_string(), SqlValue::Integer(1))]).is_err());
    }
}
