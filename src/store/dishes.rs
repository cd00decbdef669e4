use std::collections::BTreeSet;

use clap::ValueEnum;
use rusqlite::types::Value;

use crate::error::Result;
use crate::models::{collect_rows, Dish, Entity};
use crate::schema::{DISHES, ID_COLUMN};

use super::Database;

/// Columns the dish listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum DishOrder {
    Id,
    Name,
    Price,
    Category,
}

impl DishOrder {
    pub const ALL: [DishOrder; 4] = [DishOrder::Id, DishOrder::Name, DishOrder::Price, DishOrder::Category];

    pub fn column(self) -> &'static str {
        match self {
            DishOrder::Id => ID_COLUMN,
            DishOrder::Name => "name",
            DishOrder::Price => "price",
            DishOrder::Category => "category",
        }
    }
}

/// Parameters for a dish listing
#[derive(Debug, Clone, PartialEq)]
pub struct DishQuery {
    pub order_by: DishOrder,
    pub ascending: bool,
    /// `None` lists every category; an empty set lists nothing
    pub categories: Option<BTreeSet<String>>,
}

impl Default for DishQuery {
    fn default() -> Self {
        Self {
            order_by: DishOrder::Id,
            ascending: true,
            categories: None,
        }
    }
}

impl DishQuery {
    pub fn sorted(order_by: DishOrder, ascending: bool) -> Self {
        Self {
            order_by,
            ascending,
            categories: None,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    fn to_sql(&self) -> String {
        let direction = if self.ascending { "ASC" } else { "DESC" };
        let mut sql = format!("SELECT {} FROM {}", DISHES.select_list(), DISHES.name);

        if let Some(categories) = &self.categories {
            let placeholders: Vec<&str> = categories.iter().map(|_| "?").collect();
            sql.push_str(&format!(" WHERE category IN ({})", placeholders.join(", ")));
        }

        sql.push_str(&format!(" ORDER BY {} {}", self.order_by.column(), direction));
        if self.order_by != DishOrder::Id {
            sql.push_str(&format!(", {} ASC", ID_COLUMN));
        }
        sql
    }
}

impl Database {
    /// Dishes sorted by the requested column, optionally restricted to a set
    /// of categories; equal sort keys fall back to ascending id
    pub fn list_dishes(&self, query: &DishQuery) -> Result<Vec<Dish>> {
        if matches!(&query.categories, Some(c) if c.is_empty()) {
            return Ok(Vec::new());
        }

        let params: Vec<Value> = query
            .categories
            .iter()
            .flatten()
            .map(|c| Value::Text(c.clone()))
            .collect();

        let mut stmt = self.conn().prepare_cached(&query.to_sql())?;
        let dishes = collect_rows(
            DISHES.name,
            stmt.query_map(rusqlite::params_from_iter(params), |row| Dish::from_row(row))?,
        )?;

        tracing::debug!(
            order_by = query.order_by.column(),
            ascending = query.ascending,
            rows = dishes.len(),
            "listed dishes"
        );
        Ok(dishes)
    }
}
