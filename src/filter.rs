use std::collections::{BTreeMap, BTreeSet};

use crate::schema::DISH_CATEGORIES;
use crate::store::{DishOrder, DishQuery};

/// Per-column sort direction for the dish listing
///
/// Every column starts ascending. Selecting a column flips its direction
/// before the listing is run, so the first click on a column sorts it
/// descending.
#[derive(Debug, Clone)]
pub struct SortState {
    ascending: BTreeMap<DishOrder, bool>,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            ascending: DishOrder::ALL.iter().map(|o| (*o, true)).collect(),
        }
    }
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ascending(&self, column: DishOrder) -> bool {
        self.ascending.get(&column).copied().unwrap_or(true)
    }

    /// Flip a column's direction and return the new one
    pub fn toggle(&mut self, column: DishOrder) -> bool {
        let entry = self.ascending.entry(column).or_insert(true);
        *entry = !*entry;
        *entry
    }
}

/// Checkbox-style selection over the known dish categories
#[derive(Debug, Clone)]
pub struct CategorySelection {
    selected: BTreeMap<String, bool>,
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::new(DISH_CATEGORIES.iter().copied())
    }
}

impl CategorySelection {
    /// Start with every given category selected
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected: categories.into_iter().map(|c| (c.into(), true)).collect(),
        }
    }

    /// Check or uncheck a category; returns false for an unknown category
    pub fn set(&mut self, category: &str, checked: bool) -> bool {
        match self.selected.get_mut(category) {
            Some(value) => {
                *value = checked;
                true
            }
            None => false,
        }
    }

    pub fn select_all(&mut self) {
        self.selected.values_mut().for_each(|v| *v = true);
    }

    pub fn clear(&mut self) {
        self.selected.values_mut().for_each(|v| *v = false);
    }

    pub fn is_selected(&self, category: &str) -> bool {
        self.selected.get(category).copied().unwrap_or(false)
    }

    /// The checked categories, used as the listing's category filter
    pub fn filter(&self) -> BTreeSet<String> {
        self.selected
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(c, _)| c.clone())
            .collect()
    }

    /// Build the listing query for a column click
    pub fn query(&self, sort: &mut SortState, column: DishOrder) -> DishQuery {
        let ascending = sort.toggle(column);
        DishQuery {
            order_by: column,
            ascending,
            categories: Some(self.filter()),
        }
    }
}
