//! Table schema definitions for the restaurant database

use super::types::*;

pub static USERS: TableSchema = TableSchema {
    name: "users",
    columns: &[
        Column::required("username", ColumnType::Text).unique(),
        Column::required("password", ColumnType::Text),
        Column::required("role", ColumnType::Text),
    ],
    editable: false,
};

pub static DISHES: TableSchema = TableSchema {
    name: "dishes",
    columns: &[
        Column::required("name", ColumnType::Text),
        Column::new("description", ColumnType::Text),
        Column::new("ingredients", ColumnType::Text),
        Column::required("price", ColumnType::Real).non_negative(),
        Column::new("category", ColumnType::Text),
    ],
    editable: true,
};

pub static RESERVATIONS: TableSchema = TableSchema {
    name: "reservations",
    columns: &[
        Column::required("customer_name", ColumnType::Text),
        Column::required("reservation_date", ColumnType::Text),
        Column::required("number_of_guests", ColumnType::Integer).positive(),
        Column::required("table_number", ColumnType::Integer).positive(),
    ],
    editable: true,
};

pub static STAFF: TableSchema = TableSchema {
    name: "staff",
    columns: &[
        Column::required("name", ColumnType::Text),
        Column::required("position", ColumnType::Text),
        Column::required("salary", ColumnType::Real).non_negative(),
        Column::required("hire_date", ColumnType::Text),
    ],
    editable: true,
};

pub static INGREDIENTS: TableSchema = TableSchema {
    name: "ingredients",
    columns: &[
        Column::required("name", ColumnType::Text),
        Column::required("quantity", ColumnType::Integer).non_negative(),
        Column::required("unit", ColumnType::Text),
    ],
    editable: true,
};

/// All tables in creation order
pub static ALL_TABLES: &[&TableSchema] = &[&USERS, &DISHES, &RESERVATIONS, &STAFF, &INGREDIENTS];

/// Dish categories offered by the category selection
pub const DISH_CATEGORIES: &[&str] = &["Закуска", "Супы", "Основное блюдо", "Десерты", "Напитки"];

/// Look up a table by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}

/// Names of the tables reachable through the generic record store
pub fn editable_table_names() -> Vec<&'static str> {
    ALL_TABLES
        .iter()
        .filter(|t| t.editable)
        .map(|t| t.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_table() {
        assert_eq!(get_table("dishes").map(|t| t.name), Some("dishes"));
        assert!(get_table("dishes; DROP TABLE users").is_none());
        assert!(get_table("Dishes").is_none());
    }

    #[test]
    fn test_users_not_editable() {
        assert!(!editable_table_names().contains(&"users"));
        assert_eq!(editable_table_names().len(), 4);
    }

    #[test]
    fn test_column_order() {
        assert_eq!(
            DISHES.column_names(),
            vec!["name", "description", "ingredients", "price", "category"]
        );
        assert_eq!(
            DISHES.select_list(),
            "id, name, description, ingredients, price, category"
        );
        assert_eq!(RESERVATIONS.column_index("table_number"), Some(3));
    }
}
