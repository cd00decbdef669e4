use crate::schema::{TableSchema, ID_COLUMN};

/// Generate CREATE TABLE SQL for a table schema
///
/// The identifier column always comes first, followed by the schema's
/// columns in declared order.
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = vec![format!("    {} INTEGER PRIMARY KEY AUTOINCREMENT", ID_COLUMN)];

    for col in schema.columns {
        let unique = if col.unique { " UNIQUE" } else { "" };
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };

        columns.push(format!(
            "    {} {}{}{}",
            col.name,
            col.col_type.sql_type(),
            unique,
            null_constraint
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate an INSERT statement binding every non-id column in order
pub fn generate_insert(schema: &TableSchema) -> String {
    let placeholders: Vec<&str> = schema.columns.iter().map(|_| "?").collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.name,
        schema.column_names().join(", "),
        placeholders.join(", ")
    )
}

/// Generate an UPDATE statement for the given columns keyed by id
///
/// Column names must already be checked against the schema.
pub fn generate_update(schema: &TableSchema, columns: &[&str]) -> String {
    let set_clause: Vec<String> = columns.iter().map(|c| format!("{} = ?", c)).collect();
    format!(
        "UPDATE {} SET {} WHERE {} = ?",
        schema.name,
        set_clause.join(", "),
        ID_COLUMN
    )
}
