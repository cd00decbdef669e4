/// Name of the storage-assigned identifier column present on every table
pub const ID_COLUMN: &str = "id";

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Range constraint applied to numeric columns before a value is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericCheck {
    Any,
    NonNegative,
    Positive,
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
    pub unique: bool,
    pub check: NumericCheck,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
            unique: false,
            check: NumericCheck::Any,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
            unique: false,
            check: NumericCheck::Any,
        }
    }

    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    pub const fn non_negative(self) -> Self {
        Self {
            check: NumericCheck::NonNegative,
            ..self
        }
    }

    pub const fn positive(self) -> Self {
        Self {
            check: NumericCheck::Positive,
            ..self
        }
    }
}

/// Table schema definition
///
/// `columns` lists every column after `id`, in storage order. Inserts bind
/// values in exactly this order.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// Whether the generic record store may read and write this table
    pub editable: bool,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Comma-separated `id, col1, col2, ...` list for SELECT statements
    pub fn select_list(&self) -> String {
        std::iter::once(ID_COLUMN)
            .chain(self.columns.iter().map(|c| c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
