//! Target tables for INSERT and UPDATE

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlcoerce_types::{RowField, TypeDescriptor};

/// A table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: TypeDescriptor,
    /// Whether the column has a default value for omitted inserts
    #[serde(default)]
    pub has_default: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            column_type,
            has_default: false,
        }
    }

    /// Mark the column as having a default value
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Whether an INSERT may omit this column
    pub fn may_omit(&self) -> bool {
        self.column_type.nullable || self.has_default
    }
}

/// A table definition, columns in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: IndexMap<String, ColumnDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
        }
    }

    /// Append a column; a column of the same name is replaced in place
    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.columns.insert(column.name.clone(), column);
        self
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.get(name)
    }

    /// Declaration index of a column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// The NOT NULL row type of the table
    pub fn row_type(&self) -> TypeDescriptor {
        TypeDescriptor::row(
            self.columns
                .values()
                .map(|c| RowField::new(c.name.clone(), c.column_type.clone()))
                .collect(),
        )
    }
}
