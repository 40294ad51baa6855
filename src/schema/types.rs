use std::collections::HashSet;

/// Spatial value kinds stored in geometry columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    LineString,
    Point,
}

impl GeometryKind {
    pub fn sql_name(self) -> &'static str {
        match self {
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Point => "POINT",
        }
    }
}

/// Column data type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Integer,
    Float,
    /// Stored as 0/1
    Boolean,
    /// Bounded string, rendered as VARCHAR(n) where the engine has one
    String(u16),
    /// String restricted to a fixed set of values
    Enum(&'static [&'static str]),
    /// Spatial value, WKT text on engines without spatial types
    Geometry(GeometryKind),
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
            primary_key: false,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
            primary_key: false,
        }
    }

    /// Create the primary key column
    pub const fn primary(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
            primary_key: true,
        }
    }

    /// Allowed values when this is an enumerated column
    pub fn domain(&self) -> Option<&'static [&'static str]> {
        match self.col_type {
            ColumnType::Enum(values) => Some(values),
            _ => None,
        }
    }
}

/// Foreign key reference
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
        }
    }
}

/// Index definition
#[derive(Debug, Clone)]
pub struct Index {
    pub columns: &'static [&'static str],
}

impl Index {
    pub const fn on(columns: &'static [&'static str]) -> Self {
        Self { columns }
    }
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
    /// Explicit index definitions; foreign key columns are indexed implicitly
    pub indexes: &'static [Index],
}

impl TableSchema {
    /// Get all tables this table depends on (FK parents)
    pub fn dependencies(&self) -> HashSet<&'static str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.references_table)
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn primary_key(&self) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Association tables carry nothing but their foreign keys
    pub fn is_association(&self) -> bool {
        self.primary_key().is_none()
            && self.columns.len() == self.foreign_keys.len()
            && self
                .columns
                .iter()
                .all(|c| self.foreign_keys.iter().any(|fk| fk.column == c.name))
    }

    /// Directory name used for this table under `data/<country>/processed/`
    pub fn dataset_dir_name(&self) -> String {
        self.name.replace('_', "")
    }
}
