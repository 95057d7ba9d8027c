//! Error types for seeding runs.

use thiserror::Error;

/// Run-level error returned by [`crate::db::Seeder`].
///
/// Every variant aborts the run. Batches inserted before the failure are not
/// rolled back.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Invalid seed request: {0}")]
    Validation(String),

    #[error("Unable to connect to database: {0}")]
    Connection(#[source] AdapterError),

    #[error("Table '{0}' does not exist in the database")]
    TableNotFound(String),

    #[error("Failed to introspect table '{table}': {source}")]
    Introspection {
        table: String,
        #[source]
        source: AdapterError,
    },

    #[error("Table '{table}' has column '{column}' with no matching model field")]
    Mapping { table: String, column: String },

    #[error("Failed to generate fake data for table '{table}': {source}")]
    Generation {
        table: String,
        #[source]
        source: GenerationError,
    },

    #[error("Error inserting data into table '{table}': {source}")]
    Insert {
        table: String,
        #[source]
        source: AdapterError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SeedError {
    /// True for a missing table or a failed schema query.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::TableNotFound(_) | Self::Introspection { .. })
    }

    /// Name of the table the error occurred on, when there is one.
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::TableNotFound(table)
            | Self::Introspection { table, .. }
            | Self::Mapping { table, .. }
            | Self::Generation { table, .. }
            | Self::Insert { table, .. } => Some(table),
            _ => None,
        }
    }
}

/// Error raised by a [`crate::db::DatabaseAdapter`].
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Statement error: {0}")]
    Statement(#[from] StatementError),

    #[error("{0}")]
    Other(String),
}

/// A live column with no model field to fill it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing column '{column}'")]
pub struct MappingError {
    pub column: String,
}

/// Failure while synthesizing a fake value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("invalid range for column '{column}': {reason}")]
    InvalidRange { column: String, reason: String },

    #[error("column '{column}' has an empty value list")]
    EmptyChoices { column: String },

    #[error("{0}")]
    Other(String),
}

/// Invalid input to the INSERT statement builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    #[error("no columns to insert")]
    NoColumns,

    #[error("no rows to insert")]
    NoRows,

    #[error("row {row} has {actual} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{columns} columns exceed the limit of {max_params} parameters per statement")]
    TooManyColumns { columns: usize, max_params: usize },
}
