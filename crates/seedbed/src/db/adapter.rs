//! Database capability interface used by the seeder.

use async_trait::async_trait;

use super::mapper::{ColumnSet, RowValues};
use super::statement::Dialect;
use crate::error::AdapterError;

/// Operations the seeder needs from a database.
///
/// Implementations must return columns in schema order (ordinal position) so
/// that row alignment is the same for every row of a run.
#[async_trait]
pub trait DatabaseAdapter: Send + Sync {
    /// Checks that the database is reachable.
    async fn ping(&self) -> Result<(), AdapterError>;

    /// Returns whether `table` exists.
    async fn table_exists(&self, table: &str) -> Result<bool, AdapterError>;

    /// Returns the columns of `table` in ordinal order.
    async fn get_columns(&self, table: &str) -> Result<ColumnSet, AdapterError>;

    /// Inserts `rows`, each aligned to `columns`.
    async fn insert_batch(
        &self,
        table: &str,
        columns: &[String],
        rows: &[RowValues],
    ) -> Result<(), AdapterError>;

    /// Placeholder and quoting style of this database.
    fn dialect(&self) -> Dialect;
}
