//! Aligns generated model values to a table's live columns.

use std::collections::HashMap;

use crate::error::MappingError;
use crate::model::{ModelInstance, SeedValue};

/// Ordered column names reported by schema introspection.
pub type ColumnSet = Vec<String>;

/// Values positionally aligned to a [`ColumnSet`].
pub type RowValues = Vec<SeedValue>;

/// Maps `instance` onto `columns`, in column order.
///
/// The live schema is authoritative: model fields with no matching column are
/// dropped, and the first column with no model field fails the row.
pub fn map_row(instance: ModelInstance, columns: &[String]) -> Result<RowValues, MappingError> {
    let mut by_column: HashMap<String, SeedValue> = instance.values.into_iter().collect();

    columns
        .iter()
        .map(|column| {
            by_column.remove(column).ok_or_else(|| MappingError {
                column: column.clone(),
            })
        })
        .collect()
}
