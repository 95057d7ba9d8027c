//! Multi-row INSERT construction with dialect-specific placeholders.
//!
//! Parameters are always flattened row-major: all of row 0's values, then all
//! of row 1's, and so on. Adapters bind them in exactly that order.

use serde::{Deserialize, Serialize};

use crate::error::StatementError;
use crate::model::SeedValue;

/// Bind-parameter ceiling shared by PostgreSQL and MySQL wire protocols.
pub const MAX_BIND_PARAMS: usize = 65_535;

/// SQL dialect, which decides placeholder and identifier syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Ordinal placeholders: `$1, $2, ...`.
    Postgres,
    /// Anonymous placeholders: `?`.
    MySql,
}

impl Dialect {
    /// Placeholder for the 1-based parameter `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::MySql => "?".to_string(),
        }
    }

    /// Quotes an identifier, doubling any embedded quote character.
    pub fn quote_ident(&self, ident: &str) -> String {
        let q = match self {
            Dialect::Postgres => '"',
            Dialect::MySql => '`',
        };
        let escaped = ident.replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }

    pub fn max_params(&self) -> usize {
        MAX_BIND_PARAMS
    }

    /// Picks a dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split("://").next()?;
        match scheme {
            "postgres" | "postgresql" => Some(Dialect::Postgres),
            "mysql" | "mariadb" => Some(Dialect::MySql),
            _ => None,
        }
    }
}

/// Rendered statement text plus its flattened parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub sql: String,
    pub params: Vec<SeedValue>,
}

/// Builds a single INSERT covering every row in `rows`.
pub fn build_insert(
    dialect: Dialect,
    table: &str,
    columns: &[String],
    rows: &[Vec<SeedValue>],
) -> Result<InsertStatement, StatementError> {
    check_shape(columns, rows)?;

    let width = columns.len();
    let column_list = columns
        .iter()
        .map(|c| dialect.quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");

    let mut groups: Vec<String> = Vec::with_capacity(rows.len());
    let mut params: Vec<SeedValue> = Vec::with_capacity(rows.len() * width);

    for (i, row) in rows.iter().enumerate() {
        let placeholders: Vec<String> = (0..width)
            .map(|j| dialect.placeholder(i * width + j + 1))
            .collect();
        groups.push(format!("({})", placeholders.join(", ")));
        params.extend(row.iter().cloned());
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES {}",
        dialect.quote_ident(table),
        column_list,
        groups.join(", ")
    );

    Ok(InsertStatement { sql, params })
}

/// Splits `rows` into as few INSERTs as possible with at most `max_params`
/// parameters each. Placeholder numbering restarts in every statement.
pub fn build_insert_chunks(
    dialect: Dialect,
    table: &str,
    columns: &[String],
    rows: &[Vec<SeedValue>],
    max_params: usize,
) -> Result<Vec<InsertStatement>, StatementError> {
    check_shape(columns, rows)?;

    let rows_per_statement = max_params / columns.len();
    if rows_per_statement == 0 {
        return Err(StatementError::TooManyColumns {
            columns: columns.len(),
            max_params,
        });
    }

    rows.chunks(rows_per_statement)
        .map(|chunk| build_insert(dialect, table, columns, chunk))
        .collect()
}

fn check_shape(columns: &[String], rows: &[Vec<SeedValue>]) -> Result<(), StatementError> {
    if columns.is_empty() {
        return Err(StatementError::NoColumns);
    }
    if rows.is_empty() {
        return Err(StatementError::NoRows);
    }
    if let Some((row, values)) = rows
        .iter()
        .enumerate()
        .find(|(_, values)| values.len() != columns.len())
    {
        return Err(StatementError::RowWidth {
            row,
            expected: columns.len(),
            actual: values.len(),
        });
    }
    Ok(())
}
