//! MySQL adapter (`?` placeholders).

use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlPoolOptions};
use sqlx::query::Query;
use sqlx::{MySql, MySqlPool};
use tracing::debug;

use super::adapter::DatabaseAdapter;
use super::mapper::{ColumnSet, RowValues};
use super::statement::{Dialect, InsertStatement, build_insert_chunks};
use crate::error::AdapterError;
use crate::model::SeedValue;

/// Seeds a MySQL database through a [`MySqlPool`].
#[derive(Clone)]
pub struct MySqlAdapter {
    pool: MySqlPool,
    batch_transactions: bool,
}

impl MySqlAdapter {
    /// Wraps an existing pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            batch_transactions: true,
        }
    }

    /// Opens a small pool to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, AdapterError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Runs all statements of one batch inside a single transaction.
    pub fn with_batch_transactions(mut self, enabled: bool) -> Self {
        self.batch_transactions = enabled;
        self
    }

    /// The underlying pool, for queries outside the seeding pipeline.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

// UUIDs go over the wire in hyphenated text form to fill CHAR(36) columns.
fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q SeedValue,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        SeedValue::Null => query.bind(None::<String>),
        SeedValue::Bool(b) => query.bind(*b),
        SeedValue::Int(i) => query.bind(*i),
        SeedValue::Float(f) => query.bind(*f),
        SeedValue::Decimal(d) => query.bind(*d),
        SeedValue::Uuid(u) => query.bind(u.hyphenated().to_string()),
        SeedValue::Timestamp(t) => query.bind(*t),
        SeedValue::Text(s) => query.bind(s.as_str()),
    }
}

fn prepare(stmt: &InsertStatement) -> Query<'_, MySql, MySqlArguments> {
    stmt.params
        .iter()
        .fold(sqlx::query(&stmt.sql), |query, value| bind_value(query, value))
}

#[async_trait]
impl DatabaseAdapter for MySqlAdapter {
    async fn ping(&self) -> Result<(), AdapterError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn table_exists(&self, table: &str) -> Result<bool, AdapterError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM information_schema.tables
            WHERE table_schema = DATABASE() AND table_name = ?
            "#,
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn get_columns(&self, table: &str) -> Result<ColumnSet, AdapterError> {
        // information_schema reports names as binary strings on MySQL 8.
        let columns = sqlx::query_scalar::<_, String>(
            r#"
            SELECT CAST(column_name AS CHAR) FROM information_schema.columns
            WHERE table_schema = DATABASE() AND table_name = ?
            ORDER BY ordinal_position
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        Ok(columns)
    }

    async fn insert_batch(
        &self,
        table: &str,
        columns: &[String],
        rows: &[RowValues],
    ) -> Result<(), AdapterError> {
        let dialect = Dialect::MySql;
        let statements = build_insert_chunks(dialect, table, columns, rows, dialect.max_params())?;
        debug!(
            "Inserting {} rows into {} in {} statement(s)",
            rows.len(),
            table,
            statements.len()
        );

        if self.batch_transactions {
            let mut tx = self.pool.begin().await?;
            for stmt in &statements {
                prepare(stmt).execute(&mut *tx).await?;
            }
            tx.commit().await?;
        } else {
            for stmt in &statements {
                prepare(stmt).execute(&self.pool).await?;
            }
        }

        Ok(())
    }

    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }
}
