//! Configuration types for seeding runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::db::{DEFAULT_BATCH_SIZE, TableSeedRequest};
use crate::error::SeedError;
use crate::model::{FakeKind, ModelDescriptor};

/// Settings shared by every table in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Batch size for tables that do not set their own.
    pub batch_size: usize,

    /// Random seed for reproducible data. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Wrap each batch in its own transaction.
    pub batch_transactions: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
            batch_transactions: true,
        }
    }
}

/// One table entry of a [`SeedPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePlan {
    pub table: String,
    pub rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    pub model: ModelDescriptor,
}

/// A full seeding run: config plus tables in seeding order.
///
/// ```json
/// {
///   "config": { "batch_size": 100, "seed": 42 },
///   "tables": [
///     {
///       "table": "users",
///       "rows": 1000,
///       "model": {
///         "name": "user",
///         "fields": [
///           { "column": "id", "type": "uuid" },
///           { "column": "email", "type": "email" }
///         ]
///       }
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedPlan {
    #[serde(default)]
    pub config: SeedConfig,
    pub tables: Vec<TablePlan>,
}

impl SeedPlan {
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        serde_json::from_str(json).map_err(|e| SeedError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SeedError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Converts every table entry into a request, applying the default batch size.
    pub fn requests(&self) -> Vec<TableSeedRequest> {
        self.tables
            .iter()
            .map(|t| {
                TableSeedRequest::new(&t.table, t.rows, t.model.clone())
                    .with_batch_size(t.batch_size.unwrap_or(self.config.batch_size))
            })
            .collect()
    }

    /// Users and products, 100 rows each.
    pub fn demo() -> Self {
        let users = ModelDescriptor::new("user")
            .field("id", FakeKind::Uuid)
            .field("name", FakeKind::Name)
            .field("email", FakeKind::Email);

        let products = ModelDescriptor::new("product")
            .field("id", FakeKind::Uuid)
            .field("name", FakeKind::Word)
            .field(
                "price",
                FakeKind::Amount {
                    min: 1.0,
                    max: 500.0,
                },
            );

        Self {
            config: SeedConfig {
                batch_size: 100,
                ..SeedConfig::default()
            },
            tables: vec![
                TablePlan {
                    table: "users".into(),
                    rows: 100,
                    batch_size: None,
                    model: users,
                },
                TablePlan {
                    table: "products".into(),
                    rows: 100,
                    batch_size: None,
                    model: products,
                },
            ],
        }
    }
}
