//! Seeder behaviour against an in-memory recording adapter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use seedbed::db::{ColumnSet, RowValues};
use seedbed::error::GenerationError;
use seedbed::prelude::*;

#[derive(Debug, Clone)]
struct InsertCall {
    table: String,
    columns: Vec<String>,
    rows: Vec<RowValues>,
}

/// Adapter that serves a fixed schema and records every insert.
#[derive(Default)]
struct MockAdapter {
    tables: HashMap<String, Vec<String>>,
    ping_fails: bool,
    exists_fails: bool,
    columns_fail: bool,
    /// Zero-based index of the insert call that should fail.
    fail_insert_at: Option<usize>,
    inserts: Mutex<Vec<InsertCall>>,
}

impl MockAdapter {
    fn with_table(mut self, table: &str, columns: &[&str]) -> Self {
        self.tables.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    fn inserts(&self) -> Vec<InsertCall> {
        self.inserts.lock().unwrap().clone()
    }

    fn batch_sizes(&self) -> Vec<usize> {
        self.inserts().iter().map(|c| c.rows.len()).collect()
    }
}

#[async_trait]
impl DatabaseAdapter for MockAdapter {
    async fn ping(&self) -> Result<(), AdapterError> {
        if self.ping_fails {
            return Err(AdapterError::Other("connection refused".into()));
        }
        Ok(())
    }

    async fn table_exists(&self, table: &str) -> Result<bool, AdapterError> {
        if self.exists_fails {
            return Err(AdapterError::Other("permission denied".into()));
        }
        Ok(self.tables.contains_key(table))
    }

    async fn get_columns(&self, table: &str) -> Result<ColumnSet, AdapterError> {
        if self.columns_fail {
            return Err(AdapterError::Other("information_schema unavailable".into()));
        }
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }

    async fn insert_batch(
        &self,
        table: &str,
        columns: &[String],
        rows: &[RowValues],
    ) -> Result<(), AdapterError> {
        let mut inserts = self.inserts.lock().unwrap();
        if self.fail_insert_at == Some(inserts.len()) {
            return Err(AdapterError::Other("duplicate key value".into()));
        }
        inserts.push(InsertCall {
            table: table.to_string(),
            columns: columns.to_vec(),
            rows: rows.to_vec(),
        });
        Ok(())
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }
}

/// Generator that drops a column after a number of rows.
struct DegradingGenerator {
    inner: FakerGenerator,
    healthy_rows: usize,
    produced: usize,
    drop_column: &'static str,
}

impl FakeGenerator for DegradingGenerator {
    fn generate(&mut self, model: &ModelDescriptor) -> Result<ModelInstance, GenerationError> {
        let mut instance = self.inner.generate(model)?;
        if self.produced >= self.healthy_rows {
            instance.values.retain(|(column, _)| column != self.drop_column);
        }
        self.produced += 1;
        Ok(instance)
    }
}

struct FailingGenerator;

impl FakeGenerator for FailingGenerator {
    fn generate(&mut self, _model: &ModelDescriptor) -> Result<ModelInstance, GenerationError> {
        Err(GenerationError::Other("faker exhausted".into()))
    }
}

fn user_model() -> ModelDescriptor {
    ModelDescriptor::new("user")
        .field("id", FakeKind::Uuid)
        .field("name", FakeKind::Name)
        .field("email", FakeKind::Email)
}

fn users_adapter() -> MockAdapter {
    MockAdapter::default().with_table("users", &["id", "name", "email"])
}

#[tokio::test]
async fn test_users_five_rows_batch_two() {
    let adapter = users_adapter();
    let mut seeder = Seeder::new(&adapter)
        .await
        .unwrap()
        .with_generator(FakerGenerator::seeded(1));

    seeder
        .add(TableSeedRequest::new("users", 5, user_model()).with_batch_size(2))
        .unwrap();
    let report = seeder.run().await.unwrap();

    assert_eq!(adapter.batch_sizes(), vec![2, 2, 1]);
    assert_eq!(report.total_rows(), 5);
    assert_eq!(report.tables[0].batches, 3);

    for call in adapter.inserts() {
        assert_eq!(call.table, "users");
        assert_eq!(call.columns, vec!["id", "name", "email"]);
        for row in &call.rows {
            assert_eq!(row.len(), 3);
        }
    }
}

#[tokio::test]
async fn test_batch_count_is_ceiling() {
    let cases = [(1, 1), (1, 10), (10, 10), (11, 10), (7, 3), (100, 7), (64, 1)];

    for (rows, batch_size) in cases {
        let adapter = users_adapter();
        let mut seeder = Seeder::new(&adapter)
            .await
            .unwrap()
            .with_event_sink(NoopSink);
        seeder
            .add(TableSeedRequest::new("users", rows, user_model()).with_batch_size(batch_size))
            .unwrap();
        seeder.run().await.unwrap();

        let sizes = adapter.batch_sizes();
        assert_eq!(sizes.len(), rows.div_ceil(batch_size), "rows={rows} batch={batch_size}");
        assert!(sizes.iter().all(|&s| s > 0 && s <= batch_size));
        assert_eq!(sizes.iter().sum::<usize>(), rows);
    }
}

#[tokio::test]
async fn test_rows_follow_live_column_order() {
    // Live order differs from the model's declaration order.
    let adapter = MockAdapter::default().with_table("users", &["email", "id", "name"]);
    let mut seeder = Seeder::new(&adapter).await.unwrap();

    seeder
        .add(TableSeedRequest::new("users", 4, user_model()).with_batch_size(4))
        .unwrap();
    seeder.run().await.unwrap();

    let inserts = adapter.inserts();
    assert_eq!(inserts.len(), 1);
    for row in &inserts[0].rows {
        assert!(row[0].as_text().unwrap().contains('@'));
        assert!(matches!(row[1], SeedValue::Uuid(_)));
        assert!(row[2].as_text().is_some());
    }
}

#[tokio::test]
async fn test_extra_model_fields_ignored() {
    let adapter = MockAdapter::default().with_table("users", &["id", "email"]);
    let mut seeder = Seeder::new(&adapter).await.unwrap();

    seeder
        .add(TableSeedRequest::new("users", 3, user_model()))
        .unwrap();
    seeder.run().await.unwrap();

    let inserts = adapter.inserts();
    assert_eq!(inserts[0].columns, vec!["id", "email"]);
    assert!(inserts[0].rows.iter().all(|r| r.len() == 2));
}

#[tokio::test]
async fn test_add_zero_rows_leaves_pending_empty() {
    let adapter = users_adapter();
    let mut seeder = Seeder::new(&adapter).await.unwrap();

    let err = seeder
        .add(TableSeedRequest::new("users", 0, user_model()))
        .unwrap_err();

    assert!(matches!(err, SeedError::Validation(_)));
    assert_eq!(seeder.pending().len(), 0);
}

#[tokio::test]
async fn test_invalid_add_keeps_prior_requests() {
    let adapter = users_adapter();
    let mut seeder = Seeder::new(&adapter).await.unwrap();
    seeder
        .add(TableSeedRequest::new("users", 3, user_model()))
        .unwrap();

    let invalid = [
        TableSeedRequest::new("", 3, user_model()),
        TableSeedRequest::new("users", 0, user_model()),
        TableSeedRequest::new("users", 3, user_model()).with_batch_size(0),
        TableSeedRequest::new("users", 3, ModelDescriptor::new("empty")),
    ];
    for request in invalid {
        assert!(seeder.add(request).is_err());
    }

    assert_eq!(seeder.pending().len(), 1);
    assert_eq!(seeder.pending()[0].table, "users");
}

#[tokio::test]
async fn test_missing_table_aborts_without_inserts() {
    let adapter = users_adapter();
    let mut seeder = Seeder::new(&adapter).await.unwrap();
    seeder
        .add(TableSeedRequest::new("accounts", 5, user_model()))
        .unwrap();
    seeder
        .add(TableSeedRequest::new("users", 5, user_model()))
        .unwrap();

    let err = seeder.run().await.unwrap_err();

    assert!(matches!(err, SeedError::TableNotFound(ref t) if t == "accounts"));
    assert!(err.is_schema_error());
    assert!(adapter.inserts().is_empty());
    assert_eq!(seeder.pending().len(), 2);
}

#[tokio::test]
async fn test_existence_check_failure_is_schema_error() {
    let adapter = MockAdapter {
        exists_fails: true,
        ..users_adapter()
    };
    let mut seeder = Seeder::new(&adapter).await.unwrap();
    seeder
        .add(TableSeedRequest::new("users", 5, user_model()))
        .unwrap();

    let err = seeder.run().await.unwrap_err();
    assert!(matches!(err, SeedError::Introspection { ref table, .. } if table == "users"));
    assert!(adapter.inserts().is_empty());
}

#[tokio::test]
async fn test_column_query_failure_is_schema_error() {
    let adapter = MockAdapter {
        columns_fail: true,
        ..users_adapter()
    };
    let mut seeder = Seeder::new(&adapter).await.unwrap();
    seeder
        .add(TableSeedRequest::new("users", 5, user_model()))
        .unwrap();

    let err = seeder.run().await.unwrap_err();
    assert!(err.is_schema_error());
    assert!(adapter.inserts().is_empty());
}

#[tokio::test]
async fn test_live_column_missing_from_model() {
    let adapter = MockAdapter::default().with_table("users", &["id", "name", "email", "phone"]);
    let mut seeder = Seeder::new(&adapter).await.unwrap();
    seeder
        .add(TableSeedRequest::new("users", 5, user_model()))
        .unwrap();

    let err = seeder.run().await.unwrap_err();

    match err {
        SeedError::Mapping { table, column } => {
            assert_eq!(table, "users");
            assert_eq!(column, "phone");
        }
        other => panic!("expected mapping error, got {other:?}"),
    }
    assert!(adapter.inserts().is_empty());
}

#[tokio::test]
async fn test_mapping_failure_mid_run_keeps_earlier_batches() {
    let adapter = users_adapter();
    let generator = DegradingGenerator {
        inner: FakerGenerator::seeded(9),
        healthy_rows: 5,
        produced: 0,
        drop_column: "email",
    };
    let mut seeder = Seeder::new(&adapter)
        .await
        .unwrap()
        .with_generator(generator);
    seeder
        .add(TableSeedRequest::new("users", 10, user_model()).with_batch_size(2))
        .unwrap();

    let err = seeder.run().await.unwrap_err();

    assert!(matches!(err, SeedError::Mapping { ref column, .. } if column == "email"));
    // Rows 0..4 mapped; the fifth row sat in an unflushed batch.
    assert_eq!(adapter.batch_sizes(), vec![2, 2]);
}

#[tokio::test]
async fn test_generation_failure_aborts() {
    let adapter = users_adapter();
    let mut seeder = Seeder::new(&adapter)
        .await
        .unwrap()
        .with_generator(FailingGenerator);
    seeder
        .add(TableSeedRequest::new("users", 5, user_model()))
        .unwrap();

    let err = seeder.run().await.unwrap_err();
    assert!(matches!(err, SeedError::Generation { ref table, .. } if table == "users"));
    assert!(adapter.inserts().is_empty());
}

#[tokio::test]
async fn test_insert_failure_keeps_committed_batches() {
    let adapter = MockAdapter {
        fail_insert_at: Some(1),
        ..users_adapter()
    };
    let mut seeder = Seeder::new(&adapter).await.unwrap();
    seeder
        .add(TableSeedRequest::new("users", 6, user_model()).with_batch_size(2))
        .unwrap();

    let err = seeder.run().await.unwrap_err();

    assert!(matches!(err, SeedError::Insert { ref table, .. } if table == "users"));
    assert!(err.to_string().contains("duplicate key value"));
    assert_eq!(adapter.batch_sizes(), vec![2]);
}

#[tokio::test]
async fn test_ping_failure_is_connection_error() {
    let adapter = MockAdapter {
        ping_fails: true,
        ..users_adapter()
    };

    let err = Seeder::new(&adapter).await.err().unwrap();
    assert!(matches!(err, SeedError::Connection(_)));
}

#[tokio::test]
async fn test_tables_seeded_in_order() {
    let adapter = users_adapter().with_table("products", &["id", "name", "price"]);
    let products = ModelDescriptor::new("product")
        .field("id", FakeKind::Uuid)
        .field("name", FakeKind::Word)
        .field("price", FakeKind::Amount { min: 1.0, max: 10.0 });

    let mut seeder = Seeder::new(&adapter).await.unwrap();
    seeder
        .add(TableSeedRequest::new("users", 3, user_model()).with_batch_size(2))
        .unwrap();
    seeder
        .add(TableSeedRequest::new("products", 4, products).with_batch_size(2))
        .unwrap();

    let report = seeder.run().await.unwrap();

    let order: Vec<String> = adapter.inserts().into_iter().map(|c| c.table).collect();
    assert_eq!(order, vec!["users", "users", "products", "products"]);
    assert_eq!(report.tables.len(), 2);
    assert_eq!(report.total_rows(), 7);
    assert!(seeder.pending().is_empty());
}

#[tokio::test]
async fn test_events_emitted() {
    let adapter = users_adapter();
    let events = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&events);

    let mut seeder = Seeder::new(&adapter)
        .await
        .unwrap()
        .with_event_sink(move |event: &SeedEvent| recorded.lock().unwrap().push(event.clone()));
    seeder
        .add(TableSeedRequest::new("users", 3, user_model()).with_batch_size(2))
        .unwrap();
    seeder.run().await.unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        events.first(),
        Some(&SeedEvent::TableStarted {
            table: "users".into(),
            row_count: 3,
            batch_size: 2,
        })
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SeedEvent::BatchInserted { .. }))
            .count(),
        2
    );
    assert!(events.contains(&SeedEvent::TableCompleted {
        table: "users".into(),
        rows: 3,
        batches: 2,
    }));
    assert_eq!(
        events.last(),
        Some(&SeedEvent::RunCompleted { tables: 1, rows: 3 })
    );
}

#[tokio::test]
async fn test_works_through_trait_object() {
    let adapter = users_adapter();
    let dynamic: &dyn DatabaseAdapter = &adapter;

    let mut seeder = Seeder::new(dynamic).await.unwrap();
    seeder
        .add(TableSeedRequest::new("users", 2, user_model()))
        .unwrap();
    seeder.run().await.unwrap();

    assert_eq!(adapter.batch_sizes(), vec![2]);
}
