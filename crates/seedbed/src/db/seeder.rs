//! Database seeding orchestration.

use std::time::{Duration, Instant};

use tracing::debug;

use super::adapter::DatabaseAdapter;
use super::mapper::{RowValues, map_row};
use crate::error::{AdapterError, SeedError};
use crate::events::{EventSink, SeedEvent, TracingSink};
use crate::generators::{FakeGenerator, FakerGenerator};
use crate::model::{Model, ModelDescriptor};

/// Batch size used when a request does not set one.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// How many rows of which model go into which table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSeedRequest {
    pub table: String,
    pub row_count: usize,
    pub model: ModelDescriptor,
    pub batch_size: usize,
}

impl TableSeedRequest {
    pub fn new(table: impl Into<String>, row_count: usize, model: ModelDescriptor) -> Self {
        Self {
            table: table.into(),
            row_count,
            model,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Builds a request from a type's compile-time descriptor.
    pub fn for_model<M: Model>(table: impl Into<String>, row_count: usize) -> Self {
        Self::new(table, row_count, M::descriptor())
    }

    /// Sets the number of rows sent per INSERT.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Checks the request shape without touching the database.
    pub fn validate(&self) -> Result<(), SeedError> {
        if self.table.trim().is_empty() {
            return Err(SeedError::Validation("table name cannot be empty".into()));
        }
        if self.model.is_empty() {
            return Err(SeedError::Validation(format!(
                "model for table '{}' has no fields",
                self.table
            )));
        }
        if let Some(column) = self.model.duplicate_column() {
            return Err(SeedError::Validation(format!(
                "model for table '{}' maps column '{}' more than once",
                self.table, column
            )));
        }
        if self.row_count == 0 {
            return Err(SeedError::Validation(
                "row count must be greater than zero".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(SeedError::Validation(
                "batch size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Outcome of seeding one table.
#[derive(Debug, Clone)]
pub struct TableReport {
    pub table: String,
    pub rows_inserted: usize,
    pub batches: usize,
    pub elapsed: Duration,
}

/// Outcome of a whole run, one entry per table in processing order.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub tables: Vec<TableReport>,
}

impl SeedReport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows_inserted).sum()
    }

    pub fn total_batches(&self) -> usize {
        self.tables.iter().map(|t| t.batches).sum()
    }
}

/// Seeds tables one after another through a borrowed [`DatabaseAdapter`].
///
/// Each batch is its own unit of work: when a run fails, batches inserted
/// before the failure (for the current and earlier tables) stay in place.
pub struct Seeder<'a, A: DatabaseAdapter + ?Sized> {
    adapter: &'a A,
    generator: Box<dyn FakeGenerator + 'a>,
    sink: Box<dyn EventSink + 'a>,
    pending: Vec<TableSeedRequest>,
}

impl<'a, A: DatabaseAdapter + ?Sized> Seeder<'a, A> {
    /// Creates a seeder after checking the adapter is reachable.
    pub async fn new(adapter: &'a A) -> Result<Self, SeedError> {
        adapter.ping().await.map_err(SeedError::Connection)?;
        debug!("Connected to {:?} database", adapter.dialect());

        Ok(Self {
            adapter,
            generator: Box::new(FakerGenerator::new()),
            sink: Box::new(TracingSink),
            pending: Vec::new(),
        })
    }

    /// Replaces the fake-data generator.
    pub fn with_generator(mut self, generator: impl FakeGenerator + 'a) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// Replaces the event sink (defaults to [`TracingSink`]).
    pub fn with_event_sink(mut self, sink: impl EventSink + 'a) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Queues a table. Invalid requests are rejected and nothing is queued.
    pub fn add(&mut self, request: TableSeedRequest) -> Result<(), SeedError> {
        request.validate()?;
        self.pending.push(request);
        Ok(())
    }

    pub fn pending(&self) -> &[TableSeedRequest] {
        &self.pending
    }

    /// Seeds every queued table in insertion order.
    ///
    /// The first error aborts the run and leaves the queue as it was; a
    /// successful run empties it.
    pub async fn run(&mut self) -> Result<SeedReport, SeedError> {
        let requests = std::mem::take(&mut self.pending);
        let mut report = SeedReport::default();
        let mut failure = None;

        for request in &requests {
            match self.seed_table(request).await {
                Ok(table_report) => report.tables.push(table_report),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if let Some(e) = failure {
            self.pending = requests;
            return Err(e);
        }

        self.sink.on_event(&SeedEvent::RunCompleted {
            tables: report.tables.len(),
            rows: report.total_rows(),
        });

        Ok(report)
    }

    async fn seed_table(&mut self, request: &TableSeedRequest) -> Result<TableReport, SeedError> {
        let started = Instant::now();
        let table = request.table.as_str();

        self.sink.on_event(&SeedEvent::TableStarted {
            table: table.to_string(),
            row_count: request.row_count,
            batch_size: request.batch_size,
        });

        let exists = self
            .adapter
            .table_exists(table)
            .await
            .map_err(|source| SeedError::Introspection {
                table: table.to_string(),
                source,
            })?;
        if !exists {
            return Err(SeedError::TableNotFound(table.to_string()));
        }

        let columns = self
            .adapter
            .get_columns(table)
            .await
            .map_err(|source| SeedError::Introspection {
                table: table.to_string(),
                source,
            })?;
        if columns.is_empty() {
            return Err(SeedError::Introspection {
                table: table.to_string(),
                source: AdapterError::Other("table has no columns".into()),
            });
        }

        let mut batch: Vec<RowValues> =
            Vec::with_capacity(request.batch_size.min(request.row_count));
        let mut inserted = 0;
        let mut batches = 0;

        for i in 0..request.row_count {
            let instance = self
                .generator
                .generate(&request.model)
                .map_err(|source| SeedError::Generation {
                    table: table.to_string(),
                    source,
                })?;

            // Checked on every row: a generator may omit a field at any point.
            let row = map_row(instance, &columns).map_err(|e| SeedError::Mapping {
                table: table.to_string(),
                column: e.column,
            })?;
            batch.push(row);

            if batch.len() == request.batch_size || i + 1 == request.row_count {
                self.adapter
                    .insert_batch(table, &columns, &batch)
                    .await
                    .map_err(|source| SeedError::Insert {
                        table: table.to_string(),
                        source,
                    })?;

                inserted += batch.len();
                batches += 1;
                self.sink.on_event(&SeedEvent::BatchInserted {
                    table: table.to_string(),
                    rows: batch.len(),
                    inserted,
                    total: request.row_count,
                });
                batch.clear();
            }
        }

        self.sink.on_event(&SeedEvent::TableCompleted {
            table: table.to_string(),
            rows: inserted,
            batches,
        });

        Ok(TableReport {
            table: table.to_string(),
            rows_inserted: inserted,
            batches,
            elapsed: started.elapsed(),
        })
    }
}
