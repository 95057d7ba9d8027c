//! Progress notifications emitted while seeding.
//!
//! The seeder never logs on its own; it hands [`SeedEvent`]s to an
//! [`EventSink`]. [`TracingSink`] is the default and forwards them to
//! `tracing`.

use tracing::{debug, info};

/// Something observable that happened during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedEvent {
    TableStarted {
        table: String,
        row_count: usize,
        batch_size: usize,
    },
    BatchInserted {
        table: String,
        rows: usize,
        inserted: usize,
        total: usize,
    },
    TableCompleted {
        table: String,
        rows: usize,
        batches: usize,
    },
    RunCompleted {
        tables: usize,
        rows: usize,
    },
}

/// Receiver for [`SeedEvent`]s.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &SeedEvent);
}

impl<F> EventSink for F
where
    F: Fn(&SeedEvent) + Send + Sync,
{
    fn on_event(&self, event: &SeedEvent) {
        self(event)
    }
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&self, event: &SeedEvent) {
        match event {
            SeedEvent::TableStarted {
                table, row_count, ..
            } => info!("Seeding {} rows for table '{}'...", row_count, table),
            SeedEvent::BatchInserted {
                table,
                inserted,
                total,
                ..
            } => debug!("  Seeded {}/{} rows into '{}'", inserted, total, table),
            SeedEvent::TableCompleted {
                table,
                rows,
                batches,
            } => info!("Seeded {} rows into '{}' ({} batches)", rows, table, batches),
            SeedEvent::RunCompleted { tables, rows } => {
                info!("Seeding completed: {} rows across {} tables", rows, tables)
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn on_event(&self, _event: &SeedEvent) {}
}
