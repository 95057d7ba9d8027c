//! Database integration for seeding.
//!
//! The [`Seeder`] drives generation and batching; a [`DatabaseAdapter`]
//! ([`PostgresAdapter`] or [`MySqlAdapter`]) talks to the database.

mod adapter;
pub mod mapper;
mod mysql;
mod postgres;
mod seeder;
pub mod statement;

pub use adapter::DatabaseAdapter;
pub use mapper::{ColumnSet, RowValues, map_row};
pub use mysql::MySqlAdapter;
pub use postgres::PostgresAdapter;
pub use seeder::{DEFAULT_BATCH_SIZE, SeedReport, Seeder, TableReport, TableSeedRequest};
pub use statement::{Dialect, InsertStatement, MAX_BIND_PARAMS, build_insert, build_insert_chunks};
