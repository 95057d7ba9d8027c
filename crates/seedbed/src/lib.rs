//! Batched fake-data seeding for relational databases.
//!
//! Each table is described by a [`model::ModelDescriptor`] that maps columns
//! to fake-data rules. The [`db::Seeder`] checks the table against the live
//! schema, generates rows, and inserts them in bounded batches through a
//! [`db::DatabaseAdapter`] for PostgreSQL or MySQL.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seedbed::prelude::*;
//!
//! let adapter = PostgresAdapter::connect(&database_url).await?;
//! let mut seeder = Seeder::new(&adapter).await?;
//!
//! seeder.add(
//!     TableSeedRequest::new(
//!         "users",
//!         1_000,
//!         ModelDescriptor::new("user")
//!             .field("id", FakeKind::Uuid)
//!             .field("name", FakeKind::Name)
//!             .field("email", FakeKind::Email),
//!     )
//!     .with_batch_size(200),
//! )?;
//!
//! let report = seeder.run().await?;
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod generators;
pub mod model;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{SeedConfig, SeedPlan, TablePlan};
    pub use crate::db::{
        DatabaseAdapter, Dialect, MySqlAdapter, PostgresAdapter, SeedReport, Seeder,
        TableSeedRequest,
    };
    pub use crate::error::{AdapterError, SeedError};
    pub use crate::events::{EventSink, NoopSink, SeedEvent, TracingSink};
    pub use crate::generators::{FakeGenerator, FakerGenerator};
    pub use crate::model::{FakeKind, Model, ModelDescriptor, ModelInstance, SeedValue};
}
