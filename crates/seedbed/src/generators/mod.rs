//! Fake value generation.
//!
//! The seeder only depends on the [`FakeGenerator`] trait. [`FakerGenerator`]
//! is the stock implementation backed by the `fake` crate.

pub mod faker;

pub use faker::FakerGenerator;

use crate::error::GenerationError;
use crate::model::{ModelDescriptor, ModelInstance};

/// Produces one populated instance of a model per call.
pub trait FakeGenerator: Send {
    fn generate(&mut self, model: &ModelDescriptor) -> Result<ModelInstance, GenerationError>;
}
