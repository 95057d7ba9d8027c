//! Fake value generation with the `fake` crate.

use fake::Fake;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use super::FakeGenerator;
use crate::error::GenerationError;
use crate::model::{FakeKind, FieldSpec, ModelDescriptor, ModelInstance, SeedValue};

/// Generates values for every [`FakeKind`] from a single RNG.
///
/// Two generators built with the same seed produce the same rows.
pub struct FakerGenerator {
    rng: StdRng,
}

impl FakerGenerator {
    /// Creates a generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn value(&mut self, field: &FieldSpec) -> Result<SeedValue, GenerationError> {
        let rng = &mut self.rng;
        let value = match &field.kind {
            FakeKind::Uuid => {
                SeedValue::Uuid(uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid())
            }
            FakeKind::Name => SeedValue::Text(Name().fake_with_rng(rng)),
            FakeKind::FirstName => SeedValue::Text(FirstName().fake_with_rng(rng)),
            FakeKind::LastName => SeedValue::Text(LastName().fake_with_rng(rng)),
            FakeKind::Email => SeedValue::Text(SafeEmail().fake_with_rng(rng)),
            FakeKind::Username => SeedValue::Text(Username().fake_with_rng(rng)),
            FakeKind::Phone => SeedValue::Text(PhoneNumber().fake_with_rng(rng)),
            FakeKind::Company => SeedValue::Text(CompanyName().fake_with_rng(rng)),
            FakeKind::Word => SeedValue::Text(Word().fake_with_rng(rng)),
            FakeKind::Sentence => SeedValue::Text(Sentence(3..8).fake_with_rng(rng)),
            FakeKind::Boolean => SeedValue::Bool(rng.r#gen()),
            FakeKind::Integer { min, max } => {
                check_int_range(field, *min, *max)?;
                SeedValue::Int(rng.gen_range(*min..=*max))
            }
            FakeKind::Float { min, max } => {
                check_float_range(field, *min, *max)?;
                SeedValue::Float(rng.gen_range(*min..=*max))
            }
            FakeKind::Amount { min, max } => {
                check_float_range(field, *min, *max)?;
                let low = (min * 100.0).round() as i64;
                let high = (max * 100.0).round() as i64;
                SeedValue::Decimal(Decimal::new(rng.gen_range(low..=high), 2))
            }
            FakeKind::Timestamp { from, to } => {
                check_int_range(field, *from, *to)?;
                let secs = rng.gen_range(*from..=*to);
                let ts = OffsetDateTime::from_unix_timestamp(secs).map_err(|e| {
                    GenerationError::InvalidRange {
                        column: field.column.clone(),
                        reason: e.to_string(),
                    }
                })?;
                SeedValue::Timestamp(ts)
            }
            FakeKind::OneOf { values } => {
                if values.is_empty() {
                    return Err(GenerationError::EmptyChoices {
                        column: field.column.clone(),
                    });
                }
                SeedValue::Text(values[rng.gen_range(0..values.len())].clone())
            }
            FakeKind::Constant { value } => value.clone(),
        };

        Ok(value)
    }
}

fn check_int_range(field: &FieldSpec, min: i64, max: i64) -> Result<(), GenerationError> {
    if min > max {
        return Err(GenerationError::InvalidRange {
            column: field.column.clone(),
            reason: format!("min {min} is greater than max {max}"),
        });
    }
    Ok(())
}

// rand requires a finite span, not only finite bounds.
fn check_float_range(field: &FieldSpec, min: f64, max: f64) -> Result<(), GenerationError> {
    if !min.is_finite() || !max.is_finite() || min > max || !(max - min).is_finite() {
        return Err(GenerationError::InvalidRange {
            column: field.column.clone(),
            reason: format!("range {min}..={max} is reversed or not finite"),
        });
    }
    Ok(())
}

impl Default for FakerGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGenerator for FakerGenerator {
    fn generate(&mut self, model: &ModelDescriptor) -> Result<ModelInstance, GenerationError> {
        let mut instance = ModelInstance::with_capacity(model.fields.len());
        for field in &model.fields {
            let value = self.value(field)?;
            instance.push(field.column.clone(), value);
        }
        Ok(instance)
    }
}
