mod field_value;


pub use field_value::FieldValue;

use crate::{codec::CodecError, model::EntityModel, value::Value};

// ============================================================================
// ENTITY SHAPE
// ============================================================================
//
// These traits describe *what an entity is* and how its fields cross the
// value boundary. They know nothing about sessions or statements.
//

///
/// EntityKind
///
/// A persisted record type with static table metadata.
///
/// ## Semantics
/// - `MODEL.fields` is the authoritative persisted field order
/// - `to_field_values` yields exactly one value per model field, in order
/// - `from_field_values` consumes values in the same order
///
/// Usually generated by `#[derive(Entity)]`; may be written by hand.
///

pub trait EntityKind: Sized + Send + Sync + 'static {
    const MODEL: &'static EntityModel;

    fn to_field_values(&self) -> Vec<Value>;

    fn from_field_values(values: Vec<Value>) -> Result<Self, CodecError>;
}

/// Decode the value at `index` of a model-ordered value stream into a field.
///
/// Shared by generated `from_field_values` bodies.
pub fn decode_field<T: FieldValue>(
    model: &EntityModel,
    index: usize,
    value: Option<Value>,
) -> Result<T, CodecError> {
    let field = model.fields.get(index).ok_or(CodecError::ValueCount {
        expected: model.fields.len(),
        found: index + 1,
    })?;
    let value = value.ok_or(CodecError::ValueCount {
        expected: model.fields.len(),
        found: index,
    })?;

    T::from_value(value).map_err(|err| err.in_column(field.column_name()))
}
