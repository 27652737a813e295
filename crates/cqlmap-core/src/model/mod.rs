//! Static, macro-generated entity shape metadata.
//!
//! Nothing here is validated; validation happens once when a repository
//! derives its descriptor from the model.

pub mod entity;
pub mod field;

pub use entity::EntityModel;
pub use field::{FieldKind, FieldModel, FieldType};
