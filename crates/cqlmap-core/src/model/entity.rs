use crate::model::field::FieldModel;

///
/// EntityModel
/// Minimal, macro-generated runtime model for one entity shape.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Rust type path (for diagnostics).
    pub path: &'static str,
    /// Table name the entity is stored in.
    pub table: &'static str,
    /// Keyspace override; the session default applies when absent.
    pub keyspace: Option<&'static str>,
    /// Persisted fields in declaration order.
    pub fields: &'static [FieldModel],
}

impl EntityModel {
    /// Fields flagged as partition-key members, in declaration order.
    pub fn partition_key_fields(&self) -> impl Iterator<Item = (usize, &FieldModel)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.partition_key.is_some())
    }
}
