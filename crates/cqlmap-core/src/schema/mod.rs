//! Schema descriptor: the validated, immutable table layout of one entity.
//!
//! Derived exactly once per repository from the entity's static model.

#[cfg(test)]
mod tests;

use crate::{
    codec,
    error::Error,
    model::{EntityModel, FieldType},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;

///
/// SchemaError
///

#[derive(Clone, Debug, Eq, ThisError, PartialEq)]
pub enum SchemaError {
    #[error("entity '{entity}' declares no partition key fields")]
    MissingPartitionKey { entity: &'static str },

    #[error("entity '{entity}' declares no keyspace and the session has no default keyspace")]
    MissingKeyspace { entity: &'static str },

    #[error("column '{column}' is mapped by both '{first}' and '{second}'")]
    DuplicateColumn {
        column: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("entity '{entity}' declares an empty table name")]
    MissingTable { entity: &'static str },

    #[error("field '{field}' maps to an empty column name")]
    EmptyColumnName { field: &'static str },
}

///
/// ColumnDescriptor
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnDescriptor {
    /// Rust field name.
    pub property: &'static str,
    /// Stored column name.
    pub column: String,
    pub ty: FieldType,
}

///
/// EntityDescriptor
///
/// Resolved keyspace, table, ordered columns and rank-ordered partition key.
/// Invariants after construction:
/// - keyspace and table are non-empty
/// - column names are unique as the store sees them
/// - every field type has a column mapping
/// - the partition key is non-empty
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityDescriptor {
    entity: &'static str,
    keyspace: String,
    table: String,
    columns: Vec<ColumnDescriptor>,
    partition_keys: Vec<usize>,
}

impl EntityDescriptor {
    /// Derive and validate the descriptor for an entity model.
    ///
    /// The model's own keyspace wins; `default_keyspace` (the session's bound
    /// keyspace, or a configured override) is the fallback.
    pub fn derive_from(model: &EntityModel, default_keyspace: Option<&str>) -> Result<Self, Error> {
        let entity = model.path;

        if model.table.is_empty() {
            return Err(SchemaError::MissingTable { entity }.into());
        }

        let keyspace = model
            .keyspace
            .filter(|ks| !ks.is_empty())
            .or_else(|| default_keyspace.filter(|ks| !ks.is_empty()))
            .ok_or(SchemaError::MissingKeyspace { entity })?;

        // Phase 1: resolve columns in declaration order.
        let mut columns = Vec::with_capacity(model.fields.len());
        let mut seen: HashMap<String, &'static str> = HashMap::new();

        for field in model.fields {
            codec::column_type(field.ty.kind).map_err(|_| Error::UnsupportedType {
                field: field.name.to_string(),
                type_name: field.ty.kind.label().to_string(),
            })?;

            let column = field.column_name();
            if column.is_empty() {
                return Err(SchemaError::EmptyColumnName { field: field.name }.into());
            }

            if let Some(first) = seen.insert(storage_identity(column), field.name) {
                return Err(SchemaError::DuplicateColumn {
                    column: column.to_string(),
                    first,
                    second: field.name,
                }
                .into());
            }

            columns.push(ColumnDescriptor {
                property: field.name,
                column: column.to_string(),
                ty: field.ty,
            });
        }

        // Phase 2: partition key by rank, declaration order breaking ties.
        let mut ranked: Vec<(i32, usize)> = model
            .partition_key_fields()
            .filter_map(|(index, field)| field.partition_key.map(|rank| (rank, index)))
            .collect();
        if ranked.is_empty() {
            return Err(SchemaError::MissingPartitionKey { entity }.into());
        }
        ranked.sort_unstable();

        Ok(Self {
            entity,
            keyspace: keyspace.to_string(),
            table: model.table.to_string(),
            columns,
            partition_keys: ranked.into_iter().map(|(_, index)| index).collect(),
        })
    }

    #[must_use]
    pub const fn entity(&self) -> &'static str {
        self.entity
    }

    #[must_use]
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// All persisted columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Column positions of the partition key, in rank order.
    #[must_use]
    pub fn partition_key_indexes(&self) -> &[usize] {
        &self.partition_keys
    }

    /// Partition-key columns in rank order.
    pub fn partition_keys(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.partition_keys.iter().map(|&index| &self.columns[index])
    }

    #[must_use]
    pub fn partition_key_len(&self) -> usize {
        self.partition_keys.len()
    }
}

// Bare identifiers are case-folded by the store; quoted ones are exact.
fn storage_identity(column: &str) -> String {
    if column.bytes().all(|b| b.is_ascii_alphanumeric()) {
        column.to_ascii_lowercase()
    } else {
        column.to_string()
    }
}
