//! ## Crate layout
//! - `codec`: field-type to column-type mapping and value conversion.
//! - `config`: optional repository settings loaded from TOML.
//! - `ident`: identifier quoting for generated statements.
//! - `model`: static entity shape produced by `#[derive(Entity)]`.
//! - `obs`: metrics events, sinks and in-memory counters.
//! - `repository`: typed CRUD over one entity's table.
//! - `schema`: validated per-entity descriptor.
//! - `session`: driver contract and the in-memory session.
//! - `statement`: statement text generation and the prepared set.
//!
//! The `prelude` module covers what application code needs to declare
//! entities and run a repository.

pub use cqlmap_core::{
    Error, codec, config, error, ident, model, obs, repository, schema, session, statement,
    traits, value,
};
pub use cqlmap_derive::Entity;

/// re-exports
///
/// session implementations need these; saves downstream crates from pinning
/// the same versions in their own Cargo.toml
pub mod __reexports {
    pub use async_trait;
    pub use tokio_util;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Entity,
        config::RepositoryConfig,
        error::{Error, ErrorClass},
        repository::{Key, Repository},
        session::{MemorySession, Session, StoreError},
        traits::{EntityKind as _, FieldValue as _},
        value::Value,
    };
}
