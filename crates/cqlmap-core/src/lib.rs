//! Core runtime for cqlmap: entity models, the type codec, statement
//! generation, the session contract and the typed repository.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod codec;
pub mod config;
pub mod error;
pub mod ident;
pub mod model;
pub mod obs;
pub mod repository;
pub mod schema;
pub mod session;
pub mod statement;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

// re-exports
pub use error::Error;
