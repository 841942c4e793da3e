//! SQLite implementation of the Vigil store traits.
//!
//! Records are persisted as JSON documents (mirroring the document-store
//! collaborator model) alongside denormalised columns for the fields the
//! filtered listings query on. The denormalised columns are rewritten on
//! every save; the document is the source of truth.

mod encode;
mod error;
mod schema;
mod store;


pub use error::{Error, Result};
pub use store::SqliteStore;
