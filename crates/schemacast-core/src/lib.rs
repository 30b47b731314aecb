//! Core contracts for schemacast.
//!
//! This crate defines the grouped schema model built from catalog rows, the
//! shared error type, and the source connection settings used by the reader
//! and the CLI.

pub mod connection;
pub mod error;
pub mod schema;

pub use connection::{
    ConnectionSettings, DEFAULT_HOSTNAME, DEFAULT_PORT, DEFAULT_USERNAME, SOURCE_ENGINE,
};
pub use error::{Error, Result};
pub use schema::{CatalogRow, ColumnDescriptor, SchemaMapping, TableSchema};
