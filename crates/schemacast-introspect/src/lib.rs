//! Catalog introspection for schemacast.
//!
//! The [`CatalogReader`] runs one fixed query over a [`CatalogConnection`]
//! and hands back the raw catalog rows; [`SqlServerConnection`] is the
//! connection used against a live server.

pub mod connection;
pub mod reader;
pub mod sqlserver;

pub use connection::CatalogConnection;
pub use reader::{CATALOG_QUERY, CatalogReader};
pub use sqlserver::SqlServerConnection;

pub use schemacast_core::CatalogRow;

