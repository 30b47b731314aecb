use async_trait::async_trait;

use schemacast_core::{CatalogRow, Result};

/// Read connection to a source catalog.
#[async_trait]
pub trait CatalogConnection: Send {
    /// Returns the engine identifier (e.g. `sqlserver`).
    fn engine(&self) -> &'static str;

    /// Execute `query` and decode every row as a `(table, column, type)` triple.
    async fn fetch_rows(&mut self, query: &str) -> Result<Vec<CatalogRow>>;

    /// Release the connection. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}
