use std::borrow::Cow;

use schemacast_core::{CatalogRow, Result};

use crate::connection::CatalogConnection;

/// Lists every column of every user-visible table, ordered by table then column.
pub const CATALOG_QUERY: &str = "SELECT TABLE_NAME, COLUMN_NAME, DATA_TYPE FROM INFORMATION_SCHEMA.COLUMNS ORDER BY TABLE_NAME, COLUMN_NAME";

/// Runs the catalog query once over a connection.
#[derive(Debug, Clone)]
pub struct CatalogReader {
    query: Cow<'static, str>,
}

impl Default for CatalogReader {
    fn default() -> Self {
        Self::new(CATALOG_QUERY)
    }
}

impl CatalogReader {
    /// Create a reader that runs `query` instead of [`CATALOG_QUERY`].
    pub fn new(query: impl Into<Cow<'static, str>>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Read all catalog rows, then close the connection.
    ///
    /// Rows come back in the order the catalog returned them. The connection
    /// is closed whether or not the query succeeded.
    pub async fn read<C>(&self, connection: &mut C) -> Result<Vec<CatalogRow>>
    where
        C: CatalogConnection + ?Sized,
    {
        tracing::info!(event = "catalog_query_started", engine = connection.engine());

        let fetched = connection.fetch_rows(&self.query).await;
        if let Err(err) = connection.close().await {
            tracing::warn!(event = "connection_close_failed", error = %err);
        }
        let rows = fetched?;

        tracing::info!(event = "catalog_rows_read", rows = rows.len());
        Ok(rows)
    }
}
