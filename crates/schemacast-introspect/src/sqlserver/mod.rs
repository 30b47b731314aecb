//! SQL Server catalog connection over Tiberius.

use async_trait::async_trait;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use schemacast_core::{CatalogRow, ConnectionSettings, Error, Result, SOURCE_ENGINE};

use crate::connection::CatalogConnection;

mod rows;

const APPLICATION_NAME: &str = "schemacast";

/// A single exclusively-owned client connection to SQL Server.
pub struct SqlServerConnection {
    client: Option<Client<Compat<TcpStream>>>,
}

impl SqlServerConnection {
    /// Open a connection using the given settings.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let config = build_config(settings);

        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|err| Error::Connect(format!("{}: {err}", settings.address())))?;
        tcp.set_nodelay(true).ok();

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|err| Error::Connect(err.to_string()))?;

        tracing::debug!(event = "connection_opened", connection = %settings.redacted());
        Ok(Self {
            client: Some(client),
        })
    }
}

#[async_trait]
impl CatalogConnection for SqlServerConnection {
    fn engine(&self) -> &'static str {
        SOURCE_ENGINE
    }

    async fn fetch_rows(&mut self, query: &str) -> Result<Vec<CatalogRow>> {
        let client = self
            .client
            .as_mut()
            .ok_or_else(|| Error::Query("connection is closed".to_string()))?;

        let stream = client.simple_query(query).await.map_err(rows::query_error)?;
        let raw = stream.into_first_result().await.map_err(rows::query_error)?;

        raw.iter().map(rows::decode_row).collect()
    }

    async fn close(&mut self) -> Result<()> {
        match self.client.take() {
            Some(client) => client
                .close()
                .await
                .map_err(|err| Error::Connect(format!("closing connection: {err}"))),
            None => Ok(()),
        }
    }
}

/// Translate settings into a Tiberius config.
///
/// Without `encrypt` only the login exchange is encrypted and the server
/// certificate is not validated.
pub(crate) fn build_config(settings: &ConnectionSettings) -> Config {
    let mut config = Config::new();
    config.host(&settings.hostname);
    config.port(settings.port);
    config.database(&settings.database);
    config.application_name(APPLICATION_NAME);
    config.authentication(AuthMethod::sql_server(
        &settings.username,
        &settings.password,
    ));

    if settings.encrypt {
        config.encryption(EncryptionLevel::Required);
        if settings.trust_server_cert {
            config.trust_cert();
        }
    } else {
        config.encryption(EncryptionLevel::Off);
        config.trust_cert();
    }

    config
}
