use std::fmt;

use crate::error::{Error, Result};

/// Engine tag for the source system.
pub const SOURCE_ENGINE: &str = "sqlserver";
pub const DEFAULT_USERNAME: &str = "sa";
pub const DEFAULT_HOSTNAME: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 1433;

/// Parameters for the read-only connection to the source catalog.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
    /// Require TLS for the whole session instead of only the login exchange.
    pub encrypt: bool,
    /// Accept the server certificate without validation when `encrypt` is set.
    pub trust_server_cert: bool,
}

impl ConnectionSettings {
    /// Settings with the conventional defaults for everything but database and password.
    pub fn new(database: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: password.into(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            database: database.into(),
            encrypt: false,
            trust_server_cert: false,
        }
    }

    /// Check the parameters that must be present before any connection attempt.
    pub fn validate(&self) -> Result<()> {
        if self.password.is_empty() {
            return Err(Error::Precondition("must set password".to_string()));
        }
        if self.database.is_empty() {
            return Err(Error::Precondition("must set database".to_string()));
        }
        Ok(())
    }

    /// `host:port` pair used to open the TCP connection.
    pub fn address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }

    /// Connection URL with the password replaced by `***`, for logs.
    pub fn redacted(&self) -> String {
        format!(
            "{SOURCE_ENGINE}://{}:***@{}?database={}",
            self.username,
            self.address(),
            self.database
        )
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("username", &self.username)
            .field("password", &"***")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("encrypt", &self.encrypt)
            .field("trust_server_cert", &self.trust_server_cert)
            .finish()
    }
}
