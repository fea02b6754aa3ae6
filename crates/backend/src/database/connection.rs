use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Error as SqlxError;
use tracing::info;

/// The `database` section of the client configuration.
///
/// `address` is `host` or `host:port`. The password never leaves this type
/// except inside the connect options handed to sqlx.
#[derive(Clone, Serialize, Deserialize)]
pub struct DbConfig {
    username: String,
    password: String,
    dbname: String,
    address: Option<String>,
    max_connections: Option<u32>,
    connect_timeout_secs: Option<u64>,
}

impl DbConfig {
    const ADDRESS_FALLBACK: &'static str = "localhost";
    const MAX_CONN_FALLBACK: u32 = 5;
    const CONNECT_TIMEOUT_FALLBACK: Duration = Duration::from_secs(10);

    pub fn development(dbname: &str, username: &str, password: &str) -> Self {
        Self {
            dbname: dbname.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            address: None,
            max_connections: None,
            connect_timeout_secs: None,
        }
    }

    fn address(&self) -> &str {
        self.address.as_deref().unwrap_or(Self::ADDRESS_FALLBACK)
    }

    /// Splits `address` into host and optional port. A suffix that is not a
    /// port number is treated as part of the host.
    fn host_and_port(&self) -> (&str, Option<u16>) {
        let address = self.address();
        match address.rsplit_once(':') {
            Some((host, port)) => match port.parse() {
                Ok(port) => (host, Some(port)),
                Err(_) => (address, None),
            },
            None => (address, None),
        }
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let (host, port) = self.host_and_port();
        let options = PgConnectOptions::new()
            .host(host)
            .username(&self.username)
            .password(&self.password)
            .database(&self.dbname);
        match port {
            Some(port) => options.port(port),
            None => options,
        }
    }

    /// `dbname@address` as `user`, safe for logs and error messages.
    pub fn describe(&self) -> String {
        format!("{}@{} as {}", self.dbname, self.address(), self.username)
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections.unwrap_or(Self::MAX_CONN_FALLBACK)
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(Self::CONNECT_TIMEOUT_FALLBACK)
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .field("address", &self.address)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

pub struct DbConnection {
    pool: PgPool,
}

impl DbConnection {
    pub async fn connect(config: &DbConfig) -> Result<Self, SqlxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .acquire_timeout(config.connect_timeout())
            .connect_with(config.connect_options())
            .await?;
        info!("connected to {}", config.describe());
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_apply_to_missing_fields() {
        let config = DbConfig::development("civil_codes", "guest", "secret");
        assert_eq!(config.host_and_port(), ("localhost", None));
        assert_eq!(config.max_connections(), 5);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn address_splits_into_host_and_port() {
        let config: DbConfig = serde_json::from_str(
            r#"{"username":"u","password":"p","dbname":"d","address":"db:5433","connect_timeout_secs":2}"#,
        )
        .unwrap();
        assert_eq!(config.host_and_port(), ("db", Some(5433)));
        assert_eq!(config.connect_timeout(), Duration::from_secs(2));

        let config: DbConfig = serde_json::from_str(
            r#"{"username":"u","password":"p","dbname":"d","address":"db.internal"}"#,
        )
        .unwrap();
        assert_eq!(config.host_and_port(), ("db.internal", None));
    }

    #[test]
    fn password_stays_out_of_descriptions() {
        let config = DbConfig::development("civil_codes", "guest", "TopSecretPw");
        assert_eq!(config.describe(), "civil_codes@localhost as guest");
        assert!(!format!("{config:?}").contains("TopSecretPw"));
    }
}
