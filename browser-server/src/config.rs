//! Server configuration from command-line arguments and environment variables

use std::time::Duration;

use clap::{Parser, ValueEnum};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 3000;

/// How the database connection uses TLS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SslMode {
    /// Plain TCP
    Disable,
    /// TLS when the server offers it
    Prefer,
    /// TLS always; the certificate is not verified, so self-signed ones work
    #[default]
    Require,
}

impl From<SslMode> for PgSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
        }
    }
}

/// Configuration for the browser server
#[derive(Clone, Parser)]
#[command(
    name = "browser-server",
    about = "Browse PostgreSQL schemas, tables and views over HTTP",
    version
)]
pub struct Config {
    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = DEFAULT_DB_PORT)]
    pub db_port: u16,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: String,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// TLS mode for the database connection
    #[arg(long, env = "DB_SSL_MODE", value_enum, default_value_t = SslMode::Require)]
    pub db_ssl_mode: SslMode,

    /// Maximum simultaneous database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection before failing the request
    #[arg(long, env = "DB_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub db_connect_timeout_secs: u64,

    /// Seconds an idle connection is kept before it is closed
    #[arg(long, env = "DB_IDLE_TIMEOUT_SECS", default_value_t = DEFAULT_IDLE_TIMEOUT_SECS)]
    pub db_idle_timeout_secs: u64,

    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path the browser endpoints are mounted under
    #[arg(long, env = "API_BASE_PATH", default_value = "/api")]
    pub base_path: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    pub json_logs: bool,
}

impl Config {
    /// Connection options for a single database connection
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .database(&self.db_name)
            .username(&self.db_user)
            .application_name(env!("CARGO_PKG_NAME"))
            .ssl_mode(self.db_ssl_mode.into());

        match &self.db_password {
            Some(password) => options.password(password),
            None => options,
        }
    }

    /// Pool limits: connection cap, acquire timeout and idle recycling
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(Duration::from_secs(self.db_connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.db_idle_timeout_secs))
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(arguments: &[&str]) -> Config {
        let mut full = vec!["browser-server", "--db-name", "warehouse", "--db-user", "reader"];
        full.extend_from_slice(arguments);
        Config::try_parse_from(full).unwrap()
    }

    #[test]
    fn database_name_and_user_are_required() {
        if std::env::var_os("DB_NAME").is_some() || std::env::var_os("DB_USER").is_some() {
            return;
        }
        assert!(Config::try_parse_from(["browser-server"]).is_err());
    }

    #[test]
    fn explicit_arguments_override_defaults() {
        let config = parse(&[
            "--db-host",
            "db.internal",
            "--db-port",
            "6543",
            "--db-ssl-mode",
            "disable",
            "--port",
            "8080",
            "--host",
            "127.0.0.1",
        ]);

        assert_eq!(config.db_name, "warehouse");
        assert_eq!(config.db_host, "db.internal");
        assert_eq!(config.db_port, 6543);
        assert_eq!(config.db_ssl_mode, SslMode::Disable);
        assert_eq!(config.listen_address(), "127.0.0.1:8080");
    }

    #[test]
    fn connect_options_carry_the_target() {
        let config = parse(&["--db-host", "db.internal", "--db-ssl-mode", "require"]);
        let options = config.connect_options();

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_database(), Some("warehouse"));
        assert_eq!(options.get_username(), "reader");
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));
    }
}
