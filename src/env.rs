//! Environment variable names used by this crate for convenient
//! configuration of the writer from services.
//!
//! These are purely helpers; the core writer types remain decoupled
//! from environment access.

use std::time::Duration;

use crate::config::{TlsMode, WriterConfig};

/// Sink host name or address, e.g. `127.0.0.1`.
pub const CH_WRITER_HOST_ENV: &str = "CH_WRITER_HOST";

/// Sink HTTP port, e.g. `8123`.
pub const CH_WRITER_PORT_ENV: &str = "CH_WRITER_PORT";

/// Target database name.
pub const CH_WRITER_DB_ENV: &str = "CH_WRITER_DB";

/// Target table name.
pub const CH_WRITER_TABLE_ENV: &str = "CH_WRITER_TABLE";

/// User name; defaults to `default`.
pub const CH_WRITER_USER_ENV: &str = "CH_WRITER_USER";

/// Password; defaults to empty.
pub const CH_WRITER_PASSWORD_ENV: &str = "CH_WRITER_PASSWORD";

/// Set to `on` to reach the sink over HTTPS.
pub const CH_WRITER_TLS_ENV: &str = "CH_WRITER_TLS";

/// Flush interval in milliseconds.
pub const CH_WRITER_FLUSH_INTERVAL_MS_ENV: &str = "CH_WRITER_FLUSH_INTERVAL_MS";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Build a [`WriterConfig`] from the `CH_WRITER_*` environment
/// variables, falling back to the crate defaults for anything unset or
/// unparsable.
pub fn config_from_env() -> WriterConfig {
    let defaults = WriterConfig::default();
    WriterConfig {
        host: env_or(CH_WRITER_HOST_ENV, &defaults.host),
        port: env_or(CH_WRITER_PORT_ENV, "8123")
            .parse()
            .unwrap_or(defaults.port),
        database: env_or(CH_WRITER_DB_ENV, &defaults.database),
        table: env_or(CH_WRITER_TABLE_ENV, &defaults.table),
        username: env_or(CH_WRITER_USER_ENV, &defaults.username),
        password: env_or(CH_WRITER_PASSWORD_ENV, ""),
        tls: if env_or(CH_WRITER_TLS_ENV, "off") == "on" {
            TlsMode::Enabled
        } else {
            TlsMode::Disabled
        },
        flush_interval: env_or(CH_WRITER_FLUSH_INTERVAL_MS_ENV, "1000")
            .parse()
            .map(Duration::from_millis)
            .unwrap_or(defaults.flush_interval),
    }
}
