use std::fmt;
use std::time::Duration;

use crate::error::WriterError;

/// Transport security towards the sink endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    #[default]
    Disabled,
    Enabled,
}

/// Connection and flush settings consumed by [`crate::writer::Writer::open`]
/// and [`crate::clickhouse::ClickHouseSink::connect`].
///
/// Parsing this out of a config file, CLI, or host framework is the
/// caller's concern; [`crate::env`] offers an environment-variable
/// shortcut for services.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub table: String,
    pub username: String,
    pub password: String,
    pub tls: TlsMode,
    /// Interval between scheduled flushes; must be greater than zero.
    pub flush_interval: Duration,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8123,
            database: "default".to_string(),
            table: "logs".to_string(),
            username: "default".to_string(),
            password: String::new(),
            tls: TlsMode::Disabled,
            flush_interval: Duration::from_secs(1),
        }
    }
}

impl WriterConfig {
    /// Unique key identifying this writer's destination, used by hosts
    /// to deduplicate writer instances pointing at the same endpoint
    /// and table.
    pub fn writer_key(&self) -> String {
        format!(
            "{}:{}/{}.{}",
            self.host, self.port, self.database, self.table
        )
    }

    /// Reject configurations the writer cannot run with. Checked by
    /// `open` before anything is spawned or dialed.
    pub fn validate(&self) -> Result<(), WriterError> {
        if self.flush_interval.is_zero() {
            return Err(WriterError::Config(
                "flush_interval must be greater than zero".into(),
            ));
        }
        if self.host.is_empty() {
            return Err(WriterError::Config("host must not be empty".into()));
        }
        if self.table.is_empty() {
            return Err(WriterError::Config("table must not be empty".into()));
        }
        Ok(())
    }
}

impl fmt::Display for WriterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.writer_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_key_identifies_the_destination() {
        let config = WriterConfig {
            host: "ch.internal".into(),
            port: 9000,
            database: "telemetry".into(),
            table: "access_logs".into(),
            ..WriterConfig::default()
        };
        assert_eq!(config.writer_key(), "ch.internal:9000/telemetry.access_logs");
        assert_eq!(config.to_string(), config.writer_key());
    }

    #[test]
    fn zero_flush_interval_is_rejected() {
        let config = WriterConfig {
            flush_interval: Duration::ZERO,
            ..WriterConfig::default()
        };
        assert!(matches!(config.validate(), Err(WriterError::Config(_))));
    }

    #[test]
    fn empty_host_and_table_are_rejected() {
        let no_host = WriterConfig {
            host: String::new(),
            ..WriterConfig::default()
        };
        assert!(no_host.validate().is_err());

        let no_table = WriterConfig {
            table: String::new(),
            ..WriterConfig::default()
        };
        assert!(no_table.validate().is_err());
    }

    #[test]
    fn default_config_validates() {
        assert!(WriterConfig::default().validate().is_ok());
    }
}
