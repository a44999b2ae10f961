pub mod record;
pub mod buffer;
pub mod sink;
pub mod error;
pub mod shutdown;
pub mod config;
pub mod env;
pub mod writer;

#[cfg(feature = "clickhouse")]
pub mod clickhouse;

pub mod noop_sink;
