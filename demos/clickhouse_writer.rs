//! Ship a few JSON records to a local ClickHouse instance.
//!
//! Expects a server on 127.0.0.1:8123 (override via `CH_WRITER_*`
//! environment variables) and a table compatible with the records
//! written below, e.g.:
//!
//!   CREATE TABLE logs (seq UInt64, msg String) ENGINE = MergeTree ORDER BY seq;

use std::time::Duration;

use clickhouse_log_writer::env::config_from_env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut config = config_from_env();
    config.flush_interval = Duration::from_millis(500);

    let writer = clickhouse_log_writer::clickhouse::open(&config).await?;
    println!("writing to {}", writer);

    for seq in 0..10u64 {
        let payload = serde_json::json!({ "seq": seq, "msg": "hello from the demo" });
        writer.write(payload.to_string().as_bytes())?;
    }

    // Let one timed flush fire, then drain the rest on close.
    tokio::time::sleep(Duration::from_secs(1)).await;
    writer.close().await?;
    Ok(())
}
