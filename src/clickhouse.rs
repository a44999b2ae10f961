use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{TlsMode, WriterConfig};
use crate::error::{SinkError, WriterError};
use crate::record::Record;
use crate::sink::{BatchSink, RecordBatch};
use crate::writer::Writer;

/// ClickHouse implementation of [`BatchSink`] over the HTTP interface.
///
/// A batch is an `INSERT INTO <table> FORMAT JSONEachRow` request body
/// assembled one newline-delimited row per appended record and shipped
/// in a single POST.
pub struct ClickHouseSink {
    client: Client,
    /// Scheme, host and port, e.g. "http://127.0.0.1:8123".
    base_url: String,
    database: String,
    user: Option<String>,
    password: Option<String>,
}

impl ClickHouseSink {
    /// Connect to ClickHouse and verify the endpoint is reachable.
    ///
    /// **Parameters**
    /// - `config`: endpoint, credentials and TLS mode; the flush
    ///   interval is ignored here (the writer owns it).
    ///
    /// **Returns**
    /// - `Ok(ClickHouseSink)` after a successful ping.
    /// - `Err(..)` if the server is unreachable or rejects the request;
    ///   [`open`] reports this as [`WriterError::Connection`].
    pub async fn connect(config: &WriterConfig) -> Result<Self, SinkError> {
        let scheme = match config.tls {
            TlsMode::Enabled => "https",
            TlsMode::Disabled => "http",
        };

        let sink = Self {
            client: Client::new(),
            base_url: format!("{}://{}:{}", scheme, config.host, config.port),
            database: config.database.clone(),
            user: (!config.username.is_empty()).then(|| config.username.clone()),
            password: (!config.password.is_empty()).then(|| config.password.clone()),
        };
        sink.ping().await?;
        Ok(sink)
    }

    fn endpoint(&self, target: &str) -> String {
        let mut query = format!(
            "database={}&query=INSERT%20INTO%20{}%20FORMAT%20JSONEachRow",
            urlencoding::encode(&self.database),
            urlencoding::encode(target)
        );

        if let Some(user) = &self.user {
            query.push_str(&format!("&user={}", urlencoding::encode(user)));
        }
        if let Some(password) = &self.password {
            query.push_str(&format!("&password={}", urlencoding::encode(password)));
        }

        format!("{}/?{}", self.base_url, query)
    }

    async fn ping(&self) -> Result<(), SinkError> {
        let url = format!("{}/ping", self.base_url);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(format!("ClickHouse ping failed with status {}", resp.status()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl BatchSink for ClickHouseSink {
    async fn prepare_batch(&self, target: &str) -> Result<Box<dyn RecordBatch>, SinkError> {
        Ok(Box::new(ClickHouseBatch {
            client: self.client.clone(),
            url: self.endpoint(target),
            body: String::new(),
        }))
    }

    async fn close(&self) -> Result<(), SinkError> {
        // The HTTP interface is connectionless from our side; reqwest's
        // pooled connections are released when the client is dropped.
        Ok(())
    }
}

/// One in-flight `JSONEachRow` insert being assembled.
struct ClickHouseBatch {
    client: Client,
    url: String,
    body: String,
}

#[async_trait]
impl RecordBatch for ClickHouseBatch {
    fn append(&mut self, record: &Record) -> Result<(), SinkError> {
        let row = serde_json::to_string(record.as_value())?;
        self.body.push_str(&row);
        self.body.push('\n');
        Ok(())
    }

    async fn send(self: Box<Self>) -> Result<(), SinkError> {
        let resp = self.client.post(self.url.as_str()).body(self.body).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(format!("ClickHouse insert failed with status {}: {}", status, text).into())
        }
    }
}

/// Connect to ClickHouse and open a [`Writer`] on top of the
/// established connection in one step. This is the usual entry point
/// for hosts that just want a ready-to-write handle.
pub async fn open(config: &WriterConfig) -> Result<Writer, WriterError> {
    // Validate before dialing so a bad interval fails fast.
    config.validate()?;
    let sink = ClickHouseSink::connect(config)
        .await
        .map_err(WriterError::Connection)?;
    Writer::open(Arc::new(sink), config)
}
