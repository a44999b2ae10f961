use async_trait::async_trait;

use crate::error::SinkError;
use crate::record::Record;

/// Batch-oriented destination for [`Record`]s.
///
/// Implementations own an established connection or session to a
/// concrete store (ClickHouse over HTTP, an in-memory fake in tests,
/// etc). The writer only touches the sink from its flush path and its
/// close path, and serializes those itself, so implementations never
/// see two batches in flight for the same writer.
#[async_trait]
pub trait BatchSink: Send + Sync {
    /// Open a new batch scoped to `target` (a table or stream name).
    ///
    /// **Returns**
    /// - `Ok(handle)` with an empty batch ready to accept records.
    /// - `Err(..)` if the sink cannot start a batch (connection lost,
    ///   unknown target, etc.). The writer reports this as the
    ///   `PrepareFailed` flush stage.
    async fn prepare_batch(&self, target: &str) -> Result<Box<dyn RecordBatch>, SinkError>;

    /// Release the underlying connection. Called exactly once, after
    /// the writer's final flush.
    async fn close(&self) -> Result<(), SinkError>;
}

/// An open batch accepting records for one bulk submission.
///
/// Dropping an unsent batch releases its resources without sending
/// anything, which is how the writer cleans up after a failed append.
#[async_trait]
pub trait RecordBatch: Send {
    /// Append one record at the end of the batch.
    fn append(&mut self, record: &Record) -> Result<(), SinkError>;

    /// Submit the batch to the store in a single exchange. Consumes the
    /// batch; on error its records are lost.
    async fn send(self: Box<Self>) -> Result<(), SinkError>;
}
