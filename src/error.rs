use std::error::Error;

/// Boxed error produced by [`crate::sink::BatchSink`] implementations.
pub type SinkError = Box<dyn Error + Send + Sync>;

/// Malformed input to `write`: the payload was not exactly one
/// JSON-encoded value. Local to the failing call; the buffer is left
/// untouched.
#[derive(thiserror::Error, Debug)]
#[error("invalid record payload, expected a single JSON value: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Failure of a single flush attempt, tagged with the batch-protocol
/// stage that failed.
///
/// The drained records of the failing batch are dropped, not re-queued;
/// the writer keeps running and the next scheduled flush starts from
/// whatever arrived since the drain.
#[derive(thiserror::Error, Debug)]
pub enum FlushError {
    #[error("failed to prepare batch: {0}")]
    PrepareFailed(#[source] SinkError),

    #[error("failed to append record to batch: {0}")]
    AppendFailed(#[source] SinkError),

    #[error("failed to send batch: {0}")]
    SendFailed(#[source] SinkError),
}

/// Errors surfaced by the writer lifecycle (`open` and `close`).
#[derive(thiserror::Error, Debug)]
pub enum WriterError {
    /// Sink unreachable or authentication rejected while opening.
    #[error("failed to connect to sink: {0}")]
    Connection(#[source] SinkError),

    /// Invalid configuration, rejected at open time.
    #[error("invalid writer configuration: {0}")]
    Config(String),

    /// The final flush on close failed; the remaining records are lost.
    #[error(transparent)]
    Flush(#[from] FlushError),

    /// The sink connection could not be released cleanly on close.
    #[error("failed to release sink connection: {0}")]
    Shutdown(#[source] SinkError),

    /// `close` was called on a writer that was already closed.
    #[error("writer is already closed")]
    AlreadyClosed,
}
