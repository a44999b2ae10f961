use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::buffer::RecordBuffer;
use crate::config::WriterConfig;
use crate::error::{DecodeError, FlushError, WriterError};
use crate::record::Record;
use crate::shutdown::ShutdownSignal;
use crate::sink::BatchSink;

/// Buffered writer that accepts one JSON record per `write` call and
/// ships accumulated records to a [`BatchSink`] as a single batch on a
/// fixed interval.
///
/// The writer is `Send + Sync`; `write` may be called from any number
/// of tasks or threads concurrently with the background flush. Records
/// are not durable: anything still buffered when the process dies
/// without a clean [`Writer::close`] is lost.
pub struct Writer {
    inner: Arc<WriterInner>,
    shutdown: ShutdownSignal,
    /// Taken by the first `close`; `None` afterwards.
    scheduler: Mutex<Option<JoinHandle<()>>>,
    key: String,
}

struct WriterInner {
    buffer: RecordBuffer,
    sink: Arc<dyn BatchSink>,
    target: String,
    /// Serializes flushes. At most one drain-and-send is in flight at a
    /// time, so batches reach the sink in the order their flush was
    /// triggered and the sink handle is never used from two flushes at
    /// once. Tokio mutexes are FIFO, which keeps that order fair.
    flush_gate: AsyncMutex<()>,
}

impl Writer {
    /// Validate `config`, create an empty buffer and start the flush
    /// scheduler against the provided sink.
    ///
    /// The sink connection itself is established by the caller (or by
    /// [`crate::clickhouse::open`]); this constructor fails only on
    /// invalid configuration. Must be called from within a Tokio
    /// runtime, since it spawns the scheduler task.
    pub fn open(sink: Arc<dyn BatchSink>, config: &WriterConfig) -> Result<Self, WriterError> {
        config.validate()?;

        let inner = Arc::new(WriterInner {
            buffer: RecordBuffer::new(),
            sink,
            target: config.table.clone(),
            flush_gate: AsyncMutex::new(()),
        });
        let shutdown = ShutdownSignal::new();

        let scheduler = tokio::spawn(flush_loop(
            Arc::clone(&inner),
            config.flush_interval,
            shutdown.clone(),
        ));

        Ok(Self {
            inner,
            shutdown,
            scheduler: Mutex::new(Some(scheduler)),
            key: config.writer_key(),
        })
    }

    /// Decode `bytes` as one JSON record and queue it for the next
    /// flush.
    ///
    /// **Returns**
    /// - `Ok(n)` with the number of bytes accepted.
    /// - `Err(DecodeError)` if `bytes` is not exactly one JSON value;
    ///   nothing is buffered in that case and later writes are
    ///   unaffected.
    ///
    /// Never blocks on I/O; only on the buffer lock, which is held for
    /// the duration of a push or drain.
    pub fn write(&self, bytes: &[u8]) -> Result<usize, DecodeError> {
        let record = Record::from_json_bytes(bytes)?;
        self.inner.buffer.append(record);
        Ok(bytes.len())
    }

    /// Drain the buffer now and submit its contents as one batch,
    /// without waiting for the next interval.
    ///
    /// **Returns**
    /// - `Ok(n)` with the number of records delivered; `Ok(0)` without
    ///   any sink interaction when the buffer was empty.
    /// - `Err(FlushError)` naming the failed stage. The drained records
    ///   are dropped, not re-queued.
    pub async fn flush(&self) -> Result<usize, FlushError> {
        self.inner.flush().await
    }

    /// Stop the scheduler, flush everything still buffered and release
    /// the sink connection.
    ///
    /// Waits for the scheduler task to terminate before the final flush
    /// so the two cannot overlap. The final flush error, if any, takes
    /// precedence over a release error, but the release is attempted
    /// regardless. Calling `close` a second time returns
    /// [`WriterError::AlreadyClosed`] without touching the sink.
    pub async fn close(&self) -> Result<(), WriterError> {
        let scheduler = self
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(WriterError::AlreadyClosed)?;

        self.shutdown.trigger();
        if let Err(e) = scheduler.await {
            // The loop panicking does not change the close protocol;
            // the final flush below still drains the buffer.
            warn!(writer = %self.key, error = %e, "flush scheduler task failed");
        }

        let flush_result = self.inner.flush().await;
        let close_result = self.inner.sink.close().await;

        flush_result?;
        close_result.map_err(WriterError::Shutdown)?;
        Ok(())
    }

    /// Unique key for this writer's destination, used by hosts to
    /// deduplicate writers pointing at the same endpoint and table.
    pub fn writer_key(&self) -> &str {
        &self.key
    }

    /// Number of records currently buffered and not yet flushed.
    pub fn pending(&self) -> usize {
        self.inner.buffer.len()
    }
}

impl fmt::Display for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("key", &self.key)
            .field("pending", &self.inner.buffer.len())
            .finish()
    }
}

impl WriterInner {
    /// The flush executor: drain the buffer and submit one batch.
    ///
    /// Holds the flush gate across drain and send; the buffer lock is
    /// only taken inside `drain_all`, so writers never wait on network
    /// I/O. On a stage failure the drained records are dropped and the
    /// batch handle is released by drop.
    async fn flush(&self) -> Result<usize, FlushError> {
        let _gate = self.flush_gate.lock().await;

        let drained = self.buffer.drain_all();
        if drained.is_empty() {
            return Ok(0);
        }

        let count = drained.len();
        let mut batch = self
            .sink
            .prepare_batch(&self.target)
            .await
            .map_err(FlushError::PrepareFailed)?;
        for record in &drained {
            batch.append(record).map_err(FlushError::AppendFailed)?;
        }
        batch.send().await.map_err(FlushError::SendFailed)?;

        debug!(records = count, target = %self.target, "flushed batch");
        Ok(count)
    }
}

/// The flush scheduler: wake every `interval`, flush, repeat until the
/// shutdown signal fires. Flush errors are logged and never stop the
/// loop. The final drain after shutdown belongs to `close`, not to this
/// loop.
async fn flush_loop(inner: Arc<WriterInner>, interval: Duration, shutdown: ShutdownSignal) {
    loop {
        tokio::select! {
            _ = shutdown.wait() => {
                debug!(target = %inner.target, "flush scheduler stopping");
                return;
            }
            _ = sleep(interval) => {
                if let Err(e) = inner.flush().await {
                    warn!(target = %inner.target, error = %e, "scheduled flush failed, batch dropped");
                }
            }
        }
    }
}
