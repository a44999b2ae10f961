use async_trait::async_trait;

use crate::error::SinkError;
use crate::record::Record;
use crate::sink::{BatchSink, RecordBatch};

/// A sink that accepts and discards every batch.
///
/// Useful for measuring the overhead of the writer itself without any
/// external I/O, and for unit tests that don't care about persistence.
#[derive(Clone, Default)]
pub struct NoopSink;

#[async_trait]
impl BatchSink for NoopSink {
    async fn prepare_batch(&self, _target: &str) -> Result<Box<dyn RecordBatch>, SinkError> {
        Ok(Box::new(NoopBatch))
    }

    async fn close(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

struct NoopBatch;

#[async_trait]
impl RecordBatch for NoopBatch {
    fn append(&mut self, _record: &Record) -> Result<(), SinkError> {
        Ok(())
    }

    async fn send(self: Box<Self>) -> Result<(), SinkError> {
        Ok(())
    }
}
