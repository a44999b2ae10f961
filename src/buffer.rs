use std::sync::{Mutex, PoisonError};

use crate::record::Record;

/// Insertion-ordered buffer of records awaiting the next flush.
///
/// Appends from concurrent writers and the drain performed by a flush
/// are serialized by the internal lock. Neither path does any I/O while
/// holding it, so contention is bounded by another append or drain.
#[derive(Debug, Default)]
pub struct RecordBuffer {
    pending: Mutex<Vec<Record>>,
}

impl RecordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record at the tail, preserving arrival order.
    pub fn append(&self, record: Record) {
        self.lock().push(record);
    }

    /// Atomically take every pending record, leaving the buffer empty.
    /// Returns an empty vector when there is nothing pending.
    pub fn drain_all(&self) -> Vec<Record> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Record>> {
        // A writer panicking mid-push cannot leave the Vec in a state
        // worth poisoning over.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drain_returns_records_in_append_order() {
        let buffer = RecordBuffer::new();
        for i in 0..5 {
            buffer.append(json!({ "seq": i }).into());
        }
        assert_eq!(buffer.len(), 5);

        let drained = buffer.drain_all();
        let seqs: Vec<_> = drained
            .iter()
            .map(|r| r.as_value()["seq"].as_i64().unwrap())
            .collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn drain_on_empty_buffer_yields_empty_vec() {
        let buffer = RecordBuffer::new();
        assert!(buffer.drain_all().is_empty());
        // Draining twice is harmless.
        assert!(buffer.drain_all().is_empty());
    }

    #[test]
    fn appends_after_drain_start_a_fresh_batch() {
        let buffer = RecordBuffer::new();
        buffer.append(json!(1).into());
        buffer.drain_all();
        buffer.append(json!(2).into());

        let drained = buffer.drain_all();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].as_value(), &json!(2));
    }
}
