//! Buffering handler for bulk sinks
//!
//! Records accumulate in memory and are shipped to a [`BatchSink`] once the
//! buffer reaches its size, on [`Handler::flush`], or when the process exits
//! through an [`ExitRegistry`] the handler was attached to.

use crate::core::{ExitRegistry, Handler, LoggerError, Record, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// Destination that accepts records in bulk
pub trait BatchSink: Send + Sync {
    fn write_batch(&self, records: &[Record]) -> Result<()>;

    fn name(&self) -> &str {
        "batch"
    }
}

impl<F> BatchSink for F
where
    F: Fn(&[Record]) -> Result<()> + Send + Sync,
{
    fn write_batch(&self, records: &[Record]) -> Result<()> {
        self(records)
    }
}

pub struct BatchHandler<S> {
    sink: S,
    batch_size: usize,
    buffer: Mutex<Vec<Record>>,
}

impl<S: BatchSink> BatchHandler<S> {
    /// Default number of records shipped per batch
    pub const DEFAULT_BATCH_SIZE: usize = 100;

    pub fn new(sink: S) -> Self {
        Self::with_batch_size(sink, Self::DEFAULT_BATCH_SIZE)
    }

    /// A `batch_size` of zero is treated as one
    pub fn with_batch_size(sink: S, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            sink,
            batch_size,
            buffer: Mutex::new(Vec::with_capacity(batch_size)),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Records waiting for the next batch
    pub fn pending(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn ship(&self, batch: Vec<Record>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.sink.write_batch(&batch).map_err(|e| {
            LoggerError::handler(
                self.sink.name(),
                format!("failed to ship {} records: {}", batch.len(), e),
            )
        })
    }
}

impl<S: BatchSink + 'static> BatchHandler<S> {
    /// Flush whatever is buffered when `registry` runs its exit handlers
    ///
    /// The registry keeps the handler alive until it has run.
    pub fn flush_on_exit(self: &Arc<Self>, registry: &ExitRegistry) {
        let handler = Arc::clone(self);
        registry.register(move || {
            let pending = handler.pending();
            if pending == 0 {
                return;
            }
            eprintln!("[LOGGER] {}: flushing {} records", handler.name(), pending);
            let start = Instant::now();
            match handler.flush() {
                Ok(()) => eprintln!(
                    "[LOGGER] {}: flushed {} records in {:?}",
                    handler.name(),
                    pending,
                    start.elapsed()
                ),
                Err(e) => eprintln!("[LOGGER ERROR] Failed to flush batch on exit: {}", e),
            }
        });
    }
}

impl<S: BatchSink> Handler for BatchHandler<S> {
    fn handle(&self, record: &Record) -> Result<()> {
        let full = {
            let mut buffer = self.buffer.lock();
            buffer.push(record.clone());
            if buffer.len() >= self.batch_size {
                Some(std::mem::replace(
                    &mut *buffer,
                    Vec::with_capacity(self.batch_size),
                ))
            } else {
                None
            }
        };

        // Ship outside the lock so other callers keep buffering
        match full {
            Some(batch) => self.ship(batch),
            None => Ok(()),
        }
    }

    fn flush(&self) -> Result<()> {
        let batch = std::mem::take(&mut *self.buffer.lock());
        self.ship(batch)
    }

    fn name(&self) -> &str {
        self.sink.name()
    }
}
