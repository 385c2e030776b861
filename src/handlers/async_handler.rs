//! Background delivery over a bounded channel
//!
//! The calling thread only enqueues. A dedicated worker thread drains the
//! queue into the wrapped handler, so slow sinks never stall the caller.
//! When the queue is full the record is dropped and counted.

use crate::core::{handler::handle_isolated, ExitRegistry, Handler, LoggerError, Record, Result};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

enum Message {
    Record(Box<Record>),
    Flush(Sender<Result<()>>),
}

pub struct AsyncHandler {
    sender: Mutex<Option<Sender<Message>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    capacity: usize,
    dropped: AtomicU64,
    name: String,
}

impl AsyncHandler {
    /// Default queue capacity
    pub const DEFAULT_CAPACITY: usize = 8192;

    pub fn new<H: Handler + 'static>(inner: H) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    /// A `capacity` of zero is treated as one
    pub fn with_capacity<H: Handler + 'static>(inner: H, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded::<Message>(capacity);
        let name = inner.name().to_string();

        let worker = thread::Builder::new()
            .name(format!("log-{}", name))
            .spawn(move || {
                for message in receiver {
                    match message {
                        Message::Record(record) => {
                            if let Err(e) = handle_isolated(&inner, &record) {
                                eprintln!("[LOGGER ERROR] Async delivery failed: {}", e);
                            }
                        }
                        Message::Flush(reply) => {
                            let _ = reply.send(inner.flush());
                        }
                    }
                }

                // Channel closed: everything queued has been delivered
                if let Err(e) = inner.flush() {
                    eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
                }
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("[LOGGER CRITICAL] Failed to spawn async worker: {}", e);
                None
            }
        };
        let sender = worker.as_ref().map(|_| sender);

        Self {
            sender: Mutex::new(sender),
            worker: Mutex::new(worker),
            capacity,
            dropped: AtomicU64::new(0),
            name,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records dropped because the queue was full
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Stop accepting records, drain the queue and join the worker
    ///
    /// Returns `false` if the worker panicked. Calling it again is a no-op.
    pub fn shutdown(&self) -> bool {
        drop(self.sender.lock().take());

        match self.worker.lock().take() {
            Some(handle) => match handle.join() {
                Ok(()) => true,
                Err(e) => {
                    eprintln!(
                        "[LOGGER ERROR] Async worker thread panicked during shutdown: {:?}",
                        e
                    );
                    false
                }
            },
            None => true,
        }
    }

    /// Drain and stop the worker when `registry` runs its exit handlers
    pub fn shutdown_on_exit(self: &Arc<Self>, registry: &ExitRegistry) {
        let handler = Arc::clone(self);
        registry.register(move || {
            handler.shutdown();
        });
    }

    fn sender(&self) -> Result<Sender<Message>> {
        self.sender
            .lock()
            .clone()
            .ok_or_else(|| LoggerError::handler_closed(self.name.clone()))
    }
}

impl Handler for AsyncHandler {
    fn handle(&self, record: &Record) -> Result<()> {
        match self.sender()?.try_send(Message::Record(Box::new(record.clone()))) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                if self.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
                    eprintln!(
                        "[LOGGER WARNING] Queue for '{}' is full ({} records), dropping",
                        self.name, self.capacity
                    );
                }
                Err(LoggerError::QueueFull {
                    capacity: self.capacity,
                })
            }
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::handler_closed(&self.name)),
        }
    }

    /// Wait until every record queued before this call has been delivered
    fn flush(&self) -> Result<()> {
        let sender = match self.sender() {
            Ok(sender) => sender,
            // Shut down: the worker flushed on its way out
            Err(_) => return Ok(()),
        };

        let (reply_tx, reply_rx) = bounded(1);
        sender
            .send(Message::Flush(reply_tx))
            .map_err(|_| LoggerError::handler_closed(&self.name))?;
        reply_rx
            .recv()
            .map_err(|_| LoggerError::handler_closed(&self.name))?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for AsyncHandler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
