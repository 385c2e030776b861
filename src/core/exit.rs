//! Exit handlers run on controlled shutdown
//!
//! Buffering handlers register a flush callback here on construction so that
//! [`exit`] can drain them before the process terminates.

use super::error::panic_message;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

type ExitCallback = Box<dyn Fn() + Send + Sync>;

static GLOBAL_EXIT_HANDLERS: Lazy<Arc<ExitRegistry>> =
    Lazy::new(|| Arc::new(ExitRegistry::new()));

/// A callback that panicked during [`ExitRegistry::run_all`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitHandlerFailure {
    /// Registration index of the callback
    pub index: usize,
    pub message: String,
}

/// Append-only list of shutdown callbacks.
///
/// Registration and execution hold the same lock, so a callback must not
/// register further callbacks.
#[derive(Default)]
pub struct ExitRegistry {
    handlers: Mutex<Vec<ExitCallback>>,
}

impl ExitRegistry {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide registry
    pub fn global() -> Arc<ExitRegistry> {
        Arc::clone(&GLOBAL_EXIT_HANDLERS)
    }

    pub fn register<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handlers.lock().push(Box::new(callback));
    }

    pub fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.lock().is_empty()
    }

    /// Invoke every callback in registration order.
    ///
    /// A panicking callback is reported to stderr and does not stop the ones
    /// after it. Returns the failures that were reported.
    pub fn run_all(&self) -> Vec<ExitHandlerFailure> {
        let handlers = self.handlers.lock();
        let mut failures = Vec::new();

        for (index, handler) in handlers.iter().enumerate() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler())) {
                let message = panic_message(payload.as_ref());
                eprintln!("[LOGGER ERROR] Exit handler #{} failed: {}", index, message);
                failures.push(ExitHandlerFailure { index, message });
            }
        }

        failures
    }

    /// Run every callback, then terminate the process with `code`
    pub fn exit(&self, code: i32) -> ! {
        self.run_all();
        std::process::exit(code)
    }

    /// Remove every callback. Intended for test isolation.
    pub fn clear(&self) {
        self.handlers.lock().clear();
    }
}

/// Register a callback with the process-wide registry
pub fn add_exit_handler<F>(callback: F)
where
    F: Fn() + Send + Sync + 'static,
{
    GLOBAL_EXIT_HANDLERS.register(callback);
}

/// Run the process-wide exit handlers and terminate with `code`
pub fn exit(code: i32) -> ! {
    GLOBAL_EXIT_HANDLERS.exit(code)
}
