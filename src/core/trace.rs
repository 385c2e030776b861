//! Timed operations
//!
//! [`Entry::trace`](super::Entry::trace) logs the start of an operation and
//! hands back a [`Trace`] guard. The guard emits the completion record exactly
//! once: on [`Trace::stop`], or on drop when the scope is left another way.
//!
//! A guard dropped on a `?` early return cannot see the error and completes
//! at Info. Fallible operations go through
//! [`Entry::trace_result`](super::Entry::trace_result) (or [`Trace::run`]),
//! which completes at Error whenever the closure returns `Err`:
//!
//! ```no_run
//! # use logging_facility::prelude::*;
//! fn open(ctx: &Entry, path: &str) -> std::io::Result<String> {
//!     ctx.with_field("path", path)
//!         .trace_result("opening", || std::fs::read_to_string(path))
//! }
//! ```

use super::entry::Entry;
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::time::{Duration, Instant};

#[must_use = "dropping the guard immediately completes the trace"]
pub struct Trace {
    entry: Entry,
    message: String,
    start: Instant,
    location: &'static Location<'static>,
    done: bool,
}

impl Trace {
    pub(crate) fn start(
        entry: Entry,
        message: String,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            entry,
            message,
            start: Instant::now(),
            location,
            done: false,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Complete the trace.
    ///
    /// Without an error the completion is logged at Info; with one, the error
    /// is attached and the completion is logged at Error.
    pub fn stop(mut self, err: Option<&dyn Error>) {
        self.complete(err);
    }

    /// Complete the trace from the outcome of the traced operation
    pub fn stop_with<T, E: Error>(self, result: &Result<T, E>) {
        self.stop(result.as_ref().err().map(|e| e as &dyn Error));
    }

    /// Run `operation` and complete the trace from its outcome
    pub fn run<T, E, F>(self, operation: F) -> Result<T, E>
    where
        E: Error,
        F: FnOnce() -> Result<T, E>,
    {
        let result = operation();
        self.stop_with(&result);
        result
    }

    fn complete(&mut self, err: Option<&dyn Error>) {
        if self.done {
            return;
        }
        self.done = true;

        let entry = self.entry.with_field("duration", self.start.elapsed());
        match err {
            None => entry.info(self.message.clone()),
            Some(err) => entry
                .attach_error(err, self.location)
                .error(self.message.clone()),
        }
    }
}

impl Drop for Trace {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.complete(Some(&Panicked));
        } else {
            self.complete(None);
        }
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trace")
            .field("message", &self.message)
            .field("elapsed", &self.elapsed())
            .field("done", &self.done)
            .finish()
    }
}

/// Error attached when a trace is dropped during unwinding
#[derive(Debug)]
struct Panicked;

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("panicked")
    }
}

impl Error for Panicked {}
