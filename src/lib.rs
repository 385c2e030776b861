//! # Logging Facility
//!
//! Structured logging with chained context fields, severity filtering and
//! pluggable handlers.
//!
//! ## Features
//!
//! - **Context chains**: `with_field`/`with_fields`/`with_error` return new
//!   entries and never mutate the receiver, so prefixes can be shared freely
//! - **Nine severities**: debug through emergency, with numeric codes
//! - **Fan-out**: a multi handler delivers to every sink even when one fails
//! - **Sanitize hooks**: redact sensitive values before any handler sees them
//! - **Exit handlers**: buffering sinks flush before the process terminates
//! - **Traces**: time an operation and log its completion on every exit path
//!
//! ## Example
//!
//! ```
//! use logging_facility::prelude::*;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryHandler::new());
//! let logger = Logger::builder()
//!     .level(Level::Debug)
//!     .handler(Arc::clone(&memory))
//!     .build();
//!
//! let request = logger.with_field("request_id", "7f3a");
//! request.with_field("status", 200).info("handled");
//!
//! assert_eq!(memory.records()[0].fields.len(), 2);
//! ```

pub mod config;
pub mod core;
pub mod global;
pub mod handlers;
pub mod hooks;
pub mod macros;

pub mod prelude {
    pub use crate::config::LogConfig;
    pub use crate::core::{
        Clock, Entry, ExitRegistry, FieldValue, Fielder, Fields, FixedClock, Handler, HandlerFunc,
        HookRegistry, Level, Logger, LoggerBuilder, LoggerError, LoggerMetrics, MultiHandler,
        OutputFormat, Record, Result, SanitizeHook, SystemClock, TimestampFormat, Trace,
    };
    pub use crate::handlers::{
        AsyncHandler, BatchHandler, BatchSink, ConsoleHandler, DiscardHandler, LevelHandler,
        MemoryHandler, WriterHandler,
    };
    pub use crate::hooks::{DsnHook, FnHook, KeyHook};
}

pub use crate::core::exit::{add_exit_handler, exit};
pub use crate::core::hooks::register_sanitize_hook;
pub use crate::core::{
    Clock, Entry, ExitHandlerFailure, ExitRegistry, FieldValue, Fielder, Fields, FixedClock,
    Handler, HandlerFunc, HookRegistry, Identity, Level, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, MultiHandler, OutputFormat, Record, Result, SanitizeHook, SystemClock,
    TimestampFormat, Trace,
};
