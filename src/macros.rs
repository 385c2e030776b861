//! Logging macros for ergonomic log message formatting.
//!
//! Each severity macro takes an optional target (a [`Logger`](crate::Logger)
//! or an [`Entry`](crate::Entry)) followed by `format!`-style arguments.
//! Without a target the record goes to the process-wide default logger.
//!
//! # Examples
//!
//! ```
//! use logging_facility::prelude::*;
//! use logging_facility::{info, warn};
//!
//! let logger = Logger::new(DiscardHandler);
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments and context fields
//! let port = 8080;
//! info!(logger.with_field("port", port), "Server listening on port {}", port);
//!
//! // Through the default logger
//! warn!("{} connections dropped", 3);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use logging_facility::prelude::*;
/// # let logger = Logger::new(DiscardHandler);
/// use logging_facility::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($target:expr, $level:expr, $($arg:tt)+) => {
        $target.log_fmt($level, ::std::format_args!($($arg)+))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:expr, $fmt:literal $($arg:tt)*) => {
        $crate::global::log_fmt($level, ::std::format_args!($fmt $($arg)*))
    };
    ($level:expr, $target:expr, $($arg:tt)+) => {
        $crate::log!($target, $level, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use logging_facility::prelude::*;
/// # let logger = Logger::new(DiscardHandler);
/// use logging_facility::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use logging_facility::prelude::*;
/// # let logger = Logger::new(DiscardHandler);
/// use logging_facility::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Info, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Notice, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use logging_facility::prelude::*;
/// # let logger = Logger::new(DiscardHandler);
/// use logging_facility::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use logging_facility::prelude::*;
/// # let logger = Logger::new(DiscardHandler);
/// use logging_facility::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Critical, $($arg)+)
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Alert, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Only logs; terminating the process is up to the caller
/// (see [`Logger::exit`](crate::Logger::exit)).
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Fatal, $($arg)+)
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($($arg:tt)+) => {
        $crate::__log_at!($crate::Level::Emergency, $($arg)+)
    };
}

/// Build a [`Fields`](crate::Fields) container from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use logging_facility::fields;
///
/// let fields = fields! { "user" => "tj", "id" => 123 };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(fields.insert($key, $value);)+
        fields
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::{FixedClock, HookRegistry, Level, Logger};
    use crate::global::tests::{install_memory, GLOBAL_TEST_LOCK};
    use crate::global::set_logger;
    use crate::handlers::MemoryHandler;
    use std::sync::Arc;

    fn memory_logger() -> (Logger, Arc<MemoryHandler>) {
        let memory = Arc::new(MemoryHandler::new());
        let logger = Logger::builder()
            .level(Level::Debug)
            .handler(Arc::clone(&memory))
            .clock(FixedClock::epoch())
            .hooks(Arc::new(HookRegistry::new()))
            .build();
        (logger, memory)
    }

    #[test]
    fn test_log_macro() {
        let (logger, memory) = memory_logger();
        log!(logger, Level::Info, "Test message");
        log!(logger, Level::Notice, "Formatted: {}", 42);

        let records = memory.records();
        assert_eq!(records[0].message, "Test message");
        assert_eq!(records[1].message, "Formatted: 42");
        assert_eq!(records[1].level, Level::Notice);
    }

    #[test]
    fn test_severity_macros() {
        let (logger, memory) = memory_logger();
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        notice!(logger, "notice");
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        critical!(logger, "critical");
        alert!(logger, "alert");
        fatal!(logger, "Critical failure: {}", "system");
        emergency!(logger, "emergency");

        let levels: Vec<Level> = memory.records().iter().map(|r| r.level).collect();
        assert_eq!(levels, Level::ALL.to_vec());
        assert_eq!(memory.records()[3].message, "Retry 1 of 3");
    }

    #[test]
    fn test_macros_on_entry() {
        let (logger, memory) = memory_logger();
        let entry = logger.with_field("request_id", "abc");
        info!(entry, "handled in {}ms", 12);

        let record = &memory.records()[0];
        assert_eq!(record.message, "handled in 12ms");
        assert!(record.fields.contains_key("request_id"));
    }

    #[test]
    fn test_macros_without_target_use_default_logger() {
        let _guard = GLOBAL_TEST_LOCK.lock();
        let (memory, previous) = install_memory();

        let retries = 2;
        warn!("{} retries left", retries);
        info!("plain");

        assert_eq!(memory.messages(), vec!["2 retries left", "plain"]);
        set_logger(previous);
    }

    #[test]
    fn test_fields_macro() {
        let fields = fields! { "user" => "tj", "id" => 123, "user" => "ann" };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("user").and_then(|v| v.as_str()), Some("ann"));
        assert!(fields!().is_empty());
    }
}
