//! Dispatcher: threshold filtering and hand-off to the active handler

use super::{
    entry::Entry,
    error::{panic_message, Result},
    exit::ExitRegistry,
    fields::{FieldValue, Fielder},
    handler::{Handler, MultiHandler},
    hooks::HookRegistry,
    level::Level,
    metrics::LoggerMetrics,
    record::Identity,
    timestamp::{system_clock, Clock, SharedClock},
    trace::Trace,
};
use crate::handlers::ConsoleHandler;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe, Location};
use std::sync::Arc;

/// Owns the threshold and the active handler.
///
/// `Logger` is a cheap handle: clones share the same threshold, handler and
/// counters. Threshold and handler can be swapped at any time; records already
/// being dispatched finish with the handler they started with.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    level: RwLock<Level>,
    handler: RwLock<Arc<dyn Handler>>,
    clock: SharedClock,
    hooks: Arc<HookRegistry>,
    exit_handlers: Arc<ExitRegistry>,
    identity: Arc<Identity>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger at Info level delivering to `handler`
    #[must_use]
    pub fn new<H: Handler + 'static>(handler: H) -> Self {
        Self::builder().handler(handler).build()
    }

    pub fn set_level(&self, level: Level) {
        *self.inner.level.write() = level;
    }

    /// Set the threshold from a level name
    pub fn set_level_from_str(&self, name: &str) -> Result<()> {
        self.set_level(Level::parse(name)?);
        Ok(())
    }

    pub fn level(&self) -> Level {
        *self.inner.level.read()
    }

    pub fn set_handler<H: Handler + 'static>(&self, handler: H) {
        *self.inner.handler.write() = Arc::new(handler);
    }

    pub fn handler(&self) -> Arc<dyn Handler> {
        Arc::clone(&self.inner.handler.read())
    }

    /// Whether a record at `level` would be dispatched
    pub fn enabled(&self, level: Level) -> bool {
        level.enables(self.level())
    }

    /// Finalize `entry` at `level` and hand it to the handler.
    ///
    /// Records below the threshold are dropped before finalization. Handler
    /// errors and panics are reported to stderr and never reach the caller.
    pub fn log(&self, level: Level, entry: &Entry, message: impl Into<String>) {
        if !self.enabled(level) {
            self.inner.metrics.record_filtered();
            return;
        }

        let record = entry.finalize(level, message.into());
        let handler = self.handler();

        match catch_unwind(AssertUnwindSafe(|| handler.handle(&record))) {
            Ok(Ok(())) => {
                self.inner.metrics.record_logged();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Handler '{}' failed: {}", handler.name(), e);
                self.inner.metrics.record_failed();
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Handler '{}' panicked: {}",
                    handler.name(),
                    panic_message(panic_info.as_ref())
                );
                self.inner.metrics.record_failed();
            }
        }
    }

    /// Empty chain bound to this logger
    pub fn entry(&self) -> Entry {
        Entry::new(self)
    }

    pub fn with_fields<F: Fielder>(&self, fields: F) -> Entry {
        self.entry().with_fields(fields)
    }

    pub fn with_field<K, V>(&self, key: K, value: V) -> Entry
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.entry().with_field(key, value)
    }

    #[track_caller]
    pub fn with_error<E>(&self, err: &E) -> Entry
    where
        E: std::error::Error + ?Sized,
    {
        self.entry().attach_error(err, Location::caller())
    }

    #[track_caller]
    pub fn with_error_fields<E>(&self, err: &E) -> Entry
    where
        E: std::error::Error + Fielder + ?Sized,
    {
        self.entry()
            .attach_error(err, Location::caller())
            .with_fields(err.fields())
    }

    /// Chain root carrying `env`, `project` and the local host name
    pub fn with_env_project(&self, env: impl Into<String>, project: impl Into<String>) -> Entry {
        self.entry().with_env_project(env, project)
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.entry().debug(message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.entry().info(message);
    }

    #[inline]
    pub fn notice(&self, message: impl Into<String>) {
        self.entry().notice(message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.entry().warn(message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.entry().error(message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.entry().critical(message);
    }

    #[inline]
    pub fn alert(&self, message: impl Into<String>) {
        self.entry().alert(message);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.entry().fatal(message);
    }

    #[inline]
    pub fn emergency(&self, message: impl Into<String>) {
        self.entry().emergency(message);
    }

    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        self.entry().log_fmt(level, args);
    }

    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Debug, args);
    }

    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Info, args);
    }

    pub fn noticef(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Notice, args);
    }

    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Warn, args);
    }

    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Error, args);
    }

    pub fn criticalf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Critical, args);
    }

    pub fn alertf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Alert, args);
    }

    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Fatal, args);
    }

    pub fn emergencyf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Emergency, args);
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) -> Trace {
        self.entry().trace(message)
    }

    #[track_caller]
    pub fn trace_result<T, E, F>(
        &self,
        message: impl Into<String>,
        operation: F,
    ) -> std::result::Result<T, E>
    where
        E: std::error::Error,
        F: FnOnce() -> std::result::Result<T, E>,
    {
        self.entry().trace_result(message, operation)
    }

    pub fn flush(&self) -> Result<()> {
        self.handler().flush()
    }

    /// Counters for delivered, filtered and failed records
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }

    pub fn exit_handlers(&self) -> &Arc<ExitRegistry> {
        &self.inner.exit_handlers
    }

    pub fn add_exit_handler<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.exit_handlers.register(callback);
    }

    /// Run the exit handlers, then terminate the process with `code`
    pub fn exit(&self, code: i32) -> ! {
        self.inner.exit_handlers.exit(code)
    }

    pub(crate) fn hooks(&self) -> &HookRegistry {
        &self.inner.hooks
    }

    pub(crate) fn identity(&self) -> Arc<Identity> {
        Arc::clone(&self.inner.identity)
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }
}

impl Default for Logger {
    /// Info threshold, writing to stderr
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("handler", &self.handler().name())
            .field("identity", &self.inner.identity)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use logging_facility::prelude::*;
///
/// let logger = Logger::builder()
///     .level(Level::Debug)
///     .handler(MemoryHandler::new())
///     .handler(DiscardHandler)
///     .env("prod")
///     .project("api")
///     .build();
/// ```
pub struct LoggerBuilder {
    level: Level,
    handlers: Vec<Arc<dyn Handler>>,
    clock: SharedClock,
    hooks: Option<Arc<HookRegistry>>,
    exit_handlers: Option<Arc<ExitRegistry>>,
    identity: Identity,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: Level::Info,
            handlers: Vec::new(),
            clock: system_clock(),
            hooks: None,
            exit_handlers: None,
            identity: Identity::default(),
        }
    }

    /// Set the threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Add a handler; several handlers are combined into a [`MultiHandler`]
    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Time source used to stamp records
    #[must_use = "builder methods return a new value"]
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Sanitize-hook registry; defaults to the process-wide one
    #[must_use = "builder methods return a new value"]
    pub fn hooks(mut self, hooks: Arc<HookRegistry>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Exit-handler registry; defaults to the process-wide one
    #[must_use = "builder methods return a new value"]
    pub fn exit_handlers(mut self, exit_handlers: Arc<ExitRegistry>) -> Self {
        self.exit_handlers = Some(exit_handlers);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn env(mut self, env: impl Into<String>) -> Self {
        self.identity.env = env.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.identity.project = project.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.identity.hostname = hostname.into();
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let mut handlers = self.handlers;
        let handler: Arc<dyn Handler> = if handlers.len() > 1 {
            Arc::new(MultiHandler::new(handlers))
        } else {
            handlers
                .pop()
                .unwrap_or_else(|| Arc::new(ConsoleHandler::new()))
        };

        Logger {
            inner: Arc::new(LoggerInner {
                level: RwLock::new(self.level),
                handler: RwLock::new(handler),
                clock: self.clock,
                hooks: self.hooks.unwrap_or_else(HookRegistry::global),
                exit_handlers: self.exit_handlers.unwrap_or_else(ExitRegistry::global),
                identity: Arc::new(self.identity),
                metrics: LoggerMetrics::new(),
            }),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
