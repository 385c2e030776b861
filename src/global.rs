//! Process-wide default logger
//!
//! The free functions here log through one shared [`Logger`] so code can emit
//! records without plumbing a logger around. Out of the box it writes text
//! lines to stderr at Info level. Install a configured logger once at startup
//! with [`set_logger`] (or [`config::init`](crate::config::init)); code that
//! needs isolation, tests in particular, should hold its own `Logger` instead.
//!
//! # Example
//!
//! ```
//! use logging_facility::global;
//!
//! global::with_field("user", "tj").info("signed in");
//! global::warnf(format_args!("{} retries left", 2));
//! ```

use crate::core::{Entry, FieldValue, Fielder, Handler, Level, Logger, Result, Trace};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::panic::Location;

static DEFAULT_LOGGER: Lazy<RwLock<Logger>> = Lazy::new(|| RwLock::new(Logger::default()));

/// Handle to the current default logger
pub fn logger() -> Logger {
    DEFAULT_LOGGER.read().clone()
}

/// Replace the default logger, returning the previous one
pub fn set_logger(logger: Logger) -> Logger {
    std::mem::replace(&mut *DEFAULT_LOGGER.write(), logger)
}

pub fn set_handler<H: Handler + 'static>(handler: H) {
    logger().set_handler(handler);
}

pub fn set_level(level: Level) {
    logger().set_level(level);
}

pub fn set_level_from_str(name: &str) -> Result<()> {
    logger().set_level_from_str(name)
}

pub fn level() -> Level {
    logger().level()
}

pub fn entry() -> Entry {
    logger().entry()
}

pub fn with_fields<F: Fielder>(fields: F) -> Entry {
    logger().with_fields(fields)
}

pub fn with_field<K, V>(key: K, value: V) -> Entry
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    logger().with_field(key, value)
}

#[track_caller]
pub fn with_error<E>(err: &E) -> Entry
where
    E: std::error::Error + ?Sized,
{
    logger().entry().attach_error(err, Location::caller())
}

pub fn with_env_project(env: impl Into<String>, project: impl Into<String>) -> Entry {
    logger().with_env_project(env, project)
}

pub fn log(level: Level, message: impl Into<String>) {
    logger().entry().log(level, message);
}

pub fn log_fmt(level: Level, args: fmt::Arguments<'_>) {
    logger().log_fmt(level, args);
}

pub fn debug(message: impl Into<String>) {
    log(Level::Debug, message);
}

pub fn info(message: impl Into<String>) {
    log(Level::Info, message);
}

pub fn notice(message: impl Into<String>) {
    log(Level::Notice, message);
}

pub fn warn(message: impl Into<String>) {
    log(Level::Warn, message);
}

pub fn error(message: impl Into<String>) {
    log(Level::Error, message);
}

pub fn critical(message: impl Into<String>) {
    log(Level::Critical, message);
}

pub fn alert(message: impl Into<String>) {
    log(Level::Alert, message);
}

pub fn fatal(message: impl Into<String>) {
    log(Level::Fatal, message);
}

pub fn emergency(message: impl Into<String>) {
    log(Level::Emergency, message);
}

pub fn debugf(args: fmt::Arguments<'_>) {
    log_fmt(Level::Debug, args);
}

pub fn infof(args: fmt::Arguments<'_>) {
    log_fmt(Level::Info, args);
}

pub fn noticef(args: fmt::Arguments<'_>) {
    log_fmt(Level::Notice, args);
}

pub fn warnf(args: fmt::Arguments<'_>) {
    log_fmt(Level::Warn, args);
}

pub fn errorf(args: fmt::Arguments<'_>) {
    log_fmt(Level::Error, args);
}

pub fn criticalf(args: fmt::Arguments<'_>) {
    log_fmt(Level::Critical, args);
}

pub fn alertf(args: fmt::Arguments<'_>) {
    log_fmt(Level::Alert, args);
}

pub fn fatalf(args: fmt::Arguments<'_>) {
    log_fmt(Level::Fatal, args);
}

pub fn emergencyf(args: fmt::Arguments<'_>) {
    log_fmt(Level::Emergency, args);
}

#[track_caller]
pub fn trace(message: impl Into<String>) -> Trace {
    logger().entry().trace(message)
}

#[track_caller]
pub fn trace_result<T, E, F>(message: impl Into<String>, operation: F) -> std::result::Result<T, E>
where
    E: std::error::Error,
    F: FnOnce() -> std::result::Result<T, E>,
{
    logger().entry().trace_result(message, operation)
}

pub fn flush() -> Result<()> {
    logger().flush()
}

pub fn add_exit_handler<F>(callback: F)
where
    F: Fn() + Send + Sync + 'static,
{
    logger().add_exit_handler(callback);
}

/// Run the default logger's exit handlers, then terminate with `code`
pub fn exit(code: i32) -> ! {
    logger().exit(code)
}
