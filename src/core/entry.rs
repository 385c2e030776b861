//! Context chains and record finalization
//!
//! An [`Entry`] is the open phase of a record: a persistent chain of field
//! containers bound to the [`Logger`] that will dispatch it. Attaching fields
//! returns a new entry and never touches the receiver, so a shared prefix can
//! be reused from many threads. Emitting at a severity finalizes the chain
//! into a [`Record`].

use super::fields::{FieldValue, Fielder, Fields};
use super::level::Level;
use super::logger::Logger;
use super::record::{Identity, Record};
use super::trace::Trace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

#[derive(Clone)]
pub struct Entry {
    logger: Logger,
    fields: Vec<Arc<Fields>>,
    identity: Arc<Identity>,
}

impl Entry {
    /// Empty chain bound to `logger`, inheriting its identity
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.clone(),
            fields: Vec::new(),
            identity: logger.identity(),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn with_fields<F: Fielder>(&self, fields: F) -> Entry {
        let mut chain = Vec::with_capacity(self.fields.len() + 1);
        chain.extend(self.fields.iter().cloned());
        chain.push(Arc::new(fields.fields()));
        Entry {
            logger: self.logger.clone(),
            fields: chain,
            identity: Arc::clone(&self.identity),
        }
    }

    #[must_use]
    pub fn with_field<K, V>(&self, key: K, value: V) -> Entry
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.with_fields(Fields::singleton(key, value))
    }

    /// Attach `err` under the `error` key.
    ///
    /// The value is a nested container with the error text as `message` and
    /// the calling location (`file:line:column`) as `trace`.
    #[must_use]
    #[track_caller]
    pub fn with_error<E>(&self, err: &E) -> Entry
    where
        E: std::error::Error + ?Sized,
    {
        self.attach_error(err, Location::caller())
    }

    /// Like [`with_error`](Self::with_error), then merges the error's own fields
    #[must_use]
    #[track_caller]
    pub fn with_error_fields<E>(&self, err: &E) -> Entry
    where
        E: std::error::Error + Fielder + ?Sized,
    {
        self.attach_error(err, Location::caller())
            .with_fields(err.fields())
    }

    pub(crate) fn attach_error<E>(&self, err: &E, location: &Location<'_>) -> Entry
    where
        E: std::error::Error + ?Sized,
    {
        let error = Fields::new()
            .with_field("message", err.to_string())
            .with_field("trace", location.to_string());
        self.with_field("error", error)
    }

    /// New chain root carrying `env`, `project` and the local host name.
    ///
    /// Pending fields are not carried over.
    #[must_use]
    pub fn with_env_project(&self, env: impl Into<String>, project: impl Into<String>) -> Entry {
        Entry {
            logger: self.logger.clone(),
            fields: Vec::new(),
            identity: Arc::new(Identity::new(env, project)),
        }
    }

    /// Collapse the pending containers into one, sanitizing each value
    fn merged_fields(&self) -> Fields {
        let hooks = self.logger.hooks();
        let mut merged = Fields::new();
        for fields in &self.fields {
            for (key, value) in fields.iter() {
                merged.insert(key.clone(), hooks.apply(key, value.clone()));
            }
        }
        merged
    }

    pub(crate) fn finalize(&self, level: Level, message: String) -> Record {
        Record {
            fields: self.merged_fields(),
            level,
            timestamp: self.logger.now(),
            message,
            env: self.identity.env.clone(),
            project: self.identity.project.clone(),
            hostname: self.identity.hostname.clone(),
        }
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.logger.log(level, self, message);
    }

    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        self.logger.log(level, self, args.to_string());
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn notice(&self, message: impl Into<String>) {
        self.log(Level::Notice, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.log(Level::Critical, message);
    }

    pub fn alert(&self, message: impl Into<String>) {
        self.log(Level::Alert, message);
    }

    pub fn fatal(&self, message: impl Into<String>) {
        self.log(Level::Fatal, message);
    }

    pub fn emergency(&self, message: impl Into<String>) {
        self.log(Level::Emergency, message);
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

    /// Emit `message` at Info now and return a guard that emits the
    /// completion record with its `duration` when stopped or dropped.
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) -> Trace {
        let message = message.into();
        self.info(message.clone());
        Trace::start(self.clone(), message, Location::caller())
    }

    /// Trace `operation` and complete at Error when it returns `Err`.
    ///
    /// Use this rather than a bare [`Entry::trace`] guard when the traced code
    /// returns early with `?`.
    #[track_caller]
    pub fn trace_result<T, E, F>(&self, message: impl Into<String>, operation: F) -> Result<T, E>
    where
        E: std::error::Error,
        F: FnOnce() -> Result<T, E>,
    {
        self.trace(message).run(operation)
    }

    /// Run the logger's exit handlers and terminate the process
    pub fn exit(&self, code: i32) -> ! {
        self.logger.exit(code)
    }

    pub fn add_exit_handler<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.logger.add_exit_handler(callback);
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("fields", &self.fields)
            .field("identity", &self.identity)
            .finish()
    }
}
