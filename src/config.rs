//! Bootstrap a logger from a JSON document
//!
//! ```json
//! {
//!   "logLevel": "debug",
//!   "handlers": {
//!     "json": { "file": "stdout" },
//!     "logfmt": { "file": "/var/log/app.log", "level": "error" }
//!   },
//!   "context": { "service": "billing" },
//!   "env": "prod",
//!   "project": "api"
//! }
//! ```
//!
//! Handler `file` targets: empty or `"stdout"` for standard output,
//! `"stderr"` for standard error, anything else is a path opened for append.

use crate::core::record::local_hostname;
use crate::core::{
    Entry, ExitRegistry, Fields, Handler, Level, Logger, LoggerError, OutputFormat, Result,
    TimestampFormat,
};
use crate::global;
use crate::handlers::writer::is_stream_target;
use crate::handlers::{DiscardHandler, LevelHandler, WriterHandler};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Threshold level name
    pub log_level: String,
    pub handlers: HandlersConfig,
    /// Fields carried by every record of the returned root entry
    pub context: Fields,
    pub env: String,
    pub project: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: Level::Info.as_str().to_string(),
            handlers: HandlersConfig::default(),
            context: Fields::new(),
            env: String::new(),
            project: String::new(),
        }
    }
}

/// Handlers to build, keyed by kind
///
/// Several kinds together are fanned out through a multi handler. Without any
/// the logger writes through the console handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlersConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<SinkConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logfmt: Option<SinkConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<SinkConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discard: Option<DiscardConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SinkConfig {
    /// `""`, `"stdout"`, `"stderr"` or a file path
    pub file: String,
    /// Per-handler minimum level, on top of the logger threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_format: Option<TimestampFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscardConfig {}

impl LogConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LoggerError::config("log config", e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading log config", path.display().to_string(), e)
        })?;
        Self::from_json(&json)
    }

    /// Build the logger described by this configuration
    ///
    /// Invalid level names and files that cannot be opened fail here rather
    /// than on first use.
    ///
    /// File sinks register their flush with the process-wide exit registry.
    pub fn build_logger(&self) -> Result<Logger> {
        self.build_logger_with(ExitRegistry::global())
    }

    /// Build the logger against `exit_handlers` instead of the process-wide
    /// registry
    pub fn build_logger_with(&self, exit_handlers: Arc<ExitRegistry>) -> Result<Logger> {
        let level = Level::parse(&self.log_level)?;

        let mut builder = Logger::builder()
            .level(level)
            .env(self.env.clone())
            .project(self.project.clone())
            .hostname(local_hostname());
        for handler in self.handlers.build(&exit_handlers)? {
            builder = builder.shared_handler(handler);
        }

        Ok(builder.exit_handlers(exit_handlers).build())
    }

    /// Build the logger and return its root entry carrying `context`
    pub fn build(&self) -> Result<Entry> {
        Ok(self.build_logger()?.with_fields(self.context.clone()))
    }
}

impl HandlersConfig {
    fn build(&self, exit_handlers: &ExitRegistry) -> Result<Vec<Arc<dyn Handler>>> {
        let mut handlers = Vec::new();

        let sinks = [
            (&self.json, OutputFormat::Json),
            (&self.logfmt, OutputFormat::Logfmt),
            (&self.text, OutputFormat::Text),
        ];
        for (sink, format) in sinks {
            if let Some(sink) = sink {
                handlers.push(sink.build(format, exit_handlers)?);
            }
        }

        if self.discard.is_some() {
            handlers.push(Arc::new(DiscardHandler));
        }

        Ok(handlers)
    }
}

impl SinkConfig {
    fn build(
        &self,
        format: OutputFormat,
        exit_handlers: &ExitRegistry,
    ) -> Result<Arc<dyn Handler>> {
        let mut handler = WriterHandler::open(&self.file, format)?;
        if let Some(timestamp_format) = &self.timestamp_format {
            handler = handler.with_timestamp_format(timestamp_format.clone());
        }

        let handler = Arc::new(handler);
        if !is_stream_target(&self.file) {
            handler.flush_on_exit(exit_handlers);
        }

        let handler: Arc<dyn Handler> = match self.level {
            Some(level) => Arc::new(LevelHandler::new(level, handler)),
            None => handler,
        };
        Ok(handler)
    }
}

/// Build the configured logger, install it as the process default and
/// return its root entry
pub fn init(config: &LogConfig) -> Result<Entry> {
    let entry = config.build()?;
    global::set_logger(entry.logger().clone());
    entry.debug("Logger initialized");
    Ok(entry)
}
