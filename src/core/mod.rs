//! Core logger types and traits

pub mod entry;
pub mod error;
pub mod exit;
pub mod fields;
pub mod handler;
pub mod hooks;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod record;
pub mod timestamp;
pub mod trace;

pub use entry::Entry;
pub use error::{LoggerError, Result};
pub use exit::{ExitHandlerFailure, ExitRegistry};
pub use fields::{FieldValue, Fielder, Fields};
pub use handler::{Handler, HandlerFunc, MultiHandler};
pub use hooks::{HookRegistry, SanitizeHook};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use record::{Identity, Record};
pub use timestamp::{Clock, FixedClock, SystemClock, TimestampFormat};
pub use trace::Trace;
