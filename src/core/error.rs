//! Error types for the logging facility

use std::any::Any;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Unknown level name
    #[error("invalid level: '{name}'")]
    InvalidLevel { name: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A single handler failed to deliver a record
    #[error("Handler '{handler}' failed: {message}")]
    Handler { handler: String, message: String },

    /// A handler panicked while delivering a record
    #[error("Handler '{handler}' panicked: {message}")]
    HandlerPanicked { handler: String, message: String },

    /// Some sub-handlers of a multi handler failed
    #[error("Delivery failed for {failed}/{total} handlers: {}", errors.join("; "))]
    Delivery {
        failed: usize,
        total: usize,
        errors: Vec<String>,
    },

    /// Handler no longer accepts records
    #[error("Handler '{handler}' is closed")]
    HandlerClosed { handler: String },

    /// Bounded queue full
    #[error("Handler queue full ({capacity} records buffered)")]
    QueueFull { capacity: usize },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(name: impl Into<String>) -> Self {
        LoggerError::InvalidLevel { name: name.into() }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a handler delivery error
    pub fn handler(handler: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Handler {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Create a handler panic error from a caught panic payload
    pub fn handler_panicked(handler: impl Into<String>, payload: &(dyn Any + Send)) -> Self {
        LoggerError::HandlerPanicked {
            handler: handler.into(),
            message: panic_message(payload),
        }
    }

    /// Create a closed handler error
    pub fn handler_closed(handler: impl Into<String>) -> Self {
        LoggerError::HandlerClosed {
            handler: handler.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

/// Render a caught panic payload as text
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
