//! Per-handler level filtering

use crate::core::{Handler, Level, Record, Result};

/// Forwards records at or above `min_level` to the wrapped handler
///
/// Lets a multi handler send everything to one sink and only errors to
/// another, independently of the logger threshold.
///
/// # Example
///
/// ```
/// use logging_facility::prelude::*;
/// use std::sync::Arc;
///
/// let errors = Arc::new(MemoryHandler::new());
/// let logger = Logger::builder()
///     .level(Level::Debug)
///     .handler(DiscardHandler)
///     .handler(LevelHandler::new(Level::Error, Arc::clone(&errors)))
///     .build();
///
/// logger.info("ignored");
/// logger.error("kept");
/// assert_eq!(errors.len(), 1);
/// ```
pub struct LevelHandler<H> {
    min_level: Level,
    inner: H,
}

impl<H: Handler> LevelHandler<H> {
    pub fn new(min_level: Level, inner: H) -> Self {
        Self { min_level, inner }
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: Handler> Handler for LevelHandler<H> {
    fn handle(&self, record: &Record) -> Result<()> {
        if record.level.enables(self.min_level) {
            self.inner.handle(record)
        } else {
            Ok(())
        }
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::MemoryHandler;

    #[test]
    fn test_filters_below_minimum() {
        let handler = LevelHandler::new(Level::Warn, MemoryHandler::new());

        for level in Level::ALL {
            handler.handle(&Record::new(level, level.as_str())).unwrap();
        }

        let messages = handler.inner().messages();
        assert_eq!(
            messages,
            vec!["warn", "error", "critical", "alert", "fatal", "emergency"]
        );
    }

    #[test]
    fn test_fatal_minimum_admits_emergency() {
        let handler = LevelHandler::new(Level::Fatal, MemoryHandler::new());
        handler.handle(&Record::new(Level::Emergency, "e")).unwrap();
        assert_eq!(handler.inner().len(), 1);
        assert_eq!(handler.name(), "memory");
    }
}
