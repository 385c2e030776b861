//! Handler trait for record sinks

use super::{
    error::{LoggerError, Result},
    record::Record,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Destination for finalized records.
///
/// `handle` may be called concurrently from many threads; implementations
/// that buffer must guard their own state. A handler must not modify the
/// record and must not block the caller indefinitely.
pub trait Handler: Send + Sync {
    fn handle(&self, record: &Record) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "handler"
    }
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn handle(&self, record: &Record) -> Result<()> {
        (**self).handle(record)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn handle(&self, record: &Record) -> Result<()> {
        (**self).handle(record)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Adapter turning a closure into a [`Handler`]
pub struct HandlerFunc<F> {
    func: F,
}

impl<F> HandlerFunc<F>
where
    F: Fn(&Record) -> Result<()> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Handler for HandlerFunc<F>
where
    F: Fn(&Record) -> Result<()> + Send + Sync,
{
    fn handle(&self, record: &Record) -> Result<()> {
        (self.func)(record)
    }

    fn name(&self) -> &str {
        "func"
    }
}

/// Invoke `handler` with panic isolation, turning a panic into an error
pub(crate) fn handle_isolated(handler: &dyn Handler, record: &Record) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(|| handler.handle(record))) {
        Ok(result) => result,
        Err(payload) => Err(LoggerError::handler_panicked(
            handler.name(),
            payload.as_ref(),
        )),
    }
}

/// Fans every record out to an ordered list of handlers.
///
/// Each sub-handler runs even when an earlier one fails or panics. All
/// failures are collected into a single [`LoggerError::Delivery`].
#[derive(Default)]
pub struct MultiHandler {
    handlers: Vec<Arc<dyn Handler>>,
}

impl MultiHandler {
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self { handlers }
    }

    #[must_use]
    pub fn with<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    pub fn push(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn collect_errors<F>(&self, mut op: F) -> Result<()>
    where
        F: FnMut(&dyn Handler) -> Result<()>,
    {
        let errors: Vec<String> = self
            .handlers
            .iter()
            .filter_map(|handler| op(handler.as_ref()).err())
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::Delivery {
                failed: errors.len(),
                total: self.handlers.len(),
                errors,
            })
        }
    }
}

impl Handler for MultiHandler {
    fn handle(&self, record: &Record) -> Result<()> {
        self.collect_errors(|handler| handle_isolated(handler, record))
    }

    fn flush(&self) -> Result<()> {
        self.collect_errors(|handler| {
            match catch_unwind(AssertUnwindSafe(|| handler.flush())) {
                Ok(result) => result,
                Err(payload) => Err(LoggerError::handler_panicked(
                    handler.name(),
                    payload.as_ref(),
                )),
            }
        })
    }

    fn name(&self) -> &str {
        "multi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recording {
        messages: Mutex<Vec<String>>,
    }

    impl Handler for Recording {
        fn handle(&self, record: &Record) -> Result<()> {
            self.messages.lock().push(record.message.clone());
            Ok(())
        }
    }

    struct Failing;

    impl Handler for Failing {
        fn handle(&self, _record: &Record) -> Result<()> {
            Err(LoggerError::handler("failing", "unreachable sink"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct Panicking;

    impl Handler for Panicking {
        fn handle(&self, _record: &Record) -> Result<()> {
            panic!("sink exploded");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_handler_func() {
        let handler = HandlerFunc::new(|record: &Record| {
            assert_eq!(record.message, "hello");
            Ok(())
        });
        assert!(handler.handle(&Record::new(Level::Info, "hello")).is_ok());
    }

    #[test]
    fn test_multi_delivers_to_all() {
        let a = Arc::new(Recording::default());
        let b = Arc::new(Recording::default());
        let multi = MultiHandler::new(vec![a.clone(), b.clone()]);

        multi.handle(&Record::new(Level::Info, "hello")).unwrap();

        assert_eq!(*a.messages.lock(), vec!["hello"]);
        assert_eq!(*b.messages.lock(), vec!["hello"]);
    }

    #[test]
    fn test_multi_tolerates_failures() {
        let ok = Arc::new(Recording::default());
        let multi = MultiHandler::default()
            .with(Failing)
            .with(Panicking)
            .with(Arc::clone(&ok));

        let err = multi.handle(&Record::new(Level::Error, "boom")).unwrap_err();

        assert_eq!(*ok.messages.lock(), vec!["boom"]);
        match err {
            LoggerError::Delivery {
                failed,
                total,
                errors,
            } => {
                assert_eq!(failed, 2);
                assert_eq!(total, 3);
                assert!(errors[0].contains("unreachable sink"));
                assert!(errors[1].contains("sink exploded"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_multi() {
        let multi = MultiHandler::default();
        assert!(multi.is_empty());
        assert!(multi.handle(&Record::new(Level::Info, "x")).is_ok());
        assert!(multi.flush().is_ok());
    }
}
