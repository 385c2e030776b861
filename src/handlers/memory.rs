//! In-memory handler for tests and inspection

use crate::core::{Handler, Record, Result};
use parking_lot::Mutex;

/// Keeps every record it receives, in arrival order
#[derive(Debug, Default)]
pub struct MemoryHandler {
    records: Mutex<Vec<Record>>,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records received so far
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Remove and return every stored record
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.records.lock())
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Handler for MemoryHandler {
    fn handle(&self, record: &Record) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;

    #[test]
    fn test_stores_in_order() {
        let handler = MemoryHandler::new();
        assert!(handler.is_empty());

        handler.handle(&Record::new(Level::Info, "one")).unwrap();
        handler.handle(&Record::new(Level::Warn, "two")).unwrap();

        assert_eq!(handler.len(), 2);
        assert_eq!(handler.messages(), vec!["one", "two"]);
        assert_eq!(handler.records()[1].level, Level::Warn);
    }

    #[test]
    fn test_take_and_clear() {
        let handler = MemoryHandler::new();
        handler.handle(&Record::new(Level::Info, "one")).unwrap();

        assert_eq!(handler.take().len(), 1);
        assert!(handler.is_empty());

        handler.handle(&Record::new(Level::Info, "two")).unwrap();
        handler.clear();
        assert_eq!(handler.len(), 0);
    }
}
