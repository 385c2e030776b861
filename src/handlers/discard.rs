//! Handler that drops everything

use crate::core::{Handler, Record, Result};

/// Accepts and drops every record
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardHandler;

impl Handler for DiscardHandler {
    fn handle(&self, _record: &Record) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;

    #[test]
    fn test_discard() {
        let handler = DiscardHandler;
        assert!(handler.handle(&Record::new(Level::Emergency, "gone")).is_ok());
        assert!(handler.flush().is_ok());
    }
}
