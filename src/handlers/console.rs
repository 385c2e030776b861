//! Console handler, the default sink of a freshly built logger

use crate::core::{Handler, OutputFormat, Record, Result, TimestampFormat};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Writes one line per record to stderr
///
/// Text lines carry a colored level name when the `console` feature is on.
pub struct ConsoleHandler {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Set the output format for this handler
    ///
    /// # Example
    ///
    /// ```
    /// use logging_facility::handlers::ConsoleHandler;
    /// use logging_facility::OutputFormat;
    ///
    /// let handler = ConsoleHandler::new()
    ///     .with_output_format(OutputFormat::Logfmt);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn render(&self, record: &Record) -> String {
        match self.output_format {
            OutputFormat::Text if self.use_colors => self.format_colored(record),
            format => format.format(record, &self.timestamp_format),
        }
    }

    #[cfg(feature = "console")]
    fn format_colored(&self, record: &Record) -> String {
        let plain = OutputFormat::Text.format(record, &self.timestamp_format);
        let timestamp = self.timestamp_format.format(&record.timestamp);
        let level = format!("{:<9}", record.level_name().to_uppercase());

        // Swap the padded level column for its colored rendition
        let rest = &plain[timestamp.len() + 1 + level.len()..];
        format!(
            "{} {}{}",
            timestamp,
            level.color(record.level.color_code()),
            rest
        )
    }

    #[cfg(not(feature = "console"))]
    fn format_colored(&self, record: &Record) -> String {
        OutputFormat::Text.format(record, &self.timestamp_format)
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for ConsoleHandler {
    fn handle(&self, record: &Record) -> Result<()> {
        let line = self.render(record);
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "{}", line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
