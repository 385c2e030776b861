//! Line-oriented handler over any `Write`

use crate::core::{
    ExitRegistry, Handler, LoggerError, OutputFormat, Record, Result, TimestampFormat,
};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// Boxed destination produced by [`WriterHandler::open`]
pub type BoxedWriter = Box<dyn Write + Send>;

/// Encodes each record as one line and writes it to the wrapped writer
///
/// Concurrent calls are serialized on an internal lock so lines never
/// interleave.
///
/// # Example
///
/// ```
/// use logging_facility::prelude::*;
///
/// let handler = WriterHandler::logfmt(Vec::new());
/// let logger = Logger::builder()
///     .handler(handler)
///     .clock(FixedClock::epoch())
///     .build();
/// logger.info("hello");
/// ```
pub struct WriterHandler<W: Write + Send> {
    writer: Mutex<W>,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
}

impl<W: Write + Send> WriterHandler<W> {
    pub fn new(writer: W, output_format: OutputFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            output_format,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// One JSON object per line
    pub fn json(writer: W) -> Self {
        Self::new(writer, OutputFormat::Json)
    }

    /// `key=value` pairs, one record per line
    pub fn logfmt(writer: W) -> Self {
        Self::new(writer, OutputFormat::Logfmt)
    }

    /// Plain text lines
    pub fn text(writer: W) -> Self {
        Self::new(writer, OutputFormat::Text)
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Run `f` against the underlying writer while holding the lock
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.writer.lock())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send + 'static> WriterHandler<W> {
    /// Flush buffered lines when `registry` runs its exit handlers
    ///
    /// File targets from [`WriterHandler::open`] are buffered; without this
    /// a handler held by a static loses its tail on [`ExitRegistry::exit`].
    pub fn flush_on_exit(self: &Arc<Self>, registry: &ExitRegistry) {
        let handler = Arc::clone(self);
        registry.register(move || {
            if let Err(e) = handler.flush() {
                eprintln!(
                    "[LOGGER ERROR] Failed to flush '{}' on exit: {}",
                    handler.name(),
                    e
                );
            }
        });
    }
}

/// Whether `target` names a standard stream rather than a file
pub fn is_stream_target(target: &str) -> bool {
    matches!(target, "" | "stdout" | "stderr")
}

impl WriterHandler<BoxedWriter> {
    /// Open a handler on a named target
    ///
    /// An empty target or `"stdout"` selects standard output, `"stderr"`
    /// standard error. Anything else is a file path, created if missing and
    /// appended to otherwise.
    pub fn open(target: &str, output_format: OutputFormat) -> Result<Self> {
        let writer: BoxedWriter = match target {
            "" | "stdout" => Box::new(io::stdout()),
            "stderr" => Box::new(io::stderr()),
            path => Box::new(BufWriter::new(open_append(Path::new(path))?)),
        };
        Ok(Self::new(writer, output_format))
    }
}

fn open_append(path: &Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggerError::io_operation("open log file", path.display().to_string(), e))
}

impl<W: Write + Send> Handler for WriterHandler<W> {
    fn handle(&self, record: &Record) -> Result<()> {
        let mut line = self.output_format.format(record, &self.timestamp_format);
        line.push('\n');

        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        match self.output_format {
            OutputFormat::Json => "json",
            OutputFormat::Logfmt => "logfmt",
            OutputFormat::Text => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fields, Level};
    use chrono::{DateTime, Utc};
    use std::fs;
    use tempfile::tempdir;

    fn record(message: &str) -> Record {
        Record::new(Level::Info, message)
            .with_timestamp(DateTime::<Utc>::UNIX_EPOCH)
            .with_fields(Fields::new().with_field("user", "tj").with_field("id", "123"))
    }

    fn output(handler: &WriterHandler<Vec<u8>>) -> String {
        handler.with_writer(|buf| String::from_utf8_lossy(buf).into_owned())
    }

    #[test]
    fn test_json_lines() {
        let handler = WriterHandler::json(Vec::new());
        handler.handle(&record("hello")).unwrap();
        handler.handle(&record("world")).unwrap();

        let text = output(&handler);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"context":{"id":"123","user":"tj"},"level":200,"level_name":"info","timestamp":"1970-01-01T00:00:00Z","message":"hello","env":"","project":"","hostname":""}"#
        );
        assert_eq!(handler.name(), "json");
    }

    #[test]
    fn test_logfmt_lines() {
        let handler = WriterHandler::logfmt(Vec::new());
        handler.handle(&record("hello")).unwrap();

        assert_eq!(
            output(&handler),
            "timestamp=1970-01-01T00:00:00Z level=200 message=hello id=123 user=tj\n"
        );
        assert_eq!(handler.name(), "logfmt");
    }

    #[test]
    fn test_into_inner() {
        let handler = WriterHandler::text(Vec::new());
        handler.handle(&record("x")).unwrap();
        let bytes = handler.into_inner();
        assert!(String::from_utf8(bytes).unwrap().contains(" x id=123"));
    }

    #[test]
    fn test_open_file_appends() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");

        {
            let handler = WriterHandler::open(path.to_str().unwrap(), OutputFormat::Json)?;
            handler.handle(&record("first"))?;
        }
        {
            let handler = WriterHandler::open(path.to_str().unwrap(), OutputFormat::Json)?;
            handler.handle(&record("second"))?;
            handler.flush()?;
        }

        let content = fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line)?;
            assert_eq!(parsed["level"], 200);
        }
        Ok(())
    }

    #[test]
    fn test_flush_on_exit_writes_buffered_lines() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("exit.log");
        let registry = ExitRegistry::new();

        let handler = Arc::new(WriterHandler::open(
            path.to_str().unwrap(),
            OutputFormat::Logfmt,
        )?);
        handler.flush_on_exit(&registry);
        handler.handle(&record("buffered"))?;

        assert!(registry.run_all().is_empty());
        let content = fs::read_to_string(&path)?;
        assert!(content.contains("message=buffered"));
        Ok(())
    }

    #[test]
    fn test_stream_targets() {
        assert!(is_stream_target(""));
        assert!(is_stream_target("stdout"));
        assert!(is_stream_target("stderr"));
        assert!(!is_stream_target("/var/log/app.log"));
    }

    #[test]
    fn test_open_streams() {
        assert!(WriterHandler::open("", OutputFormat::Text).is_ok());
        assert!(WriterHandler::open("stdout", OutputFormat::Text).is_ok());
        assert!(WriterHandler::open("stderr", OutputFormat::Text).is_ok());
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");
        let err = WriterHandler::open(path.to_str().unwrap(), OutputFormat::Logfmt).err();
        assert!(matches!(err, Some(LoggerError::IoOperation { .. })));
    }
}
