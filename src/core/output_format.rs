//! Line encodings for records
//!
//! Provides the encodings used by the writer-backed handlers:
//! - Text: human-readable line
//! - Json: one JSON object per line
//! - Logfmt: key=value pairs

use super::fields::FieldValue;
use super::record::Record;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Output format for records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `1970-01-01T00:00:00Z INFO      hello id=123 user=tj`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"context":{"user":"tj"},"level":200,"level_name":"info",...}`
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `timestamp=1970-01-01T00:00:00Z level=200 message=hello user=tj`
    Logfmt,
}

impl OutputFormat {
    /// Encode a record as a single line, without the trailing newline
    pub fn format(&self, record: &Record, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => format_text(record, timestamp_format),
            OutputFormat::Json => format_json(record),
            OutputFormat::Logfmt => format_logfmt(record, timestamp_format),
        }
    }
}

fn format_text(record: &Record, timestamp_format: &TimestampFormat) -> String {
    let base = format!(
        "{} {:<9} {}",
        timestamp_format.format(&record.timestamp),
        record.level_name().to_uppercase(),
        escape_control(&record.message)
    );

    if record.fields.is_empty() {
        base
    } else {
        format!("{} {}", base, format_pairs(record))
    }
}

fn format_json(record: &Record) -> String {
    // Serializing a record cannot fail: every key is a string and every value
    // has a JSON representation.
    record.to_json().unwrap_or_default()
}

fn format_logfmt(record: &Record, timestamp_format: &TimestampFormat) -> String {
    let mut parts = vec![
        format!(
            "timestamp={}",
            escape_logfmt_value(&timestamp_format.format(&record.timestamp))
        ),
        format!("level={}", record.level_code()),
        format!("message={}", escape_logfmt_value(&record.message)),
    ];

    for (key, value) in [
        ("env", &record.env),
        ("project", &record.project),
        ("hostname", &record.hostname),
    ] {
        if !value.is_empty() {
            parts.push(format!("{}={}", key, escape_logfmt_value(value)));
        }
    }

    if !record.fields.is_empty() {
        parts.push(format_pairs(record));
    }

    parts.join(" ")
}

/// Sorted `key=value` pairs for the record's fields
fn format_pairs(record: &Record) -> String {
    record
        .fields
        .sorted()
        .into_iter()
        .map(|(key, value)| format!("{}={}", escape_logfmt_key(key), format_value(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::String(s) => escape_logfmt_value(s),
        FieldValue::Map(map) => escape_logfmt_value(&map.to_json_value().to_string()),
        other => escape_logfmt_value(&other.to_string()),
    }
}

/// Escape a logfmt key (remove spaces and special chars)
///
/// A key with nothing left after filtering becomes `_`.
fn escape_logfmt_key(key: &str) -> String {
    let escaped: String = key
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect();
    if escaped.is_empty() {
        "_".to_string()
    } else {
        escaped
    }
}

/// Escape a logfmt value (quote if it contains spaces, quotes, `=` or control chars)
fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_string();
    }
    if value
        .chars()
        .any(|c| c == ' ' || c == '"' || c == '=' || c.is_control())
    {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

/// Quote a logfmt value
fn quote_logfmt_value(value: &str) -> String {
    format!(
        "\"{}\"",
        escape_control(&value.replace('\\', "\\\\").replace('"', "\\\""))
    )
}

/// Keep a record on one line
fn escape_control(value: &str) -> String {
    value
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
