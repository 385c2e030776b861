//! Finalized log records

use super::fields::Fields;
use super::level::Level;
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Environment, project and host a record originates from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub env: String,
    pub project: String,
    pub hostname: String,
}

impl Identity {
    pub fn new(env: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            project: project.into(),
            hostname: local_hostname(),
        }
    }
}

/// Best-effort host name; empty when it cannot be resolved
pub fn local_hostname() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Immutable snapshot handed to handlers.
///
/// Serializes as
/// `{"context":{..},"level":200,"level_name":"info","timestamp":"..","message":"..","env":"..","project":"..","hostname":".."}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: Fields,
    pub level: Level,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub env: String,
    pub project: String,
    pub hostname: String,
}

impl Record {
    /// A record without fields or identity, stamped with the current time
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            fields: Fields::new(),
            level,
            timestamp: Utc::now(),
            message: message.into(),
            env: String::new(),
            project: String::new(),
            hostname: String::new(),
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity: &Identity) -> Self {
        self.env = identity.env.clone();
        self.project = identity.project.clone();
        self.hostname = identity.hostname.clone();
        self
    }

    pub fn level_code(&self) -> i32 {
        self.level.as_i32()
    }

    pub fn level_name(&self) -> &'static str {
        self.level.as_str()
    }

    /// Serialize to a single-line JSON object
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Code<'a>(&'a Level);

        impl Serialize for Code<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                Level::serialize_code(self.0, serializer)
            }
        }

        let mut state = serializer.serialize_struct("Record", 8)?;
        state.serialize_field("context", &self.fields)?;
        state.serialize_field("level", &Code(&self.level))?;
        state.serialize_field("level_name", self.level.as_str())?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("env", &self.env)?;
        state.serialize_field("project", &self.project)?;
        state.serialize_field("hostname", &self.hostname)?;
        state.end()
    }
}
