//! Severity levels

use super::error::LoggerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Severity of a record.
///
/// Levels compare by numeric value. `Fatal` and `Emergency` share the value
/// 600 but keep separate names; ordering breaks that tie so `Fatal < Emergency`,
/// while threshold checks (see [`Level::enables`]) only look at the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    Debug,
    #[default]
    Info,
    Notice,
    Warn,
    Error,
    Critical,
    Alert,
    Fatal,
    Emergency,
}

impl Level {
    pub const ALL: [Level; 9] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warn,
        Level::Error,
        Level::Critical,
        Level::Alert,
        Level::Fatal,
        Level::Emergency,
    ];

    pub const fn as_i32(self) -> i32 {
        match self {
            Level::Debug => 100,
            Level::Info => 200,
            Level::Notice => 250,
            Level::Warn => 300,
            Level::Error => 400,
            Level::Critical => 500,
            Level::Alert => 550,
            Level::Fatal => 600,
            Level::Emergency => 600,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Notice => "notice",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Critical => "critical",
            Level::Alert => "alert",
            Level::Fatal => "fatal",
            Level::Emergency => "emergency",
        }
    }

    /// Case-insensitive lookup by name
    pub fn parse(name: &str) -> Result<Self, LoggerError> {
        match name.to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "notice" => Ok(Level::Notice),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "critical" => Ok(Level::Critical),
            "alert" => Ok(Level::Alert),
            "fatal" => Ok(Level::Fatal),
            "emergency" => Ok(Level::Emergency),
            _ => Err(LoggerError::invalid_level(name)),
        }
    }

    /// Parse a level name, panicking when it is unknown.
    ///
    /// Meant for startup configuration only.
    pub fn must_parse(name: &str) -> Self {
        match Self::parse(name) {
            Ok(level) => level,
            Err(_) => panic!("invalid log level"),
        }
    }

    /// Whether a record at `self` passes a `threshold`
    #[inline]
    pub const fn enables(self, threshold: Level) -> bool {
        self.as_i32() >= threshold.as_i32()
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug => BrightBlack,
            Level::Info => Blue,
            Level::Notice => Cyan,
            Level::Warn => Yellow,
            Level::Error => Red,
            Level::Critical | Level::Alert => BrightRed,
            Level::Fatal | Level::Emergency => Magenta,
        }
    }

    fn rank(self) -> (i32, u8) {
        (self.as_i32(), self as u8)
    }

    pub(crate) fn serialize_code<S: Serializer>(
        level: &Level,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(level.as_i32())
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::parse(s)
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Level::parse(&name).map_err(serde::de::Error::custom)
    }
}
