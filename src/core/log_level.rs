//! Log level definitions and the process-wide level name registry
//!
//! Levels are plain integers ordered numerically, so a level registered at
//! runtime compares correctly against the built-in ones. `VERBOSE` sits
//! between `DEBUG` and `INFO` and is registered lazily, once per process.

use super::error::{LoggerError, Result};
use parking_lot::RwLock;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Once, OnceLock};

/// Highest `-v` count that still maps to `DEBUG`; anything above is
/// treated as an unrecognized verbosity.
pub const MAX_VERBOSITY: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogLevel(u8);

impl LogLevel {
    pub const NOTSET: LogLevel = LogLevel(0);
    pub const DEBUG: LogLevel = LogLevel(10);
    pub const VERBOSE: LogLevel = LogLevel(15);
    pub const INFO: LogLevel = LogLevel(20);
    pub const WARN: LogLevel = LogLevel(30);
    pub const ERROR: LogLevel = LogLevel(40);
    pub const FATAL: LogLevel = LogLevel(50);

    /// Wrap a raw severity value. Any value is a valid level; it only has a
    /// name once registered.
    pub const fn new(value: u8) -> Self {
        LogLevel(value)
    }

    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Level name as it appears in output (`Level N` for unregistered values)
    pub fn name(&self) -> Cow<'static, str> {
        match *self {
            LogLevel::NOTSET => Cow::Borrowed("NOTSET"),
            LogLevel::DEBUG => Cow::Borrowed("DEBUG"),
            LogLevel::VERBOSE => Cow::Borrowed("VERBOSE"),
            LogLevel::INFO => Cow::Borrowed("INFO"),
            LogLevel::WARN => Cow::Borrowed("WARNING"),
            LogLevel::ERROR => Cow::Borrowed("ERROR"),
            LogLevel::FATAL => Cow::Borrowed("FATAL"),
            other => match level_name(other.0) {
                Some(name) => Cow::Owned(name),
                None => Cow::Owned(format!("Level {}", other.0)),
            },
        }
    }

    /// Whether this value has a registered name
    pub fn is_registered(&self) -> bool {
        level_name(self.0).is_some()
    }

    /// Map a user-facing verbosity count to a threshold.
    ///
    /// 0 → INFO, 1 → VERBOSE, 2..=[`MAX_VERBOSITY`] → DEBUG. Anything else
    /// falls back to INFO rather than failing.
    pub fn from_verbosity(verbosity: i64) -> Self {
        match verbosity {
            0 => LogLevel::INFO,
            1 => LogLevel::VERBOSE,
            2..=MAX_VERBOSITY => LogLevel::DEBUG,
            _ => LogLevel::INFO,
        }
    }

    /// Parse a level name, falling back to WARNING for anything unknown
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or(LogLevel::WARN)
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self.0 {
            0..=10 => Blue,
            11..=19 => Cyan,
            20..=29 => Green,
            30..=39 => Yellow,
            40..=49 => Red,
            _ => BrightRed,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::INFO
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u8>() {
            return Ok(LogLevel(value));
        }

        let upper = trimmed.to_uppercase();
        let canonical = match upper.as_str() {
            "WARN" => "WARNING",
            "CRITICAL" => "FATAL",
            other => other,
        };

        level_value(canonical)
            .map(LogLevel)
            .ok_or_else(|| format!("Invalid log level: '{}'", s))
    }
}

/// Resolve a verbosity count; the single mapping used by configuration
pub fn resolve(verbosity: i64) -> LogLevel {
    LogLevel::from_verbosity(verbosity)
}

/// Resolve a level name (`"debug"`, `"warning"`, ...), defaulting to WARNING
pub fn resolve_name(name: &str) -> LogLevel {
    LogLevel::from_name_or_default(name)
}

fn table() -> &'static RwLock<BTreeMap<u8, String>> {
    static TABLE: OnceLock<RwLock<BTreeMap<u8, String>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let builtin = [
            (LogLevel::NOTSET, "NOTSET"),
            (LogLevel::DEBUG, "DEBUG"),
            (LogLevel::INFO, "INFO"),
            (LogLevel::WARN, "WARNING"),
            (LogLevel::ERROR, "ERROR"),
            (LogLevel::FATAL, "FATAL"),
        ];
        RwLock::new(
            builtin
                .iter()
                .map(|(level, name)| (level.0, (*name).to_string()))
                .collect(),
        )
    })
}

/// Register the VERBOSE level. Runs at most once per process.
pub fn register_verbose() {
    static VERBOSE_REGISTERED: Once = Once::new();
    VERBOSE_REGISTERED.call_once(|| {
        // The slot is reserved for VERBOSE; a conflicting earlier registration wins.
        if let Err(e) = insert_level(LogLevel::VERBOSE.0, "VERBOSE") {
            eprintln!("[LOGGER WARNING] {}", e);
        }
    });
}

/// Register a custom level name at `value`.
///
/// Registering the same name/value pair again is a no-op. A different name on
/// an occupied slot, or an existing name on a different slot, is rejected.
pub fn register_level(value: u8, name: &str) -> Result<LogLevel> {
    register_verbose();
    insert_level(value, name)
}

fn insert_level(value: u8, name: &str) -> Result<LogLevel> {
    let name = name.trim().to_uppercase();
    if name.is_empty() {
        return Err(LoggerError::config("LogLevel", "level name must not be empty"));
    }

    let mut table = table().write();
    if let Some(existing) = table.get(&value) {
        return if *existing == name {
            Ok(LogLevel(value))
        } else {
            Err(LoggerError::level_conflict(value, existing.clone(), name))
        };
    }

    if let Some((&other, _)) = table.iter().find(|(_, n)| **n == name) {
        return Err(LoggerError::level_conflict(other, name.clone(), name));
    }

    table.insert(value, name);
    Ok(LogLevel(value))
}

fn level_name(value: u8) -> Option<String> {
    register_verbose();
    table().read().get(&value).cloned()
}

fn level_value(name: &str) -> Option<u8> {
    register_verbose();
    table()
        .read()
        .iter()
        .find(|(_, n)| n.as_str() == name)
        .map(|(&v, _)| v)
}
