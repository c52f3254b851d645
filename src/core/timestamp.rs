//! Timestamp renderings for the text and JSON formatters

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// How a text template renders `{timestamp}` / `{asctime}`
///
/// # Examples
///
/// ```
/// use verbose_logger_system::TimestampFormat;
/// use chrono::Utc;
///
/// let stamp = TimestampFormat::Iso8601.format(&Utc::now());
/// assert!(stamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local time, comma before the milliseconds: `2025-01-08 10:30:45,123`
    #[default]
    Asctime,

    /// UTC with milliseconds: `2025-01-08T10:30:45.123Z`. Always used for JSON.
    Iso8601,

    /// Whole seconds since the epoch
    Unix,

    /// strftime pattern, rendered in local time
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Asctime => datetime
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S,%3f")
                .to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::Custom(pattern) => {
                datetime.with_timezone(&Local).format(pattern).to_string()
            }
        }
    }
}
