//! Record formatters
//!
//! - [`TextFormatter`]: renders a `{field}` template, e.g.
//!   `{timestamp} - {name} - {level} - {message}`
//! - [`JsonFormatter`]: one JSON object per record, either the minimal
//!   three-field shape or the full nine-field shape
//!
//! Both are pure functions of the record and their own configuration.

use super::error::{LoggerError, Result};
use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Template used for file output when none is configured
pub const DEFAULT_FILE_TEMPLATE: &str = "{timestamp} - {name} - {level} - {message}";

/// Template used for console output: the bare message
pub const BARE_MESSAGE_TEMPLATE: &str = "{message}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Timestamp,
    Name,
    Level,
    LevelNo,
    Message,
    File,
    Line,
    Function,
    Module,
    Thread,
    Context,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        let field = match name {
            "timestamp" | "asctime" => Field::Timestamp,
            "name" => Field::Name,
            "level" | "levelname" => Field::Level,
            "levelno" => Field::LevelNo,
            "message" => Field::Message,
            "file" | "pathname" => Field::File,
            "line" | "lineno" => Field::Line,
            "function" | "funcName" => Field::Function,
            "module" => Field::Module,
            "thread" => Field::Thread,
            "context" => Field::Context,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Human-readable formatter driven by a `{field}` template
///
/// Recognized fields: `timestamp` (`asctime`), `name`, `level` (`levelname`),
/// `levelno`, `message`, `file` (`pathname`), `line` (`lineno`), `function`
/// (`funcName`), `module`, `thread`, `context`. Use `{{` and `}}` for literal
/// braces. Exception info, when present, is appended on the following lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFormatter {
    template: String,
    segments: Vec<Segment>,
    timestamp_format: TimestampFormat,
}

impl TextFormatter {
    /// Parse `template`
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidTemplate`] for unknown fields or
    /// unbalanced braces.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let segments = Self::parse(&template)?;
        Ok(Self {
            template,
            segments,
            timestamp_format: TimestampFormat::default(),
        })
    }

    /// `{timestamp} - {name} - {level} - {message}`
    pub fn default_file() -> Self {
        Self {
            template: DEFAULT_FILE_TEMPLATE.to_string(),
            segments: vec![
                Segment::Field(Field::Timestamp),
                Segment::Literal(" - ".to_string()),
                Segment::Field(Field::Name),
                Segment::Literal(" - ".to_string()),
                Segment::Field(Field::Level),
                Segment::Literal(" - ".to_string()),
                Segment::Field(Field::Message),
            ],
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Message text only, no metadata
    pub fn bare_message() -> Self {
        Self {
            template: BARE_MESSAGE_TEMPLATE.to_string(),
            segments: vec![Segment::Field(Field::Message)],
            timestamp_format: TimestampFormat::default(),
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn parse(template: &str) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => name.push(ch),
                            None => {
                                return Err(LoggerError::invalid_template(
                                    template,
                                    format!("unclosed placeholder '{{{}'", name),
                                ))
                            }
                        }
                    }
                    let field = Field::parse(name.trim()).ok_or_else(|| {
                        LoggerError::invalid_template(template, format!("unknown field '{}'", name))
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(LoggerError::invalid_template(
                        template,
                        "unmatched '}' (use '}}' for a literal brace)",
                    ))
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(segments)
    }

    pub fn format(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(self.template.len() + record.message.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => match field {
                    Field::Timestamp => {
                        out.push_str(&self.timestamp_format.format(&record.timestamp))
                    }
                    Field::Name => out.push_str(&record.logger_name),
                    Field::Level => out.push_str(&record.level.name()),
                    Field::LevelNo => out.push_str(&record.level.value().to_string()),
                    Field::Message => out.push_str(&record.message),
                    Field::File => out.push_str(record.file()),
                    Field::Line => out.push_str(&record.line().to_string()),
                    Field::Function => out.push_str(record.function()),
                    Field::Module => out.push_str(record.module()),
                    Field::Thread => out.push_str(record.thread()),
                    Field::Context => {
                        if let Some(ref context) = record.context {
                            out.push_str(&context.format_fields());
                        }
                    }
                },
            }
        }

        if let Some(ref exception) = record.exception {
            out.push('\n');
            out.push_str(&exception.render());
        }

        out
    }
}

/// Field set emitted by [`JsonFormatter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonDetail {
    /// `timestamp`, `loglevel`, `logger_name`
    Minimal,
    /// Minimal fields plus `filepath`, `function_call`, `line_number`,
    /// `message`, `context` and `exception`
    #[default]
    Full,
}

#[derive(Serialize)]
struct MinimalLine<'a> {
    timestamp: String,
    loglevel: &'a str,
    logger_name: &'a str,
}

#[derive(Serialize)]
struct FullLine<'a> {
    timestamp: String,
    loglevel: &'a str,
    logger_name: &'a str,
    filepath: &'a str,
    function_call: &'a str,
    line_number: u32,
    message: &'a str,
    context: serde_json::Map<String, serde_json::Value>,
    exception: String,
}

/// Structured formatter producing one JSON object per record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonFormatter {
    detail: JsonDetail,
}

impl JsonFormatter {
    pub fn new(detail: JsonDetail) -> Self {
        Self { detail }
    }

    pub fn minimal() -> Self {
        Self::new(JsonDetail::Minimal)
    }

    pub fn full() -> Self {
        Self::new(JsonDetail::Full)
    }

    pub fn detail(&self) -> JsonDetail {
        self.detail
    }

    pub fn format(&self, record: &LogRecord) -> String {
        let timestamp = TimestampFormat::Iso8601.format(&record.timestamp);
        let level = record.level.name();

        let json = match self.detail {
            JsonDetail::Minimal => serde_json::to_string(&MinimalLine {
                timestamp,
                loglevel: &level,
                logger_name: &record.logger_name,
            }),
            JsonDetail::Full => serde_json::to_string(&FullLine {
                timestamp,
                loglevel: &level,
                logger_name: &record.logger_name,
                filepath: record.file(),
                function_call: record.function(),
                line_number: record.line(),
                message: &record.message,
                context: record
                    .context
                    .as_ref()
                    .map(|c| c.to_json_object())
                    .unwrap_or_default(),
                exception: record
                    .exception
                    .as_ref()
                    .map(|e| e.render())
                    .unwrap_or_default(),
            }),
        };

        // Every key is a string and every value plain data, so this only
        // fires if a field type changes
        json.unwrap_or_else(|e| {
            eprintln!(
                "[LOGGER ERROR] Failed to serialize record from '{}' as JSON: {}",
                record.logger_name, e
            );
            String::new()
        })
    }
}

/// The formatter attached to a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFormatter {
    Text(TextFormatter),
    Json(JsonFormatter),
}

impl RecordFormatter {
    pub fn format(&self, record: &LogRecord) -> String {
        match self {
            RecordFormatter::Text(text) => text.format(record),
            RecordFormatter::Json(json) => json.format(record),
        }
    }
}

impl From<TextFormatter> for RecordFormatter {
    fn from(formatter: TextFormatter) -> Self {
        RecordFormatter::Text(formatter)
    }
}

impl From<JsonFormatter> for RecordFormatter {
    fn from(formatter: JsonFormatter) -> Self {
        RecordFormatter::Json(formatter)
    }
}
