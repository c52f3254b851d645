//! File appender implementation

use crate::core::{Appender, LogRecord, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// How an existing file is treated when the appender opens it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileMode {
    /// Discard prior contents
    #[default]
    Truncate,
    Append,
}

pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileAppender {
    /// Open `path`, truncating any existing contents
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_mode(path, FileMode::Truncate)
    }

    pub fn with_mode(path: impl Into<PathBuf>, mode: FileMode) -> Result<Self> {
        let path = path.into();
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            FileMode::Truncate => options.write(true).truncate(true),
            FileMode::Append => options.append(true),
        };

        let file = options.open(&path).map_err(|e| {
            LoggerError::io_operation(
                "opening log file",
                format!("Failed to open '{}'", path.display()),
                e,
            )
        })?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&mut self, _record: &LogRecord, formatted: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        // Each record reaches the file before emission returns
        writer.write_all(formatted.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::fs;
    use tempfile::tempdir;

    fn write_line(appender: &mut FileAppender, text: &str) {
        let record = LogRecord::new(LogLevel::INFO, "main", text);
        appender.append(&record, text).unwrap();
        appender.flush().unwrap();
    }

    #[test]
    fn test_truncate_discards_prior_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.log");
        fs::write(&path, "stale line\n").unwrap();

        let mut appender = FileAppender::new(&path).unwrap();
        write_line(&mut appender, "fresh line");

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh line\n");
    }

    #[test]
    fn test_append_mode_keeps_prior_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.log");
        fs::write(&path, "stale line\n").unwrap();

        let mut appender = FileAppender::with_mode(&path, FileMode::Append).unwrap();
        write_line(&mut appender, "fresh line");

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "stale line\nfresh line\n"
        );
    }

    #[test]
    fn test_record_visible_without_explicit_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.log");

        let mut appender = FileAppender::new(&path).unwrap();
        let record = LogRecord::new(LogLevel::INFO, "main", "started");
        appender.append(&record, "started").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "started\n");
    }

    #[test]
    fn test_open_failure_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("run.log");

        let err = FileAppender::new(&path).err().unwrap();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
    }
}
