//! Rotating file appender with size-based rollover
//!
//! Before a write that would bring the active file to `max_bytes` or more,
//! the file is rolled over: `app.log` becomes `app.log.1`, `app.log.1`
//! becomes `app.log.2`, and so on, keeping at most `backup_count` backups.
//! The oldest backup is deleted first.

use super::file::FileMode;
use crate::core::appender::Appender;
use crate::core::error::{LoggerError, Result};
use crate::core::log_record::LogRecord;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Configuration for rotating file appender
///
/// # Examples
///
/// ```
/// use verbose_logger_system::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_compression(true);
/// assert_eq!(policy.max_bytes, 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Size at which the active file rolls over; 0 disables rollover
    pub max_bytes: u64,
    /// Maximum number of rotated files to keep; 0 disables rollover
    pub backup_count: usize,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 1024,
            backup_count: 5,
            compress: false,
        }
    }
}

impl RotationPolicy {
    /// Create a new rotation policy with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.max_bytes = size;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.backup_count = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Whether this policy ever rolls the file over
    #[must_use]
    pub fn rotates(&self) -> bool {
        self.max_bytes > 0 && self.backup_count > 0
    }
}

/// File appender that rolls over by size
///
/// The first open truncates unless [`FileMode::Append`] is requested; files
/// opened after a rollover start empty. Every record is flushed before
/// `append` returns. Rotation happens inside `append`, so a handler
/// serializing calls to `append` makes each rollover atomic with respect to
/// concurrent writers.
///
/// # Examples
///
/// ```no_run
/// use verbose_logger_system::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let policy = RotationPolicy::new().with_max_size(1024 * 1024).with_max_backups(3);
/// let appender = RotatingFileAppender::with_policy("/var/log/app.log", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    rotation_count: u64,
}

impl RotatingFileAppender {
    /// Create a new rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Open `path` truncated, rolling over per `policy`
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        Self::with_mode(path, policy, FileMode::Truncate)
    }

    /// Like [`with_policy`](Self::with_policy), choosing how existing
    /// contents are treated on the first open
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn with_mode<P: AsRef<Path>>(
        path: P,
        policy: RotationPolicy,
        mode: FileMode,
    ) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        let (file, current_size) = Self::open_file(&base_path, mode)?;

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
            rotation_count: 0,
        })
    }

    fn open_file(path: &Path, mode: FileMode) -> Result<(File, u64)> {
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            FileMode::Truncate => options.write(true).truncate(true),
            FileMode::Append => options.append(true),
        };

        let file = options
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    /// Whether writing `incoming` more bytes calls for a rollover first
    fn should_rotate(&self, incoming: u64) -> bool {
        self.policy.rotates()
            && self.current_size > 0
            && self.current_size + incoming >= self.policy.max_bytes
    }

    /// Perform log rotation
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        // Oldest backup goes first
        let count = self.policy.backup_count;
        for oldest in [self.backup_path(count), Self::gz_path(&self.backup_path(count))] {
            if oldest.exists() {
                fs::remove_file(&oldest).map_err(|e| {
                    LoggerError::file_rotation(
                        oldest.display().to_string(),
                        format!("Failed to remove oldest backup: {}", e),
                    )
                })?;
            }
        }

        for i in (1..count).rev() {
            let old_path = self.backup_path(i);
            let new_path = self.backup_path(i + 1);
            for (from, to) in [
                (Self::gz_path(&old_path), Self::gz_path(&new_path)),
                (old_path, new_path),
            ] {
                if from.exists() {
                    fs::rename(&from, &to).map_err(|e| {
                        LoggerError::file_rotation(
                            from.display().to_string(),
                            format!("Failed to rotate backup files: {}", e),
                        )
                    })?;
                }
            }
        }

        let first_backup = self.backup_path(1);
        if self.base_path.exists() {
            fs::rename(&self.base_path, &first_backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;

            if self.policy.compress {
                self.compress_file(&first_backup)?;
            }
        }

        let (file, size) = Self::open_file(&self.base_path, FileMode::Append)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        self.rotation_count += 1;

        Ok(())
    }

    /// Get backup file path for given index
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    fn gz_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".gz");
        PathBuf::from(name)
    }

    /// Gzip `path` into `path.gz`, removing the original only on success
    fn compress_file(&self, path: &Path) -> Result<()> {
        use std::io::BufReader;

        let gz_path = Self::gz_path(path);
        let temp_gz_path = {
            let mut name = gz_path.as_os_str().to_os_string();
            name.push(".tmp");
            PathBuf::from(name)
        };

        let compress = || -> std::io::Result<()> {
            let mut reader = BufReader::new(File::open(path)?);
            let output = BufWriter::new(File::create(&temp_gz_path)?);
            let mut encoder =
                flate2::write::GzEncoder::new(output, flate2::Compression::default());
            std::io::copy(&mut reader, &mut encoder)?;
            encoder.finish()?.flush()?;
            fs::rename(&temp_gz_path, &gz_path)
        };

        if let Err(e) = compress() {
            let _ = fs::remove_file(&temp_gz_path);
            return Err(LoggerError::io_operation(
                "compressing rotated log",
                format!("Failed to compress {}", path.display()),
                e,
            ));
        }

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
                path.display(),
                e
            );
        }

        Ok(())
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Number of rollovers performed since the appender was opened
    #[must_use]
    pub fn rotation_count(&self) -> u64 {
        self.rotation_count
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, _record: &LogRecord, formatted: &str) -> Result<()> {
        let bytes_written = formatted.len() as u64 + 1;

        if self.should_rotate(bytes_written) {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.writer.is_none() {
                    let reopened = Self::open_file(&self.base_path, FileMode::Append);
                    let (file, size) = reopened.map_err(|reopen_err| {
                        eprintln!(
                            "[LOGGER ERROR] Failed to reopen log file after rotation failure: {}",
                            reopen_err
                        );
                        e
                    })?;
                    self.writer = Some(BufWriter::new(file));
                    self.current_size = size;
                }

                // Let the file outgrow the limit instead of retrying on every write
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;

        writer
            .write_all(formatted.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush())
            .map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to write log entry: {}", e),
                )
            })?;
        self.current_size += bytes_written;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
