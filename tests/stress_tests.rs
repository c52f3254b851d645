//! Stress tests for concurrent emission
//!
//! These tests verify:
//! - No record is lost or split when many threads share one logger
//! - Rotation stays atomic with respect to concurrent writers
//! - Temporary elevation restores the threshold under concurrent logging
//! - Sampling metrics stay consistent under contention

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use verbose_logger_system::prelude::*;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

fn spawn_writers(logger: &Arc<Logger>, level: LogLevel) {
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(logger);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger
                        .log(level, format!("thread {:02} message {:04}", t, i))
                        .expect("Failed to log");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Writer thread panicked");
    }
}

/// Every line must be one complete record from one writer
fn assert_whole_lines(lines: &[String]) {
    for line in lines {
        assert!(
            line.starts_with("thread ") && line.len() == "thread 00 message 0000".len(),
            "Corrupted line: {:?}",
            line
        );
    }
}

#[test]
fn test_concurrent_file_logging_loses_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(Logger::new("stress"));
    configure(
        &logger,
        &HandlerOpts::new()
            .with_output_dir(temp_dir.path())
            .with_filename("stress.log"),
        &FormatterOpts::new().with_format(HandlerKind::File, "{message}"),
        &LoggerOpts::new(),
    )
    .expect("Failed to configure");

    spawn_writers(&logger, LogLevel::INFO);
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(temp_dir.path().join("stress.log")).unwrap();
    let lines: Vec<String> = content.lines().map(String::from).collect();
    assert_eq!(lines.len(), THREADS * PER_THREAD);
    assert_whole_lines(&lines);

    let unique: HashSet<&String> = lines.iter().collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD);
    assert_eq!(logger.metrics().written(), (THREADS * PER_THREAD) as u64);
}

#[test]
fn test_concurrent_rotation_is_atomic() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(Logger::new("rotation"));
    // Enough backups that nothing is evicted: 4000 lines * 23 bytes < 64 * 2048
    configure(
        &logger,
        &HandlerOpts::new()
            .with_output_dir(temp_dir.path())
            .with_filename("rotate.log")
            .with_rotation(2048, 64),
        &FormatterOpts::new().with_format(HandlerKind::File, "{message}"),
        &LoggerOpts::new(),
    )
    .expect("Failed to configure");

    spawn_writers(&logger, LogLevel::WARN);
    logger.flush().expect("Failed to flush");

    let mut lines = Vec::new();
    for entry in fs::read_dir(temp_dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let size = fs::metadata(&path).unwrap().len();
        assert!(size <= 2048, "{} is {} bytes", path.display(), size);
        lines.extend(fs::read_to_string(&path).unwrap().lines().map(String::from));
    }

    assert!(temp_dir.path().join("rotate.log.1").exists());
    assert_eq!(lines.len(), THREADS * PER_THREAD);
    assert_whole_lines(&lines);
}

#[test]
fn test_elevation_under_concurrent_logging() {
    let logger = Arc::new(Logger::builder("elevate").level(LogLevel::ERROR).build());

    let writer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for i in 0..PER_THREAD {
                logger.debug(format!("debug {}", i)).expect("Failed to log");
            }
        })
    };

    for round in 0..50 {
        logger
            .record_inputs([("round", round)])
            .expect("Failed to record inputs");
    }

    writer.join().expect("Writer thread panicked");
    assert_eq!(logger.level(), LogLevel::ERROR);
}

#[test]
fn test_sampling_metrics_under_contention() {
    #[derive(Default)]
    struct NullAppender;

    impl Appender for NullAppender {
        fn append(&mut self, _record: &LogRecord, _formatted: &str) -> Result<()> {
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "null"
        }
    }

    let logger = Arc::new(
        Logger::builder("sampled")
            .level(LogLevel::DEBUG)
            .handler(
                Handler::new(NullAppender, TextFormatter::bare_message())
                    .with_filter(RandomPropFilter::new(0.5).unwrap()),
            )
            .build(),
    );

    spawn_writers(&logger, LogLevel::DEBUG);

    let metrics = logger.metrics();
    let total = (THREADS * PER_THREAD) as u64;
    assert_eq!(metrics.emitted(), total);
    assert_eq!(metrics.written() + metrics.filtered(), total);

    let rate = metrics.written() as f64 / total as f64;
    assert!((0.45..=0.55).contains(&rate), "kept rate {}", rate);
}
