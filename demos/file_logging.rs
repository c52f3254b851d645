//! File logging example
//!
//! Demonstrates configuring file and console output from a JSON document,
//! size-based rotation and JSON lines with context fields.
//!
//! Run with: cargo run --example file_logging

use verbose_logger_system::prelude::*;

fn main() -> Result<()> {
    println!("=== Verbose Logger System - File Logging Example ===\n");

    // The output directory must exist before configuring
    let out_dir = std::env::temp_dir().join("verbose_logger_demo");
    std::fs::create_dir_all(&out_dir)?;

    println!("1. Text log with console echo, configured from JSON:");
    let document = serde_json::json!({
        "filename": "IBDCluster.log",
        "output_dir": out_dir,
        "to_console": true,
        "verbosity": 1,
        "file_format": "{timestamp} - {name} - {level} - {message}",
    });
    let config = LoggerConfig::from_json_str(&document.to_string())?;
    let logger = create_logger("__main__");
    configure_from(&logger, &config)?;

    logger.record_startup_parameters([
        ("output_dir", out_dir.display().to_string()),
        ("verbosity", config.verbosity.to_string()),
    ])?;
    logger.verbose("Reading pedigree file")?;
    logger.info("Analysis complete")?;
    logger.flush()?;

    println!("\n2. Rotating JSON log (256 bytes, 3 backups):");
    let json_logger = create_logger("__main__.json");
    json_logger.set_propagate(false);
    configure(
        &json_logger,
        &HandlerOpts::new()
            .with_output_dir(&out_dir)
            .with_filename("events.jsonl")
            .with_rotation(256, 3),
        &FormatterOpts::new().with_format(HandlerKind::File, "json"),
        &LoggerOpts::new(),
    )?;

    let session = json_logger.with_context(LogContext::new().with_field("user", "alice"));
    for i in 1..=10 {
        session.log_with_context(
            LogLevel::INFO,
            format!("Processed chunk {}", i),
            LogContext::new().with_field("chunk", i),
        )?;
    }

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "optional map file missing");
    json_logger.exception("Falling back to default genetic map", &err)?;
    json_logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check '{}' for the log files", out_dir.display());

    Ok(())
}
