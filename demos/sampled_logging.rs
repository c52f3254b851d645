//! Sampled logging example
//!
//! Demonstrates throttling high-volume DEBUG output with a random
//! proportion filter while keeping every warning and error.
//!
//! Run with: cargo run --example sampled_logging

use verbose_logger_system::prelude::*;

fn main() -> Result<()> {
    println!("=== Verbose Logger System - Sampled Logging Example ===\n");

    // Keep 5% of records at or below VERBOSE, everything above it
    let filter = RandomPropFilter::with_ceiling(0.05, LogLevel::VERBOSE)?;
    let handler = Handler::new(ConsoleAppender::new(), TextFormatter::new("[{level}] {message}")?)
        .with_filter(filter);

    let logger = Logger::builder("sampled")
        .level(LogLevel::DEBUG)
        .handler(handler)
        .build();

    for i in 0..1000 {
        logger.debug(format!("Comparing segment pair {}", i))?;
        if i % 250 == 0 {
            logger.warn(format!("Segment pair {} has a gap over 5 cM", i))?;
        }
    }
    logger.error("One chromosome file could not be parsed")?;

    let metrics = logger.metrics();
    println!("\nEmitted:  {}", metrics.emitted());
    println!("Written:  {}", metrics.written());
    println!("Sampled out: {}", metrics.filtered());

    println!("\nInvalid proportions are rejected:");
    match RandomPropFilter::new(1.5) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  {}", e),
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
