//! Basic logger usage example
//!
//! Demonstrates console logging, the VERBOSE level, verbosity-driven
//! thresholds and child loggers.
//!
//! Run with: cargo run --example basic_usage -- [verbosity]

use verbose_logger_system::prelude::*;
use verbose_logger_system::{info, verbose};

fn main() -> Result<()> {
    println!("=== Verbose Logger System - Basic Usage Example ===\n");

    let verbosity: i64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);

    // No filename: the console becomes the only sink
    let logger = create_logger("__main__");
    configure(
        &logger,
        &HandlerOpts::new().without_file(),
        &FormatterOpts::new().with_format(HandlerKind::Stream, "[{level}] {name}: {message}"),
        &LoggerOpts::new().with_verbosity(verbosity),
    )?;
    println!("1. Verbosity {} resolves to threshold {}", verbosity, logger.level());

    logger.debug("Debug message (shown with verbosity >= 2)")?;
    logger.verbose("Verbose message (shown with verbosity >= 1)")?;
    logger.info("Info message")?;
    logger.warn("Warning message")?;

    println!("\n2. Startup parameters are always recorded at INFO:");
    logger.set_level(LogLevel::ERROR);
    logger.record_startup_parameters([("verbosity", verbosity.to_string()), ("mode", "demo".to_string())])?;
    println!("   Threshold after recording: {}", logger.level());
    logger.set_level(resolve(verbosity));

    println!("\n3. Child loggers inherit the threshold and the handlers:");
    let child = get_logger("pedigree", "__main__");
    info!(child, "Loaded {} families", 120)?;
    verbose!(child, "Largest family has {} members", 14)?;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
