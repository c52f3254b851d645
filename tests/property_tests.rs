//! Property-based tests for verbose_logger_system using proptest

use proptest::prelude::*;
use verbose_logger_system::prelude::*;

fn builtin_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::DEBUG),
        Just(LogLevel::VERBOSE),
        Just(LogLevel::INFO),
        Just(LogLevel::WARN),
        Just(LogLevel::ERROR),
        Just(LogLevel::FATAL),
    ]
}

fn record(level: LogLevel, message: &str) -> LogRecord {
    LogRecord::new(level, "prop", message)
}

// ============================================================================
// Level Registry Tests
// ============================================================================

proptest! {
    /// Level names parse back to the same level
    #[test]
    fn test_log_level_name_roundtrip(level in builtin_level()) {
        let parsed: LogLevel = level.name().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Ordering follows the numeric value, so custom levels interleave
    #[test]
    fn test_log_level_ordering(a in any::<u8>(), b in any::<u8>()) {
        let (la, lb) = (LogLevel::new(a), LogLevel::new(b));
        prop_assert_eq!(la < lb, a < b);
        prop_assert_eq!(la == lb, a == b);
    }

    /// Parsing is case-insensitive
    #[test]
    fn test_log_level_case_insensitive(level in builtin_level(), use_lower in any::<bool>()) {
        let name = level.name();
        let input = if use_lower { name.to_lowercase() } else { name.to_string() };
        let parsed: std::result::Result<LogLevel, String> = input.parse();
        prop_assert_eq!(parsed, Ok(level));
    }

    /// Any verbosity resolves to one of the three thresholds, never panics
    #[test]
    fn test_resolve_is_total(verbosity in any::<i64>()) {
        let level = resolve(verbosity);
        prop_assert!(
            level == LogLevel::INFO || level == LogLevel::VERBOSE || level == LogLevel::DEBUG
        );
        if !(0..=10).contains(&verbosity) {
            prop_assert_eq!(level, LogLevel::INFO);
        }
    }

    /// Unknown names fall back to WARNING
    #[test]
    fn test_resolve_name_fallback(name in "[a-z]{12,20}") {
        prop_assert_eq!(resolve_name(&name), LogLevel::WARN);
    }
}

#[test]
fn test_verbose_between_debug_and_info() {
    assert!(LogLevel::DEBUG < LogLevel::VERBOSE);
    assert!(LogLevel::VERBOSE < LogLevel::INFO);
    assert_eq!(resolve(0), LogLevel::INFO);
    assert_eq!(resolve(1), LogLevel::VERBOSE);
    assert_eq!(resolve(2), LogLevel::DEBUG);
    assert_eq!(resolve(999), LogLevel::INFO);
}

// ============================================================================
// LogRecord Message Tests
// ============================================================================

proptest! {
    /// Messages are stored exactly as given, control characters included
    #[test]
    fn test_message_kept_verbatim(message in any::<String>()) {
        let rec = record(LogLevel::INFO, &message);
        prop_assert_eq!(&rec.message, &message);
        prop_assert!(TextFormatter::bare_message().format(&rec) == message);
    }

    /// JSON keeps a multi-line message on one line and intact
    #[test]
    fn test_json_preserves_multiline_message(
        first in "[a-zA-Z0-9 ]+",
        second in "[a-zA-Z0-9 ]+",
    ) {
        let message = format!("{}\n{}\t{}", first, second, first);
        let line = JsonFormatter::minimal().format(&record(LogLevel::INFO, &message));
        prop_assert_eq!(line.lines().count(), 1);

        let line = JsonFormatter::full().format(&record(LogLevel::INFO, &message));
        prop_assert_eq!(line.lines().count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        prop_assert_eq!(parsed["message"].as_str().unwrap(), message.as_str());
    }
}

// ============================================================================
// Sampling Filter Tests
// ============================================================================

proptest! {
    /// proportion = 1 keeps every record at every level
    #[test]
    fn test_full_proportion_keeps_all(level in any::<u8>(), ceiling in builtin_level()) {
        let plain = RandomPropFilter::new(1.0).unwrap();
        let capped = RandomPropFilter::with_ceiling(1.0, ceiling).unwrap();
        let rec = record(LogLevel::new(level), "x");
        for _ in 0..50 {
            prop_assert!(plain.should_keep(&rec));
            prop_assert!(capped.should_keep(&rec));
        }
    }

    /// proportion = 0 without a ceiling drops every record
    #[test]
    fn test_zero_proportion_drops_all(level in any::<u8>()) {
        let filter = RandomPropFilter::new(0.0).unwrap();
        let rec = record(LogLevel::new(level), "x");
        for _ in 0..50 {
            prop_assert!(!filter.should_keep(&rec));
        }
    }

    /// Records strictly above the ceiling are always kept
    #[test]
    fn test_above_ceiling_always_kept(
        proportion in 0.0f64..=1.0,
        ceiling in builtin_level(),
        level in builtin_level(),
    ) {
        prop_assume!(level > ceiling);
        let filter = RandomPropFilter::with_ceiling(proportion, ceiling).unwrap();
        let rec = record(level, "x");
        for _ in 0..50 {
            prop_assert!(filter.should_keep(&rec));
        }
    }

    /// Proportions outside [0, 1] are rejected, never clamped
    #[test]
    fn test_out_of_range_proportion_rejected(
        proportion in prop_oneof![1.000_001f64..1e6, -1e6f64..-0.000_001]
    ) {
        let err = RandomPropFilter::new(proportion).unwrap_err();
        prop_assert!(matches!(err, LoggerError::InvalidProportion { .. }), "expected InvalidProportion, got {:?}", err);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Kept fraction converges to the proportion (10k trials, ±5 points)
    #[test]
    fn test_kept_fraction_converges(proportion in 0.0f64..=1.0) {
        let filter = RandomPropFilter::new(proportion).unwrap();
        let rec = record(LogLevel::DEBUG, "x");
        let trials = 10_000;
        let kept = (0..trials).filter(|_| filter.should_keep(&rec)).count();
        let rate = kept as f64 / trials as f64;
        prop_assert!((rate - proportion).abs() <= 0.05,
                "kept {} for proportion {}", rate, proportion);
    }

    /// At or below the ceiling the probabilistic rule applies
    #[test]
    fn test_at_or_below_ceiling_is_sampled(proportion in 0.1f64..0.9) {
        let filter = RandomPropFilter::with_ceiling(proportion, LogLevel::VERBOSE).unwrap();
        let trials = 10_000;
        for level in [LogLevel::DEBUG, LogLevel::VERBOSE] {
            let rec = record(level, "x");
            let kept = (0..trials).filter(|_| filter.should_keep(&rec)).count();
            let rate = kept as f64 / trials as f64;
            prop_assert!((rate - proportion).abs() <= 0.05);
        }
    }
}

#[test]
fn test_documented_invalid_proportions() {
    assert!(RandomPropFilter::new(1.5).is_err());
    assert!(RandomPropFilter::new(-0.1).is_err());
    assert!(RandomPropFilter::new(f64::NAN).is_err());
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    /// Full JSON output is always one valid object carrying the message
    #[test]
    fn test_json_output_is_valid(
        message in ".*",
        key in "[a-z]{1,8}",
        value in ".*",
        level in builtin_level(),
    ) {
        let rec = record(level, &message)
            .with_context(LogContext::new().with_field(key.clone(), value.clone()));
        let line = JsonFormatter::full().format(&rec);

        prop_assert!(!line.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        prop_assert_eq!(parsed["message"].as_str().unwrap(), rec.message.as_str());
        prop_assert_eq!(parsed["context"][key.as_str()].as_str().unwrap(), value.as_str());
        prop_assert_eq!(parsed["exception"].as_str().unwrap(), "");
        let loglevel = level.name();
        prop_assert_eq!(parsed["loglevel"].as_str().unwrap(), &*loglevel);
    }

    /// Literal template text is reproduced untouched
    #[test]
    fn test_template_literals_preserved(prefix in "[a-zA-Z0-9 :|-]*", message in "[a-zA-Z0-9 ]*") {
        let formatter = TextFormatter::new(format!("{}{{message}}", prefix)).unwrap();
        prop_assert_eq!(formatter.format(&record(LogLevel::INFO, &message)), format!("{}{}", prefix, message));
    }
}

// ============================================================================
// Threshold Restore Tests
// ============================================================================

proptest! {
    /// Recording startup parameters never changes the explicit level
    #[test]
    fn test_startup_parameters_restore_level(
        level in prop_oneof![Just(LogLevel::NOTSET), builtin_level()],
        params in proptest::collection::vec(("[a-z]{1,6}", "[a-z0-9]{0,6}"), 0..6),
    ) {
        let logger = Logger::builder("prop").level(level).build();
        logger.record_startup_parameters(params.iter().map(|(k, v)| (k, v))).unwrap();
        prop_assert_eq!(logger.level(), level);
        prop_assert_eq!(logger.metrics().emitted(), params.len() as u64 + 4);
    }
}
