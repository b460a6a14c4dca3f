//! Structured logging setup for blueprint
//!
//! Logging uses the `tracing` ecosystem. Output always goes to stderr so that
//! `blueprint plan --format json` can be piped without log lines mixed in.
//!
//! # Example
//!
//! ```no_run
//! use blueprint::util::logging;
//! use tracing::{debug, info};
//!
//! logging::init_from_env();
//!
//! info!("Build started");
//! debug!(build_target = "Default", "Resolving parameters");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format (for CI log collectors)
    pub use_json: bool,

    /// Include the module target (e.g., blueprint::build::version) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Parses a log level from a string
///
/// Returns `Level::INFO` for anything unrecognised.
///
/// ```
/// use blueprint::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    EnvFilter::new(format!("blueprint={}", level))
        .add_directive(LevelFilter::WARN.into())
}

/// Initializes the logging system; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}

/// Initializes logging from environment variables
///
/// - `BLUEPRINT_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
/// - `BLUEPRINT_LOG_JSON` - Use JSON output (true/false)
/// - `RUST_LOG` - Standard filter, overrides the level when set
pub fn init_from_env() {
    let level_str = env::var("BLUEPRINT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    init_logging(LoggingConfig {
        level: parse_level(&level_str),
        use_json: json_from_env(),
        ..Default::default()
    });
}

/// `BLUEPRINT_LOG_JSON=true` switches the formatter to JSON
pub fn json_from_env() -> bool {
    env::var("BLUEPRINT_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}
