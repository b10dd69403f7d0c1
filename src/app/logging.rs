//! Structured logging setup.
//!
//! Diagnostics go to stderr through `tracing`; command results are printed
//! to stdout by the CLI and never pass through the subscriber.
//!
//! Configuration comes from:
//! - `LINTPHASE_LOG`: filter directives (falls back to `RUST_LOG`)
//! - `LINTPHASE_LOG_FORMAT=json`: one JSON object per event
//! - `--verbose`: debug output for this crate, ignoring the directives above

use std::env;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "LINTPHASE_LOG";
pub const LOG_FORMAT_ENV: &str = "LINTPHASE_LOG_FORMAT";

static INIT: Once = Once::new();

/// How the subscriber filters and formats events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level applied when no directive matches.
    pub level: Level,
    /// Extra `EnvFilter` directives, e.g. `lintphase::domain=trace`.
    pub directives: Option<String>,
    pub use_json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: Level::WARN, directives: None, use_json: false }
    }
}

impl LoggingConfig {
    /// Read the configuration from the process environment.
    pub fn from_env(verbose: bool) -> Self {
        let directives = env::var(LOG_ENV).ok().or_else(|| env::var("RUST_LOG").ok());
        Self::from_values(directives, env::var(LOG_FORMAT_ENV).ok(), verbose)
    }

    fn from_values(directives: Option<String>, format: Option<String>, verbose: bool) -> Self {
        let use_json = format.is_some_and(|format| format.trim().eq_ignore_ascii_case("json"));
        if verbose {
            return Self { level: Level::DEBUG, directives: None, use_json };
        }
        let directives = directives.filter(|value| !value.trim().is_empty());
        Self { directives, use_json, ..Self::default() }
    }

    /// Filter built from the directives, defaulting to `level`.
    ///
    /// Invalid directives are skipped rather than rejected.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.level).into())
            .parse_lossy(self.directives.as_deref().unwrap_or_default())
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(config: LoggingConfig) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(config.filter());
        let result = if config.use_json {
            registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()
        } else {
            registry
                .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
                .try_init()
        };
        if let Err(err) = result {
            eprintln!("lintphase: logging already initialised: {err}");
        }
    });
}
