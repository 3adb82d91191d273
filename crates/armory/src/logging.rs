//! Tracing setup for armory.
//!
//! Log lines go to stderr; stdout carries only command output so it can be
//! piped. Storage failures are logged by the registry rather than returned,
//! so warnings stay visible even with `--quiet`.

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Target prefix shared by every armory log event.
const LOG_TARGET: &str = "armory";

/// How much armory logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only.
    Quiet,
    /// Lifecycle events such as opening the database.
    #[default]
    Normal,
    /// Every load, save and registry mutation.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Map the `-q` flag and the number of `-v` flags. `-q` wins.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Most detailed level emitted for armory's own events.
    #[must_use]
    pub fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::WARN,
            Self::Normal => LevelFilter::INFO,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }

    fn directive(self) -> String {
        format!("{LOG_TARGET}={}", self.level())
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG`, when set and valid, replaces the verbosity-derived filter.
/// Calling this again after a subscriber is installed does nothing.
///
/// # Examples
///
/// ```no_run
/// use armory::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(1, false));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Route warnings and errors to the test harness output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
