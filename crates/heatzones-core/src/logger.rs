//! Minimal logging setup shared by the harvesting crates.
//!
//! Library code logs through the `log` facade only. Binaries and tests
//! install a backend once at startup: the plain stderr backend via
//! `init_with_level`, the scoped variant via `init_scoped` (drops records
//! whose target is outside the given prefix, so `image`/`imageproc`
//! internals stay quiet at debug levels), or a `tracing` subscriber via
//! `init_tracing` when the `tracing` feature is enabled.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct StderrLogger {
    level: LevelFilter,
    /// Target prefix to emit; `None` passes every target through.
    scope: Option<&'static str>,
    started: Instant,
}

impl StderrLogger {
    fn in_scope(&self, target: &str) -> bool {
        match self.scope {
            Some(prefix) => target.starts_with(prefix),
            None => true,
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && self.in_scope(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr();
        let _ = writeln!(
            stderr,
            "[{:8.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

fn install(level: LevelFilter, scope: Option<&'static str>) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            level,
            scope,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install the stderr logger with the given level filter.
///
/// Later calls after a successful installation are no-ops.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    install(level, None)
}

/// Like [`init_with_level`], but only records whose target starts with
/// `scope` (typically a crate-name prefix) are emitted.
pub fn init_scoped(level: LevelFilter, scope: &'static str) -> Result<(), log::SetLoggerError> {
    install(level, Some(scope))
}

#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
