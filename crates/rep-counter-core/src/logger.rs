//! Stderr logger for the counter binaries.
//!
//! Records from the `rep_counter*` crates are shown at the configured level;
//! everything else is capped at `warn` so dependency chatter stays out of the
//! per-frame log. Lines look like `[  1.204s  INFO detect] message`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const OWN_TARGET_PREFIX: &str = "rep_counter";

struct CounterLogger {
    level: LevelFilter,
    started: Instant,
}

impl CounterLogger {
    fn short_target<'a>(&self, target: &'a str) -> &'a str {
        target
            .strip_prefix(OWN_TARGET_PREFIX)
            .map(|rest| rest.trim_start_matches(['_', ':']))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(target)
    }
}

impl Log for CounterLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.target().starts_with(OWN_TARGET_PREFIX) {
            metadata.level() <= self.level
        } else {
            metadata.level() <= Level::Warn && metadata.level() <= self.level
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            self.short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<CounterLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| CounterLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Span close events are emitted so replay and sink timings show up.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_targets_are_shortened() {
        let logger = CounterLogger {
            level: LevelFilter::Debug,
            started: Instant::now(),
        };
        assert_eq!(logger.short_target("rep_counter_detect::session"), "detect::session");
        assert_eq!(logger.short_target("rep_counter"), "rep_counter");
        assert_eq!(logger.short_target("serde_json"), "serde_json");
    }

    #[test]
    fn foreign_targets_are_capped_at_warn() {
        let logger = CounterLogger {
            level: LevelFilter::Debug,
            started: Instant::now(),
        };
        let own = Metadata::builder()
            .level(Level::Debug)
            .target("rep_counter_detect")
            .build();
        let foreign = Metadata::builder()
            .level(Level::Info)
            .target("other_crate")
            .build();
        assert!(logger.enabled(&own));
        assert!(!logger.enabled(&foreign));
    }
}
