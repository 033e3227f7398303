#![cfg(feature = "std")]
//! Stderr logger behind the `log` facade.
//!
//! `SEABATTLE_LOG` sets the level for this crate's own records
//! (`error`, `warn`, `info`, `debug`, `trace`, `off`; default `info`).
//! Records from other crates only get through at `warn` and above.

use std::env;

use log::{Level, LevelFilter, Metadata, Record};

pub const LOG_ENV: &str = "SEABATTLE_LOG";

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

struct StderrLogger {
    level: LevelFilter,
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.target().starts_with(CRATE_TARGET) {
            metadata.level() <= self.level
        } else {
            metadata.level() <= Level::Warn
        }
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let target = record
                .target()
                .strip_prefix(CRATE_TARGET)
                .map(|t| t.trim_start_matches("::"))
                .unwrap_or(record.target());
            eprintln!("{:<5} [{}] {}", record.level(), target, record.args());
        }
    }

    fn flush(&self) {}
}

fn level_from(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|lvl| lvl.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the stderr logger. Calling it again is harmless: the first
/// logger stays in place.
pub fn init_logging() {
    let level = level_from(env::var(LOG_ENV).ok().as_deref());
    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level.max(LevelFilter::Warn));
    }
}
