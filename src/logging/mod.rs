//! Injected logging capability.
//!
//! Pipeline components receive an `Arc<dyn Logger>` instead of calling a
//! process-wide logger. `FacadeLogger` forwards to the `log` crate (whose
//! backend `main.rs` installs once); `MemoryLogger` keeps lines in memory so
//! tests can assert on them without touching global state.

use std::fmt;
use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter};

use crate::config::LOG_TARGET;

/// Level-gated logging sink.
pub trait Logger: Send + Sync {
    /// Whether a message at `level` would be kept.
    fn enabled(&self, level: Level) -> bool;

    /// Writes a message. Callers normally go through the level helpers.
    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    fn error(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Level::Error) {
            self.log(Level::Error, args);
        }
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Level::Warn) {
            self.log(Level::Warn, args);
        }
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Level::Info) {
            self.log(Level::Info, args);
        }
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        if self.enabled(Level::Debug) {
            self.log(Level::Debug, args);
        }
    }
}

/// Forwards to the `log` facade under a fixed target.
#[derive(Debug, Clone)]
pub struct FacadeLogger {
    max_level: LevelFilter,
    target: &'static str,
}

impl FacadeLogger {
    pub fn new(max_level: LevelFilter) -> Self {
        FacadeLogger {
            max_level,
            target: LOG_TARGET,
        }
    }

    pub fn shared(max_level: LevelFilter) -> Arc<dyn Logger> {
        Arc::new(Self::new(max_level))
    }
}

impl Logger for FacadeLogger {
    fn enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: self.target, level, "{}", args);
    }
}

/// Keeps every accepted line in memory.
#[derive(Debug)]
pub struct MemoryLogger {
    max_level: LevelFilter,
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    pub fn new(max_level: LevelFilter) -> Self {
        MemoryLogger {
            max_level,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the captured lines.
    pub fn lines(&self) -> Vec<(Level, String)> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Captured messages at exactly `level`.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg)
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let line = args.to_string();
        match self.lines.lock() {
            Ok(mut lines) => lines.push((level, line)),
            Err(poisoned) => poisoned.into_inner().push((level, line)),
        }
    }
}
