//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro that only prints with `--verbose`
//! - `Tally` for the per-disposition counters printed after a build
//!
//! # Example
//!
//! ```ignore
//! log!("build"; "routing {} assets", count);
//!
//! let tally = Tally::new(&["inlined", "emitted", "passed"]);
//! tally.inc("emitted");
//! tally.finish();
//! ```

use owo_colors::OwoColorize;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "build" => prefix.bright_blue().bold().to_string(),
        "emit" | "copy" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Tally (named counters, printed once)
// ============================================================================

/// Named counters shared across worker threads.
///
/// Counters are fixed at construction; `inc` on an unknown name is a no-op.
pub struct Tally {
    counters: Vec<Counter>,
}

struct Counter {
    name: &'static str,
    current: AtomicUsize,
}

impl Tally {
    pub fn new(names: &[&'static str]) -> Self {
        let counters = names
            .iter()
            .map(|&name| Counter {
                name,
                current: AtomicUsize::new(0),
            })
            .collect();
        Self { counters }
    }

    /// Increment the counter with the given name.
    #[inline]
    pub fn inc(&self, name: &str) {
        self.add(name, 1);
    }

    /// Add `n` to the counter with the given name.
    pub fn add(&self, name: &str, n: usize) {
        if let Some(counter) = self.counters.iter().find(|c| c.name == name) {
            counter.current.fetch_add(n, Ordering::Relaxed);
        }
    }

    /// Current value of a counter (0 if unknown).
    pub fn get(&self, name: &str) -> usize {
        self.counters
            .iter()
            .find(|c| c.name == name)
            .map_or(0, |c| c.current.load(Ordering::Relaxed))
    }

    /// Render as `name(count)` pairs, skipping zero counters.
    pub fn line(&self) -> String {
        let parts: Vec<_> = self
            .counters
            .iter()
            .map(|c| (c.name, c.current.load(Ordering::Relaxed)))
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| format!("{name}({n})"))
            .collect();

        if parts.is_empty() {
            "nothing to do".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Print the final counts under the `build` prefix.
    pub fn finish(self) {
        log("build", &self.line());
    }
}

// ============================================================================
// Tests
// ============================================================================
