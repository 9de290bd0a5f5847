// ============================================================
// Layer 6 — Console Output
// ============================================================
// Coloured status lines for the person running the installer:
//
//   [INFO]     cyan    → stdout
//   [SUCCESS]  green   → stdout
//   [WARNING]  yellow  → stderr
//   [ERROR]    red     → stderr
//
// Colour is plain ANSI SGR and is switched off by --no-color or
// by a non-empty NO_COLOR environment variable.
//
// These lines are separate from tracing output: tracing is the
// diagnostic log (stderr, filtered by RUST_LOG / -v), the console
// is the run's narrative.

use std::io::Write;

use crate::domain::traits::{Status, StatusSink};

const RESET: &str = "\x1b[0m";

/// Terminal status reporter.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
}

impl Console {
    /// Create a console; `no_color` forces plain output.
    pub fn new(no_color: bool) -> Self {
        let env_disabled = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self { color: !no_color && !env_disabled }
    }

    /// Render one status line, without the trailing newline
    pub fn format(&self, level: Status, message: &str) -> String {
        let (tag, sgr) = match level {
            Status::Info    => ("INFO",    "\x1b[36m"),
            Status::Success => ("SUCCESS", "\x1b[32m"),
            Status::Warning => ("WARNING", "\x1b[33m"),
            Status::Error   => ("ERROR",   "\x1b[31m"),
        };
        if self.color {
            format!("{sgr}[{tag}]{RESET} {message}")
        } else {
            format!("[{tag}] {message}")
        }
    }

    /// Remediation text under an error line (stderr)
    pub fn hint(&self, text: &str) {
        let _ = writeln!(std::io::stderr().lock(), "        hint: {text}");
    }
}

impl StatusSink for Console {
    fn status(&self, level: Status, message: &str) {
        let line = self.format(level, message);
        // A closed pipe is not worth aborting an install over
        match level {
            Status::Info | Status::Success => {
                let _ = writeln!(std::io::stdout().lock(), "{line}");
            }
            Status::Warning | Status::Error => {
                let _ = writeln!(std::io::stderr().lock(), "{line}");
            }
        }
    }

    fn plain(&self, line: &str) {
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    }
}

/// Discards everything. Used while building a plan so the
/// plan itself is the only thing on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl StatusSink for SilentSink {
    fn status(&self, _level: Status, _message: &str) {}
    fn plain(&self, _line: &str) {}
}
