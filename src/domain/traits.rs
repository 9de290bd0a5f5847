// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The provisioning steps never touch std::process or the
// terminal directly. They talk to these two seams:
//
//   CommandRunner  — runs an external command to completion
//                    (SystemRunner spawns it for real,
//                     DryRunRunner only records it)
//
//   StatusSink     — receives the user-facing status lines
//                    (Console colours them onto the terminal)
//
// Tests plug in scripted fakes for both, so every branch of the
// pipeline can be exercised without python or conda installed.

use crate::domain::command::{CommandOutput, CommandSpec};

// ─── CommandRunner ────────────────────────────────────────────────────────────
/// Anything that can execute a CommandSpec and report how it ended.
pub trait CommandRunner {
    /// Run the command and block until it exits.
    ///
    /// An Err means the process could not be started at all
    /// (program missing, permission denied). A process that starts
    /// and exits non-zero is an Ok with `success == false`.
    fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput>;

    /// True when `program --version` starts and exits zero.
    fn is_available(&self, program: &str) -> bool {
        let probe = CommandSpec::new(program).arg("--version").captured();
        matches!(self.run(&probe), Ok(out) if out.success)
    }
}

// ─── StatusSink ───────────────────────────────────────────────────────────────
/// Severity of a user-facing status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Info,
    Success,
    Warning,
    Error,
}

/// Destination for status lines and free-form report text.
pub trait StatusSink {
    /// Emit one status line at the given severity
    fn status(&self, level: Status, message: &str);

    /// Emit an unadorned line (section bodies, instructions)
    fn plain(&self, line: &str);

    fn info(&self, message: &str) {
        self.status(Status::Info, message);
    }

    fn success(&self, message: &str) {
        self.status(Status::Success, message);
    }

    fn warn(&self, message: &str) {
        self.status(Status::Warning, message);
    }

    fn error(&self, message: &str) {
        self.status(Status::Error, message);
    }
}
