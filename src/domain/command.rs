// ============================================================
// Layer 3 — External Command Description
// ============================================================
// A CommandSpec is a plain description of one external program
// invocation: program, arguments, and whether stdout should be
// captured (import checks) or streamed to the terminal (pip,
// conda, venv creation). Nothing here spawns a process; that is
// the job of a CommandRunner in Layer 6.

use serde::Serialize;
use std::fmt;

/// One external command to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,

    /// Arguments, passed verbatim (no shell involved)
    pub args: Vec<String>,

    /// Capture stdout instead of inheriting the terminal
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub capture: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args:    Vec::new(),
            capture: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Mark this command's stdout for capture
    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    /// True when any argument equals `needle` exactly
    pub fn has_arg(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a == needle)
    }
}

/// Renders the command roughly as a shell would show it, quoting
/// arguments that contain whitespace or quotes.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    if !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        return s.to_string();
    }
    format!("\"{}\"", s.replace('"', "\\\""))
}

/// Result of running a CommandSpec to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status was zero
    pub success: bool,

    /// Exit status, None when killed by a signal
    pub code: Option<i32>,

    /// Captured stdout (empty unless the command asked for capture)
    pub stdout: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { success: true, code: Some(0), stdout: stdout.into() }
    }

    pub fn failed(code: i32) -> Self {
        Self { success: false, code: Some(code), stdout: String::new() }
    }
}
