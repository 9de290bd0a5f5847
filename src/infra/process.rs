// ============================================================
// Layer 6 — Process Runners
// ============================================================
// Two implementations of the CommandRunner trait:
//
//   SystemRunner — spawns the program with std::process::Command,
//                  no shell, blocking until it exits. Streaming
//                  commands inherit the terminal so pip / conda
//                  progress stays visible; captured commands have
//                  their stdout collected for parsing.
//
//   DryRunRunner — spawns nothing. Records every command it is
//                  handed and reports success, and claims every
//                  tool is installed. Backs the `plan` command.
//
// No timeout is applied: a run blocks on each command until the
// command finishes.

use std::{
    cell::RefCell,
    process::{Command, Stdio},
};

use crate::domain::command::{CommandOutput, CommandSpec};
use crate::domain::traits::CommandRunner;

// ─── SystemRunner ─────────────────────────────────────────────────────────────
/// Runs commands on the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        tracing::debug!("exec: {}", spec);

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).stdin(Stdio::null());

        if spec.capture {
            // Keep stderr on the terminal so import tracebacks are visible
            let output = cmd.stderr(Stdio::inherit()).output()?;
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            tracing::debug!(
                "exit {:?} from '{}' ({} bytes captured)",
                output.status.code(),
                spec.program,
                stdout.len()
            );
            return Ok(CommandOutput {
                success: output.status.success(),
                code:    output.status.code(),
                stdout,
            });
        }

        let status = cmd
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        tracing::debug!("exit {:?} from '{}'", status.code(), spec.program);

        Ok(CommandOutput {
            success: status.success(),
            code:    status.code(),
            stdout:  String::new(),
        })
    }
}

// ─── DryRunRunner ─────────────────────────────────────────────────────────────
/// Records commands instead of running them.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    recorded: RefCell<Vec<CommandSpec>>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command handed to `run`, in call order
    pub fn into_commands(self) -> Vec<CommandSpec> {
        self.recorded.into_inner()
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        tracing::debug!("plan: {}", spec);
        self.recorded.borrow_mut().push(spec.clone());
        Ok(CommandOutput::ok(""))
    }

    // Tool probes are not part of the plan
    fn is_available(&self, _program: &str) -> bool {
        true
    }
}
