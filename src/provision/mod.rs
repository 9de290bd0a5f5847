// ============================================================
// Layer 4 — Provisioning Steps
// ============================================================
// One module per step of an installer run, in run order:
//
//   environment.rs  — create the venv / conda environment
//       │
//       ▼
//   framework.rs    — install torch + torchvision for the device,
//       │             then an advisory import check
//       ▼
//   dependencies.rs — pip install -r requirements.txt
//       │
//       ▼
//   verify.rs       — final import check (fatal) and the
//                     next-steps guidance
//
// Each step talks only to the CommandRunner and StatusSink
// traits from Layer 3, so it can be driven by fakes in tests.

use crate::domain::command::{CommandOutput, CommandSpec};
use crate::domain::error::SetupError;
use crate::domain::traits::CommandRunner;

/// Environment creation and the PythonEnv handle
pub mod environment;

/// PyTorch / torchvision installation
pub mod framework;

/// requirements.txt installation
pub mod dependencies;

/// Import checks and next-step guidance
pub mod verify;

/// Run one command that must succeed. A spawn failure becomes
/// SetupError::Spawn, a non-zero exit SetupError::CommandFailed.
pub(crate) fn run_step(
    runner: &dyn CommandRunner,
    step:   &'static str,
    spec:   &CommandSpec,
) -> Result<CommandOutput, SetupError> {
    tracing::debug!("[{}] {}", step, spec);

    let out = runner.run(spec).map_err(|source| SetupError::Spawn {
        command: spec.to_string(),
        source,
    })?;

    if !out.success {
        tracing::debug!("[{}] exited with {:?}", step, out.code);
        return Err(SetupError::CommandFailed {
            step,
            command: spec.to_string(),
            code:    out.code,
        });
    }
    Ok(out)
}

// ─── Test Doubles ─────────────────────────────────────────────────────────────
// Shared by the unit tests of every provisioning step and of the
// application layer.
#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::PathBuf;

    use crate::domain::command::{CommandOutput, CommandSpec};
    use crate::domain::options::{Device, EnvKind, InstallOptions};
    use crate::domain::traits::{CommandRunner, Status, StatusSink};

    type Matcher = Box<dyn Fn(&CommandSpec) -> bool>;

    /// CommandRunner whose behaviour is scripted per command.
    /// Commands succeed with empty output unless a rule says otherwise.
    #[derive(Default)]
    pub struct ScriptedRunner {
        missing:   HashSet<String>,
        failures:  Vec<(Matcher, i32)>,
        responses: Vec<(Matcher, String)>,
        executed:  RefCell<Vec<CommandSpec>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pretend `program` is not installed
        pub fn missing(mut self, program: &str) -> Self {
            self.missing.insert(program.to_string());
            self
        }

        /// Exit with `code` for commands matching `pred`
        pub fn fail_when(mut self, pred: impl Fn(&CommandSpec) -> bool + 'static, code: i32) -> Self {
            self.failures.push((Box::new(pred), code));
            self
        }

        /// Return `stdout` for commands matching `pred`
        pub fn respond_when(
            mut self,
            pred:   impl Fn(&CommandSpec) -> bool + 'static,
            stdout: &str,
        ) -> Self {
            self.responses.push((Box::new(pred), stdout.to_string()));
            self
        }

        /// Commands that were run (probes excluded)
        pub fn executed(&self) -> Vec<CommandSpec> {
            self.executed.borrow().clone()
        }

        pub fn find(&self, pred: impl Fn(&CommandSpec) -> bool) -> Option<CommandSpec> {
            self.executed.borrow().iter().find(|c| pred(c)).cloned()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
            if self.missing.contains(&spec.program) {
                return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found"));
            }
            self.executed.borrow_mut().push(spec.clone());

            if let Some((_, code)) = self.failures.iter().find(|(m, _)| m(spec)) {
                return Ok(CommandOutput::failed(*code));
            }
            let stdout = self
                .responses
                .iter()
                .find(|(m, _)| m(spec))
                .map(|(_, s)| s.clone())
                .unwrap_or_default();
            Ok(CommandOutput::ok(stdout))
        }

        fn is_available(&self, program: &str) -> bool {
            !self.missing.contains(program)
        }
    }

    /// StatusSink that keeps everything it is sent.
    #[derive(Default)]
    pub struct RecordingSink {
        pub lines: RefCell<Vec<(Option<Status>, String)>>,
    }

    impl RecordingSink {
        pub fn contains(&self, level: Status, needle: &str) -> bool {
            self.lines
                .borrow()
                .iter()
                .any(|(l, m)| *l == Some(level) && m.contains(needle))
        }

        pub fn contains_warning(&self, needle: &str) -> bool {
            self.contains(Status::Warning, needle)
        }

        pub fn contains_plain(&self, needle: &str) -> bool {
            self.lines
                .borrow()
                .iter()
                .any(|(l, m)| l.is_none() && m.contains(needle))
        }
    }

    impl StatusSink for RecordingSink {
        fn status(&self, level: Status, message: &str) {
            self.lines.borrow_mut().push((Some(level), message.to_string()));
        }

        fn plain(&self, line: &str) {
            self.lines.borrow_mut().push((None, line.to_string()));
        }
    }

    /// Options with the documented defaults for the given env/device
    pub fn options(env: &str, device: &str) -> InstallOptions {
        InstallOptions {
            env_kind:       EnvKind::parse(env).unwrap(),
            device:         Device::resolve(device, "111").unwrap(),
            env_name:       "bert-env".to_string(),
            python_version: "3.8".to_string(),
            venv_dir:       PathBuf::from("venv"),
            requirements:   PathBuf::from("requirements.txt"),
            strict_verify:  false,
        }
    }
}
