// ============================================================
// Layer 4 — Dependency Installer
// ============================================================
// Installs the rest of the project's Python dependencies
// (transformers, scikit-learn, tqdm, ...) from the manifest:
//
//   <env python> -m pip install -r requirements.txt
//
// The manifest path is resolved relative to the directory the
// installer was started from. A missing manifest is reported
// before pip is ever started.

use std::path::Path;

use crate::domain::error::SetupError;
use crate::domain::traits::{CommandRunner, StatusSink};
use crate::provision::environment::PythonEnv;
use crate::provision::run_step;

pub struct DependencyInstaller<'a> {
    runner: &'a dyn CommandRunner,
    sink:   &'a dyn StatusSink,
    /// Check the manifest exists on disk first (off for dry runs)
    check_manifest: bool,
}

impl<'a> DependencyInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, sink: &'a dyn StatusSink) -> Self {
        Self { runner, sink, check_manifest: true }
    }

    pub fn check_manifest(mut self, enabled: bool) -> Self {
        self.check_manifest = enabled;
        self
    }

    /// Install every requirement in `manifest`. Fatal on failure.
    pub fn install(&self, env: &PythonEnv, manifest: &Path) -> Result<(), SetupError> {
        if self.check_manifest && !manifest.is_file() {
            return Err(SetupError::ManifestNotFound(manifest.to_path_buf()));
        }

        self.sink.info(&format!(
            "Installing project dependencies from '{}'...",
            manifest.display()
        ));
        let spec = env.pip_install(["-r".to_string(), manifest.to_string_lossy().into_owned()]);
        run_step(self.runner, "dependency installation", &spec)?;

        self.sink.success("Project dependencies installed");
        Ok(())
    }
}
