// ============================================================
// Layer 2 — InstallUseCase
// ============================================================
// Runs the installer as a strict linear chain:
//
//   Step 0: Resolve arguments     (InstallConfig::resolve)
//   Step 1: Provision environment (Layer 4 - environment)
//   Step 2: Install framework     (Layer 4 - framework)
//           + advisory import check
//   Step 3: Install dependencies  (Layer 4 - dependencies)
//   Step 4: Verify and guide      (Layer 4 - verify)
//
// The first error ends the run (Aborted). Nothing is retried and
// nothing already done is rolled back. Reaching the end is the
// Completed state.

use std::{fmt, path::PathBuf};

use crate::domain::accelerator::DEFAULT_CUDA_CODE;
use crate::domain::error::SetupError;
use crate::domain::options::{Device, EnvKind, InstallOptions};
use crate::domain::traits::{CommandRunner, StatusSink};
use crate::provision::{
    dependencies::DependencyInstaller,
    environment::{EnvironmentProvisioner, PythonEnv},
    framework::FrameworkInstaller,
    verify::{ImportReport, VerificationReporter},
};

pub const DEFAULT_ENV_KIND:       &str = "venv";
pub const DEFAULT_DEVICE:         &str = "cpu";
pub const DEFAULT_ENV_NAME:       &str = "bert-env";
pub const DEFAULT_PYTHON_VERSION: &str = "3.8";
pub const DEFAULT_VENV_DIR:       &str = "venv";
pub const DEFAULT_REQUIREMENTS:   &str = "requirements.txt";

// ─── Install Configuration ───────────────────────────────────────────────────
// Raw, unvalidated choices exactly as the user gave them.
// resolve() turns them into InstallOptions or rejects the run
// before anything is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    pub env:            String,
    pub device:         String,
    pub cuda:           String,
    pub name:           String,
    pub python_version: String,
    pub venv_dir:       String,
    pub requirements:   String,
    pub strict_verify:  bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            env:            DEFAULT_ENV_KIND.to_string(),
            device:         DEFAULT_DEVICE.to_string(),
            cuda:           DEFAULT_CUDA_CODE.to_string(),
            name:           DEFAULT_ENV_NAME.to_string(),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            venv_dir:       DEFAULT_VENV_DIR.to_string(),
            requirements:   DEFAULT_REQUIREMENTS.to_string(),
            strict_verify:  false,
        }
    }
}

impl InstallConfig {
    /// Validate every enumerated option. No side effects.
    pub fn resolve(&self) -> Result<InstallOptions, SetupError> {
        let env_kind = EnvKind::parse(&self.env)?;
        let device   = Device::resolve(&self.device, &self.cuda)?;

        if env_kind == EnvKind::Conda && self.name.trim().is_empty() {
            return Err(SetupError::invalid_argument("--name", &self.name, "a non-empty name"));
        }

        Ok(InstallOptions {
            env_kind,
            device,
            env_name:       self.name.clone(),
            python_version: self.python_version.clone(),
            venv_dir:       PathBuf::from(&self.venv_dir),
            requirements:   PathBuf::from(&self.requirements),
            strict_verify:  self.strict_verify,
        })
    }
}

// ─── Stage ────────────────────────────────────────────────────────────────────
/// The side-effecting steps of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ProvisionEnvironment,
    InstallFramework,
    InstallDependencies,
    VerifyAndGuide,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::ProvisionEnvironment,
        Stage::InstallFramework,
        Stage::InstallDependencies,
        Stage::VerifyAndGuide,
    ];

    /// 1-based position, for "[2/4]" style headers
    pub fn number(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).map_or(0, |i| i + 1)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ProvisionEnvironment => "Provision Python environment",
            Self::InstallFramework     => "Install PyTorch",
            Self::InstallDependencies  => "Install project dependencies",
            Self::VerifyAndGuide       => "Verify installation",
        };
        f.write_str(name)
    }
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub env:       PythonEnv,
    /// None when the advisory framework check failed
    pub framework: Option<ImportReport>,
    pub packages:  ImportReport,
}

// ─── InstallUseCase ───────────────────────────────────────────────────────────
pub struct InstallUseCase<'a> {
    options: InstallOptions,
    runner:  &'a dyn CommandRunner,
    sink:    &'a dyn StatusSink,
    /// Look for the manifest on disk (off when planning)
    check_files: bool,
}

impl<'a> InstallUseCase<'a> {
    pub fn new(
        options: InstallOptions,
        runner:  &'a dyn CommandRunner,
        sink:    &'a dyn StatusSink,
    ) -> Self {
        Self { options, runner, sink, check_files: true }
    }

    pub fn check_files(mut self, enabled: bool) -> Self {
        self.check_files = enabled;
        self
    }

    /// Run every step in order, stopping at the first failure.
    pub fn execute(&self) -> Result<InstallReport, SetupError> {
        let opts = &self.options;
        tracing::info!(
            "Starting install: env={} device={} name={}",
            opts.env_kind,
            opts.device.channel(),
            opts.env_name
        );

        // ── Step 1: Environment ──────────────────────────────────────────────
        self.enter(Stage::ProvisionEnvironment);
        let env = EnvironmentProvisioner::new(self.runner, self.sink).provision(opts)?;

        // ── Step 2: Framework ────────────────────────────────────────────────
        self.enter(Stage::InstallFramework);
        let framework = FrameworkInstaller::new(self.runner, self.sink);
        framework.install(&env, &opts.device)?;
        let framework_report = framework.check(&env, &opts.device, opts.strict_verify)?;

        // ── Step 3: Dependencies ─────────────────────────────────────────────
        self.enter(Stage::InstallDependencies);
        DependencyInstaller::new(self.runner, self.sink)
            .check_manifest(self.check_files)
            .install(&env, &opts.requirements)?;

        // ── Step 4: Verification + guidance ──────────────────────────────────
        self.enter(Stage::VerifyAndGuide);
        let reporter = VerificationReporter::new(self.runner, self.sink);
        let packages = reporter.final_check(&env)?;
        reporter.report_success(&env, &opts.device);

        tracing::info!("Install completed");
        Ok(InstallReport {
            env,
            framework: framework_report,
            packages,
        })
    }

    fn enter(&self, stage: Stage) {
        tracing::info!("Stage {}/{}: {}", stage.number(), Stage::ALL.len(), stage);
        self.sink.plain("");
        self.sink.plain(&format!("==> [{}/{}] {}", stage.number(), Stage::ALL.len(), stage));
    }
}
