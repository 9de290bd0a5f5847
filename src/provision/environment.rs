// ============================================================
// Layer 4 — Environment Provisioner
// ============================================================
// Produces the isolated Python environment every later install
// goes into. Two paths:
//
//   venv  — find a base interpreter (python3 / python),
//           `<base> -m venv <dir>`
//
//   conda — check `conda` is reachable,
//           `conda create -y -n <name> python=<version>`
//
// A child process cannot activate an environment in its parent's
// shell, so "activation" is expressed as a PythonEnv handle that
// knows how to invoke the environment's own interpreter:
//
//   venv   <dir>/bin/python            (Unix)
//          <dir>\Scripts\python.exe    (Windows)
//   conda  conda run -n <name> --no-capture-output python
//
// Every pip call afterwards is `<that interpreter> -m pip ...`,
// which pins installs to the provisioned environment.

use std::path::{Path, PathBuf};

use crate::domain::command::CommandSpec;
use crate::domain::error::SetupError;
use crate::domain::options::{EnvKind, InstallOptions};
use crate::domain::traits::{CommandRunner, StatusSink};
use crate::provision::run_step;

/// Download page shown when no base interpreter is found
pub const PYTHON_DOWNLOAD_URL: &str = "https://www.python.org/downloads/";

/// Download page shown when conda is missing
pub const CONDA_DOWNLOAD_URL: &str = "https://docs.conda.io/en/latest/miniconda.html";

/// Tool name used in status lines and errors
pub const CONDA_PROGRAM: &str = "conda";

/// conda launchers probed in order. On Windows conda ships as a
/// batch script, which process spawning does not resolve from a
/// bare `conda`.
pub fn conda_candidates() -> &'static [&'static str] {
    if cfg!(windows) {
        &["conda", "conda.bat"]
    } else {
        &["conda"]
    }
}

/// Base interpreters probed for the venv path, in order
pub fn base_python_candidates() -> &'static [&'static str] {
    if cfg!(windows) {
        &["python", "python3"]
    } else {
        &["python3", "python"]
    }
}

/// Interpreter inside a virtual environment directory
pub fn venv_python(dir: &Path) -> PathBuf {
    if cfg!(windows) {
        dir.join("Scripts").join("python.exe")
    } else {
        dir.join("bin").join("python")
    }
}

// ─── PythonEnv ────────────────────────────────────────────────────────────────
/// A provisioned environment, as a way of running its interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PythonEnv {
    Venv { dir: PathBuf },
    /// `program` is the conda launcher that answered the probe
    Conda { name: String, program: String },
}

impl PythonEnv {
    pub fn kind(&self) -> EnvKind {
        match self {
            Self::Venv { .. }  => EnvKind::Venv,
            Self::Conda { .. } => EnvKind::Conda,
        }
    }

    /// Command that starts this environment's interpreter, ready
    /// for interpreter arguments to be appended.
    pub fn interpreter(&self) -> CommandSpec {
        match self {
            Self::Venv { dir } => {
                CommandSpec::new(venv_python(dir).to_string_lossy().into_owned())
            }
            Self::Conda { name, program } => CommandSpec::new(program.as_str())
                .args(["run", "-n"])
                .arg(name.as_str())
                .args(["--no-capture-output", "python"]),
        }
    }

    /// `<interpreter> -m pip install <args>`
    pub fn pip_install<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interpreter().args(["-m", "pip", "install"]).args(args)
    }

    /// `<interpreter> -c <script>`, stdout captured
    pub fn python_script(&self, script: &str) -> CommandSpec {
        self.interpreter().arg("-c").arg(script).captured()
    }

    /// What the user types later to enter this environment
    pub fn activation_command(&self) -> String {
        match self {
            Self::Venv { dir } if cfg!(windows) => {
                format!("{}", dir.join("Scripts").join("activate").display())
            }
            Self::Venv { dir } => {
                format!("source {}", dir.join("bin").join("activate").display())
            }
            Self::Conda { name, .. } => format!("conda activate {name}"),
        }
    }
}

// ─── EnvironmentProvisioner ───────────────────────────────────────────────────
/// Creates the environment chosen in InstallOptions.
pub struct EnvironmentProvisioner<'a> {
    runner: &'a dyn CommandRunner,
    sink:   &'a dyn StatusSink,
}

impl<'a> EnvironmentProvisioner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, sink: &'a dyn StatusSink) -> Self {
        Self { runner, sink }
    }

    /// Create the environment and upgrade its pip.
    pub fn provision(&self, opts: &InstallOptions) -> Result<PythonEnv, SetupError> {
        let env = match opts.env_kind {
            EnvKind::Venv  => self.create_venv(&opts.venv_dir)?,
            EnvKind::Conda => self.create_conda(&opts.env_name, &opts.python_version)?,
        };
        self.upgrade_pip(&env);
        Ok(env)
    }

    fn create_venv(&self, dir: &Path) -> Result<PythonEnv, SetupError> {
        self.sink.info("Checking for a Python interpreter...");
        let base = base_python_candidates()
            .iter()
            .copied()
            .find(|p| self.runner.is_available(p))
            .ok_or_else(|| {
                SetupError::missing_tool(
                    "python",
                    format!(
                        "install Python 3 from {PYTHON_DOWNLOAD_URL} and make sure it is on PATH"
                    ),
                )
            })?;
        tracing::info!("Using base interpreter '{}'", base);

        self.sink.info(&format!("Creating virtual environment in '{}'...", dir.display()));
        let create = CommandSpec::new(base)
            .args(["-m", "venv"])
            .arg(dir.to_string_lossy().into_owned());
        run_step(self.runner, "virtual environment creation", &create)?;

        self.sink.success(&format!("Virtual environment ready: {}", dir.display()));
        Ok(PythonEnv::Venv { dir: dir.to_path_buf() })
    }

    fn create_conda(&self, name: &str, python_version: &str) -> Result<PythonEnv, SetupError> {
        self.sink.info("Checking for conda...");
        let program = conda_candidates()
            .iter()
            .copied()
            .find(|p| self.runner.is_available(p))
            .ok_or_else(|| {
                SetupError::missing_tool(
                    CONDA_PROGRAM,
                    format!(
                        "install Miniconda or Anaconda from {CONDA_DOWNLOAD_URL}, \
                         then open a new shell"
                    ),
                )
            })?;
        tracing::debug!("Using conda launcher: {}", program);

        self.sink.info(&format!(
            "Creating conda environment '{name}' with Python {python_version}..."
        ));
        let create = CommandSpec::new(program)
            .args(["create", "-y", "-n"])
            .arg(name)
            .arg(format!("python={python_version}"));
        run_step(self.runner, "conda environment creation", &create)?;

        self.sink.success(&format!("Conda environment ready: {name}"));
        Ok(PythonEnv::Conda { name: name.to_string(), program: program.to_string() })
    }

    // An old pip still installs the pinned wheels, so failure here only warns
    fn upgrade_pip(&self, env: &PythonEnv) {
        self.sink.info("Upgrading pip...");
        let upgrade = env.pip_install(["--upgrade", "pip"]);
        if let Err(e) = run_step(self.runner, "pip upgrade", &upgrade) {
            tracing::warn!("pip upgrade failed: {}", e);
            self.sink.warn(&format!("Could not upgrade pip ({e}); continuing"));
        }
    }
}
