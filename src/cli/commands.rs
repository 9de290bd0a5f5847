// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands:
//
//   install   — provision the environment (default when no
//               subcommand is given)
//   plan      — print the commands `install` would run
//   channels  — list the supported CUDA codes
//
// Enumerated options (--env, --device, --cuda) are taken as plain
// strings here and validated by InstallConfig::resolve, so a bad
// value is reported the same way no matter how it arrived.

use clap::{Args, Subcommand};

use crate::application::install_use_case::{
    InstallConfig, DEFAULT_DEVICE, DEFAULT_ENV_KIND, DEFAULT_ENV_NAME, DEFAULT_PYTHON_VERSION,
    DEFAULT_REQUIREMENTS, DEFAULT_VENV_DIR,
};
use crate::domain::accelerator::DEFAULT_CUDA_CODE;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the environment and install PyTorch plus project dependencies
    Install(InstallArgs),

    /// Show the commands `install` would run, without running them
    Plan(PlanArgs),

    /// List supported CUDA version codes
    Channels(ChannelsArgs),
}

/// Options shared by `install` and `plan`.
#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Environment manager: venv or conda
    #[arg(long, default_value = DEFAULT_ENV_KIND)]
    pub env: String,

    /// Build to install: cpu or gpu
    #[arg(long, default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// CUDA version code for --device gpu (see `channels`)
    #[arg(long, default_value = DEFAULT_CUDA_CODE)]
    pub cuda: String,

    /// Name of the conda environment (ignored for venv)
    #[arg(long, default_value = DEFAULT_ENV_NAME)]
    pub name: String,

    /// Python version pinned when creating a conda environment
    #[arg(long, default_value = DEFAULT_PYTHON_VERSION)]
    pub python_version: String,

    /// Directory for the virtual environment
    #[arg(long, default_value = DEFAULT_VENV_DIR)]
    pub venv_dir: String,

    /// Dependency manifest installed after PyTorch
    #[arg(long, default_value = DEFAULT_REQUIREMENTS)]
    pub requirements: String,

    /// Abort if the post-install PyTorch import check fails
    #[arg(long)]
    pub strict_verify: bool,
}

/// CLI args → application config. The application layer never
/// sees clap types.
impl From<InstallArgs> for InstallConfig {
    fn from(a: InstallArgs) -> Self {
        InstallConfig {
            env:            a.env,
            device:         a.device,
            cuda:           a.cuda,
            name:           a.name,
            python_version: a.python_version,
            venv_dir:       a.venv_dir,
            requirements:   a.requirements,
            strict_verify:  a.strict_verify,
        }
    }
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub install: InstallArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ChannelsArgs {
    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}
