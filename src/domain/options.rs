// ============================================================
// Layer 3 — Install Options
// ============================================================
// The validated form of everything the user can choose.
// Raw strings from the command line are turned into these types
// exactly once, before any external command runs; after that the
// options are read-only for the rest of the run.
//
//   EnvKind     venv | conda
//   DeviceKind  cpu  | gpu
//   Device      cpu  | gpu + accelerator channel row
//
// Only a GPU device carries an accelerator channel, so "GPU
// without a valid CUDA code" cannot be represented.

use serde::Serialize;
use std::{fmt, path::PathBuf};

use crate::domain::accelerator::{self, AcceleratorChannel};
use crate::domain::error::SetupError;

// ─── EnvKind ──────────────────────────────────────────────────────────────────
/// Which tool provisions the isolated Python environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvKind {
    /// `python -m venv` in a directory under the project
    Venv,
    /// A named conda environment with a pinned interpreter
    Conda,
}

impl EnvKind {
    pub const ALLOWED: &'static str = "venv, conda";

    pub fn parse(value: &str) -> Result<Self, SetupError> {
        match value {
            "venv"  => Ok(Self::Venv),
            "conda" => Ok(Self::Conda),
            other   => Err(SetupError::invalid_argument("--env", other, Self::ALLOWED)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Venv  => "venv",
            Self::Conda => "conda",
        }
    }
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── DeviceKind ───────────────────────────────────────────────────────────────
/// Which PyTorch build family to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Cpu,
    Gpu,
}

impl DeviceKind {
    pub const ALLOWED: &'static str = "cpu, gpu";

    pub fn parse(value: &str) -> Result<Self, SetupError> {
        match value {
            "cpu" => Ok(Self::Cpu),
            "gpu" => Ok(Self::Gpu),
            other => Err(SetupError::invalid_argument("--device", other, Self::ALLOWED)),
        }
    }
}

// ─── Device ───────────────────────────────────────────────────────────────────
/// Resolved device choice. The GPU arm holds the table row for
/// the requested CUDA code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Gpu {
        accelerator: &'static AcceleratorChannel,
    },
}

impl Device {
    /// Build a Device from the two raw options. The CUDA code is
    /// only looked at when the device is a GPU.
    pub fn resolve(device: &str, cuda_code: &str) -> Result<Self, SetupError> {
        match DeviceKind::parse(device)? {
            DeviceKind::Cpu => Ok(Self::Cpu),
            DeviceKind::Gpu => {
                let accelerator = accelerator::lookup(cuda_code).ok_or_else(|| {
                    SetupError::invalid_argument("--cuda", cuda_code, accelerator::supported_codes())
                })?;
                Ok(Self::Gpu { accelerator })
            }
        }
    }

    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Cpu        => DeviceKind::Cpu,
            Self::Gpu { .. } => DeviceKind::Gpu,
        }
    }

    /// Wheel channel: "cpu" or the accelerator's "cuXYZ"
    pub fn channel(&self) -> &'static str {
        match self {
            Self::Cpu                => accelerator::CPU_CHANNEL,
            Self::Gpu { accelerator } => accelerator.channel,
        }
    }

    /// Human readable target, used in status lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cpu                => "CPU",
            Self::Gpu { accelerator } => accelerator.label,
        }
    }

    pub fn accelerator(&self) -> Option<&'static AcceleratorChannel> {
        match self {
            Self::Cpu                => None,
            Self::Gpu { accelerator } => Some(*accelerator),
        }
    }
}

// ─── InstallOptions ───────────────────────────────────────────────────────────
/// Fully validated settings for one installer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallOptions {
    /// Environment manager to use
    pub env_kind: EnvKind,

    /// Framework build target
    pub device: Device,

    /// conda environment name (unused for venv)
    pub env_name: String,

    /// Interpreter version pinned when creating a conda environment
    pub python_version: String,

    /// Directory of the virtual environment (unused for conda)
    pub venv_dir: PathBuf,

    /// Dependency manifest installed after the framework
    pub requirements: PathBuf,

    /// Treat a failed post-framework import check as fatal
    pub strict_verify: bool,
}
