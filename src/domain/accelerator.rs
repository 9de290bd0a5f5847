// ============================================================
// Layer 3 — Accelerator Channel Table
// ============================================================
// Static lookup from a short CUDA version code (what the user
// types on the command line) to the PyTorch download channel
// that serves matching GPU wheels.
//
//   code   channel   label
//   ----   -------   ---------
//   102    cu102     CUDA 10.2
//   111    cu111     CUDA 11.1   (default)
//   113    cu113     CUDA 11.3
//
// The channel doubles as the wheel local-version suffix:
//   torch==1.10.1+cu111  from  https://download.pytorch.org/whl/cu111
//
// The pinned framework versions live here too, because the set
// of valid channels is dictated by which builds upstream ships
// for exactly those versions.

use serde::Serialize;

/// PyTorch release installed by every run
pub const TORCH_VERSION: &str = "1.10.1";

/// torchvision release paired with TORCH_VERSION
pub const TORCHVISION_VERSION: &str = "0.11.2";

/// Root of the PyTorch wheel indices; a channel name is appended
pub const WHEEL_INDEX_ROOT: &str = "https://download.pytorch.org/whl";

/// Channel used for the CPU-only build
pub const CPU_CHANNEL: &str = "cpu";

/// Code used when `--cuda` is not given
pub const DEFAULT_CUDA_CODE: &str = "111";

/// One row of the accelerator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcceleratorChannel {
    /// Short code accepted on the command line, e.g. "111"
    pub code: &'static str,

    /// Download channel and wheel suffix, e.g. "cu111"
    pub channel: &'static str,

    /// Human readable toolkit name, e.g. "CUDA 11.1"
    pub label: &'static str,
}

impl AcceleratorChannel {
    /// Package index that serves this channel's wheels
    pub fn index_url(&self) -> String {
        index_url(self.channel)
    }

    /// True for the row selected when no code is supplied
    pub fn is_default(&self) -> bool {
        self.code == DEFAULT_CUDA_CODE
    }
}

/// Every supported CUDA code, in ascending toolkit order.
pub const ACCELERATOR_CHANNELS: &[AcceleratorChannel] = &[
    AcceleratorChannel { code: "102", channel: "cu102", label: "CUDA 10.2" },
    AcceleratorChannel { code: "111", channel: "cu111", label: "CUDA 11.1" },
    AcceleratorChannel { code: "113", channel: "cu113", label: "CUDA 11.3" },
];

/// Look up a CUDA code. Returns None for anything outside the table.
pub fn lookup(code: &str) -> Option<&'static AcceleratorChannel> {
    ACCELERATOR_CHANNELS.iter().find(|c| c.code == code)
}

/// Comma separated list of supported codes, for error messages
pub fn supported_codes() -> String {
    ACCELERATOR_CHANNELS
        .iter()
        .map(|c| c.code)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Index URL for an arbitrary channel name ("cpu", "cu111", ...)
pub fn index_url(channel: &str) -> String {
    format!("{WHEEL_INDEX_ROOT}/{channel}")
}
