// ============================================================
// Layer 4 — Framework Installer
// ============================================================
// Installs the pinned PyTorch + torchvision build for the device:
//
//   cpu  → torch==1.10.1+cpu    torchvision==0.11.2+cpu
//          --extra-index-url https://download.pytorch.org/whl/cpu
//
//   gpu  → torch==1.10.1+cu111  torchvision==0.11.2+cu111
//          --extra-index-url https://download.pytorch.org/whl/cu111
//          (channel taken from the accelerator table)
//
// The index is passed as an *extra* index so that torch's own
// dependencies (numpy, pillow, typing-extensions) still resolve
// from PyPI.
//
// After installing, a short import check reports the versions and
// whether CUDA is visible. That check is advisory: a failure only
// warns, unless --strict-verify was given.

use crate::domain::accelerator::{self, TORCHVISION_VERSION, TORCH_VERSION};
use crate::domain::command::CommandSpec;
use crate::domain::error::SetupError;
use crate::domain::options::{Device, DeviceKind};
use crate::domain::traits::{CommandRunner, StatusSink};
use crate::provision::environment::PythonEnv;
use crate::provision::run_step;
use crate::provision::verify::ImportReport;

/// Reports framework versions and CUDA visibility
pub const FRAMEWORK_CHECK_SCRIPT: &str = "\
import torch, torchvision
print('torch:', torch.__version__)
print('torchvision:', torchvision.__version__)
print('cuda_available:', torch.cuda.is_available())
if torch.cuda.is_available():
    print('device:', torch.cuda.get_device_name(0))
";

/// The pip command that installs the framework for `device`.
pub fn install_command(env: &PythonEnv, device: &Device) -> CommandSpec {
    let channel = device.channel();
    env.pip_install([
        format!("torch=={TORCH_VERSION}+{channel}"),
        format!("torchvision=={TORCHVISION_VERSION}+{channel}"),
        "--extra-index-url".to_string(),
        accelerator::index_url(channel),
    ])
}

pub struct FrameworkInstaller<'a> {
    runner: &'a dyn CommandRunner,
    sink:   &'a dyn StatusSink,
}

impl<'a> FrameworkInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, sink: &'a dyn StatusSink) -> Self {
        Self { runner, sink }
    }

    /// Install torch and torchvision. Fatal on failure.
    pub fn install(&self, env: &PythonEnv, device: &Device) -> Result<(), SetupError> {
        self.sink.info(&format!(
            "Installing PyTorch {TORCH_VERSION} ({}) ...",
            device.label()
        ));
        if let Some(acc) = device.accelerator() {
            tracing::info!("CUDA code {} → channel {}", acc.code, acc.channel);
        }

        run_step(self.runner, "PyTorch installation", &install_command(env, device))?;

        self.sink.success(&format!("PyTorch {TORCH_VERSION} installed"));
        Ok(())
    }

    /// Import the framework and print what it reports.
    ///
    /// Returns Ok(None) when the check failed but `strict` is off.
    pub fn check(
        &self,
        env:    &PythonEnv,
        device: &Device,
        strict: bool,
    ) -> Result<Option<ImportReport>, SetupError> {
        self.sink.info("Checking the PyTorch installation...");

        let spec = env.python_script(FRAMEWORK_CHECK_SCRIPT);
        let code = match self.runner.run(&spec) {
            Ok(out) if out.success => {
                let report = ImportReport::parse(&out.stdout);
                report.print_to(self.sink);
                self.warn_if_no_cuda(device, &report);
                return Ok(Some(report));
            }
            Ok(out) => out.code,
            Err(e) => {
                tracing::warn!("framework check could not start: {}", e);
                None
            }
        };

        if strict {
            return Err(SetupError::VerificationFailed { check: "PyTorch import", code });
        }
        self.sink.warn("PyTorch import check failed; continuing (use --strict-verify to abort)");
        Ok(None)
    }

    fn warn_if_no_cuda(&self, device: &Device, report: &ImportReport) {
        if device.kind() == DeviceKind::Gpu && report.flag("cuda_available") == Some(false) {
            self.sink.warn(&format!(
                "{} build installed but torch cannot see a CUDA device",
                device.label()
            ));
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::testing::{RecordingSink, ScriptedRunner};

    fn env() -> PythonEnv {
        PythonEnv::Conda { name: "bert-env".into(), program: "conda".into() }
    }

    #[test]
    fn test_cpu_command_uses_cpu_index() {
        let spec = install_command(&env(), &Device::Cpu);
        assert!(spec.has_arg("torch==1.10.1+cpu"));
        assert!(spec.has_arg("torchvision==0.11.2+cpu"));
        assert!(spec.has_arg("https://download.pytorch.org/whl/cpu"));
    }

    #[test]
    fn test_gpu_command_uses_channel_index() {
        let device = Device::resolve("gpu", "102").unwrap();
        let spec   = install_command(&env(), &device);
        assert!(spec.has_arg("torch==1.10.1+cu102"));
        assert!(spec.has_arg("https://download.pytorch.org/whl/cu102"));
    }

    #[test]
    fn test_install_failure_is_fatal() {
        let runner = ScriptedRunner::new().fail_when(|c| c.has_arg("torch==1.10.1+cpu"), 1);
        let sink   = RecordingSink::default();
        let err    = FrameworkInstaller::new(&runner, &sink)
            .install(&env(), &Device::Cpu)
            .unwrap_err();
        assert!(matches!(err, SetupError::CommandFailed { .. }));
    }

    #[test]
    fn test_check_failure_is_advisory_by_default() {
        let runner = ScriptedRunner::new().fail_when(|c| c.capture, 1);
        let sink   = RecordingSink::default();
        let result = FrameworkInstaller::new(&runner, &sink)
            .check(&env(), &Device::Cpu, false)
            .unwrap();
        assert!(result.is_none());
        assert!(sink.contains_warning("import check failed"));
    }

    #[test]
    fn test_check_failure_is_fatal_when_strict() {
        let runner = ScriptedRunner::new().fail_when(|c| c.capture, 1);
        let sink   = RecordingSink::default();
        let err    = FrameworkInstaller::new(&runner, &sink)
            .check(&env(), &Device::Cpu, true)
            .unwrap_err();
        assert!(matches!(err, SetupError::VerificationFailed { code: Some(1), .. }));
    }

    #[test]
    fn test_gpu_without_cuda_warns() {
        let runner = ScriptedRunner::new().respond_when(
            |c| c.capture,
            "torch: 1.10.1+cu111\ntorchvision: 0.11.2+cu111\ncuda_available: False\n",
        );
        let sink   = RecordingSink::default();
        let device = Device::resolve("gpu", "111").unwrap();
        let report = FrameworkInstaller::new(&runner, &sink)
            .check(&env(), &device, false)
            .unwrap()
            .unwrap();

        assert_eq!(report.get("torch"), Some("1.10.1+cu111"));
        assert!(sink.contains_warning("cannot see a CUDA device"));
    }
}
