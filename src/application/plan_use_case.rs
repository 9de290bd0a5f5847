// ============================================================
// Layer 2 — PlanUseCase
// ============================================================
// Dry run of InstallUseCase. The same pipeline is driven by a
// DryRunRunner (records commands, spawns nothing, reports every
// tool as present) and a SilentSink, so the recorded commands are
// exactly what a real run with these options would execute when
// every step succeeds.

use serde::Serialize;

use crate::application::install_use_case::InstallUseCase;
use crate::domain::command::CommandSpec;
use crate::domain::error::SetupError;
use crate::domain::options::InstallOptions;
use crate::infra::{console::SilentSink, process::DryRunRunner};

/// Resolved options plus the ordered command list.
#[derive(Debug, Clone, Serialize)]
pub struct InstallPlan {
    pub options:  InstallOptions,
    pub commands: Vec<CommandSpec>,
}

pub struct PlanUseCase {
    options: InstallOptions,
}

impl PlanUseCase {
    pub fn new(options: InstallOptions) -> Self {
        Self { options }
    }

    pub fn execute(self) -> Result<InstallPlan, SetupError> {
        let runner = DryRunRunner::new();
        let sink   = SilentSink;

        InstallUseCase::new(self.options.clone(), &runner, &sink)
            .check_files(false)
            .execute()?;

        let commands = runner.into_commands();
        tracing::debug!("Planned {} commands", commands.len());
        Ok(InstallPlan { options: self.options, commands })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::install_use_case::InstallConfig;

    #[test]
    fn test_plan_venv_cpu() {
        let opts = InstallConfig::default().resolve().unwrap();
        let plan = PlanUseCase::new(opts).execute().unwrap();

        let first = &plan.commands[0];
        assert!(first.has_arg("venv"));
        assert!(first.has_arg("-m"));
        assert_eq!(plan.commands.len(), 6);
        assert!(plan.commands.iter().any(|c| c.has_arg("torch==1.10.1+cpu")));
    }

    #[test]
    fn test_plan_serialises_options() {
        let cfg  = InstallConfig { env: "conda".into(), device: "gpu".into(), cuda: "113".into(), ..Default::default() };
        let plan = PlanUseCase::new(cfg.resolve().unwrap()).execute().unwrap();
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["options"]["env_kind"], "conda");
        assert_eq!(json["options"]["device"]["kind"], "gpu");
        assert_eq!(json["options"]["device"]["accelerator"]["channel"], "cu113");
        assert_eq!(json["commands"][0]["program"], "conda");
    }
}
