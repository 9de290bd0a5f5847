// ============================================================
// Layer 4 — Verification & Guidance Reporter
// ============================================================
// Runs the last gate of an install and tells the user what to do
// next.
//
//   final_check()    — imports torch, transformers, numpy and
//                      sklearn inside the environment and prints
//                      their versions. A non-zero exit aborts the
//                      run with VerificationFailed.
//
//   report_success() — success banner followed by the next-step
//                      instructions for the downstream BERT
//                      text-classification project.
//
// The import scripts print one `name: value` pair per line;
// ImportReport parses that back into ordered pairs.

use crate::domain::error::SetupError;
use crate::domain::options::Device;
use crate::domain::traits::{CommandRunner, StatusSink};
use crate::provision::environment::PythonEnv;

/// Printed once everything has succeeded
pub const SUCCESS_BANNER: &str = "Environment setup complete!";

/// Where the pretrained BERT weights come from
pub const PRETRAINED_MODEL_URL: &str = "https://huggingface.co/bert-base-chinese";

/// Directory the training code loads pretrained weights from
pub const PRETRAINED_DIR: &str = "bert_pretrain";

/// Directory holding the classification datasets
pub const DATA_DIR: &str = "data";

/// Command that starts training in the downstream project
pub const TRAIN_COMMAND: &str = "python run.py --model bert";

/// Imports every critical package and prints its version
pub const FINAL_CHECK_SCRIPT: &str = "\
import torch, transformers, numpy, sklearn
print('torch:', torch.__version__)
print('transformers:', transformers.__version__)
print('numpy:', numpy.__version__)
print('scikit-learn:', sklearn.__version__)
print('cuda_available:', torch.cuda.is_available())
";

// ─── ImportReport ─────────────────────────────────────────────────────────────
/// Ordered `name: value` pairs printed by an import check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub entries: Vec<(String, String)>,
}

impl ImportReport {
    /// Parse `name: value` lines. Lines without a colon (stray
    /// warnings from imported packages) are skipped.
    pub fn parse(stdout: &str) -> Self {
        let entries = stdout
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Python prints booleans as True / False
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            "True"  => Some(true),
            "False" => Some(false),
            _       => None,
        }
    }

    /// Write every pair as an indented plain line
    pub fn print_to(&self, sink: &dyn StatusSink) {
        for (k, v) in &self.entries {
            sink.plain(&format!("  {k}: {v}"));
        }
    }
}

// ─── VerificationReporter ─────────────────────────────────────────────────────
pub struct VerificationReporter<'a> {
    runner: &'a dyn CommandRunner,
    sink:   &'a dyn StatusSink,
}

impl<'a> VerificationReporter<'a> {
    pub fn new(runner: &'a dyn CommandRunner, sink: &'a dyn StatusSink) -> Self {
        Self { runner, sink }
    }

    /// Import every critical package. Fatal on a non-zero exit.
    pub fn final_check(&self, env: &PythonEnv) -> Result<ImportReport, SetupError> {
        self.sink.info("Verifying installed packages...");

        let spec = env.python_script(FINAL_CHECK_SCRIPT);
        let out  = self.runner.run(&spec).map_err(|source| SetupError::Spawn {
            command: spec.to_string(),
            source,
        })?;

        if !out.success {
            return Err(SetupError::VerificationFailed {
                check: "final import",
                code:  out.code,
            });
        }

        let report = ImportReport::parse(&out.stdout);
        report.print_to(self.sink);
        self.sink.success("All packages import correctly");
        Ok(report)
    }

    /// Banner plus next steps
    pub fn report_success(&self, env: &PythonEnv, device: &Device) {
        self.sink.plain("");
        self.sink.success(SUCCESS_BANNER);
        self.sink.plain("");
        for line in guidance_lines(env, device) {
            self.sink.plain(&line);
        }
    }
}

/// Next-step instructions for the chosen environment and device.
pub fn guidance_lines(env: &PythonEnv, device: &Device) -> Vec<String> {
    let mut lines = vec![
        "Next steps:".to_string(),
        format!("  1. Download the pretrained BERT model from {PRETRAINED_MODEL_URL}"),
        format!("     and place its files under {PRETRAINED_DIR}/"),
        format!("  2. Put the dataset (train.txt, dev.txt, test.txt, class.txt) under {DATA_DIR}/"),
        "  3. Activate the environment in new shells:".to_string(),
        format!("       {}", env.activation_command()),
        "  4. Start training:".to_string(),
        format!("       {TRAIN_COMMAND}"),
    ];

    if let Some(acc) = device.accelerator() {
        lines.push(String::new());
        lines.push(format!(
            "GPU build installed for {}. Run `nvidia-smi` to confirm the driver supports it.",
            acc.label
        ));
    }
    lines
}
