// ============================================================
// Layer 3 — Setup Error Taxonomy
// ============================================================
// Every failure the installer can hit falls into one of these
// variants. None of them is recovered locally: the pipeline
// stops at the first one and the process exits with status 1.
//
//   InvalidArgument     — an option outside its legal set
//   MissingTool         — python / conda not reachable
//   CommandFailed       — an external command exited non-zero
//   VerificationFailed  — an import check exited non-zero
//   ManifestNotFound    — requirements file absent
//   Spawn               — the OS refused to start a command
//
// Already-created environments are left on disk after a failure.

use std::path::PathBuf;
use thiserror::Error;

/// Installer failure, carrying enough context to print a
/// useful message and, where one exists, a remediation hint.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid value '{value}' for {option} (expected one of: {allowed})")]
    InvalidArgument {
        option:  &'static str,
        value:   String,
        allowed: String,
    },

    #[error("{tool} was not found on PATH")]
    MissingTool {
        tool: String,
        hint: String,
    },

    #[error("{step} failed: `{command}` exited with {}", describe_code(.code))]
    CommandFailed {
        step:    &'static str,
        command: String,
        code:    Option<i32>,
    },

    #[error("{check} verification failed (exit {})", describe_code(.code))]
    VerificationFailed {
        check: &'static str,
        code:  Option<i32>,
    },

    #[error("dependency manifest '{}' not found", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("could not start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source:  std::io::Error,
    },
}

impl SetupError {
    /// Process exit status for this error. Every variant aborts
    /// the run with the same status.
    #[inline]
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Short remediation text to show under the error line
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::MissingTool { hint, .. } => Some(hint.as_str()),
            Self::ManifestNotFound(_) => {
                Some("run the installer from the project root, or pass --requirements <path>")
            }
            Self::VerificationFailed { .. } => {
                Some("re-run with -vv to see the interpreter output")
            }
            _ => None,
        }
    }

    /// Stable identifier for JSON output and log fields
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. }    => "ERR_INVALID_ARGUMENT",
            Self::MissingTool { .. }        => "ERR_MISSING_TOOL",
            Self::CommandFailed { .. }      => "ERR_COMMAND_FAILED",
            Self::VerificationFailed { .. } => "ERR_VERIFICATION_FAILED",
            Self::ManifestNotFound(_)       => "ERR_MANIFEST_NOT_FOUND",
            Self::Spawn { .. }              => "ERR_SPAWN",
        }
    }

    pub fn invalid_argument(
        option:  &'static str,
        value:   impl Into<String>,
        allowed: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            option,
            value:   value.into(),
            allowed: allowed.into(),
        }
    }

    pub fn missing_tool(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            hint: hint.into(),
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None    => "no status (terminated by signal)".to_string(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_variants_exit_with_one() {
        let errors = vec![
            SetupError::invalid_argument("--device", "tpu", "cpu, gpu"),
            SetupError::missing_tool("conda", "install miniconda"),
            SetupError::CommandFailed { step: "pip", command: "pip".into(), code: Some(2) },
            SetupError::VerificationFailed { check: "final", code: Some(1) },
            SetupError::ManifestNotFound(PathBuf::from("requirements.txt")),
        ];
        for e in errors {
            assert_eq!(e.exit_code(), 1, "{e}");
        }
    }

    #[test]
    fn test_invalid_argument_message() {
        let e = SetupError::invalid_argument("--device", "tpu", "cpu, gpu");
        assert_eq!(
            e.to_string(),
            "invalid value 'tpu' for --device (expected one of: cpu, gpu)"
        );
        assert_eq!(e.error_code(), "ERR_INVALID_ARGUMENT");
        assert!(e.hint().is_none());
    }

    #[test]
    fn test_missing_tool_carries_hint() {
        let e = SetupError::missing_tool("conda", "https://docs.conda.io");
        assert_eq!(e.hint(), Some("https://docs.conda.io"));
    }

    #[test]
    fn test_command_failed_without_status() {
        let e = SetupError::CommandFailed { step: "framework install", command: "pip".into(), code: None };
        assert!(e.to_string().contains("terminated by signal"));
    }
}
