// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: these modules decide which
// provisioning step runs when, and hand data back to Layer 1
// for display.
//
// Rules for this layer:
//   - No process spawning here (that's Layer 6)
//   - No argument parsing here (that's Layer 1)
//   - Step logic lives in Layer 4

/// The real install run
pub mod install_use_case;

/// Dry-run of the install run
pub mod plan_use_case;

/// Accelerator table listing
pub mod channels_use_case;
