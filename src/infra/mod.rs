// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// The only code in the crate that touches the operating system:
//
//   process.rs — CommandRunner implementations. SystemRunner
//                spawns real processes; DryRunRunner records
//                them for `plan`.
//
//   console.rs — StatusSink implementations. Console prints
//                coloured status lines; SilentSink drops them.

/// Real and recording command runners
pub mod process;

/// Coloured terminal status output
pub mod console;
