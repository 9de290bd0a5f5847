// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe an installer run:
// what the user asked for, which wheel channel that maps to,
// what can go wrong, and the two seams (running commands,
// reporting status) the rest of the crate is written against.
//
// Rules for this layer:
//   - NO process spawning
//   - NO terminal or file I/O
//   - Only structs, enums, constants and traits

/// CUDA code → wheel channel table and framework pins
pub mod accelerator;

/// Description of an external command and its outcome
pub mod command;

/// Failure taxonomy shared by every layer
pub mod error;

/// Validated user choices
pub mod options;

/// CommandRunner and StatusSink abstractions
pub mod traits;
