//! Sandboxed bundle execution.
//!
//! A bundle runs exactly once per instance, against a closed capability
//! record and nothing else. This component defines the bundle
//! representation, the program boundary, the capability scope, and the
//! executor, the isolation line between bundle code and the rest of the
//! runtime.

pub mod bundle;
pub mod executor;
pub mod scope;

// Re-export main types
pub use bundle::{Bundle, BundleProgram};
pub use executor::{execute, ExecutionOutcome};
pub use scope::{ComponentHandle, SandboxScope};
