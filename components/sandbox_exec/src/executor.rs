//! Bundle executor.
//!
//! Runs a bundle's body once, positionally bound to the capability scope.
//! An empty body does not execute: the instance stays prepared and a later
//! call can replay against the same instance.

use crate::bundle::Bundle;
use crate::scope::SandboxScope;
use app_core::AppInstance;
use bridge_types::{BridgeResult, BridgeValue, SharedConfig};
use tracing::debug;

/// What a single execution did.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The bundle had no body; the instance stays prepared and keeps the
    /// same capability set for a later run.
    Prepared,
    /// The body ran to completion with this result.
    Ran(BridgeValue),
}

/// Executes a bundle against an instance.
///
/// Errors returned by the bundle body are its own and propagate unmodified.
pub fn execute(
    app: &mut AppInstance,
    shared: &SharedConfig,
    bundle: &Bundle,
) -> BridgeResult<ExecutionOutcome> {
    match bundle.program() {
        None => {
            debug!(instance = app.id(), "empty bundle body, instance prepared");
            Ok(ExecutionOutcome::Prepared)
        }
        Some(program) => {
            let program = program.clone();
            let mut scope = SandboxScope::new(app, shared);
            program.run(&mut scope).map(ExecutionOutcome::Ran)
        }
    }
}
