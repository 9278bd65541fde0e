//! Bundle representation.
//!
//! A bundle is the source payload executed for one instance: its raw text
//! (whose first line may carry a version header) plus an optional compiled
//! body. The body is a `BundleProgram`: a callable that receives only the
//! sandbox scope, which is the whole point: the program can reach the named
//! capabilities and nothing else.

use crate::scope::SandboxScope;
use bridge_types::{BridgeResult, BridgeValue};
use std::fmt;
use std::rc::Rc;

/// The executable body of a bundle.
///
/// Implemented by closures over `SandboxScope`; errors returned here are
/// the bundle's own failures and propagate unmodified.
pub trait BundleProgram {
    fn run(&self, scope: &mut SandboxScope<'_>) -> BridgeResult<BridgeValue>;
}

impl<F> BundleProgram for F
where
    F: Fn(&mut SandboxScope<'_>) -> BridgeResult<BridgeValue>,
{
    fn run(&self, scope: &mut SandboxScope<'_>) -> BridgeResult<BridgeValue> {
        self(scope)
    }
}

/// One instance's bundle: source text plus an optional body.
#[derive(Clone)]
pub struct Bundle {
    source: String,
    program: Option<Rc<dyn BundleProgram>>,
}

impl Bundle {
    /// A bundle with source text but no executable body.
    ///
    /// Executing it prepares the instance without running anything.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            program: None,
        }
    }

    /// A bundle with an explicit program object.
    pub fn with_program(source: impl Into<String>, program: Rc<dyn BundleProgram>) -> Self {
        Self {
            source: source.into(),
            program: Some(program),
        }
    }

    /// A bundle whose body is a closure over the sandbox scope.
    pub fn with_body<F>(source: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut SandboxScope<'_>) -> BridgeResult<BridgeValue> + 'static,
    {
        Self {
            source: source.into(),
            program: Some(Rc::new(body)),
        }
    }

    /// The raw bundle text, header line included.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True if the bundle has no executable body.
    pub fn is_empty(&self) -> bool {
        self.program.is_none()
    }

    /// The compiled body, if any.
    pub fn program(&self) -> Option<&Rc<dyn BundleProgram>> {
        self.program.as_ref()
    }
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("source_len", &self.source.len())
            .field("has_program", &self.program.is_some())
            .finish()
    }
}
