//! Bridge error taxonomy.
//!
//! Every host-facing entry point returns one of these as an explicit value;
//! nothing in this layer panics across the bridge boundary. Bundle execution
//! errors carry the bundle's own failure text, unmodified.

use std::fmt;

/// Errors surfaced by the runtime bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// No live instance is registered under this id
    UnknownInstance(String),
    /// No framework is registered under this name
    UnknownFramework(String),
    /// The resolved framework does not declare this lifecycle hook
    Unsupported {
        framework: String,
        hook: &'static str,
    },
    /// An instance already exists under this id
    InstanceExists(String),
    /// Bad data, callback id, or element reference
    InvalidArgument(String),
    /// The executed bundle's own failure, propagated unmodified
    BundleError(String),
    /// The framework registry has not been initialized yet
    NotInitialized,
    /// The framework registry was already initialized
    AlreadyInitialized,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::UnknownInstance(id) => {
                write!(f, "unknown instance: {}", id)
            }
            BridgeError::UnknownFramework(name) => {
                write!(f, "unknown framework: {}", name)
            }
            BridgeError::Unsupported { framework, hook } => {
                write!(f, "framework '{}' does not support {}", framework, hook)
            }
            BridgeError::InstanceExists(id) => {
                write!(f, "instance already exists: {}", id)
            }
            BridgeError::InvalidArgument(msg) => {
                write!(f, "invalid argument: {}", msg)
            }
            BridgeError::BundleError(msg) => {
                write!(f, "bundle execution failed: {}", msg)
            }
            BridgeError::NotInitialized => {
                write!(f, "framework registry has not been initialized")
            }
            BridgeError::AlreadyInitialized => {
                write!(f, "framework registry was already initialized")
            }
        }
    }
}

impl std::error::Error for BridgeError {}

impl BridgeError {
    /// Shorthand for an invalid-argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        BridgeError::InvalidArgument(msg.into())
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
