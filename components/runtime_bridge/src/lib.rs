//! Instance lifecycle and host-facing entry points.
//!
//! This component ties the bridge together: the instance registry owning
//! the id-to-instance mapping, the event/callback dispatcher routing
//! native-originated work into live instances, the default framework
//! implementation, and the `Runtime` facade the host drives. Every entry
//! point returns a value or an explicit error; nothing here panics across
//! the bridge boundary.

pub mod default_framework;
pub mod dispatcher;
pub mod registry;
pub mod runtime;

// Re-export main types
pub use default_framework::{DefaultFramework, DEFAULT_FRAMEWORK};
pub use registry::InstanceRegistry;
pub use runtime::Runtime;
