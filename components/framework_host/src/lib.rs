//! Pluggable framework host.
//!
//! Frameworks implement the instance lifecycle contract as a trait with a
//! structurally declared capability set. The registry holds them
//! process-wide, runs init-once wiring, broadcasts registration calls, and
//! resolves per-instance dispatch. The bundle-version sniffer lives here
//! too, since it decides which framework an unannotated bundle binds to.

pub mod framework;
pub mod registry;
pub mod sniffer;

// Re-export main types
pub use framework::{Framework, LifecycleHook};
pub use registry::{BroadcastCall, FrameworkRegistry};
pub use sniffer::{sniff, BundleInfo};
