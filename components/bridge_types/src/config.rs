//! Shared bridge configuration.
//!
//! The host wires its collaborators into the bridge once, at framework
//! registry init time. Frameworks and the sandbox only ever see these
//! handles; nothing in this layer reaches for ambient state.

use crate::document::DocumentFactory;
use crate::task::Transport;
use std::rc::Rc;

/// The host timer capability.
///
/// The bridge has no persistent timer of its own across calls, so timer
/// polyfills inside the sandbox delegate here. Handles are allocated by the
/// instance (its uid counter as a string) and passed back for clears.
pub trait HostTimer {
    fn set_timeout(&self, instance_id: &str, handle: &str, delay_ms: f64);
    fn clear_timeout(&self, instance_id: &str, handle: &str);
    fn set_interval(&self, instance_id: &str, handle: &str, interval_ms: f64);
    fn clear_interval(&self, instance_id: &str, handle: &str);
}

/// Collaborator handles shared with every framework at init.
#[derive(Clone)]
pub struct SharedConfig {
    /// Constructs the document owned by each new instance
    pub documents: Rc<dyn DocumentFactory>,
    /// Ships normalized task batches to the native side
    pub transport: Rc<dyn Transport>,
    /// Backs the sandbox timer polyfills
    pub timer: Rc<dyn HostTimer>,
}

impl SharedConfig {
    /// Creates a shared config from its three collaborators.
    pub fn new(
        documents: Rc<dyn DocumentFactory>,
        transport: Rc<dyn Transport>,
        timer: Rc<dyn HostTimer>,
    ) -> Self {
        Self {
            documents,
            transport,
            timer,
        }
    }
}

impl std::fmt::Debug for SharedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedConfig {{ ... }}")
    }
}
