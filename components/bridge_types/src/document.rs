//! Document collaborator interface.
//!
//! The virtual-DOM tree and its diff engine live outside this layer. What
//! the bridge needs from a document is narrow: ref-indexed element lookup,
//! event firing, a differ flush, and a listener holding the pending update
//! queue plus the phase-finished signals.

use crate::error::BridgeResult;
use crate::task::Task;
use crate::value::BridgeValue;

/// A named phase-finished signal on the document listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseSignal {
    /// Initial creation finished
    CreateFinish,
    /// A refresh pass finished
    RefreshFinish,
    /// An event- or callback-driven update finished
    UpdateFinish,
}

/// The document listener: pending updates plus phase signals.
///
/// Mutations staged by the document's differ land in the update queue; the
/// action batcher drains it. Phase signals are recorded in order so the host
/// (or a test) can observe lifecycle progress.
#[derive(Debug, Default)]
pub struct DocumentListener {
    updates: Vec<Task>,
    signals: Vec<PhaseSignal>,
}

impl DocumentListener {
    /// Creates an empty listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pending update.
    pub fn push_update(&mut self, task: Task) {
        self.updates.push(task);
    }

    /// Returns true if no updates are pending.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Drains the pending update queue, clearing it.
    pub fn drain_updates(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.updates)
    }

    /// Signals that initial creation finished.
    pub fn create_finish(&mut self) {
        self.signals.push(PhaseSignal::CreateFinish);
    }

    /// Signals that a refresh pass finished.
    pub fn refresh_finish(&mut self) {
        self.signals.push(PhaseSignal::RefreshFinish);
    }

    /// Signals that an update finished.
    pub fn update_finish(&mut self) {
        self.signals.push(PhaseSignal::UpdateFinish);
    }

    /// The signals recorded so far, in order.
    pub fn signals(&self) -> &[PhaseSignal] {
        &self.signals
    }
}

/// The document collaborator owned by one instance.
pub trait Document {
    /// Returns true if an element is registered under `ref_id`.
    fn contains(&self, ref_id: &str) -> bool;

    /// Fires an event on the element at `ref_id` and returns the handler's
    /// result. An element with no handler for the type yields `Undefined`.
    fn fire_event(
        &mut self,
        ref_id: &str,
        event_type: &str,
        event: &BridgeValue,
    ) -> BridgeResult<BridgeValue>;

    /// Applies attribute changes to the element at `ref_id`, staging the
    /// corresponding mutation.
    fn update_element(&mut self, ref_id: &str, changes: &BridgeValue) -> BridgeResult<()>;

    /// Creates the document body from a root component, staging its creation
    /// tasks. Returns the root ref id.
    fn create_body(&mut self, component: &str, data: &BridgeValue) -> BridgeResult<String>;

    /// Runs the differ, moving staged mutations into the listener's update
    /// queue.
    fn flush_diff(&mut self);

    /// The document listener.
    fn listener(&mut self) -> &mut DocumentListener;

    /// The root element's ref id, if the body exists.
    fn root_ref(&self) -> Option<&str>;
}

/// Constructs a fresh document for each new instance.
pub trait DocumentFactory {
    fn create_document(&self, instance_id: &str) -> Box<dyn Document>;
}
