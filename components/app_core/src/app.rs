//! Instance state.
//!
//! One `AppInstance` per running application. Every resource here is
//! exclusively owned by the instance: the view-model root, the document,
//! the callback table, and the uid counter shared by callbacks and timer
//! handles. Nothing in this struct is shared between instances.

use bridge_types::{BridgeError, BridgeFunction, BridgeResult, BridgeValue, Document};
use std::collections::HashMap;
use std::fmt;

/// Lifecycle state of a live instance.
///
/// Destruction is represented by registry removal, not by a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// Shell exists; bundle has not run yet
    Prepared,
    /// Bundle executed; instance is live
    Created,
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceState::Prepared => write!(f, "prepared"),
            InstanceState::Created => write!(f, "created"),
        }
    }
}

/// Bundle metadata stamped at create time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleMeta {
    /// Version sniffed from the bundle header, if any
    pub version: Option<String>,
    /// Instance options object (config merged with stamped fields)
    pub options: Option<BridgeValue>,
}

/// The instance's view-model root.
#[derive(Debug, Clone)]
pub struct ViewModel {
    /// Root component name
    pub component: String,
    /// Model data object
    pub data: BridgeValue,
    /// Model-defined refresh hook, preferred over shallow merge
    pub refresh_hook: Option<BridgeFunction>,
}

impl ViewModel {
    /// Creates a view-model rooted at `component` with initial data.
    pub fn new(component: &str, data: BridgeValue) -> Self {
        Self {
            component: component.to_string(),
            data,
            refresh_hook: None,
        }
    }
}

/// One running application instance.
pub struct AppInstance {
    id: String,
    framework: Option<String>,
    state: InstanceState,
    vm: Option<ViewModel>,
    doc: Option<Box<dyn Document>>,
    callbacks: HashMap<i64, BridgeFunction>,
    uid: i64,
    /// Bundle metadata (version, options)
    pub meta: BundleMeta,
    /// Components registered or defined for this instance
    components: HashMap<String, BridgeValue>,
    /// Modules defined by the bundle
    modules: HashMap<String, BridgeValue>,
}

impl AppInstance {
    /// Creates a fresh instance shell in the prepared state.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            framework: None,
            state: InstanceState::Prepared,
            vm: None,
            doc: None,
            callbacks: HashMap::new(),
            uid: 0,
            meta: BundleMeta::default(),
            components: HashMap::new(),
            modules: HashMap::new(),
        }
    }

    /// The instance id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The bound framework name, if one has been resolved.
    pub fn framework(&self) -> Option<&str> {
        self.framework.as_deref()
    }

    /// Binds the instance to a framework.
    pub fn bind_framework(&mut self, name: &str) {
        self.framework = Some(name.to_string());
    }

    /// Current lifecycle state.
    pub fn state(&self) -> InstanceState {
        self.state
    }

    /// Marks the instance live after its bundle ran.
    pub fn mark_created(&mut self) {
        self.state = InstanceState::Created;
    }

    // ------------------------------------------------------------------
    // Uid counter and callback table
    // ------------------------------------------------------------------

    /// Allocates the next uid.
    ///
    /// Strictly increasing for the lifetime of the instance; shared by
    /// callback ids and timer handles, so the two can never collide.
    pub fn next_uid(&mut self) -> i64 {
        self.uid += 1;
        self.uid
    }

    /// Stores a function in the callback table under a fresh uid.
    pub fn register_callback(&mut self, f: BridgeFunction) -> i64 {
        let id = self.next_uid();
        self.callbacks.insert(id, f);
        id
    }

    /// Returns a handle to the callback stored at `id`.
    pub fn callback(&self, id: i64) -> Option<BridgeFunction> {
        self.callbacks.get(&id).cloned()
    }

    /// Removes the callback stored at `id`.
    pub fn remove_callback(&mut self, id: i64) -> Option<BridgeFunction> {
        self.callbacks.remove(&id)
    }

    /// Number of live callback slots.
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    // ------------------------------------------------------------------
    // Owned document and view-model
    // ------------------------------------------------------------------

    /// Attaches the instance's document.
    pub fn attach_document(&mut self, doc: Box<dyn Document>) {
        self.doc = Some(doc);
    }

    /// The owned document, if still attached.
    pub fn document_opt_mut(&mut self) -> Option<&mut (dyn Document + '_)> {
        self.doc.as_deref_mut().map(|d| d as &mut (dyn Document + '_))
    }

    /// The owned document, or an explicit error once released.
    pub fn document_mut(&mut self) -> BridgeResult<&mut (dyn Document + '_)> {
        self.doc
            .as_deref_mut()
            .map(|d| d as &mut (dyn Document + '_))
            .ok_or_else(|| BridgeError::invalid(format!("instance {} has no document", self.id)))
    }

    /// Read access to the owned document.
    pub fn document(&self) -> BridgeResult<&dyn Document> {
        self.doc
            .as_deref()
            .ok_or_else(|| BridgeError::invalid(format!("instance {} has no document", self.id)))
    }

    /// Installs the view-model root.
    pub fn set_vm(&mut self, vm: ViewModel) {
        self.vm = Some(vm);
    }

    /// The view-model root, if bootstrapped.
    pub fn vm(&self) -> Option<&ViewModel> {
        self.vm.as_ref()
    }

    /// Mutable view-model root.
    pub fn vm_mut(&mut self) -> Option<&mut ViewModel> {
        self.vm.as_mut()
    }

    // ------------------------------------------------------------------
    // Component and module tables
    // ------------------------------------------------------------------

    /// Registers a component definition for this instance.
    pub fn register_component(&mut self, name: &str, definition: BridgeValue) {
        self.components.insert(name.to_string(), definition);
    }

    /// Returns the component definition under `name`.
    pub fn component(&self, name: &str) -> Option<&BridgeValue> {
        self.components.get(name)
    }

    /// Defines a module for this instance.
    pub fn define_module(&mut self, name: &str, definition: BridgeValue) {
        self.modules.insert(name.to_string(), definition);
    }

    /// Returns the module definition under `name`.
    pub fn module(&self, name: &str) -> Option<&BridgeValue> {
        self.modules.get(name)
    }

    /// Releases everything the instance owns.
    ///
    /// The registry entry itself is the lifecycle layer's responsibility;
    /// this only drops the view-model, document, callback table, and
    /// metadata so nothing can fire afterwards.
    pub fn release(&mut self) {
        self.vm = None;
        self.doc = None;
        self.callbacks.clear();
        self.meta = BundleMeta::default();
        self.components.clear();
        self.modules.clear();
    }
}

impl fmt::Debug for AppInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppInstance")
            .field("id", &self.id)
            .field("framework", &self.framework)
            .field("state", &self.state)
            .field("uid", &self.uid)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
