//! The sandbox capability scope.
//!
//! Bundle code sees exactly this record: a module-define function, a
//! require function, the instance's document, a bootstrap function, a
//! register function, a render function, and timer polyfills. The scope
//! borrows the instance and the shared config for the duration of one
//! call; nothing ambient leaks through.

use app_core::{flush, AppInstance, ViewModel};
use bridge_types::{
    BridgeError, BridgeFunction, BridgeResult, BridgeValue, Document, SharedConfig,
};

/// A component resolved through `require`.
///
/// Calling `render` on the handle has the same effect as bootstrapping the
/// component, without overriding the instance config.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentHandle {
    name: String,
}

impl ComponentHandle {
    /// The resolved component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders the component as the instance's view-model root.
    pub fn render(&self, scope: &mut SandboxScope<'_>, data: &BridgeValue) -> BridgeResult<()> {
        scope.render(&self.name, data)
    }
}

/// The fixed capability set exposed to one bundle execution.
pub struct SandboxScope<'a> {
    app: &'a mut AppInstance,
    shared: &'a SharedConfig,
}

impl<'a> SandboxScope<'a> {
    /// Builds the scope over an instance and the shared config.
    pub fn new(app: &'a mut AppInstance, shared: &'a SharedConfig) -> Self {
        Self { app, shared }
    }

    /// The instance id the scope is bound to.
    pub fn instance_id(&self) -> &str {
        self.app.id()
    }

    // ------------------------------------------------------------------
    // Module and component capabilities
    // ------------------------------------------------------------------

    /// Defines a module under `name` (the module-define capability).
    pub fn define(&mut self, name: &str, definition: BridgeValue) {
        self.app.define_module(name, definition);
    }

    /// Registers a component definition under `name`.
    pub fn register(&mut self, name: &str, definition: BridgeValue) {
        self.app.register_component(name, definition);
    }

    /// Resolves a defined component or module to a renderable handle.
    pub fn require(&mut self, name: &str) -> BridgeResult<ComponentHandle> {
        if self.app.component(name).is_some() || self.app.module(name).is_some() {
            Ok(ComponentHandle {
                name: name.to_string(),
            })
        } else {
            Err(BridgeError::invalid(format!(
                "no component or module named '{}'",
                name
            )))
        }
    }

    /// The instance's document.
    pub fn document(&mut self) -> BridgeResult<&mut dyn Document> {
        self.app.document_mut()
    }

    // ------------------------------------------------------------------
    // Bootstrap and render
    // ------------------------------------------------------------------

    /// Instantiates `name` as the view-model root against `data`, flushes
    /// pending mutations, then signals that initial creation finished.
    ///
    /// `config` is shallow-merged into the instance options before the root
    /// is built.
    pub fn bootstrap(
        &mut self,
        name: &str,
        config: &BridgeValue,
        data: &BridgeValue,
    ) -> BridgeResult<()> {
        self.boot_root(name, Some(config), data)
    }

    /// Same effect as `bootstrap`, without overriding config.
    pub fn render(&mut self, name: &str, data: &BridgeValue) -> BridgeResult<()> {
        self.boot_root(name, None, data)
    }

    fn boot_root(
        &mut self,
        name: &str,
        config: Option<&BridgeValue>,
        data: &BridgeValue,
    ) -> BridgeResult<()> {
        let definition = self
            .app
            .component(name)
            .cloned()
            .ok_or_else(|| BridgeError::invalid(format!("unknown component '{}'", name)))?;

        if let Some(config) = config {
            if matches!(config, BridgeValue::Object(pairs) if !pairs.is_empty()) {
                let mut options = self
                    .app
                    .meta
                    .options
                    .take()
                    .unwrap_or_else(BridgeValue::empty_object);
                options.merge_shallow(config);
                self.app.meta.options = Some(options);
            }
        }

        let data = match data {
            BridgeValue::Object(_) => data.clone(),
            _ => BridgeValue::empty_object(),
        };
        let mut vm = ViewModel::new(name, data.clone());
        if let Some(BridgeValue::Function(hook)) = definition.object_get("refresh") {
            vm.refresh_hook = Some(hook.clone());
        }

        self.app.document_mut()?.create_body(name, &data)?;
        self.app.set_vm(vm);
        self.app.mark_created();

        flush(self.app, self.shared.transport.as_ref())?;
        self.app.document_mut()?.listener().create_finish();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Timer polyfills
    // ------------------------------------------------------------------

    /// Schedules a one-shot timer through the host timer capability.
    ///
    /// The returned handle is the instance's uid as a string; the callback
    /// is stored under the same id, so the host fires it through the
    /// regular callback path.
    pub fn set_timeout(&mut self, f: BridgeFunction, delay_ms: f64) -> String {
        let id = self.app.register_callback(f);
        let handle = id.to_string();
        self.shared
            .timer
            .set_timeout(self.app.id(), &handle, delay_ms);
        handle
    }

    /// Cancels a one-shot timer and drops its stored callback.
    pub fn clear_timeout(&mut self, handle: &str) {
        self.shared.timer.clear_timeout(self.app.id(), handle);
        if let Ok(id) = handle.parse::<i64>() {
            self.app.remove_callback(id);
        }
    }

    /// Schedules a repeating timer through the host timer capability.
    pub fn set_interval(&mut self, f: BridgeFunction, interval_ms: f64) -> String {
        let id = self.app.register_callback(f);
        let handle = id.to_string();
        self.shared
            .timer
            .set_interval(self.app.id(), &handle, interval_ms);
        handle
    }

    /// Cancels a repeating timer and drops its stored callback.
    pub fn clear_interval(&mut self, handle: &str) {
        self.shared.timer.clear_interval(self.app.id(), handle);
        if let Ok(id) = handle.parse::<i64>() {
            self.app.remove_callback(id);
        }
    }
}
