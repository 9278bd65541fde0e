//! Host-facing runtime facade.
//!
//! The one object the native host drives. It owns the framework registry
//! and the instance registry and routes every lifecycle call to the
//! framework the target instance is bound to. Instances are taken out of
//! the registry for the duration of a hook and reinserted afterwards, so a
//! hook holds the instance mutably without freezing the registry.

use crate::default_framework::{DefaultFramework, DEFAULT_FRAMEWORK};
use crate::dispatcher;
use crate::registry::InstanceRegistry;
use app_core::{AppInstance, InstanceState};
use bridge_types::{BridgeError, BridgeResult, BridgeValue, SharedConfig, Task};
use framework_host::{sniff, BroadcastCall, Framework, FrameworkRegistry, LifecycleHook};
use sandbox_exec::Bundle;
use tracing::{debug, warn};

/// The runtime bridge.
#[derive(Debug, Default)]
pub struct Runtime {
    frameworks: FrameworkRegistry,
    instances: InstanceRegistry,
}

impl Runtime {
    /// Creates a runtime with no frameworks registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runtime with the default framework pre-registered.
    pub fn with_default_framework() -> Self {
        let mut runtime = Self::new();
        // A fresh registry is open and empty, so this cannot fail.
        let _ = runtime
            .frameworks
            .register(Box::new(DefaultFramework::new()));
        runtime
    }

    /// Registers a framework. Closed once [`Runtime::init`] has run.
    pub fn register_framework(&mut self, framework: Box<dyn Framework>) -> BridgeResult<()> {
        self.frameworks.register(framework)
    }

    /// One-time wiring with the host's collaborators. Runs every registered
    /// framework's init hook.
    pub fn init(&mut self, shared: SharedConfig) -> BridgeResult<()> {
        self.frameworks.init(shared)
    }

    pub fn is_initialized(&self) -> bool {
        self.frameworks.is_initialized()
    }

    /// Number of live instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// The lifecycle state of a live instance, if it exists.
    pub fn instance_state(&self, id: &str) -> Option<InstanceState> {
        self.instances.get(id).map(|app| app.state())
    }

    /// Builds an instance shell ahead of its bundle.
    ///
    /// `instance_type` names the framework the host wants; a `framework`
    /// field in the config is consulted only when the positional argument
    /// is absent. A registered name binds the instance immediately and runs
    /// that framework's prepare hook. Any other name, or no name at all,
    /// leaves an empty placeholder bound to the default framework; the
    /// bundle header gets another chance to classify at create time. A
    /// repeated prepare under the same id silently replaces the earlier
    /// shell.
    pub fn prepare_instance(
        &mut self,
        id: &str,
        instance_type: Option<&str>,
        config: &BridgeValue,
        data: &BridgeValue,
    ) -> BridgeResult<()> {
        let mut app = AppInstance::new(id);
        if matches!(config, BridgeValue::Object(pairs) if !pairs.is_empty()) {
            app.meta.options = Some(config.clone());
        }

        let requested = instance_type
            .map(str::to_string)
            .or_else(|| config_framework(config));
        match requested {
            Some(name) if self.frameworks.contains(&name) => {
                app.bind_framework(&name);
                if self.frameworks.supports(&name, LifecycleHook::PrepareInstance) {
                    let (framework, shared) =
                        self.frameworks.resolve(&name, LifecycleHook::PrepareInstance)?;
                    framework.prepare_instance(&mut app, shared, config, data)?;
                }
            }
            Some(name) => {
                debug!(instance = id, framework = %name, "preparing placeholder for unknown framework");
                app.bind_framework(DEFAULT_FRAMEWORK);
            }
            None => app.bind_framework(DEFAULT_FRAMEWORK),
        }

        if self.instances.insert(app).is_some() {
            debug!(instance = id, "prepare replaced an existing shell");
        }
        Ok(())
    }

    /// Executes a bundle, turning a prepared shell (or nothing) into a live
    /// instance.
    ///
    /// The bundle header is sniffed for a framework binding; without one
    /// the instance's existing binding, then the config's `framework`
    /// field, then the default framework apply in that order. A sniffed
    /// version is stamped onto the instance and passed to the framework as
    /// `bundleVersion` in the config. Creating over an already created id
    /// is an error.
    pub fn create_instance(
        &mut self,
        id: &str,
        bundle: &Bundle,
        config: &BridgeValue,
        data: &BridgeValue,
    ) -> BridgeResult<BridgeValue> {
        if let Some(existing) = self.instances.get(id) {
            if existing.state() == InstanceState::Created {
                return Err(BridgeError::InstanceExists(id.to_string()));
            }
        }
        let mut app = self
            .instances
            .take(id)
            .unwrap_or_else(|| AppInstance::new(id));

        let result = self.run_create(&mut app, bundle, config, data);
        self.instances.insert(app);
        result
    }

    fn run_create(
        &mut self,
        app: &mut AppInstance,
        bundle: &Bundle,
        config: &BridgeValue,
        data: &BridgeValue,
    ) -> BridgeResult<BridgeValue> {
        let info = sniff(bundle.source());
        let name = match &info {
            Some(info) => info.framework.clone(),
            None => app
                .framework()
                .map(str::to_string)
                .or_else(|| config_framework(config))
                .unwrap_or_else(|| DEFAULT_FRAMEWORK.to_string()),
        };
        if !self.frameworks.contains(&name) {
            return Err(BridgeError::UnknownFramework(name));
        }
        app.bind_framework(&name);

        let mut config = config.clone();
        if let Some(info) = info {
            app.meta.version = Some(info.version.clone());
            if !matches!(config, BridgeValue::Object(_)) {
                config = BridgeValue::empty_object();
            }
            config.object_set("bundleVersion", BridgeValue::string(&info.version));
        }
        debug!(instance = app.id(), framework = %name, "creating instance");

        let (framework, shared) = self.frameworks.resolve(&name, LifecycleHook::CreateInstance)?;
        framework.create_instance(app, shared, bundle, &config, data)
    }

    /// Tears an instance down and removes it from the registry.
    ///
    /// Removal is unconditional for a known id: a framework hook failure is
    /// logged, never surfaced. Only an unknown id is an error.
    pub fn destroy_instance(&mut self, id: &str) -> BridgeResult<()> {
        let Some(mut app) = self.instances.take(id) else {
            return Err(BridgeError::UnknownInstance(id.to_string()));
        };
        if let Some(name) = app.framework().map(str::to_string) {
            match self.frameworks.resolve(&name, LifecycleHook::DestroyInstance) {
                Ok((framework, shared)) => {
                    if let Err(err) = framework.destroy_instance(&mut app, shared) {
                        warn!(instance = id, error = %err, "destroy hook failed");
                    }
                }
                Err(err) => warn!(instance = id, error = %err, "destroy could not resolve framework"),
            }
        }
        dispatcher::destroy(&mut app);
        debug!(instance = id, "instance destroyed");
        Ok(())
    }

    /// Refreshes an instance's view-model with new data.
    pub fn refresh_instance(&mut self, id: &str, data: &BridgeValue) -> BridgeResult<BridgeValue> {
        self.with_framework(id, LifecycleHook::RefreshInstance, |framework, app, shared| {
            framework.refresh_instance(app, shared, data)
        })
    }

    /// Routes native-originated tasks into an instance.
    pub fn receive_tasks(&mut self, id: &str, tasks: &[Task]) -> BridgeResult<BridgeValue> {
        self.with_framework(id, LifecycleHook::ReceiveTasks, |framework, app, shared| {
            framework.receive_tasks(app, shared, tasks)
        })
    }

    /// Alias for [`Runtime::receive_tasks`] under the wire-facing name.
    pub fn call_js(&mut self, id: &str, tasks: &[Task]) -> BridgeResult<BridgeValue> {
        self.receive_tasks(id, tasks)
    }

    /// Returns an instance's root element reference.
    pub fn get_root(&mut self, id: &str) -> BridgeResult<BridgeValue> {
        self.with_framework(id, LifecycleHook::GetRoot, |framework, app, shared| {
            framework.get_root(app, shared)
        })
    }

    /// Fires an event against candidate refs inside an instance, bypassing
    /// the framework's task router.
    pub fn fire_event(
        &mut self,
        id: &str,
        refs: &[String],
        event_type: &str,
        event: &BridgeValue,
        dom_changes: Option<&BridgeValue>,
    ) -> BridgeResult<BridgeValue> {
        let shared = self.frameworks.shared()?.clone();
        let app = self
            .instances
            .get_mut(id)
            .ok_or_else(|| BridgeError::UnknownInstance(id.to_string()))?;
        dispatcher::fire_event(app, &shared, refs, event_type, event, dom_changes)
    }

    /// Invokes a registered callback inside an instance.
    pub fn callback(
        &mut self,
        id: &str,
        callback_id: i64,
        data: &BridgeValue,
        keep_alive: bool,
    ) -> BridgeResult<BridgeValue> {
        let shared = self.frameworks.shared()?.clone();
        let app = self
            .instances
            .get_mut(id)
            .ok_or_else(|| BridgeError::UnknownInstance(id.to_string()))?;
        dispatcher::callback(app, &shared, callback_id, data, keep_alive)
    }

    /// Broadcasts component definitions to every framework declaring the
    /// hook. Returns how many were reached.
    pub fn register_components(&mut self, defs: &BridgeValue) -> BridgeResult<usize> {
        self.frameworks
            .broadcast(BroadcastCall::RegisterComponents(defs))
    }

    /// Broadcasts module definitions. Returns how many frameworks were
    /// reached.
    pub fn register_modules(&mut self, defs: &BridgeValue) -> BridgeResult<usize> {
        self.frameworks
            .broadcast(BroadcastCall::RegisterModules(defs))
    }

    /// Broadcasts method definitions. Returns how many frameworks were
    /// reached.
    pub fn register_methods(&mut self, defs: &BridgeValue) -> BridgeResult<usize> {
        self.frameworks
            .broadcast(BroadcastCall::RegisterMethods(defs))
    }

    fn with_framework<R>(
        &mut self,
        id: &str,
        hook: LifecycleHook,
        run: impl FnOnce(&mut dyn Framework, &mut AppInstance, &SharedConfig) -> BridgeResult<R>,
    ) -> BridgeResult<R> {
        let Some(mut app) = self.instances.take(id) else {
            return Err(BridgeError::UnknownInstance(id.to_string()));
        };
        let result = match app.framework().map(str::to_string) {
            Some(name) => match self.frameworks.resolve(&name, hook) {
                Ok((framework, shared)) => run(framework, &mut app, shared),
                Err(err) => Err(err),
            },
            None => Err(BridgeError::invalid(format!(
                "instance {} is not bound to a framework",
                id
            ))),
        };
        self.instances.insert(app);
        result
    }
}

/// Reads a string `framework` field out of an instance config.
fn config_framework(config: &BridgeValue) -> Option<String> {
    match config.object_get("framework") {
        Some(BridgeValue::String(name)) => Some(name.clone()),
        _ => None,
    }
}
