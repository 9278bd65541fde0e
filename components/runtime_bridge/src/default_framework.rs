//! The default framework.
//!
//! The built-in lifecycle implementation bundles bind to when their header
//! names no registered framework. It wires the sandbox executor, the
//! dispatcher, and the action batcher together, and keeps framework-wide
//! component/module/method registrations that seed every new instance.

use crate::dispatcher;
use app_core::{AppInstance, InstanceState};
use bridge_types::{BridgeError, BridgeResult, BridgeValue, SharedConfig, Task};
use framework_host::{Framework, LifecycleHook};
use sandbox_exec::{execute, Bundle, ExecutionOutcome};
use std::collections::HashMap;
use tracing::debug;

/// Name the sniffer falls back to for unclassified bundles.
pub const DEFAULT_FRAMEWORK: &str = "Mural";

const HOOKS: &[LifecycleHook] = &[
    LifecycleHook::Init,
    LifecycleHook::PrepareInstance,
    LifecycleHook::CreateInstance,
    LifecycleHook::DestroyInstance,
    LifecycleHook::RefreshInstance,
    LifecycleHook::ReceiveTasks,
    LifecycleHook::GetRoot,
    LifecycleHook::RegisterComponents,
    LifecycleHook::RegisterModules,
    LifecycleHook::RegisterMethods,
];

/// The built-in framework implementation.
#[derive(Default)]
pub struct DefaultFramework {
    components: HashMap<String, BridgeValue>,
    modules: HashMap<String, BridgeValue>,
    methods: HashMap<String, BridgeValue>,
}

impl DefaultFramework {
    /// Creates the framework with empty registration tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of framework-wide component registrations.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    fn store_definitions(
        table: &mut HashMap<String, BridgeValue>,
        defs: &BridgeValue,
    ) -> BridgeResult<()> {
        match defs {
            // { name: definition, ... }
            BridgeValue::Object(pairs) => {
                for (name, def) in pairs {
                    table.insert(name.clone(), def.clone());
                }
                Ok(())
            }
            // [ { "type": name, ... }, ... ]
            BridgeValue::Array(items) => {
                for item in items {
                    let name = item
                        .object_get("type")
                        .and_then(|v| match v {
                            BridgeValue::String(s) => Some(s.clone()),
                            _ => None,
                        })
                        .ok_or_else(|| {
                            BridgeError::invalid("registration entries need a string 'type'")
                        })?;
                    table.insert(name, item.clone());
                }
                Ok(())
            }
            _ => Err(BridgeError::invalid(
                "registrations must be an object or an array",
            )),
        }
    }
}

impl Framework for DefaultFramework {
    fn name(&self) -> &str {
        DEFAULT_FRAMEWORK
    }

    fn hooks(&self) -> &[LifecycleHook] {
        HOOKS
    }

    fn init(&mut self, _shared: &SharedConfig) -> BridgeResult<()> {
        debug!(framework = DEFAULT_FRAMEWORK, "framework initialized");
        Ok(())
    }

    fn prepare_instance(
        &mut self,
        app: &mut AppInstance,
        shared: &SharedConfig,
        config: &BridgeValue,
        _data: &BridgeValue,
    ) -> BridgeResult<()> {
        if app.document_opt_mut().is_none() {
            app.attach_document(shared.documents.create_document(app.id()));
        }
        if matches!(config, BridgeValue::Object(pairs) if !pairs.is_empty()) {
            app.meta.options = Some(config.clone());
        }
        Ok(())
    }

    fn create_instance(
        &mut self,
        app: &mut AppInstance,
        shared: &SharedConfig,
        bundle: &Bundle,
        config: &BridgeValue,
        data: &BridgeValue,
    ) -> BridgeResult<BridgeValue> {
        if app.document_opt_mut().is_none() {
            app.attach_document(shared.documents.create_document(app.id()));
        }
        if matches!(config, BridgeValue::Object(pairs) if !pairs.is_empty()) {
            let mut options = app
                .meta
                .options
                .take()
                .unwrap_or_else(BridgeValue::empty_object);
            options.merge_shallow(config);
            app.meta.options = Some(options);
        }
        // Framework-wide registrations seed the instance so its bundle can
        // bootstrap them without re-defining. Registered methods join the
        // module namespace and are reachable through require the same way.
        for (name, def) in &self.components {
            app.register_component(name, def.clone());
        }
        for (name, def) in &self.methods {
            app.define_module(name, def.clone());
        }
        for (name, def) in &self.modules {
            app.define_module(name, def.clone());
        }

        let outcome = execute(app, shared, bundle)?;
        let result = match outcome {
            ExecutionOutcome::Prepared => BridgeValue::Undefined,
            ExecutionOutcome::Ran(value) => {
                app.mark_created();
                value
            }
        };

        // External data overrides what the bundle bootstrapped with.
        if matches!(data, BridgeValue::Object(pairs) if !pairs.is_empty()) {
            if let Some(vm) = app.vm_mut() {
                vm.data.merge_shallow(data);
                app_core::flush(app, shared.transport.as_ref())?;
            }
        }
        Ok(result)
    }

    fn destroy_instance(
        &mut self,
        app: &mut AppInstance,
        _shared: &SharedConfig,
    ) -> BridgeResult<()> {
        dispatcher::destroy(app);
        Ok(())
    }

    fn refresh_instance(
        &mut self,
        app: &mut AppInstance,
        shared: &SharedConfig,
        data: &BridgeValue,
    ) -> BridgeResult<BridgeValue> {
        dispatcher::refresh(app, shared, data)
    }

    fn receive_tasks(
        &mut self,
        app: &mut AppInstance,
        shared: &SharedConfig,
        tasks: &[Task],
    ) -> BridgeResult<BridgeValue> {
        if app.state() != InstanceState::Created {
            return Err(BridgeError::invalid(format!(
                "instance {} has not been created",
                app.id()
            )));
        }
        let mut result = BridgeValue::Undefined;
        for task in tasks {
            result = match task.method.as_str() {
                "fireEvent" => {
                    let refs = task
                        .args
                        .first()
                        .map(candidate_refs)
                        .transpose()?
                        .ok_or_else(|| BridgeError::invalid("fireEvent needs a target ref"))?;
                    let event_type = string_arg(&task.args, 1, "fireEvent needs an event type")?;
                    let event = task.args.get(2).cloned().unwrap_or(BridgeValue::Undefined);
                    let dom_changes = task.args.get(3).filter(|v| v.is_truthy());
                    dispatcher::fire_event(
                        app,
                        shared,
                        &refs,
                        &event_type,
                        &event,
                        dom_changes,
                    )?
                }
                "callback" => {
                    let id = callback_id(task.args.first())?;
                    let data = task.args.get(1).cloned().unwrap_or(BridgeValue::Undefined);
                    let keep_alive = matches!(task.args.get(2), Some(BridgeValue::Boolean(true)));
                    dispatcher::callback(app, shared, id, &data, keep_alive)?
                }
                other => {
                    return Err(BridgeError::invalid(format!(
                        "unsupported task method '{}'",
                        other
                    )))
                }
            };
        }
        Ok(result)
    }

    fn get_root(&self, app: &AppInstance, _shared: &SharedConfig) -> BridgeResult<BridgeValue> {
        let doc = app.document()?;
        doc.root_ref()
            .map(|r| BridgeValue::Element(r.to_string()))
            .ok_or_else(|| BridgeError::invalid("instance has no root element"))
    }

    fn register_components(&mut self, defs: &BridgeValue) -> BridgeResult<()> {
        Self::store_definitions(&mut self.components, defs)
    }

    fn register_modules(&mut self, defs: &BridgeValue) -> BridgeResult<()> {
        Self::store_definitions(&mut self.modules, defs)
    }

    fn register_methods(&mut self, defs: &BridgeValue) -> BridgeResult<()> {
        Self::store_definitions(&mut self.methods, defs)
    }
}

/// Extracts an ordered candidate ref list from a task argument.
///
/// Accepts a single ref (string or element) or a list of them.
fn candidate_refs(value: &BridgeValue) -> BridgeResult<Vec<String>> {
    match value {
        BridgeValue::String(s) => Ok(vec![s.clone()]),
        BridgeValue::Element(r) => Ok(vec![r.clone()]),
        BridgeValue::Array(items) => {
            let mut refs = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    BridgeValue::String(s) => refs.push(s.clone()),
                    BridgeValue::Element(r) => refs.push(r.clone()),
                    _ => return Err(BridgeError::invalid("event refs must be strings")),
                }
            }
            Ok(refs)
        }
        _ => Err(BridgeError::invalid("event ref must be a string or list")),
    }
}

fn string_arg(args: &[BridgeValue], index: usize, message: &str) -> BridgeResult<String> {
    match args.get(index) {
        Some(BridgeValue::String(s)) => Ok(s.clone()),
        _ => Err(BridgeError::invalid(message)),
    }
}

/// Parses a callback id from a number or decimal string argument.
fn callback_id(value: Option<&BridgeValue>) -> BridgeResult<i64> {
    match value {
        Some(BridgeValue::Number(n)) if n.fract() == 0.0 => Ok(*n as i64),
        Some(BridgeValue::String(s)) => s
            .parse::<i64>()
            .map_err(|_| BridgeError::invalid(format!("bad callback id '{}'", s))),
        _ => Err(BridgeError::invalid("callback needs a numeric id")),
    }
}
