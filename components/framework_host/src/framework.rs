//! The framework lifecycle contract.
//!
//! A framework is a pluggable implementation of the instance lifecycle. It
//! declares the subset of hooks it supports up front, as data, so callers
//! check capabilities structurally instead of probing at dispatch time.

use app_core::AppInstance;
use bridge_types::{BridgeError, BridgeResult, BridgeValue, SharedConfig, Task};
use sandbox_exec::Bundle;

/// The lifecycle operations a framework may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleHook {
    Init,
    PrepareInstance,
    CreateInstance,
    DestroyInstance,
    RefreshInstance,
    ReceiveTasks,
    GetRoot,
    RegisterComponents,
    RegisterModules,
    RegisterMethods,
}

impl LifecycleHook {
    /// Wire-facing hook name.
    pub const fn name(self) -> &'static str {
        match self {
            LifecycleHook::Init => "init",
            LifecycleHook::PrepareInstance => "prepareInstance",
            LifecycleHook::CreateInstance => "createInstance",
            LifecycleHook::DestroyInstance => "destroyInstance",
            LifecycleHook::RefreshInstance => "refreshInstance",
            LifecycleHook::ReceiveTasks => "receiveTasks",
            LifecycleHook::GetRoot => "getRoot",
            LifecycleHook::RegisterComponents => "registerComponents",
            LifecycleHook::RegisterModules => "registerModules",
            LifecycleHook::RegisterMethods => "registerMethods",
        }
    }
}

/// A pluggable UI framework.
///
/// Registered once with the framework registry and immutable after init.
/// Every hook has a default body returning an explicit unsupported error,
/// so a framework implements exactly the subset it declares in `hooks()`.
pub trait Framework {
    /// The framework's registered name.
    fn name(&self) -> &str;

    /// The hooks this framework supports, declared structurally.
    fn hooks(&self) -> &[LifecycleHook];

    /// Returns true if the framework declares `hook`.
    fn supports(&self, hook: LifecycleHook) -> bool {
        self.hooks().contains(&hook)
    }

    /// Builds the unsupported-hook error for this framework.
    fn unsupported(&self, hook: LifecycleHook) -> BridgeError {
        BridgeError::Unsupported {
            framework: self.name().to_string(),
            hook: hook.name(),
        }
    }

    /// One-time wiring with the shared config. Runs before any instance
    /// exists.
    fn init(&mut self, _shared: &SharedConfig) -> BridgeResult<()> {
        Ok(())
    }

    /// Builds an initial shell for an instance ahead of its bundle.
    fn prepare_instance(
        &mut self,
        _app: &mut AppInstance,
        _shared: &SharedConfig,
        _config: &BridgeValue,
        _data: &BridgeValue,
    ) -> BridgeResult<()> {
        Err(self.unsupported(LifecycleHook::PrepareInstance))
    }

    /// Executes an instance's bundle.
    fn create_instance(
        &mut self,
        _app: &mut AppInstance,
        _shared: &SharedConfig,
        _bundle: &Bundle,
        _config: &BridgeValue,
        _data: &BridgeValue,
    ) -> BridgeResult<BridgeValue> {
        Err(self.unsupported(LifecycleHook::CreateInstance))
    }

    /// Tears an instance down.
    fn destroy_instance(
        &mut self,
        _app: &mut AppInstance,
        _shared: &SharedConfig,
    ) -> BridgeResult<()> {
        Err(self.unsupported(LifecycleHook::DestroyInstance))
    }

    /// Refreshes an instance's view-model with new data.
    fn refresh_instance(
        &mut self,
        _app: &mut AppInstance,
        _shared: &SharedConfig,
        _data: &BridgeValue,
    ) -> BridgeResult<BridgeValue> {
        Err(self.unsupported(LifecycleHook::RefreshInstance))
    }

    /// Routes native-originated tasks into an instance.
    fn receive_tasks(
        &mut self,
        _app: &mut AppInstance,
        _shared: &SharedConfig,
        _tasks: &[Task],
    ) -> BridgeResult<BridgeValue> {
        Err(self.unsupported(LifecycleHook::ReceiveTasks))
    }

    /// Returns the instance's root element reference.
    fn get_root(&self, _app: &AppInstance, _shared: &SharedConfig) -> BridgeResult<BridgeValue> {
        Err(self.unsupported(LifecycleHook::GetRoot))
    }

    /// Registers component definitions framework-wide.
    fn register_components(&mut self, _defs: &BridgeValue) -> BridgeResult<()> {
        Err(self.unsupported(LifecycleHook::RegisterComponents))
    }

    /// Registers module definitions framework-wide.
    fn register_modules(&mut self, _defs: &BridgeValue) -> BridgeResult<()> {
        Err(self.unsupported(LifecycleHook::RegisterModules))
    }

    /// Registers method definitions framework-wide.
    fn register_methods(&mut self, _defs: &BridgeValue) -> BridgeResult<()> {
        Err(self.unsupported(LifecycleHook::RegisterMethods))
    }
}

impl std::fmt::Debug for dyn Framework + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framework").field("name", &self.name()).finish()
    }
}
