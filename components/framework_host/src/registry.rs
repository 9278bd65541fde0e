//! Framework registry.
//!
//! Holds every registered framework for the life of the process. The
//! registry is an explicit object the host owns and passes by reference, so
//! a fresh one can be constructed per test; there is no ambient global.
//! Registration closes at init: after `init` runs, the set is immutable.

use crate::framework::{Framework, LifecycleHook};
use bridge_types::{BridgeError, BridgeResult, BridgeValue, SharedConfig};
use tracing::debug;

/// A registration call delivered to every framework declaring its hook.
#[derive(Debug, Clone, Copy)]
pub enum BroadcastCall<'a> {
    RegisterComponents(&'a BridgeValue),
    RegisterModules(&'a BridgeValue),
    RegisterMethods(&'a BridgeValue),
}

impl BroadcastCall<'_> {
    /// The hook this call targets.
    pub fn hook(&self) -> LifecycleHook {
        match self {
            BroadcastCall::RegisterComponents(_) => LifecycleHook::RegisterComponents,
            BroadcastCall::RegisterModules(_) => LifecycleHook::RegisterModules,
            BroadcastCall::RegisterMethods(_) => LifecycleHook::RegisterMethods,
        }
    }
}

/// The process-wide set of pluggable frameworks.
#[derive(Default)]
pub struct FrameworkRegistry {
    frameworks: Vec<Box<dyn Framework>>,
    shared: Option<SharedConfig>,
}

impl FrameworkRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a framework. Closed once `init` has run.
    pub fn register(&mut self, framework: Box<dyn Framework>) -> BridgeResult<()> {
        if self.shared.is_some() {
            return Err(BridgeError::AlreadyInitialized);
        }
        if self.contains(framework.name()) {
            return Err(BridgeError::invalid(format!(
                "framework '{}' is already registered",
                framework.name()
            )));
        }
        debug!(framework = framework.name(), "registering framework");
        self.frameworks.push(framework);
        Ok(())
    }

    /// Returns true if a framework is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.frameworks.iter().any(|f| f.name() == name)
    }

    /// Returns true if `name` is registered and declares `hook`.
    pub fn supports(&self, name: &str, hook: LifecycleHook) -> bool {
        self.frameworks
            .iter()
            .any(|f| f.name() == name && f.supports(hook))
    }

    /// True once `init` has run.
    pub fn is_initialized(&self) -> bool {
        self.shared.is_some()
    }

    /// Runs each framework's init hook with the shared config and stores
    /// the config for later dispatch. Must run before any instance exists;
    /// a second call is an error.
    pub fn init(&mut self, shared: SharedConfig) -> BridgeResult<()> {
        if self.shared.is_some() {
            return Err(BridgeError::AlreadyInitialized);
        }
        for framework in &mut self.frameworks {
            if framework.supports(LifecycleHook::Init) {
                framework.init(&shared)?;
            }
        }
        debug!(frameworks = self.frameworks.len(), "framework registry initialized");
        self.shared = Some(shared);
        Ok(())
    }

    /// The shared config installed at init.
    pub fn shared(&self) -> BridgeResult<&SharedConfig> {
        self.shared.as_ref().ok_or(BridgeError::NotInitialized)
    }

    /// Delivers a registration call to exactly the frameworks declaring its
    /// hook. Returns how many were reached. No cross-framework ordering
    /// contract.
    pub fn broadcast(&mut self, call: BroadcastCall<'_>) -> BridgeResult<usize> {
        let hook = call.hook();
        let mut reached = 0;
        for framework in &mut self.frameworks {
            if !framework.supports(hook) {
                continue;
            }
            match call {
                BroadcastCall::RegisterComponents(defs) => {
                    framework.register_components(defs)?
                }
                BroadcastCall::RegisterModules(defs) => framework.register_modules(defs)?,
                BroadcastCall::RegisterMethods(defs) => framework.register_methods(defs)?,
            }
            reached += 1;
        }
        Ok(reached)
    }

    /// Resolves a framework for a per-instance dispatch.
    ///
    /// Returns explicit errors, never panics, when the registry is
    /// uninitialized, the name is unknown, or the framework does not
    /// declare the hook.
    pub fn resolve(
        &mut self,
        name: &str,
        hook: LifecycleHook,
    ) -> BridgeResult<(&mut dyn Framework, &SharedConfig)> {
        let shared = self.shared.as_ref().ok_or(BridgeError::NotInitialized)?;
        let framework = self
            .frameworks
            .iter_mut()
            .find(|f| f.name() == name)
            .ok_or_else(|| BridgeError::UnknownFramework(name.to_string()))?;
        if !framework.supports(hook) {
            return Err(BridgeError::Unsupported {
                framework: name.to_string(),
                hook: hook.name(),
            });
        }
        Ok((framework.as_mut(), shared))
    }
}

impl std::fmt::Debug for FrameworkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameworkRegistry")
            .field("frameworks", &self.frameworks.len())
            .field("initialized", &self.shared.is_some())
            .finish()
    }
}
