//! Unit tests for the framework registry.

use bridge_types::{
    BridgeError, BridgeResult, BridgeValue, HostTimer, SharedConfig, SimpleDocumentFactory,
    Transport, WireTask,
};
use framework_host::{BroadcastCall, Framework, FrameworkRegistry, LifecycleHook};
use std::cell::RefCell;
use std::rc::Rc;

struct NullTransport;

impl Transport for NullTransport {
    fn send_tasks(&self, _instance_id: &str, _tasks: &[WireTask], _callback_id: &str) {}
}

struct NullTimer;

impl HostTimer for NullTimer {
    fn set_timeout(&self, _instance_id: &str, _handle: &str, _delay_ms: f64) {}
    fn clear_timeout(&self, _instance_id: &str, _handle: &str) {}
    fn set_interval(&self, _instance_id: &str, _handle: &str, _interval_ms: f64) {}
    fn clear_interval(&self, _instance_id: &str, _handle: &str) {}
}

fn shared_config() -> SharedConfig {
    SharedConfig::new(
        Rc::new(SimpleDocumentFactory),
        Rc::new(NullTransport),
        Rc::new(NullTimer),
    )
}

/// Records which hooks were invoked, shared across clones of the log.
struct MockFramework {
    name: String,
    hooks: Vec<LifecycleHook>,
    log: Rc<RefCell<Vec<String>>>,
}

impl MockFramework {
    fn new(name: &str, hooks: Vec<LifecycleHook>, log: Rc<RefCell<Vec<String>>>) -> Box<Self> {
        Box::new(Self {
            name: name.to_string(),
            hooks,
            log,
        })
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.name, hook));
    }
}

impl Framework for MockFramework {
    fn name(&self) -> &str {
        &self.name
    }

    fn hooks(&self) -> &[LifecycleHook] {
        &self.hooks
    }

    fn init(&mut self, _shared: &SharedConfig) -> BridgeResult<()> {
        self.record("init");
        Ok(())
    }

    fn register_components(&mut self, _defs: &BridgeValue) -> BridgeResult<()> {
        self.record("registerComponents");
        Ok(())
    }

    fn register_modules(&mut self, _defs: &BridgeValue) -> BridgeResult<()> {
        self.record("registerModules");
        Ok(())
    }
}

#[test]
fn broadcast_reaches_exactly_the_declaring_frameworks() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = FrameworkRegistry::new();
    registry
        .register(MockFramework::new(
            "A",
            vec![LifecycleHook::RegisterComponents],
            log.clone(),
        ))
        .unwrap();
    registry
        .register(MockFramework::new(
            "B",
            vec![
                LifecycleHook::RegisterComponents,
                LifecycleHook::RegisterModules,
            ],
            log.clone(),
        ))
        .unwrap();
    registry
        .register(MockFramework::new("C", vec![], log.clone()))
        .unwrap();
    registry.init(shared_config()).unwrap();

    let defs = BridgeValue::empty_object();
    let reached = registry
        .broadcast(BroadcastCall::RegisterComponents(&defs))
        .unwrap();
    assert_eq!(reached, 2);

    let reached = registry
        .broadcast(BroadcastCall::RegisterModules(&defs))
        .unwrap();
    assert_eq!(reached, 1);

    let log = log.borrow();
    assert!(log.contains(&"A:registerComponents".to_string()));
    assert!(log.contains(&"B:registerComponents".to_string()));
    assert!(log.contains(&"B:registerModules".to_string()));
    assert!(!log.iter().any(|entry| entry.starts_with("C:register")));
}

#[test]
fn init_runs_each_declared_init_hook_once() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = FrameworkRegistry::new();
    registry
        .register(MockFramework::new(
            "A",
            vec![LifecycleHook::Init],
            log.clone(),
        ))
        .unwrap();
    registry
        .register(MockFramework::new("B", vec![], log.clone()))
        .unwrap();

    registry.init(shared_config()).unwrap();
    assert_eq!(log.borrow().as_slice(), &["A:init".to_string()]);

    let err = registry.init(shared_config()).unwrap_err();
    assert_eq!(err, BridgeError::AlreadyInitialized);
}

#[test]
fn registration_closes_at_init() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = FrameworkRegistry::new();
    registry.init(shared_config()).unwrap();
    let err = registry
        .register(MockFramework::new("late", vec![], log))
        .unwrap_err();
    assert_eq!(err, BridgeError::AlreadyInitialized);
}

#[test]
fn duplicate_names_are_rejected() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = FrameworkRegistry::new();
    registry
        .register(MockFramework::new("A", vec![], log.clone()))
        .unwrap();
    let err = registry
        .register(MockFramework::new("A", vec![], log))
        .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidArgument(_)));
}

#[test]
fn resolve_reports_unknown_framework_and_unsupported_hook() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut registry = FrameworkRegistry::new();
    registry
        .register(MockFramework::new(
            "A",
            vec![LifecycleHook::RegisterComponents],
            log,
        ))
        .unwrap();
    registry.init(shared_config()).unwrap();

    let err = registry
        .resolve("missing", LifecycleHook::RefreshInstance)
        .unwrap_err();
    assert_eq!(err, BridgeError::UnknownFramework("missing".to_string()));

    let err = registry
        .resolve("A", LifecycleHook::RefreshInstance)
        .unwrap_err();
    assert_eq!(
        err,
        BridgeError::Unsupported {
            framework: "A".to_string(),
            hook: "refreshInstance",
        }
    );
}

#[test]
fn resolve_before_init_is_an_error() {
    let mut registry = FrameworkRegistry::new();
    let err = registry
        .resolve("A", LifecycleHook::RefreshInstance)
        .unwrap_err();
    assert_eq!(err, BridgeError::NotInitialized);
}
