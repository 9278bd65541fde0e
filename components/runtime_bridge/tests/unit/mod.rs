//! Unit tests for the runtime facade, instance lifecycle, and dispatch.

use app_core::{AppInstance, InstanceState};
use bridge_types::{
    BridgeError, BridgeFunction, BridgeValue, HostTimer, SharedConfig, SimpleDocument,
    SimpleDocumentFactory, Transport, WireTask, NO_CALLBACK,
};
use runtime_bridge::{dispatcher, Runtime};
use sandbox_exec::Bundle;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct RecordingTransport {
    sent: RefCell<Vec<(String, Vec<WireTask>, String)>>,
}

impl Transport for RecordingTransport {
    fn send_tasks(&self, instance_id: &str, tasks: &[WireTask], callback_id: &str) {
        self.sent.borrow_mut().push((
            instance_id.to_string(),
            tasks.to_vec(),
            callback_id.to_string(),
        ));
    }
}

struct NullTimer;

impl HostTimer for NullTimer {
    fn set_timeout(&self, _instance_id: &str, _handle: &str, _delay_ms: f64) {}
    fn clear_timeout(&self, _instance_id: &str, _handle: &str) {}
    fn set_interval(&self, _instance_id: &str, _handle: &str, _interval_ms: f64) {}
    fn clear_interval(&self, _instance_id: &str, _handle: &str) {}
}

struct Harness {
    transport: Rc<RecordingTransport>,
    shared: SharedConfig,
}

fn harness() -> Harness {
    let transport = Rc::new(RecordingTransport::default());
    let shared = SharedConfig::new(
        Rc::new(SimpleDocumentFactory),
        transport.clone(),
        Rc::new(NullTimer),
    );
    Harness { transport, shared }
}

fn runtime() -> (Runtime, Harness) {
    let h = harness();
    let mut rt = Runtime::with_default_framework();
    rt.init(h.shared.clone()).unwrap();
    (rt, h)
}

const HEADER: &str = "// {\"framework\":\"Mural\",\"version\":\"0.1.0\"}\n";

/// A bundle that registers a root component and bootstraps it.
fn boot_bundle(component: &'static str) -> Bundle {
    Bundle::with_body(HEADER, move |scope| {
        scope.register(component, BridgeValue::empty_object());
        scope.bootstrap(
            component,
            &BridgeValue::empty_object(),
            &BridgeValue::Object(vec![(
                "title".to_string(),
                BridgeValue::string("hello"),
            )]),
        )?;
        Ok(BridgeValue::Undefined)
    })
}

// ----------------------------------------------------------------------
// Lifecycle
// ----------------------------------------------------------------------

#[test]
fn prepare_then_create_runs_the_bundle_and_batches_one_flush() {
    let (mut rt, h) = runtime();
    rt.prepare_instance("x", None, &BridgeValue::empty_object(), &BridgeValue::Undefined)
        .unwrap();
    assert_eq!(rt.instance_state("x"), Some(InstanceState::Prepared));

    rt.create_instance(
        "x",
        &boot_bundle("container"),
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();
    assert_eq!(rt.instance_state("x"), Some(InstanceState::Created));

    let sent = h.transport.sent.borrow();
    assert_eq!(sent.len(), 1);
    let (id, tasks, callback_id) = &sent[0];
    assert_eq!(id, "x");
    assert_eq!(callback_id, NO_CALLBACK);
    assert_eq!(tasks[0].method, "createBody");
}

#[test]
fn create_without_prepare_builds_the_instance_on_the_fly() {
    let (mut rt, _h) = runtime();
    rt.create_instance(
        "fresh",
        &boot_bundle("page"),
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();
    assert_eq!(rt.instance_state("fresh"), Some(InstanceState::Created));
}

#[test]
fn create_over_a_created_id_is_rejected() {
    let (mut rt, _h) = runtime();
    rt.create_instance(
        "x",
        &boot_bundle("page"),
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();

    let err = rt
        .create_instance(
            "x",
            &boot_bundle("page"),
            &BridgeValue::empty_object(),
            &BridgeValue::Undefined,
        )
        .unwrap_err();
    assert_eq!(err, BridgeError::InstanceExists("x".to_string()));
}

#[test]
fn unknown_type_prepares_a_placeholder_and_sniffing_still_creates() {
    let (mut rt, _h) = runtime();
    // A type naming no registered framework is accepted, not an error.
    rt.prepare_instance(
        "x",
        Some("Weex"),
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();
    assert_eq!(rt.instance_state("x"), Some(InstanceState::Prepared));

    // The bundle header resolves the framework on its own.
    rt.create_instance(
        "x",
        &boot_bundle("container"),
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();
    assert_eq!(rt.instance_state("x"), Some(InstanceState::Created));
}

#[test]
fn positional_type_wins_over_the_config_framework_field() {
    let (mut rt, _h) = runtime();
    rt.prepare_instance(
        "x",
        Some("Mural"),
        &BridgeValue::Object(vec![(
            "framework".to_string(),
            BridgeValue::string("Ghost"),
        )]),
        &BridgeValue::Undefined,
    )
    .unwrap();

    // Bound to the positional type: dispatch resolves and fails on the
    // instance's lifecycle state, not on an unknown framework name.
    let task = bridge_types::Task::new("fireEvent", vec![BridgeValue::string("_root")]);
    let err = rt.call_js("x", &[task]).unwrap_err();
    assert!(matches!(err, BridgeError::InvalidArgument(_)));
}

#[test]
fn repeated_prepare_silently_replaces_the_shell() {
    let (mut rt, _h) = runtime();
    rt.prepare_instance("x", None, &BridgeValue::empty_object(), &BridgeValue::Undefined)
        .unwrap();
    rt.prepare_instance("x", None, &BridgeValue::empty_object(), &BridgeValue::Undefined)
        .unwrap();
    assert_eq!(rt.instance_count(), 1);
}

#[test]
fn header_naming_an_unregistered_framework_is_an_error() {
    let (mut rt, _h) = runtime();
    rt.prepare_instance("x", None, &BridgeValue::empty_object(), &BridgeValue::Undefined)
        .unwrap();
    let bundle =
        Bundle::from_source("// {\"framework\":\"Ghost\",\"version\":\"9.9\"}\ncode");
    let err = rt
        .create_instance(
            "x",
            &bundle,
            &BridgeValue::empty_object(),
            &BridgeValue::Undefined,
        )
        .unwrap_err();
    assert_eq!(err, BridgeError::UnknownFramework("Ghost".to_string()));
    // The shell survives the failed create.
    assert_eq!(rt.instance_state("x"), Some(InstanceState::Prepared));
}

#[test]
fn headerless_bundle_falls_back_to_the_default_framework() {
    let (mut rt, _h) = runtime();
    let bundle = Bundle::with_body("no header here", |scope| {
        scope.register("page", BridgeValue::empty_object());
        scope.render("page", &BridgeValue::empty_object())?;
        Ok(BridgeValue::Undefined)
    });
    rt.create_instance(
        "x",
        &bundle,
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();
    assert_eq!(rt.instance_state("x"), Some(InstanceState::Created));
}

#[test]
fn destroy_removes_the_instance_and_later_calls_fail() {
    let (mut rt, _h) = runtime();
    rt.create_instance(
        "x",
        &boot_bundle("page"),
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();

    rt.destroy_instance("x").unwrap();
    assert_eq!(rt.instance_count(), 0);

    let err = rt
        .refresh_instance("x", &BridgeValue::empty_object())
        .unwrap_err();
    assert_eq!(err, BridgeError::UnknownInstance("x".to_string()));
    assert_eq!(
        rt.destroy_instance("x").unwrap_err(),
        BridgeError::UnknownInstance("x".to_string())
    );
}

#[test]
fn destroying_a_prepared_placeholder_succeeds() {
    let (mut rt, _h) = runtime();
    rt.prepare_instance("ghost", None, &BridgeValue::empty_object(), &BridgeValue::Undefined)
        .unwrap();
    rt.destroy_instance("ghost").unwrap();
    assert_eq!(rt.instance_count(), 0);
}

#[test]
fn registration_is_closed_after_init() {
    let h = harness();
    let mut rt = Runtime::with_default_framework();
    rt.init(h.shared.clone()).unwrap();
    assert!(rt.is_initialized());

    let err = rt
        .register_framework(Box::new(
            runtime_bridge::DefaultFramework::new(),
        ))
        .unwrap_err();
    assert_eq!(err, BridgeError::AlreadyInitialized);
}

// ----------------------------------------------------------------------
// Refresh and task routing
// ----------------------------------------------------------------------

#[test]
fn refresh_accepts_object_data_and_rejects_falsy_data() {
    let (mut rt, _h) = runtime();
    rt.create_instance(
        "x",
        &boot_bundle("page"),
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();

    rt.refresh_instance(
        "x",
        &BridgeValue::Object(vec![("count".to_string(), BridgeValue::Number(2.0))]),
    )
    .unwrap();

    let err = rt
        .refresh_instance("x", &BridgeValue::Undefined)
        .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidArgument(_)));
}

#[test]
fn refresh_before_create_is_rejected() {
    let (mut rt, _h) = runtime();
    rt.prepare_instance("x", None, &BridgeValue::empty_object(), &BridgeValue::Undefined)
        .unwrap();
    let err = rt
        .refresh_instance("x", &BridgeValue::empty_object())
        .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidArgument(_)));
}

#[test]
fn call_js_routes_fire_event_tasks_to_the_root() {
    let (mut rt, _h) = runtime();
    rt.create_instance(
        "x",
        &boot_bundle("page"),
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();

    let task = bridge_types::Task::new(
        "fireEvent",
        vec![
            BridgeValue::string("_root"),
            BridgeValue::string("click"),
            BridgeValue::empty_object(),
        ],
    );
    // No handler is installed on the root, so the dispatch result is
    // undefined rather than an error.
    let result = rt.call_js("x", &[task]).unwrap();
    assert_eq!(result, BridgeValue::Undefined);
}

#[test]
fn call_js_rejects_tasks_before_create() {
    let (mut rt, _h) = runtime();
    rt.prepare_instance(
        "x",
        Some("Mural"),
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();

    let task = bridge_types::Task::new("fireEvent", vec![BridgeValue::string("_root")]);
    let err = rt.call_js("x", &[task]).unwrap_err();
    assert!(matches!(err, BridgeError::InvalidArgument(_)));
}

#[test]
fn get_root_returns_the_root_element_ref() {
    let (mut rt, _h) = runtime();
    rt.create_instance(
        "x",
        &boot_bundle("page"),
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();
    assert_eq!(
        rt.get_root("x").unwrap(),
        BridgeValue::Element("_root".to_string())
    );
}

// ----------------------------------------------------------------------
// Event candidate order (dispatcher level)
// ----------------------------------------------------------------------

fn event_app(log: &Rc<RefCell<Vec<String>>>) -> AppInstance {
    let mut doc = SimpleDocument::new();
    for (ref_id, result) in [
        ("a", BridgeValue::Boolean(false)),
        ("b", BridgeValue::string("handled")),
        ("c", BridgeValue::string("never")),
    ] {
        let log = log.clone();
        let name = ref_id.to_string();
        doc.insert_element(ref_id, "div").on(
            "tap",
            BridgeFunction::new(move |_event| {
                log.borrow_mut().push(name.clone());
                result.clone()
            }),
        );
    }
    let mut app = AppInstance::new("ev");
    app.attach_document(Box::new(doc));
    app
}

#[test]
fn event_candidates_stop_at_the_first_non_false_result() {
    let h = harness();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut app = event_app(&log);

    let refs = vec![
        "missing".to_string(),
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
    ];
    let result = dispatcher::fire_event(
        &mut app,
        &h.shared,
        &refs,
        "tap",
        &BridgeValue::empty_object(),
        None,
    )
    .unwrap();

    assert_eq!(result, BridgeValue::string("handled"));
    assert_eq!(*log.borrow(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn event_with_no_resolvable_candidate_is_an_error() {
    let h = harness();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut app = event_app(&log);

    let refs = vec!["nope".to_string(), "nada".to_string()];
    let err = dispatcher::fire_event(
        &mut app,
        &h.shared,
        &refs,
        "tap",
        &BridgeValue::empty_object(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidArgument(_)));
    assert!(log.borrow().is_empty());
}

// ----------------------------------------------------------------------
// Callbacks
// ----------------------------------------------------------------------

#[test]
fn callbacks_are_single_shot_unless_kept_alive() {
    let (mut rt, _h) = runtime();
    let hits = Rc::new(RefCell::new(0));
    let bundle = {
        let hits = hits.clone();
        Bundle::with_body(HEADER, move |scope| {
            scope.register("page", BridgeValue::empty_object());
            scope.render("page", &BridgeValue::empty_object())?;
            let hits = hits.clone();
            scope.set_timeout(
                BridgeFunction::new(move |_v| {
                    *hits.borrow_mut() += 1;
                    BridgeValue::Undefined
                }),
                100.0,
            );
            Ok(BridgeValue::Undefined)
        })
    };
    rt.create_instance(
        "x",
        &bundle,
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();

    // keep_alive leaves the slot in place for a second fire
    rt.callback("x", 1, &BridgeValue::Undefined, true).unwrap();
    rt.callback("x", 1, &BridgeValue::Undefined, false).unwrap();
    assert_eq!(*hits.borrow(), 2);

    // single-shot semantics cleared the slot
    let err = rt
        .callback("x", 1, &BridgeValue::Undefined, false)
        .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidArgument(_)));
}

// ----------------------------------------------------------------------
// Framework-wide registrations
// ----------------------------------------------------------------------

#[test]
fn broadcast_registrations_seed_new_instances() {
    let h = harness();
    let mut rt = Runtime::with_default_framework();
    let reached = rt
        .register_components(&BridgeValue::Object(vec![(
            "shared-card".to_string(),
            BridgeValue::empty_object(),
        )]))
        .unwrap();
    assert_eq!(reached, 1);
    rt.init(h.shared.clone()).unwrap();

    // The bundle renders a component it never registered itself; the
    // framework-wide table supplies the definition.
    let bundle = Bundle::with_body(HEADER, |scope| {
        scope.render("shared-card", &BridgeValue::empty_object())?;
        Ok(BridgeValue::Undefined)
    });
    rt.create_instance(
        "x",
        &bundle,
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();
    assert_eq!(rt.instance_state("x"), Some(InstanceState::Created));
}

#[test]
fn broadcast_methods_are_requirable_inside_bundles() {
    let h = harness();
    let mut rt = Runtime::with_default_framework();
    rt.register_methods(&BridgeValue::Object(vec![(
        "ping".to_string(),
        BridgeValue::empty_object(),
    )]))
    .unwrap();
    rt.init(h.shared.clone()).unwrap();

    let bundle = Bundle::with_body(HEADER, |scope| {
        scope.require("ping")?;
        scope.register("page", BridgeValue::empty_object());
        scope.render("page", &BridgeValue::empty_object())?;
        Ok(BridgeValue::Undefined)
    });
    rt.create_instance(
        "x",
        &bundle,
        &BridgeValue::empty_object(),
        &BridgeValue::Undefined,
    )
    .unwrap();
    assert_eq!(rt.instance_state("x"), Some(InstanceState::Created));
}

// ----------------------------------------------------------------------
// External data at create
// ----------------------------------------------------------------------

#[test]
fn create_time_data_overrides_the_bootstrapped_model() {
    let (mut rt, h) = runtime();
    rt.create_instance(
        "x",
        &boot_bundle("page"),
        &BridgeValue::empty_object(),
        &BridgeValue::Object(vec![(
            "title".to_string(),
            BridgeValue::string("override"),
        )]),
    )
    .unwrap();
    assert_eq!(rt.instance_state("x"), Some(InstanceState::Created));
    // The bootstrap flush and the data-merge flush both reach the
    // transport; the merge flush may be empty-diff and skipped.
    assert!(!h.transport.sent.borrow().is_empty());
}
