//! Event and callback dispatch.
//!
//! Routes native-originated events and callbacks into a live instance.
//! Every operation here runs to completion synchronously; nested dispatch
//! (a callback firing another dispatch) nests normally.

use app_core::{flush, AppInstance};
use bridge_types::{BridgeError, BridgeResult, BridgeValue, SharedConfig};

/// Refreshes the instance's view-model with new data.
///
/// A model-defined refresh hook is preferred; without one the data is
/// shallow-merged onto the view-model. Flushes pending mutations and
/// signals that the refresh finished.
pub fn refresh(
    app: &mut AppInstance,
    shared: &SharedConfig,
    data: &BridgeValue,
) -> BridgeResult<BridgeValue> {
    if !data.is_truthy() {
        return Err(BridgeError::invalid("refresh data must be non-empty"));
    }
    let Some(vm) = app.vm_mut() else {
        return Err(BridgeError::invalid("instance has no view-model"));
    };
    match vm.refresh_hook.clone() {
        Some(hook) => {
            hook.call(data.clone());
        }
        None => vm.data.merge_shallow(data),
    }
    flush(app, shared.transport.as_ref())?;
    app.document_mut()?.listener().refresh_finish();
    Ok(BridgeValue::Undefined)
}

/// Fires an event against one or more candidate element refs.
///
/// Candidates are tried in order; dispatch stops at the first handler whose
/// result is not exactly `false`. Candidates that do not resolve are
/// skipped, but if none resolve the call fails with an explicit error.
/// Optional DOM changes are applied to the first resolved ref before the
/// event fires.
pub fn fire_event(
    app: &mut AppInstance,
    shared: &SharedConfig,
    refs: &[String],
    event_type: &str,
    event: &BridgeValue,
    dom_changes: Option<&BridgeValue>,
) -> BridgeResult<BridgeValue> {
    if refs.is_empty() {
        return Err(BridgeError::invalid("no event target"));
    }
    let result = {
        let doc = app.document_mut()?;
        if let Some(changes) = dom_changes {
            if let Some(target) = refs.iter().find(|r| doc.contains(r)) {
                let target = target.clone();
                doc.update_element(&target, changes)?;
            }
        }
        let mut resolved = false;
        let mut result = BridgeValue::Undefined;
        for ref_id in refs {
            if !doc.contains(ref_id) {
                continue;
            }
            resolved = true;
            result = doc.fire_event(ref_id, event_type, event)?;
            if result != BridgeValue::Boolean(false) {
                break;
            }
        }
        if !resolved {
            return Err(BridgeError::invalid(format!(
                "no element at ref(s) {:?}",
                refs
            )));
        }
        result
    };
    flush(app, shared.transport.as_ref())?;
    app.document_mut()?.listener().update_finish();
    Ok(result)
}

/// Invokes the callback stored at `id` with `data`.
///
/// Single-shot by default: the slot is cleared after the call unless
/// `keep_alive` is explicitly true.
pub fn callback(
    app: &mut AppInstance,
    shared: &SharedConfig,
    id: i64,
    data: &BridgeValue,
    keep_alive: bool,
) -> BridgeResult<BridgeValue> {
    let Some(f) = app.callback(id) else {
        return Err(BridgeError::invalid(format!("no callback at id {}", id)));
    };
    let result = f.call(data.clone());
    if !keep_alive {
        app.remove_callback(id);
    }
    flush(app, shared.transport.as_ref())?;
    if let Some(doc) = app.document_opt_mut() {
        doc.listener().update_finish();
    }
    Ok(result)
}

/// Releases everything the instance owns: view-model, document, callback
/// table, and metadata. Registry-entry removal is the lifecycle layer's
/// responsibility, not this function's.
pub fn destroy(app: &mut AppInstance) {
    app.release();
}
