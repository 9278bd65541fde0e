//! Action batching.
//!
//! Drains pending document mutations into one batch per unit of work. A
//! flush that finds nothing pending submits nothing; a non-empty batch is
//! normalized and shipped as a single `send_tasks` call tagged with the
//! no-return-value sentinel.

use crate::app::AppInstance;
use crate::normalize::normalize;
use bridge_types::{BridgeResult, Task, Transport, WireTask, NO_CALLBACK};
use tracing::debug;

/// Runs the document differ, drains the listener's update queue, and
/// submits the result if non-empty.
///
/// A no-op when the instance's document has been released or nothing is
/// pending.
pub fn flush(app: &mut AppInstance, transport: &dyn Transport) -> BridgeResult<()> {
    let tasks = match app.document_opt_mut() {
        None => return Ok(()),
        Some(doc) => {
            doc.flush_diff();
            doc.listener().drain_updates()
        }
    };
    if tasks.is_empty() {
        return Ok(());
    }
    submit(app, tasks, transport)
}

/// Normalizes every argument of every task and ships the batch.
///
/// The wire contract is exactly `send_tasks(instance_id, tasks, "-1")`.
pub fn submit(
    app: &mut AppInstance,
    tasks: Vec<Task>,
    transport: &dyn Transport,
) -> BridgeResult<()> {
    let mut wire = Vec::with_capacity(tasks.len());
    for task in tasks {
        let mut args = Vec::with_capacity(task.args.len());
        for arg in &task.args {
            args.push(normalize(arg, app));
        }
        wire.push(WireTask {
            method: task.method,
            args,
        });
    }
    debug!(instance = app.id(), tasks = wire.len(), "submitting batch");
    transport.send_tasks(app.id(), &wire, NO_CALLBACK);
    Ok(())
}

/// Submits a single task as a one-element batch.
pub fn submit_one(
    app: &mut AppInstance,
    task: Task,
    transport: &dyn Transport,
) -> BridgeResult<()> {
    submit(app, vec![task], transport)
}
