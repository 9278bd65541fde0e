//! Task and batch wire types.
//!
//! A task is one bridge operation: a method name plus its ordered argument
//! list. Tasks accumulate inside the bridge with live `BridgeValue`
//! arguments and only cross to the native side after normalization, as
//! `WireTask` batches.

use crate::value::BridgeValue;
use serde::{Deserialize, Serialize};

/// Sentinel callback id meaning "no return value expected".
///
/// Part of the wire contract: every batch this layer submits is tagged with
/// this id.
pub const NO_CALLBACK: &str = "-1";

/// One pending bridge operation with un-normalized arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Method name on the native side
    pub method: String,
    /// Ordered argument list, not yet bridge-safe
    pub args: Vec<BridgeValue>,
}

impl Task {
    /// Creates a new task.
    pub fn new(method: impl Into<String>, args: Vec<BridgeValue>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// One bridge operation after normalization.
///
/// Every argument is guaranteed bridge-safe: primitives, strings, and
/// element-reference ids only. This is the `{method, args}` shape the native
/// transport receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTask {
    pub method: String,
    pub args: Vec<serde_json::Value>,
}

/// The native transport collaborator.
///
/// Fire-and-forget from this layer's perspective; transient transport
/// failures are the transport's own concern.
pub trait Transport {
    /// Ships one batch of normalized tasks for an instance.
    fn send_tasks(&self, instance_id: &str, tasks: &[WireTask], callback_id: &str);
}
