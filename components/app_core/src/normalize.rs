//! Value normalization.
//!
//! The single choke point between instance state and the native bridge.
//! Every task argument passes through here exactly once, so no live
//! function, element object, or cyclic structure can cross into a batch.

use crate::app::AppInstance;
use bridge_types::BridgeValue;

/// Normalizes one value into its bridge-safe JSON form.
///
/// Classification is a closed, exhaustive match over the value model:
///
/// | input                         | output                               |
/// |-------------------------------|--------------------------------------|
/// | undefined / null              | empty string                         |
/// | regular expression            | its `/pattern/flags` string form     |
/// | date                          | ISO-8601 string with milliseconds    |
/// | element reference             | its ref id string                    |
/// | boolean / number / string     | unchanged                            |
/// | sequence / mapping            | unchanged JSON (lossy for nesting)   |
/// | function                      | fresh callback id, as a string       |
///
/// A function is stored in the instance's callback table under the next uid
/// and crosses the bridge as that id's decimal string. Anything that cannot
/// be represented cleanly degrades through best-effort JSON serialization;
/// normalization itself never fails.
pub fn normalize(value: &BridgeValue, app: &mut AppInstance) -> serde_json::Value {
    match value {
        BridgeValue::Undefined | BridgeValue::Null => {
            serde_json::Value::String(String::new())
        }
        BridgeValue::Boolean(b) => serde_json::Value::Bool(*b),
        BridgeValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        BridgeValue::String(s) => serde_json::Value::String(s.clone()),
        BridgeValue::Date(ms) => BridgeValue::date_to_iso(*ms)
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
        BridgeValue::RegExp { pattern, flags } => {
            serde_json::Value::String(format!("/{}/{}", pattern, flags))
        }
        BridgeValue::Element(ref_id) => serde_json::Value::String(ref_id.clone()),
        BridgeValue::Array(_) | BridgeValue::Object(_) => value.to_json_lossy(),
        BridgeValue::Function(f) => {
            let id = app.register_callback(f.clone());
            serde_json::Value::String(id.to_string())
        }
    }
}
