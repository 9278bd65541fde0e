//! Bridge value representation.
//!
//! This module provides the `BridgeValue` enum covering every value that can
//! reach the native bridge, as a closed tagged classification: primitives,
//! dates, regular expressions, ordered sequences, keyed mappings, document
//! element references, and callable functions.

use chrono::{TimeZone, Utc};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A callable crossing into the bridge layer.
///
/// Functions are single-threaded and reference-counted; cloning a
/// `BridgeFunction` clones the handle, not the closure. Identity is pointer
/// identity, which is what callback-table bookkeeping relies on.
#[derive(Clone)]
pub struct BridgeFunction {
    inner: Rc<RefCell<dyn FnMut(BridgeValue) -> BridgeValue>>,
}

impl BridgeFunction {
    /// Creates a new function from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(BridgeValue) -> BridgeValue + 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(f)),
        }
    }

    /// Invokes the function with a single argument.
    pub fn call(&self, arg: BridgeValue) -> BridgeValue {
        (self.inner.borrow_mut())(arg)
    }

    /// Returns true if both handles refer to the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for BridgeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BridgeFunction {{ ... }}")
    }
}

/// Represents any value that can cross the bridge boundary.
///
/// This is a closed classification: every value an instance can hand to the
/// bridge falls into exactly one variant, and the normalizer in `app_core`
/// matches on it exhaustively.
///
/// # Examples
///
/// ```
/// use bridge_types::BridgeValue;
///
/// let undefined = BridgeValue::Undefined;
/// let number = BridgeValue::Number(42.0);
///
/// assert!(!undefined.is_truthy());
/// assert!(number.is_truthy());
/// ```
#[derive(Clone)]
pub enum BridgeValue {
    /// Absent value
    Undefined,
    /// Explicit null
    Null,
    /// Boolean (true or false)
    Boolean(bool),
    /// IEEE 754 double-precision number
    Number(f64),
    /// UTF-8 string
    String(String),
    /// Date as milliseconds since the Unix epoch (NaN = invalid date)
    Date(f64),
    /// Regular expression (pattern, flags)
    RegExp { pattern: String, flags: String },
    /// Ordered sequence
    Array(Vec<BridgeValue>),
    /// Keyed mapping with stable insertion order
    Object(Vec<(String, BridgeValue)>),
    /// Reference to a document element, by ref id
    Element(String),
    /// Callable function
    Function(BridgeFunction),
}

impl fmt::Debug for BridgeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeValue::Undefined => write!(f, "Undefined"),
            BridgeValue::Null => write!(f, "Null"),
            BridgeValue::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            BridgeValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            BridgeValue::String(s) => f.debug_tuple("String").field(s).finish(),
            BridgeValue::Date(ms) => f.debug_tuple("Date").field(ms).finish(),
            BridgeValue::RegExp { pattern, flags } => f
                .debug_struct("RegExp")
                .field("pattern", pattern)
                .field("flags", flags)
                .finish(),
            BridgeValue::Array(items) => f.debug_tuple("Array").field(items).finish(),
            BridgeValue::Object(pairs) => f.debug_tuple("Object").field(pairs).finish(),
            BridgeValue::Element(ref_id) => f.debug_tuple("Element").field(ref_id).finish(),
            BridgeValue::Function(_) => write!(f, "Function(...)"),
        }
    }
}

impl PartialEq for BridgeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BridgeValue::Undefined, BridgeValue::Undefined) => true,
            (BridgeValue::Null, BridgeValue::Null) => true,
            (BridgeValue::Boolean(a), BridgeValue::Boolean(b)) => a == b,
            (BridgeValue::Number(a), BridgeValue::Number(b)) => a == b,
            (BridgeValue::String(a), BridgeValue::String(b)) => a == b,
            (BridgeValue::Date(a), BridgeValue::Date(b)) => a == b,
            (
                BridgeValue::RegExp { pattern: pa, flags: fa },
                BridgeValue::RegExp { pattern: pb, flags: fb },
            ) => pa == pb && fa == fb,
            (BridgeValue::Array(a), BridgeValue::Array(b)) => a == b,
            (BridgeValue::Object(a), BridgeValue::Object(b)) => a == b,
            (BridgeValue::Element(a), BridgeValue::Element(b)) => a == b,
            (BridgeValue::Function(a), BridgeValue::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl BridgeValue {
    /// Creates a string value.
    pub fn string(s: impl Into<String>) -> Self {
        BridgeValue::String(s.into())
    }

    /// Creates an object value from key/value pairs.
    pub fn object(pairs: Vec<(String, BridgeValue)>) -> Self {
        BridgeValue::Object(pairs)
    }

    /// Creates an empty object value.
    pub fn empty_object() -> Self {
        BridgeValue::Object(Vec::new())
    }

    /// Wraps a closure as a function value.
    pub fn function<F>(f: F) -> Self
    where
        F: FnMut(BridgeValue) -> BridgeValue + 'static,
    {
        BridgeValue::Function(BridgeFunction::new(f))
    }

    /// Returns whether the value is truthy.
    ///
    /// Falsy values are undefined, null, false, 0, NaN, and the empty
    /// string; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            BridgeValue::Undefined | BridgeValue::Null => false,
            BridgeValue::Boolean(b) => *b,
            BridgeValue::Number(n) => *n != 0.0 && !n.is_nan(),
            BridgeValue::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Returns the value stored under `key` if this is an object.
    pub fn object_get(&self, key: &str) -> Option<&BridgeValue> {
        match self {
            BridgeValue::Object(pairs) => {
                pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Sets `key` on an object value, replacing an existing entry.
    ///
    /// No-op for non-object values.
    pub fn object_set(&mut self, key: &str, value: BridgeValue) {
        if let BridgeValue::Object(pairs) = self {
            if let Some(entry) = pairs.iter_mut().find(|(k, _)| k == key) {
                entry.1 = value;
            } else {
                pairs.push((key.to_string(), value));
            }
        }
    }

    /// Shallow-merges another object's entries onto this object.
    ///
    /// Existing keys are overwritten; nested values are not merged.
    /// No-op unless both values are objects.
    pub fn merge_shallow(&mut self, other: &BridgeValue) {
        if let BridgeValue::Object(pairs) = other {
            for (k, v) in pairs {
                self.object_set(k, v.clone());
            }
        }
    }

    /// Formats a date value as an ISO-8601 string with milliseconds.
    ///
    /// Returns `None` for NaN or out-of-range timestamps.
    pub fn date_to_iso(ms: f64) -> Option<String> {
        if ms.is_nan() || ms.is_infinite() {
            return None;
        }
        match Utc.timestamp_millis_opt(ms.trunc() as i64) {
            chrono::LocalResult::Single(dt) => {
                Some(dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
            }
            _ => None,
        }
    }

    /// Best-effort conversion to plain JSON.
    ///
    /// This is the serialization fallback: a value that cannot cross the
    /// bridge as-is degrades rather than fails. Dates become ISO-8601
    /// strings, regular expressions their string form, element references
    /// their ref id, and functions (which cannot be represented) become
    /// JSON null. Non-finite numbers also degrade to null.
    pub fn to_json_lossy(&self) -> serde_json::Value {
        match self {
            BridgeValue::Undefined | BridgeValue::Null => serde_json::Value::Null,
            BridgeValue::Boolean(b) => serde_json::Value::Bool(*b),
            BridgeValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            BridgeValue::String(s) => serde_json::Value::String(s.clone()),
            BridgeValue::Date(ms) => Self::date_to_iso(*ms)
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
            BridgeValue::RegExp { pattern, flags } => {
                serde_json::Value::String(format!("/{}/{}", pattern, flags))
            }
            BridgeValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(|v| v.to_json_lossy()).collect())
            }
            BridgeValue::Object(pairs) => {
                let mut map = serde_json::Map::new();
                for (k, v) in pairs {
                    map.insert(k.clone(), v.to_json_lossy());
                }
                serde_json::Value::Object(map)
            }
            BridgeValue::Element(ref_id) => serde_json::Value::String(ref_id.clone()),
            BridgeValue::Function(_) => serde_json::Value::Null,
        }
    }

    /// Converts plain JSON into a bridge value.
    ///
    /// Used when decoding task arguments arriving from the native side.
    pub fn from_json(value: &serde_json::Value) -> BridgeValue {
        match value {
            serde_json::Value::Null => BridgeValue::Null,
            serde_json::Value::Bool(b) => BridgeValue::Boolean(*b),
            serde_json::Value::Number(n) => {
                BridgeValue::Number(n.as_f64().unwrap_or(f64::NAN))
            }
            serde_json::Value::String(s) => BridgeValue::String(s.clone()),
            serde_json::Value::Array(items) => {
                BridgeValue::Array(items.iter().map(BridgeValue::from_json).collect())
            }
            serde_json::Value::Object(map) => BridgeValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), BridgeValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for BridgeValue {
    fn from(b: bool) -> Self {
        BridgeValue::Boolean(b)
    }
}

impl From<f64> for BridgeValue {
    fn from(n: f64) -> Self {
        BridgeValue::Number(n)
    }
}

impl From<i32> for BridgeValue {
    fn from(n: i32) -> Self {
        BridgeValue::Number(n as f64)
    }
}

impl From<&str> for BridgeValue {
    fn from(s: &str) -> Self {
        BridgeValue::String(s.to_string())
    }
}

impl From<String> for BridgeValue {
    fn from(s: String) -> Self {
        BridgeValue::String(s)
    }
}
