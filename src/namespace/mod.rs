//! Runtime value model exposed to bridge clients
//!
//! Everything a client can reach (`inspect`, `queryApi`, `eval`) is a
//! [`Value`] hanging off one root object. Objects are anything implementing
//! [`Inspectable`], so each subsystem decides for itself which members it
//! exposes.

pub mod editor;
pub mod object;

pub use editor::editor_namespace;
pub use object::Namespace;

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Nested objects deeper than this are dropped when converted to JSON
const MAX_JSON_DEPTH: usize = 16;
/// 2^53 - 1, the largest integer an f64 holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Error raised by namespace code: a failing getter or native function
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ScriptError(pub String);

impl ScriptError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Capability interface for objects that can be walked and enumerated
pub trait Inspectable: Send + Sync {
    /// Own enumerable member names, in declaration order
    fn list_members(&self) -> Vec<String>;

    /// Read one member. Unknown names yield `Value::Undefined`.
    fn get_member(&self, name: &str) -> Result<Value, ScriptError>;

    /// Textual signature when the object is itself callable-like
    fn signature(&self) -> Option<String> {
        None
    }
}

pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, ScriptError> + Send + Sync;

/// Native function plus the textual signature clients see
#[derive(Clone)]
pub struct Callable {
    signature: String,
    body: Arc<NativeFn>,
}

impl Callable {
    pub fn new<F>(signature: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ScriptError> + Send + Sync + 'static,
    {
        Self {
            signature: signature.into(),
            body: Arc::new(body),
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, ScriptError> {
        (self.body)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("signature", &self.signature)
            .finish()
    }
}

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Arc<dyn Inspectable>),
    Function(Callable),
}

impl Value {
    pub fn object(object: impl Inspectable + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn function<F>(signature: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ScriptError> + Send + Sync + 'static,
    {
        Value::Function(Callable::new(signature, body))
    }

    /// Runtime type tag, as `typeof` reports it
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Missing in the sense of a failed global lookup
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Own member names; primitives have none
    pub fn member_names(&self) -> Vec<String> {
        match self {
            Value::Object(object) => object.list_members(),
            Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Read a member; anything without that member yields `Undefined`
    pub fn member(&self, name: &str) -> Result<Value, ScriptError> {
        match self {
            Value::Object(object) => object.get_member(name),
            Value::Array(items) => Ok(name
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index).cloned())
                .unwrap_or_default()),
            _ => Ok(Value::Undefined),
        }
    }

    /// Textual signature used to derive parameter names
    pub fn signature(&self) -> Option<String> {
        match self {
            Value::Function(callable) => Some(callable.signature().to_string()),
            Value::Object(object) => object.signature(),
            _ => None,
        }
    }

    /// JSON form of the value, or `None` when it has no JSON representation
    ///
    /// Undefined and functions are dropped, non-finite numbers become null.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        self.to_json_at(0)
    }

    fn to_json_at(&self, depth: usize) -> Option<serde_json::Value> {
        if depth > MAX_JSON_DEPTH {
            return None;
        }

        match self {
            Value::Undefined | Value::Function(_) => None,
            Value::Null => Some(serde_json::Value::Null),
            Value::Bool(b) => Some(serde_json::Value::Bool(*b)),
            Value::Number(n) => Some(number_to_json(*n)),
            Value::String(s) => Some(serde_json::Value::String(s.clone())),
            Value::Array(items) => Some(serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| item.to_json_at(depth + 1).unwrap_or(serde_json::Value::Null))
                    .collect(),
            )),
            Value::Object(object) => {
                let mut map = serde_json::Map::new();
                for name in object.list_members() {
                    let Ok(member) = object.get_member(&name) else {
                        continue;
                    };
                    if let Some(json) = member.to_json_at(depth + 1) {
                        map.insert(name, json);
                    }
                }
                Some(serde_json::Value::Object(map))
            }
        }
    }

    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let namespace = map
                    .into_iter()
                    .fold(Namespace::new(), |ns, (name, value)| {
                        ns.with(name, Value::from_json(value))
                    });
                Value::object(namespace)
            }
        }
    }
}

/// Integral numbers inside the safe integer range are written without a fraction
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::Number(serde_json::Number::from(n as i64));
    }

    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Object(object) => f.debug_set().entries(object.list_members()).finish(),
            Value::Function(callable) => write!(f, "{}", callable.signature()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Namespace> for Value {
    fn from(namespace: Namespace) -> Self {
        Value::object(namespace)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
