//! Runtime values produced by instantiating variables

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use serde_json::json;

use crate::error::NamingError;

/// Capability of an instantiated object to record the name of the unit it
/// was instantiated from.
///
/// Objects opt in by implementing this trait and returning themselves from
/// [`Object::as_nameable`].
pub trait Nameable {
    /// Record `name` as the name of the unit this object was resolved from.
    fn assign_name(&self, name: &str) -> Result<(), NamingError>;
}

/// A live runtime object constructed from a composite variable.
pub trait Object: Debug + Send + Sync {
    /// The type name the object was constructed under.
    fn type_name(&self) -> &str;

    /// A JSON rendering of the object for inspection.
    fn describe(&self) -> serde_json::Value {
        json!({ "type": self.type_name() })
    }

    /// The naming capability, for objects that have one.
    fn as_nameable(&self) -> Option<&dyn Nameable> {
        None
    }

    /// The object as [`Any`], for downcasting to its concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// The result of instantiating a variable.
#[derive(Debug, Clone)]
pub enum Value {
    /// Text
    Text(String),
    /// A 64 bit signed integer
    Integer(i64),
    /// A boolean
    Boolean(bool),
    /// Items in order
    Array(Vec<Value>),
    /// Entries in the order they were written
    Dictionary(Vec<(String, Value)>),
    /// A live object built by a constructor
    Object(Arc<dyn Object>),
}

impl Value {
    /// Short name of the value's kind, for messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Array(_) => "array",
            Value::Dictionary(_) => "dictionary",
            Value::Object(_) => "object",
        }
    }

    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The integer, if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(number) => Some(*number),
            _ => None,
        }
    }

    /// The flag, if this is a boolean value.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    /// The object, if this is an object value.
    pub fn as_object(&self) -> Option<&Arc<dyn Object>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The object held by this value, if it is an object of type `T`.
    pub fn downcast_ref<T: Object + 'static>(&self) -> Option<&T> {
        self.as_object()
            .and_then(|object| object.as_any().downcast_ref::<T>())
    }

    /// Render this value as JSON. Objects render through [`Object::describe`].
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Text(text) => json!(text),
            Value::Integer(number) => json!(number),
            Value::Boolean(flag) => json!(flag),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Dictionary(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Object(object) => object.describe(),
        }
    }
}

/// Objects are equal only when they are the same instance.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Integer(number)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Boolean(flag)
    }
}

impl<T: Object + 'static> From<Arc<T>> for Value {
    fn from(object: Arc<T>) -> Self {
        Value::Object(object)
    }
}
