//! Generic nameable object

use std::any::Any;

use parking_lot::Mutex;
use serde_json::json;

use crate::error::NamingError;
use crate::value::{Nameable, Object, Value};

/// An object that keeps the type name and arguments it was constructed with.
///
/// Records are nameable and keep the last name assigned. A record reached
/// through an alias unit therefore ends up named after the outermost unit.
#[derive(Debug)]
pub struct Record {
    type_name: String,
    arguments: Vec<Value>,
    name: Mutex<Option<String>>,
}

impl Record {
    /// An unnamed record of `type_name` built from `arguments`.
    pub fn new(type_name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            arguments,
            name: Mutex::new(None),
        }
    }

    /// The type name the record was constructed under.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The argument values, in call order.
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// The name assigned to this record, if any.
    pub fn name(&self) -> Option<String> {
        self.name.lock().clone()
    }
}

impl Nameable for Record {
    fn assign_name(&self, name: &str) -> Result<(), NamingError> {
        *self.name.lock() = Some(name.to_owned());
        Ok(())
    }
}

impl Object for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn describe(&self) -> serde_json::Value {
        json!({
            "type": self.type_name,
            "name": self.name(),
            "arguments": self.arguments.iter().map(Value::to_json).collect::<Vec<_>>(),
        })
    }

    fn as_nameable(&self) -> Option<&dyn Nameable> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_keeps_the_last_name() {
        let record = Record::new("shell.Step", vec![]);
        assert_eq!(record.name(), None);

        record.assign_name("check").unwrap();
        record.assign_name("test").unwrap();

        assert_eq!(record.name().as_deref(), Some("test"));
    }

    #[test]
    fn it_describes_itself() {
        let record = Record::new("shell.Step", vec!["make".into(), 2.into()]);
        record.assign_name("build").unwrap();

        assert_eq!(
            record.describe(),
            json!({ "type": "shell.Step", "name": "build", "arguments": ["make", 2] })
        );
    }
}
