//! Composite type constructors

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{ConstructionError, InstantiationError};
use crate::record::Record;
use crate::value::{Object, Value};

/// Builds an object from already instantiated argument values.
pub type Constructor =
    Arc<dyn Fn(Vec<Value>) -> Result<Arc<dyn Object>, ConstructionError> + Send + Sync>;

/// Table of the composite types a grammar can instantiate, keyed by their
/// dotted type name (e.g. `shell.Step`).
#[derive(Clone, Default)]
pub struct Registry {
    constructors: BTreeMap<String, Constructor>,
    records: bool,
}

impl Registry {
    /// An empty registry: every composite type is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that builds a [`Record`] for any type it has no
    /// constructor for.
    pub fn records() -> Self {
        Self {
            constructors: BTreeMap::new(),
            records: true,
        }
    }

    /// Register `constructor` under `type_name`, replacing any previous one.
    pub fn register<F>(mut self, type_name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Arc<dyn Object>, ConstructionError> + Send + Sync + 'static,
    {
        self.constructors
            .insert(type_name.into(), Arc::new(constructor));
        self
    }

    /// Names of all explicitly registered types.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Construct an object of type `type_name` from `arguments`.
    pub fn construct(
        &self,
        type_name: &str,
        arguments: Vec<Value>,
    ) -> Result<Arc<dyn Object>, InstantiationError> {
        match self.constructors.get(type_name) {
            Some(constructor) => {
                constructor(arguments).map_err(|source| InstantiationError::Construction {
                    type_name: type_name.to_owned(),
                    source,
                })
            }
            None if self.records => Ok(Arc::new(Record::new(type_name, arguments))),
            None => Err(InstantiationError::UnknownType {
                type_name: type_name.to_owned(),
            }),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.constructors.keys().collect::<Vec<_>>())
            .field("records", &self.records)
            .finish()
    }
}

/// Shared handle to a registry, compared by instance rather than content.
#[derive(Clone, Debug)]
pub struct RegistryRef(Arc<Registry>);

impl std::ops::Deref for RegistryRef {
    type Target = Registry;

    fn deref(&self) -> &Registry {
        &self.0
    }
}

impl From<Arc<Registry>> for RegistryRef {
    fn from(registry: Arc<Registry>) -> Self {
        Self(registry)
    }
}

impl From<Registry> for RegistryRef {
    fn from(registry: Registry) -> Self {
        Self(Arc::new(registry))
    }
}

impl PartialEq for RegistryRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RegistryRef {}

impl Hash for RegistryRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

/// Argument checks shared by constructors.
pub mod arguments {
    use crate::error::ConstructionError;
    use crate::value::Value;

    /// Fail unless exactly `expected` arguments were given.
    pub fn arity(arguments: &[Value], expected: usize) -> Result<(), ConstructionError> {
        if arguments.len() == expected {
            Ok(())
        } else {
            Err(ConstructionError::Arity {
                expected,
                actual: arguments.len(),
            })
        }
    }

    /// The text argument at `index`.
    pub fn text(arguments: &[Value], index: usize) -> Result<&str, ConstructionError> {
        let value = argument(arguments, index)?;
        value.as_text().ok_or_else(|| mismatch(index, "text", value))
    }

    /// The integer argument at `index`.
    pub fn integer(arguments: &[Value], index: usize) -> Result<i64, ConstructionError> {
        let value = argument(arguments, index)?;
        value.as_integer().ok_or_else(|| mismatch(index, "integer", value))
    }

    /// The boolean argument at `index`.
    pub fn boolean(arguments: &[Value], index: usize) -> Result<bool, ConstructionError> {
        let value = argument(arguments, index)?;
        value.as_boolean().ok_or_else(|| mismatch(index, "boolean", value))
    }

    fn argument(arguments: &[Value], index: usize) -> Result<&Value, ConstructionError> {
        arguments.get(index).ok_or(ConstructionError::Arity {
            expected: index + 1,
            actual: arguments.len(),
        })
    }

    fn mismatch(index: usize, expected: &str, found: &Value) -> ConstructionError {
        ConstructionError::Argument {
            index,
            expected: expected.to_owned(),
            found: found.kind().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn step(arguments: Vec<Value>) -> Result<Arc<dyn Object>, ConstructionError> {
        arguments::arity(&arguments, 1)?;
        arguments::text(&arguments, 0)?;
        Ok(Arc::new(Record::new("shell.Step", arguments)))
    }

    #[test]
    fn it_constructs_registered_types() {
        let registry = Registry::new().register("shell.Step", step);
        let object = registry
            .construct("shell.Step", vec!["make".into()])
            .unwrap();

        assert_eq!(object.type_name(), "shell.Step");
        assert_eq!(registry.type_names().collect::<Vec<_>>(), vec!["shell.Step"]);
    }

    #[test]
    fn it_reports_unknown_types() {
        let error = Registry::new().construct("shell.Step", vec![]).unwrap_err();
        assert_eq!(
            error,
            InstantiationError::UnknownType {
                type_name: "shell.Step".into()
            }
        );
    }

    #[test]
    fn it_wraps_constructor_failures() {
        let registry = Registry::new().register("shell.Step", step);
        let error = registry
            .construct("shell.Step", vec![Value::Integer(1)])
            .unwrap_err();

        assert_eq!(
            error,
            InstantiationError::Construction {
                type_name: "shell.Step".into(),
                source: ConstructionError::Argument {
                    index: 0,
                    expected: "text".into(),
                    found: "integer".into(),
                },
            }
        );
    }

    #[test]
    fn it_falls_back_to_records() {
        let object = Registry::records()
            .construct("anything.At-all", vec![Value::Boolean(true)])
            .unwrap();

        assert_eq!(object.type_name(), "anything.At-all");
        assert!(object.as_nameable().is_some());
    }

    #[test]
    fn it_compares_handles_by_instance() {
        let shared = Arc::new(Registry::new());
        assert_eq!(
            RegistryRef::from(shared.clone()),
            RegistryRef::from(shared)
        );
        assert!(RegistryRef::from(Registry::new()) != RegistryRef::from(Registry::new()));
    }
}
