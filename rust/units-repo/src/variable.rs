//! The variable tree a unit specification parses into

use std::collections::BTreeSet;
use std::fmt;

use crate::error::InstantiationError;
use crate::reference::Reference;
use crate::registry::RegistryRef;
use crate::unit::User;
use crate::value::Value;

/// A node of a parsed unit specification.
///
/// Instantiating a variable against a user produces a runtime [`Value`];
/// rendering it with [`Display`](fmt::Display) produces its canonical text,
/// which parses back into an equal variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Another unit of the same user, by name
    Reference(Reference),
    /// A text literal
    Text(String),
    /// An integer literal
    Integer(i64),
    /// `true` or `false`
    Boolean(bool),
    /// Items in order
    Array(Vec<Variable>),
    /// Entries in the order they were written; keys are unique
    Dictionary(Vec<(String, Variable)>),
    /// An object built by a registered constructor
    Composite(Composite),
}

impl Variable {
    /// Produce the runtime value of this variable for `user`.
    ///
    /// Nested variables are instantiated depth first, left to right; the
    /// first failure aborts the whole instantiation.
    pub fn instantiate(&self, user: &dyn User) -> Result<Value, InstantiationError> {
        match self {
            Variable::Reference(reference) => reference.instantiate(user),
            Variable::Text(text) => Ok(Value::Text(text.clone())),
            Variable::Integer(number) => Ok(Value::Integer(*number)),
            Variable::Boolean(flag) => Ok(Value::Boolean(*flag)),
            Variable::Array(items) => items
                .iter()
                .map(|item| item.instantiate(user))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Variable::Dictionary(entries) => entries
                .iter()
                .map(|(key, item)| Ok((key.clone(), item.instantiate(user)?)))
                .collect::<Result<Vec<_>, InstantiationError>>()
                .map(Value::Dictionary),
            Variable::Composite(composite) => composite.instantiate(user),
        }
    }

    /// The canonical text form of this variable.
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// Names of the units this variable refers to anywhere in its tree.
    pub fn references(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references(&self, names: &mut BTreeSet<String>) {
        match self {
            Variable::Reference(reference) => {
                names.insert(reference.as_text());
            }
            Variable::Array(items) => {
                for item in items {
                    item.collect_references(names);
                }
            }
            Variable::Dictionary(entries) => {
                for (_, item) in entries {
                    item.collect_references(names);
                }
            }
            Variable::Composite(composite) => {
                for argument in composite.arguments() {
                    argument.collect_references(names);
                }
            }
            Variable::Text(_) | Variable::Integer(_) | Variable::Boolean(_) => {}
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Reference(reference) => write!(f, "{reference}"),
            Variable::Text(text) => write_text(f, text),
            Variable::Integer(number) => write!(f, "{number}"),
            Variable::Boolean(flag) => write!(f, "{flag}"),
            Variable::Array(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            Variable::Dictionary(entries) => {
                write!(f, "{{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_text(f, key)?;
                    write!(f, ": {item}")?;
                }
                write!(f, "}}")
            }
            Variable::Composite(composite) => write!(f, "{composite}"),
        }
    }
}

/// A call of a registered constructor, e.g. `shell.Step("make", 2)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Composite {
    registry: RegistryRef,
    type_name: String,
    arguments: Vec<Variable>,
}

impl Composite {
    /// A call of `type_name` with `arguments`, built by `registry`.
    pub fn new(
        registry: impl Into<RegistryRef>,
        type_name: impl Into<String>,
        arguments: Vec<Variable>,
    ) -> Self {
        Self {
            registry: registry.into(),
            type_name: type_name.into(),
            arguments,
        }
    }

    /// The dotted type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The argument variables, in call order.
    pub fn arguments(&self) -> &[Variable] {
        &self.arguments
    }

    /// Instantiate the arguments, then hand them to the type's constructor.
    pub fn instantiate(&self, user: &dyn User) -> Result<Value, InstantiationError> {
        let arguments = self
            .arguments
            .iter()
            .map(|argument| argument.instantiate(user))
            .collect::<Result<Vec<_>, _>>()?;

        self.registry
            .construct(&self.type_name, arguments)
            .map(Value::Object)
    }
}

impl fmt::Display for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name)?;
        write_list(f, &self.arguments)?;
        write!(f, ")")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Variable]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_text(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in text.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}
