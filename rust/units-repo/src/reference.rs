//! References to other units
//!
//! A [`Reference`] is the variable a grammar produces for a bare unit name.
//! Instantiating it looks the name up among the user's units, parses that
//! unit's specification with the same grammar, instantiates the result
//! against the same user, and finally lets the produced object record the
//! name it was resolved under (see [`Nameable`](crate::value::Nameable)).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::error::{InstantiationError, NameError, SyntaxError};
use crate::grammar::Grammar;
use crate::name::UnitName;
use crate::unit::User;
use crate::value::Value;
use crate::variable::Variable;

/// Shared handle to a grammar.
///
/// Two handles are equal only when they point at the same grammar instance.
#[derive(Clone)]
pub struct GrammarRef(Arc<dyn Grammar>);

impl GrammarRef {
    /// Parse `text` with the underlying grammar.
    pub fn parse(&self, text: &str) -> Result<Variable, SyntaxError> {
        self.0.parse(text)
    }
}

impl<G> From<Arc<G>> for GrammarRef
where
    G: Grammar + 'static,
{
    fn from(grammar: Arc<G>) -> Self {
        Self(grammar)
    }
}

impl From<Arc<dyn Grammar>> for GrammarRef {
    fn from(grammar: Arc<dyn Grammar>) -> Self {
        Self(grammar)
    }
}

impl PartialEq for GrammarRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl Eq for GrammarRef {}

impl Hash for GrammarRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).cast::<()>().hash(state);
    }
}

impl fmt::Debug for GrammarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GrammarRef")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// A variable resolving to the object another unit of the same user
/// instantiates to.
///
/// References are immutable. Two references are equal when they were built
/// with the same grammar instance and the same name, regardless of what the
/// named unit currently resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    grammar: GrammarRef,
    name: UnitName,
}

impl Reference {
    /// Fails unless `name` is a valid unit name.
    pub fn new(grammar: impl Into<GrammarRef>, name: impl Into<String>) -> Result<Self, NameError> {
        Ok(Self {
            grammar: grammar.into(),
            name: UnitName::new(name)?,
        })
    }

    /// The referenced unit name.
    pub fn name(&self) -> &UnitName {
        &self.name
    }

    /// The grammar referenced units are parsed with.
    pub fn grammar(&self) -> &GrammarRef {
        &self.grammar
    }

    /// Resolve the referenced unit for `user` and instantiate it.
    ///
    /// Nothing is cached: every call fetches, parses and instantiates the
    /// unit again.
    #[instrument(level = "debug", skip_all, fields(unit = %self.name))]
    pub fn instantiate(&self, user: &dyn User) -> Result<Value, InstantiationError> {
        if !user.units().contains(self.name.as_str()) {
            debug!("unit is not owned by the user");
            return Err(self.not_found());
        }
        let unit = user
            .get(self.name.as_str())
            .ok_or_else(|| self.not_found())?;

        let variable =
            self.grammar
                .parse(unit.spec().as_text())
                .map_err(|source| InstantiationError::Syntax {
                    name: self.name.to_string(),
                    source,
                })?;

        let value = variable.instantiate(user)?;
        self.assign_name(&value)?;

        debug!(kind = value.kind(), "unit resolved");
        Ok(value)
    }

    /// The name exactly as it was given at construction.
    pub fn as_text(&self) -> String {
        self.name.to_string()
    }

    fn assign_name(&self, value: &Value) -> Result<(), InstantiationError> {
        let Some(nameable) = value.as_object().and_then(|object| object.as_nameable()) else {
            trace!(kind = value.kind(), "value is not nameable");
            return Ok(());
        };

        nameable
            .assign_name(self.name.as_str())
            .map_err(|source| InstantiationError::Naming {
                name: self.name.to_string(),
                source,
            })?;

        trace!("name assigned");
        Ok(())
    }

    fn not_found(&self) -> InstantiationError {
        InstantiationError::UnitNotFound {
            name: self.name.to_string(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
