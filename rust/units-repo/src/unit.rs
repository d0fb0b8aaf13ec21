//! Units, their specifications, and the accounts that own them

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// The textual definition body of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spec(String);

impl Spec {
    /// Wrap specification text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The specification text as written.
    pub fn as_text(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Spec {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Spec {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// A named configuration fragment owned by a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    name: String,
    spec: Spec,
}

impl Unit {
    /// A unit called `name` defined by `spec`.
    pub fn new(name: impl Into<String>, spec: impl Into<Spec>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }

    /// The unit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unit's specification.
    pub fn spec(&self) -> &Spec {
        &self.spec
    }
}

/// The user context variables are instantiated against.
///
/// Implementations are consumed read-only and may be shared between threads
/// resolving references concurrently.
pub trait User: Send + Sync {
    /// Names of all units owned by this user.
    fn units(&self) -> BTreeSet<String>;

    /// The unit named `name`, if this user owns it.
    fn get(&self, name: &str) -> Option<Unit>;
}

impl<U> User for &U
where
    U: User + ?Sized,
{
    fn units(&self) -> BTreeSet<String> {
        (**self).units()
    }

    fn get(&self, name: &str) -> Option<Unit> {
        (**self).get(name)
    }
}

impl<U> User for Arc<U>
where
    U: User + ?Sized,
{
    fn units(&self) -> BTreeSet<String> {
        (**self).units()
    }

    fn get(&self, name: &str) -> Option<Unit> {
        (**self).get(name)
    }
}

/// In-memory account: an owner label and the units it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    owner: String,
    units: BTreeMap<String, Unit>,
}

impl Account {
    /// An account owned by `owner`, with no units.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            units: BTreeMap::new(),
        }
    }

    /// Builder form of [`Account::insert`].
    pub fn with_unit(mut self, name: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.insert(Unit::new(name, spec));
        self
    }

    /// Add `unit`, returning the unit it replaced, if any.
    pub fn insert(&mut self, unit: Unit) -> Option<Unit> {
        self.units.insert(unit.name().to_owned(), unit)
    }

    /// The owner label.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Number of units owned.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the account owns no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl User for Account {
    fn units(&self) -> BTreeSet<String> {
        self.units.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> Option<Unit> {
        self.units.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_lists_and_fetches_units() {
        let account = Account::new("alice")
            .with_unit("build", "shell.Step(\"make\")")
            .with_unit("deploy", "[build]");

        assert_eq!(
            account.units(),
            BTreeSet::from(["build".to_string(), "deploy".to_string()])
        );
        assert_eq!(
            account.get("deploy").map(|unit| unit.spec().as_text().to_owned()),
            Some("[build]".to_string())
        );
        assert_eq!(account.get("missing"), None);
    }

    #[test]
    fn it_replaces_units_with_the_same_name() {
        let mut account = Account::new("alice").with_unit("build", "1");
        let replaced = account.insert(Unit::new("build", "2"));

        assert_eq!(replaced, Some(Unit::new("build", "1")));
        assert_eq!(account.len(), 1);
    }

    #[test]
    fn it_serializes_spec_as_plain_text() {
        let json = serde_json::to_string(&Unit::new("build", "true")).unwrap();
        assert_eq!(json, r#"{"name":"build","spec":"true"}"#);
    }
}
