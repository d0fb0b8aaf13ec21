//! Units and reference resolution
//!
//! Users own named units: configuration fragments written in a small
//! specification language. A unit's text parses (through a [`Grammar`]) into
//! a tree of [`Variable`]s, and instantiating that tree against a [`User`]
//! produces runtime [`Value`]s, typically live objects built by a
//! [`Registry`] of constructors.
//!
//! A bare name in a specification is a [`Reference`] to another unit of the
//! same user. Instantiating it fetches that unit's text, parses it with the
//! same grammar, instantiates it recursively, and hands the unit name to the
//! resulting object if the object is [`Nameable`].
//!
//! ```
//! use units_repo::{Account, Record, Reference, Registry, UnitGrammar};
//!
//! let grammar = UnitGrammar::new(Registry::records());
//! let account = Account::new("alice").with_unit("build", r#"shell.Step("make")"#);
//!
//! let value = Reference::new(grammar, "build")
//!     .unwrap()
//!     .instantiate(&account)
//!     .unwrap();
//!
//! let step = value.downcast_ref::<Record>().unwrap();
//! assert_eq!(step.name().as_deref(), Some("build"));
//! ```

#![warn(missing_docs)]

/// Error types for parsing and instantiation.
pub mod error;
/// Grammars and the unit specification language.
pub mod grammar;
/// Validated unit names.
pub mod name;
/// The stock nameable object.
pub mod record;
/// Resolution of unit references.
pub mod reference;
/// Composite type constructors.
pub mod registry;
/// Units, specifications and users.
pub mod unit;
/// Runtime values and the object contracts.
pub mod value;
/// The variable tree.
pub mod variable;

pub use error::{
    ConstructionError, InstantiationError, InstantiationResult, NameError, NamingError,
    SyntaxError,
};
pub use grammar::{Grammar, MAX_DEPTH, UnitGrammar};
pub use name::UnitName;
pub use record::Record;
pub use reference::{GrammarRef, Reference};
pub use registry::{Constructor, Registry, RegistryRef, arguments};
pub use unit::{Account, Spec, Unit, User};
pub use value::{Nameable, Object, Value};
pub use variable::{Composite, Variable};
