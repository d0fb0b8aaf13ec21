//! Grammars turning unit specification text into variable trees
//!
//! [`Grammar`] is the seam the resolver depends on. [`UnitGrammar`] is the
//! grammar of the unit DSL:
//!
//! ```text
//! spec        = variable EOF
//! variable    = text | integer | boolean | array | dictionary | composite | reference
//! text        = '"' (char | '\"' | '\\' | '\n' | '\t')* '"'
//! integer     = '-'? digit+
//! boolean     = 'true' | 'false'
//! array       = '[' (variable (',' variable)* ','?)? ']'
//! dictionary  = '{' (text ':' variable (',' text ':' variable)* ','?)? '}'
//! composite   = type_name '(' (variable (',' variable)* ','?)? ')'
//! type_name   = word ('.' word)*
//! reference   = word
//! word        = [-_a-zA-Z0-9]+
//! ```
//!
//! A word is an integer when it is entirely an optionally negative digit
//! sequence, a boolean when it is `true` or `false`, a composite type name
//! when it is followed by `.` or `(`, and a reference otherwise. Whitespace
//! between tokens is ignored and `#` starts a comment running to the end of
//! the line.
//!
//! ## Example
//!
//! ```
//! use units_repo::{Account, Grammar, Registry, UnitGrammar, Value};
//!
//! let grammar = UnitGrammar::new(Registry::records());
//! let account = Account::new("alice")
//!     .with_unit("make", r#"shell.Step("make", 2)"#)
//!     .with_unit("pipeline", "[make, make]");
//!
//! let pipeline = grammar.parse("pipeline").unwrap();
//! let value = pipeline.instantiate(&account).unwrap();
//! assert!(matches!(value, Value::Array(ref steps) if steps.len() == 2));
//! ```

mod parser;
mod tokenizer;

use std::fmt::Debug;
use std::sync::{Arc, Weak};

use crate::error::SyntaxError;
use crate::reference::GrammarRef;
use crate::registry::{Registry, RegistryRef};
use crate::variable::Variable;

pub use tokenizer::{Spanned, Token, tokenize};

/// Deepest nesting of arrays, dictionaries and composites [`UnitGrammar`]
/// accepts.
pub const MAX_DEPTH: usize = 64;

/// A parser of unit specification text.
pub trait Grammar: Debug + Send + Sync {
    /// Parse a whole specification into a single variable.
    fn parse(&self, text: &str) -> Result<Variable, SyntaxError>;
}

/// The unit DSL grammar.
///
/// References produced by this grammar hold the very grammar instance that
/// parsed them, so nested units are parsed the same way.
#[derive(Debug)]
pub struct UnitGrammar {
    registry: RegistryRef,
    this: Weak<UnitGrammar>,
}

impl UnitGrammar {
    /// A grammar whose composites are built by `registry`.
    pub fn new(registry: impl Into<RegistryRef>) -> Arc<Self> {
        let registry = registry.into();
        Arc::new_cyclic(|this| Self {
            registry,
            this: this.clone(),
        })
    }

    /// The registry composites of this grammar are built by.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Grammar for UnitGrammar {
    fn parse(&self, text: &str) -> Result<Variable, SyntaxError> {
        let Some(grammar) = self.this.upgrade() else {
            unreachable!("a unit grammar only lives inside the Arc built by UnitGrammar::new");
        };
        let tokens = tokenize(text)?;

        parser::Parser::new(
            tokens,
            text.len(),
            GrammarRef::from(grammar),
            self.registry.clone(),
        )
        .parse_spec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Reference;
    use crate::variable::Composite;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_parses_into_references_bound_to_itself() {
        let grammar = UnitGrammar::new(Registry::new());
        let variable = grammar.parse("build").unwrap();

        assert_eq!(
            variable,
            Variable::Reference(Reference::new(grammar.clone(), "build").unwrap())
        );
    }

    #[test]
    fn it_builds_composites_with_its_registry() {
        let registry = RegistryRef::from(Registry::records());
        let grammar = UnitGrammar::new(registry.clone());

        assert_eq!(
            grammar.parse("shell.Step(\"make\")").unwrap(),
            Variable::Composite(Composite::new(
                registry,
                "shell.Step",
                vec![Variable::Text("make".into())]
            ))
        );
    }

    #[test]
    fn it_can_be_used_through_a_trait_object() {
        let grammar: Arc<dyn Grammar> = UnitGrammar::new(Registry::new());
        assert_eq!(grammar.parse("42").unwrap(), Variable::Integer(42));
    }
}
