//! Error types for unit parsing and instantiation

use thiserror::Error;

/// A string was used where a unit name was expected but is not one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Unit names are one or more ASCII letters, digits, `_` or `-`
    #[error("invalid unit name {name:?}: expected one or more letters, digits, '_' or '-'")]
    Invalid {
        /// The rejected text
        name: String,
    },
}

/// Errors raised while parsing unit specification text.
///
/// Every variant carries the byte offset into the parsed text at which the
/// problem was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A character that starts no token
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedCharacter {
        /// The offending character
        found: char,
        /// Where it was found
        offset: usize,
    },

    /// A text literal with no closing quote
    #[error("unterminated text starting at offset {offset}")]
    UnterminatedText {
        /// Where the text literal opened
        offset: usize,
    },

    /// A backslash followed by something other than `"`, `\`, `n` or `t`
    #[error("invalid escape sequence '\\{found}' at offset {offset}")]
    InvalidEscape {
        /// The character after the backslash
        found: char,
        /// Where the backslash was found
        offset: usize,
    },

    /// An integer literal outside the range of `i64`
    #[error("integer {literal} at offset {offset} does not fit in 64 bits")]
    IntegerOverflow {
        /// The literal as written
        literal: String,
        /// Where the literal starts
        offset: usize,
    },

    /// A token other than the one the grammar requires at this point
    #[error("expected {expected}, found {found} at offset {offset}")]
    Expected {
        /// What the grammar was looking for
        expected: String,
        /// What was there instead
        found: String,
        /// Where it was found
        offset: usize,
    },

    /// A dictionary key written twice in the same dictionary
    #[error("duplicate key {key:?} at offset {offset}")]
    DuplicateKey {
        /// The repeated key
        key: String,
        /// Where the repetition starts
        offset: usize,
    },

    /// Arrays, dictionaries and composites nested too deeply
    #[error("nesting exceeds {limit} levels at offset {offset}")]
    TooDeep {
        /// The nesting limit
        limit: usize,
        /// Where the limit was exceeded
        offset: usize,
    },

    /// A word that cannot name a unit in reference position
    #[error("invalid reference at offset {offset}")]
    InvalidName {
        /// Where the word starts
        offset: usize,
        /// Why the name was rejected
        #[source]
        source: NameError,
    },
}

/// Failures reported by an object while recording the name it was
/// instantiated under.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// The object does not allow its name to be set
    #[error("permission denied: {reason}")]
    PermissionDenied {
        /// Explanation given by the object
        reason: String,
    },

    /// The object failed while recording its name
    #[error("naming failed: {reason}")]
    Fault {
        /// Explanation given by the object
        reason: String,
    },
}

/// Failures reported by composite type constructors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// The constructor got the wrong number of arguments
    #[error("expected {expected} argument(s), got {actual}")]
    Arity {
        /// Number of arguments the constructor takes
        expected: usize,
        /// Number of arguments it was given
        actual: usize,
    },

    /// An argument had the wrong kind
    #[error("argument {index}: expected {expected}, got {found}")]
    Argument {
        /// Position of the argument
        index: usize,
        /// Kind the constructor takes there
        expected: String,
        /// Kind it was given
        found: String,
    },

    /// Any other constructor failure
    #[error("{0}")]
    Other(String),
}

/// The resolution error: the single error kind surfaced when a variable tree
/// is instantiated against a user.
///
/// Parse and naming failures met while resolving a reference are always
/// wrapped into this type together with the name of the unit being resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstantiationError {
    /// The referenced unit is not among the user's units
    #[error("unit '{name}' not found in your account")]
    UnitNotFound {
        /// The referenced unit
        name: String,
    },

    /// The referenced unit's specification text failed to parse
    #[error("unit '{name}' has invalid syntax")]
    Syntax {
        /// The unit whose text failed to parse
        name: String,
        /// The parse failure
        #[source]
        source: SyntaxError,
    },

    /// The instantiated object refused or failed to record its name
    #[error("object instantiated from unit '{name}' cannot be named")]
    Naming {
        /// The name the object was given
        name: String,
        /// The object's failure
        #[source]
        source: NamingError,
    },

    /// A composite names a type the registry cannot build
    #[error("unknown type '{type_name}'")]
    UnknownType {
        /// The dotted type name
        type_name: String,
    },

    /// A registered constructor rejected its arguments
    #[error("cannot construct '{type_name}'")]
    Construction {
        /// The dotted type name
        type_name: String,
        /// The constructor's failure
        #[source]
        source: ConstructionError,
    },
}

/// Result type for instantiation
pub type InstantiationResult<T> = Result<T, InstantiationError>;
