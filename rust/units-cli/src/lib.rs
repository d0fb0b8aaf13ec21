#![warn(missing_docs)]

//! # Units CLI
//!
//! Command line tools for inspecting and resolving units kept as files in a
//! directory, one `<name>.unit` file per unit.
//!
//! ## Usage
//!
//! ```bash
//! units --dir ./units list
//! units --dir ./units show release
//! units --dir ./units deps release
//! RUST_LOG=units_repo=debug units --dir ./units resolve release
//! ```
//!
//! Composite types are not compiled in: every composite resolves to a
//! generic record that keeps its type name, its arguments and the name of
//! the unit it was resolved from.
//!
//! `resolve` refuses units whose references lead back to themselves instead
//! of recursing without end.

mod cli;
pub use cli::*;

mod commands;
pub use commands::*;

mod cycles;
pub use cycles::*;

mod load;
pub use load::*;
