//! sheetgraph - command-line front-end for the sheetgraph engine.
//!
//! Reads `REF: input` assignment scripts, applies them to a
//! [`Sheet`](sheetgraph_core::Sheet) and prints the result.

pub mod error;
pub mod script;

pub use error::{Result, ScriptError};
pub use script::{Assignment, apply_script, parse_script};
