//! Error types for the sheetgraph front-end.

use sheetgraph_core::SheetError;
use thiserror::Error;

/// Errors that can occur while loading and applying an assignment script.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Line {line}")]
    Sheet {
        line: usize,
        #[source]
        source: SheetError,
    },
}

pub type Result<T> = std::result::Result<T, ScriptError>;
