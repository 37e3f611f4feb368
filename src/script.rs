//! Assignment scripts.
//!
//! One assignment per line, `REF: input`, for example:
//!
//! ```text
//! # totals
//! A1: 100
//! A2: =A1*2
//! A3: '=not a formula
//! A1:
//! ```
//!
//! A single space after the colon is dropped; everything else is passed to
//! [`Sheet::set_cell`] verbatim. An empty input clears the cell. Blank lines
//! and lines starting with `#` are skipped.

use log::debug;
use sheetgraph_core::{Position, Sheet};

use crate::error::{Result, ScriptError};

/// One `REF: input` line.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    /// 1-based line number in the script it came from.
    pub line: usize,
    pub position: Position,
    pub input: String,
}

/// Parse script content into assignments.
pub fn parse_script(content: &str) -> Result<Vec<Assignment>> {
    let mut assignments = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        assignments.push(parse_assignment(raw.trim_start(), line)?);
    }
    Ok(assignments)
}

/// Parse a single `REF: input` assignment.
pub fn parse_assignment(text: &str, line: usize) -> Result<Assignment> {
    let Some((name, input)) = text.split_once(':') else {
        return Err(ScriptError::Parse {
            line,
            message: "Expected 'REF: input' format".to_string(),
        });
    };

    let name = name.trim();
    let position = name.parse::<Position>().map_err(|message| ScriptError::Parse {
        line,
        message,
    })?;
    let input = input.strip_prefix(' ').unwrap_or(input);

    Ok(Assignment {
        line,
        position,
        input: input.to_string(),
    })
}

/// Apply assignments in order. Stops at the first one the sheet rejects;
/// earlier assignments stay applied.
pub fn apply_script(sheet: &mut Sheet, assignments: &[Assignment]) -> Result<()> {
    for assignment in assignments {
        let result = if assignment.input.is_empty() {
            sheet.clear_cell(assignment.position)
        } else {
            sheet.set_cell(assignment.position, &assignment.input)
        };
        result.map_err(|source| ScriptError::Sheet {
            line: assignment.line,
            source,
        })?;
    }
    debug!("applied {} assignment(s)", assignments.len());
    Ok(())
}
