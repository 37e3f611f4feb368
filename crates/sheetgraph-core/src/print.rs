//! Plain-text rendering of a sheet.
//!
//! Both printers walk the printable area row by row, separate cells with a
//! tab and end every row with a newline. Absent cells print nothing.

use std::io::{self, Write};

use sheetgraph_engine::engine::Position;

use crate::sheet::{Cell, Sheet};

/// Write every cell's computed value.
pub fn print_values<W: Write>(sheet: &Sheet, out: &mut W) -> io::Result<()> {
    print_with(sheet, out, |_, pos| {
        // The position comes from the printable area, so it is in range.
        sheet.value(pos).map(|value| value.to_string()).unwrap_or_default()
    })
}

/// Write every cell's text as entered.
pub fn print_texts<W: Write>(sheet: &Sheet, out: &mut W) -> io::Result<()> {
    print_with(sheet, out, |cell, _| cell.text())
}

fn print_with<W, F>(sheet: &Sheet, out: &mut W, render: F) -> io::Result<()>
where
    W: Write,
    F: Fn(&Cell, Position) -> String,
{
    let size = sheet.printable_size();
    for row in 0..size.rows {
        for col in 0..size.cols {
            if col > 0 {
                out.write_all(b"\t")?;
            }
            let pos = Position::new(row, col);
            if let Ok(Some(cell)) = sheet.cell(pos) {
                out.write_all(render(cell, pos).as_bytes())?;
            }
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(name: &str) -> Position {
        name.parse().unwrap()
    }

    fn render(sheet: &Sheet, values: bool) -> String {
        let mut out = Vec::new();
        if values {
            print_values(sheet, &mut out).unwrap();
        } else {
            print_texts(sheet, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    fn sample() -> Sheet {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=(1+2)*3").unwrap();
        sheet.set_cell(pos("B1"), "'=escaped").unwrap();
        sheet.set_cell(pos("A2"), "=B2/0").unwrap();
        sheet.set_cell(pos("C2"), "label").unwrap();
        sheet
    }

    #[test]
    fn test_print_values() {
        assert_eq!(render(&sample(), true), "9\t=escaped\t\n#DIV/0!\t\tlabel\n");
    }

    #[test]
    fn test_print_texts() {
        assert_eq!(render(&sample(), false), "=(1+2)*3\t'=escaped\t\n=B2/0\t\tlabel\n");
    }

    #[test]
    fn test_print_empty_sheet() {
        let sheet = Sheet::new();
        assert_eq!(render(&sheet, true), "");
        assert_eq!(render(&sheet, false), "");
    }

    #[test]
    fn test_print_skips_cleared_cells() {
        let mut sheet = sample();
        sheet.clear_cell(pos("C2")).unwrap();
        assert_eq!(render(&sheet, false), "=(1+2)*3\t'=escaped\n=B2/0\t\n");
    }
}
