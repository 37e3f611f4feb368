//! End-to-end behaviour of the sheet: round-trips, memoization, cycles,
//! invalidation and error propagation.

use proptest::prelude::*;
use sheetgraph_core::{FormulaError, Position, Sheet, SheetError, Size, Value};

fn pos(name: &str) -> Position {
    name.parse().unwrap()
}

#[test]
fn test_dependent_sees_updated_input() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1+1").unwrap();
    sheet.set_cell(pos("B1"), "5").unwrap();
    assert_eq!(sheet.value(pos("A1")).unwrap(), Value::Number(6.0));

    sheet.set_cell(pos("B1"), "7").unwrap();
    assert_eq!(sheet.value(pos("A1")).unwrap(), Value::Number(8.0));
}

#[test]
fn test_mutual_reference_is_rejected() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1").unwrap();
    let err = sheet.set_cell(pos("B1"), "=A1").unwrap_err();
    assert_eq!(err, SheetError::CircularDependency(pos("B1")));

    assert_eq!(sheet.text(pos("A1")).unwrap(), "=B1");
    assert_eq!(sheet.text(pos("B1")).unwrap(), "");
    assert_eq!(sheet.value(pos("A1")).unwrap(), Value::Number(0.0));
}

#[test]
fn test_rejected_edit_keeps_previous_formula() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1*2").unwrap();
    sheet.set_cell(pos("B1"), "=C1+1").unwrap();
    sheet.set_cell(pos("C1"), "3").unwrap();
    assert_eq!(sheet.value(pos("A1")).unwrap(), Value::Number(8.0));
    let evaluations = sheet.evaluation_count();

    assert!(sheet.set_cell(pos("C1"), "=A1").is_err());
    assert_eq!(sheet.text(pos("C1")).unwrap(), "3");
    assert_eq!(sheet.value(pos("A1")).unwrap(), Value::Number(8.0));
    // The memos survive the rejected edit.
    assert_eq!(sheet.evaluation_count(), evaluations);
    assert_eq!(sheet.referenced_cells(pos("B1")).unwrap(), vec![pos("C1")]);
}

#[test]
fn test_self_reference_is_rejected() {
    let mut sheet = Sheet::new();
    assert_eq!(
        sheet.set_cell(pos("A1"), "=A1"),
        Err(SheetError::CircularDependency(pos("A1")))
    );
    assert_eq!(
        sheet.set_cell(pos("A1"), "=1+A1*2"),
        Err(SheetError::CircularDependency(pos("A1")))
    );
}

#[test]
fn test_out_of_range_reference_is_ref_error() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=ZZZZ1+1").unwrap();
    assert_eq!(
        sheet.value(pos("A1")).unwrap(),
        Value::Error(FormulaError::BadRef)
    );
    assert_eq!(sheet.text(pos("A1")).unwrap(), "=#REF!+1");
    assert!(sheet.referenced_cells(pos("A1")).unwrap().is_empty());
}

#[test]
fn test_text_operands() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "abc").unwrap();
    sheet.set_cell(pos("A2"), "42").unwrap();
    sheet.set_cell(pos("B1"), "=A1").unwrap();
    sheet.set_cell(pos("B2"), "=A2").unwrap();

    assert_eq!(
        sheet.value(pos("B1")).unwrap(),
        Value::Error(FormulaError::BadValue)
    );
    assert_eq!(sheet.value(pos("B2")).unwrap(), Value::Number(42.0));
    // Plain text cells keep their text as the value.
    assert_eq!(sheet.value(pos("A2")).unwrap(), Value::Text("42".to_string()));
}

#[test]
fn test_errors_flow_through_dependents() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=1/0").unwrap();
    sheet.set_cell(pos("A2"), "=A1*2").unwrap();
    sheet.set_cell(pos("A3"), "=A2+XFE1").unwrap();
    assert_eq!(
        sheet.value(pos("A3")).unwrap(),
        Value::Error(FormulaError::DivByZero)
    );

    sheet.set_cell(pos("A1"), "=4").unwrap();
    assert_eq!(
        sheet.value(pos("A3")).unwrap(),
        Value::Error(FormulaError::BadRef)
    );
    assert_eq!(sheet.value(pos("A2")).unwrap(), Value::Number(8.0));
}

#[test]
fn test_cleared_reference_reads_as_zero() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("B1"), "10").unwrap();
    sheet.set_cell(pos("A1"), "=B1+1").unwrap();
    assert_eq!(sheet.value(pos("A1")).unwrap(), Value::Number(11.0));

    sheet.clear_cell(pos("B1")).unwrap();
    assert_eq!(sheet.value(pos("A1")).unwrap(), Value::Number(1.0));
    assert!(sheet.cell(pos("B1")).unwrap().is_none());
}

#[test]
fn test_printable_size_tracks_listed_cells() {
    let mut sheet = Sheet::new();
    assert_eq!(sheet.printable_size(), Size::new(0, 0));

    sheet.set_cell(pos("C2"), "x").unwrap();
    assert_eq!(sheet.printable_size(), Size::new(2, 3));

    sheet.set_cell(pos("A1"), "=E5").unwrap();
    assert_eq!(sheet.printable_size(), Size::new(5, 5));

    sheet.clear_cell(pos("A1")).unwrap();
    assert_eq!(sheet.printable_size(), Size::new(5, 5));
    sheet.clear_cell(pos("E5")).unwrap();
    assert_eq!(sheet.printable_size(), Size::new(2, 3));
}

#[test]
fn test_invalid_positions_are_rejected_everywhere() {
    let mut sheet = Sheet::new();
    let bad = Position::new(sheetgraph_engine::engine::MAX_ROWS, 0);
    assert_eq!(sheet.set_cell(bad, "1"), Err(SheetError::InvalidPosition(bad)));
    assert!(sheet.cell(bad).is_err());
    assert!(sheet.value(bad).is_err());
    assert!(sheet.text(bad).is_err());
    assert!(sheet.clear_cell(bad).is_err());
}

#[test]
fn test_large_formulas_are_accepted_or_rejected_cleanly() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("B1"), "2").unwrap();

    let sum = format!("={}", vec!["B1"; 500].join("+"));
    sheet.set_cell(pos("A1"), &sum).unwrap();
    assert_eq!(sheet.value(pos("A1")).unwrap(), Value::Number(1000.0));
    assert_eq!(sheet.text(pos("A1")).unwrap(), sum);

    let long_sum = format!("={}", vec!["1"; 20_000].join("+"));
    assert!(matches!(
        sheet.set_cell(pos("A2"), &long_sum),
        Err(SheetError::FormulaSyntax { .. })
    ));
    let deep = format!("={}1{}", "(".repeat(200_000), ")".repeat(200_000));
    assert!(matches!(
        sheet.set_cell(pos("A1"), &deep),
        Err(SheetError::FormulaSyntax { .. })
    ));

    assert_eq!(sheet.text(pos("A1")).unwrap(), sum);
    assert!(sheet.cell(pos("A2")).unwrap().is_none());
}

fn cell_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z ]{1,8}",
        "'[=a-z0-9]{0,6}",
        "-?[0-9]{1,4}(\\.[0-9]{1,2})?",
        // Canonical formulas over row 9, which the properties never write.
        "=[A-D]9(\\+[A-D]9)?",
        "=[1-9][0-9]?\\*\\([A-D]9-[1-9]\\)",
    ]
}

proptest! {
    #[test]
    fn prop_text_round_trips(row in 0usize..8, col in 0usize..4, text in cell_text()) {
        let mut sheet = Sheet::new();
        let target = Position::new(row, col);
        sheet.set_cell(target, &text).unwrap();
        prop_assert_eq!(sheet.text(target).unwrap(), text);
    }

    #[test]
    fn prop_second_read_is_memoized(
        inputs in proptest::collection::vec(cell_text(), 1..8),
    ) {
        let mut sheet = Sheet::new();
        for (row, text) in inputs.iter().enumerate() {
            sheet.set_cell(Position::new(row, 0), text).unwrap();
        }
        let first: Vec<Value> = (0..inputs.len())
            .map(|row| sheet.value(Position::new(row, 0)).unwrap())
            .collect();
        let evaluations = sheet.evaluation_count();
        let second: Vec<Value> = (0..inputs.len())
            .map(|row| sheet.value(Position::new(row, 0)).unwrap())
            .collect();
        prop_assert_eq!(first, second);
        prop_assert_eq!(sheet.evaluation_count(), evaluations);
    }
}
