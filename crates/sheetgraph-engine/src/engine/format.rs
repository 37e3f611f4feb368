/// Format a number for display and for canonical formula text.
///
/// Uses the shortest representation that parses back to the same `f64`,
/// and prints negative zero as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}
