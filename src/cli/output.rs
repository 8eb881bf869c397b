//! Output formatting for CLI

use crate::tictactoe::TOTAL_CELLS;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a count together with its share of `total`
pub fn format_count(count: usize, total: usize) -> String {
    let pct = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    };
    format!("{} ({pct:.1}%)", format_number(count))
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Lay out nine action values as a 3x3 grid matching the board
pub fn format_value_grid(values: &[f64]) -> String {
    values
        .chunks(3)
        .take(TOTAL_CELLS / 3)
        .map(|row| {
            row.iter()
                .map(|v| format!("{v:>8.3}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, 4), "1 (25.0%)");
        assert_eq!(format_count(0, 0), "0 (0.0%)");
    }

    #[test]
    fn test_value_grid() {
        let grid = format_value_grid(&[0.0, 1.0, -0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 2.25]);
        let lines: Vec<_> = grid.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "   0.000    1.000   -0.500");
        assert_eq!(lines[2], "   0.000    0.000    2.250");
    }
}
