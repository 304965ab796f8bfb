//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use crate::report::RunReport;
use crate::utils::format_nanos;
use terminal_size::{terminal_size, Width};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

fn format_optional(ns: Option<u64>) -> String {
    ns.map(|v| format_nanos(v as f64)).unwrap_or_else(|| "-".to_string())
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80); // Cap header at 80
    let title = " keit: cold vs hot ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!();
}

/// Print the comparison info box
pub fn print_comparison_box(title: &str, description: &str, iterations: usize, weight: f64) {
    let term_width = get_term_width();
    let max_content_width = term_width.saturating_sub(4).max(40);

    let title_line = format!("Comparison: {}", title);
    let config_line = format!("Iterations: {}  Weight: {}", iterations, weight);

    let content_width = [title_line.len(), description.len(), config_line.len()]
        .iter()
        .cloned()
        .max()
        .unwrap_or(60)
        .min(max_content_width);

    let border = "─".repeat(content_width + 2);

    println!("┌{}┐", border);
    println!(
        "│ {:<width$} │",
        truncate(&title_line, content_width),
        width = content_width
    );
    println!(
        "│ {:<width$} │",
        truncate(description, content_width),
        width = content_width
    );
    println!("├{}┤", border);
    println!(
        "│ {:<width$} │",
        truncate(&config_line, content_width),
        width = content_width
    );
    println!("└{}┘", border);
    println!();
}

/// Render the results table for a run as lines, fitted to `term_width`.
///
/// The last column is each score relative to the best (lowest) score.
pub fn format_results_table<T>(report: &RunReport<T>, term_width: usize) -> Vec<String> {
    if report.is_empty() {
        return Vec::new();
    }

    // 7 columns of 10 + 1 of 9, plus separators and indent
    let fixed_width = 90;
    let name_col_width = term_width.saturating_sub(fixed_width).max(15);
    let table_width = name_col_width + 79 + 8;

    let best_score = report.best().map(|(_, r)| r.score);

    let mut lines = Vec::with_capacity(report.len() + 3);
    lines.push(format!("  {}", "─".repeat(table_width)));
    lines.push(format!(
        "  {:<n_width$} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>9}",
        "Candidate",
        "Cold",
        "Average",
        "Avg hot",
        "Fast hot",
        "Slow hot",
        "Slowest",
        "Score",
        "Relative",
        n_width = name_col_width
    ));
    lines.push(format!("  {}", "─".repeat(table_width)));

    for (name, result) in report.iter() {
        let relative = match best_score {
            Some(best) if best > 0.0 && !result.score.is_nan() => {
                format!("{:>8.2}x", result.score / best)
            }
            _ => format!("{:>9}", "-"),
        };

        lines.push(format!(
            "  {:<n_width$} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {}",
            truncate(name, name_col_width),
            format_nanos(result.cold.time as f64),
            format_nanos(result.stats.average),
            format_nanos(result.stats.average_hot),
            format_optional(result.stats.fastest_hot),
            format_optional(result.stats.slowest_hot),
            format_nanos(result.stats.slowest as f64),
            format_nanos(result.score),
            relative,
            n_width = name_col_width
        ));
    }

    lines
}

/// Print results table for a run
pub fn print_results_table<T>(report: &RunReport<T>) {
    for line in format_results_table(report, get_term_width()) {
        println!("{}", line);
    }
    println!(
        "  Total benchmark time: {}",
        format_nanos(report.benchmark_time as f64)
    );
    println!();
}

/// Print the help message
pub fn print_help() {
    println!("Usage: keit [OPTIONS] [COMPARISON]");
    println!();
    println!("Options:");
    println!("  --list, -l     List all built-in comparisons");
    println!("  --help, -h     Show this help message");
    println!("  --iter N       Number of hot trials per candidate (default: 1000)");
    println!("  --weight W     Weight of the cold trial and spreads in the score (default: 0.25)");
    println!("  --size N       Input size used by the candidates (default: 1024)");
    println!("  --seed N       Random seed for generated inputs (default: time-based)");
    println!("  --pin MODE     CPU pinning: off, global, trial (default: off)");
    println!("  --verbose, -v  Log every trial event");
    println!();
    println!("Arguments:");
    println!("  COMPARISON     Name of a specific comparison to run (omit for all)");
    println!();
    println!("Examples:");
    println!("  keit                      # Run all comparisons");
    println!("  keit sort                 # Run only the sort comparison");
    println!("  keit --iter 100 --pin global");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppingClock;
    use crate::{Block, Keit};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long candidate name", 10), "a very ...");
    }

    #[test]
    fn test_results_table_has_row_per_candidate() {
        let report = Keit::new()
            .candidate("alpha", Block::new(|| ()))
            .candidate("beta", Block::new(|| ()))
            .iterations(4)
            .clock(SteppingClock::new(5))
            .run()
            .unwrap();

        let lines = format_results_table(&report, 120);
        assert_eq!(lines.len(), 5);
        assert!(lines[3].trim_start().starts_with("alpha"));
        assert!(lines[4].trim_start().starts_with("beta"));
        // Identical candidates score the same.
        assert!(lines[3].ends_with("1.00x"));
        assert!(lines[4].ends_with("1.00x"));
    }

    #[test]
    fn test_results_table_empty_report() {
        let report = Keit::<()>::new().run().unwrap();
        assert!(format_results_table(&report, 80).is_empty());
    }
}
