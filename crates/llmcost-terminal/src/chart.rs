//! Horizontal bar chart rendering
//!
//! Bars are scaled against the most expensive row in the chart, so the
//! largest bar always spans the full bar width.

use colored::*;
use is_terminal::IsTerminal;
use llmcost_core::types::CostBreakdown;
use terminal_size::{Width, terminal_size};

/// Character used for the filled part of a bar
const BAR_FULL: &str = "█";

/// Width of the model label column
const LABEL_WIDTH: usize = 28;

/// Room reserved for the value printed after each bar
const VALUE_WIDTH: usize = 14;

/// Share of the maximum above which a bar is drawn red
const HIGH_SHARE: f64 = 0.66;

/// Share of the maximum above which a bar is drawn yellow
const MEDIUM_SHARE: f64 = 0.33;

/// Text bar chart of total cost per model
pub struct BarChart {
    /// Total line width
    width: usize,
    /// Whether to color bars (respects NO_COLOR and piped stdout)
    colored_output: bool,
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new()
    }
}

impl BarChart {
    /// Chart sized to the current terminal
    pub fn new() -> Self {
        let width = terminal_width().unwrap_or(100).clamp(60, 140);
        let colored_output =
            std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal();
        Self {
            width,
            colored_output,
        }
    }

    /// Chart with a fixed width and no colors
    pub fn plain(width: usize) -> Self {
        Self {
            width,
            colored_output: false,
        }
    }

    fn bar_width(&self) -> usize {
        self.width.saturating_sub(LABEL_WIDTH + VALUE_WIDTH + 2).max(10)
    }

    /// Render one line per row
    ///
    /// `format_value` turns a total cost into its display string.
    pub fn render(&self, rows: &[&CostBreakdown], format_value: impl Fn(f64) -> String) -> String {
        let max = rows
            .iter()
            .map(|row| row.total_cost)
            .fold(0.0_f64, f64::max);
        let bar_width = self.bar_width();
        let mut output = String::new();

        for row in rows {
            let share = if max > 0.0 { row.total_cost / max } else { 0.0 };
            let filled = ((share * bar_width as f64).round() as usize).min(bar_width);
            // Any positive cost gets at least one cell so it is visible
            let filled = if row.total_cost > 0.0 { filled.max(1) } else { filled };

            let bar = self.colorize(&BAR_FULL.repeat(filled), share);
            let padding = " ".repeat(bar_width - filled);

            output.push_str(&format!(
                "{:<label$} {}{} {}\n",
                truncate(&row.model.name, LABEL_WIDTH),
                bar,
                padding,
                format_value(row.total_cost),
                label = LABEL_WIDTH
            ));
        }

        output
    }

    fn colorize(&self, bar: &str, share: f64) -> String {
        if !self.colored_output {
            return bar.to_string();
        }

        if share >= HIGH_SHARE {
            bar.red().to_string()
        } else if share >= MEDIUM_SHARE {
            bar.yellow().to_string()
        } else {
            bar.green().to_string()
        }
    }
}

/// Shorten `text` to `max` characters, ending with `…` when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}
