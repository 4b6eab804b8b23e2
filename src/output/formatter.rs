use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::review::ReviewInput;
use crate::scoring::{Band, CompositeResult};

const BAR_WIDTH: usize = 10;
const MAX_DIVIDER: usize = 48;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Divider width: terminal width capped at 48, or 48 when piped
fn divider_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| (w as usize).min(MAX_DIVIDER))
        .unwrap_or(MAX_DIVIDER)
}

/// Sub-score with one decimal, trailing ".0" dropped ("4", "3.5")
pub fn format_subscore(score: f64) -> String {
    let formatted = format!("{:.1}", score);
    formatted
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(formatted)
}

/// Text bar for a value out of `max`, e.g. "████████░░"
pub fn score_bar(score: f64, max: f64, width: usize) -> String {
    let ratio = if max > 0.0 {
        (score / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width.saturating_sub(filled)))
}

/// Band label, colored green/cyan/yellow/red by standing when colors are on
pub fn format_band(band: Band, use_colors: bool) -> String {
    if !use_colors {
        return band.to_string();
    }
    match band {
        Band::Elite => band.as_str().green().bold().to_string(),
        Band::Strong => band.as_str().green().to_string(),
        Band::Solid => band.as_str().cyan().to_string(),
        Band::Developing => band.as_str().yellow().to_string(),
        Band::AtRisk => band.as_str().red().bold().to_string(),
    }
}

/// One-line job summary: "Dana Ruiz | Electrical Journeyman | Rough-In | 2026-03-14"
pub fn format_job_line(input: &ReviewInput) -> String {
    let worker = if input.worker_name.trim().is_empty() {
        "(unnamed worker)"
    } else {
        input.worker_name.as_str()
    };
    format!(
        "{} | {} {} | {} | {}",
        worker,
        input.trade,
        input.role,
        input.job_type,
        input.job_date.format("%Y-%m-%d")
    )
}

/// Format the full scorecard: job line, composite, and the four sub-scores with bars
pub fn format_scorecard(input: &ReviewInput, result: &CompositeResult, use_colors: bool) -> String {
    let divider = "─".repeat(divider_width());
    let job_line = format_job_line(input);
    let composite = format!("{}%", result.percent);

    let mut lines = Vec::new();
    if use_colors {
        lines.push(job_line.bold().to_string());
        lines.push(divider.dimmed().to_string());
        lines.push(format!(
            "Composite  {}  {}",
            composite.bold(),
            format_band(result.band, true)
        ));
    } else {
        lines.push(job_line);
        lines.push(divider.clone());
        lines.push(format!("Composite  {}  {}", composite, result.band));
    }

    for dim in result.breakdown() {
        let bar = score_bar(dim.score, 5.0, BAR_WIDTH);
        let bar = if use_colors { bar.cyan().to_string() } else { bar };
        lines.push(format!(
            "  {:<14}{:>4}/5  {}",
            dim.label,
            format_subscore(dim.score),
            bar
        ));
    }
    lines.push(format!("  {:<14}{:>4}/5  (not scored)", "Customer", input.customer_rating));

    if !input.notes_str().is_empty() {
        lines.push(if use_colors { divider.dimmed().to_string() } else { divider });
        lines.push(format!("Notes: {}", input.notes_str()));
    }

    lines.join("\n")
}

/// Format the per-dimension breakdown (verbose mode)
/// e.g. "  Quality        3.5 x 0.35 = 1.225  (workmanship 5, callback -1.5)"
pub fn format_breakdown(result: &CompositeResult) -> String {
    let mut lines: Vec<String> = result
        .breakdown()
        .iter()
        .map(|dim| {
            format!(
                "  {:<14}{:>4} x {:.2} = {:.3}  ({})",
                dim.label,
                format_subscore(dim.score),
                dim.weight,
                dim.contribution,
                dim.description
            )
        })
        .collect();
    lines.push(format!(
        "  {:<14}{:.3} / 5 -> {}%",
        "Weighted", result.weighted, result.percent
    ));
    lines.join("\n")
}

/// Validation problems as a heading plus one "  - " line each
pub fn format_review_problems(heading: &str, problems: &[String]) -> String {
    let mut lines = vec![format!("{}:", heading)];
    lines.extend(problems.iter().map(|p| format!("  - {}", p)));
    lines.join("\n")
}

/// Tab-separated line for scripting, no colors, no header
/// Columns: percent, band, worker, date, trade, role, job type
pub fn format_tsv(input: &ReviewInput, result: &CompositeResult) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        result.percent,
        result.band,
        input.worker_name,
        input.job_date.format("%Y-%m-%d"),
        input.trade,
        input.role,
        input.job_type
    )
}
