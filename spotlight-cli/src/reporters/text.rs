//! Text (terminal) reporter with colors and formatting

use super::RenderOptions;
use crate::models::{CategoryReport, Outcome, ScanReport, ScanSummary, Severity, Status};
use console::{style, StyledObject};
use std::fmt::Write;

/// Apply or strip styling according to the color option
fn paint<D>(options: &RenderOptions, styled: StyledObject<D>) -> StyledObject<D> {
    if options.color {
        styled
    } else {
        styled.force_styling(false)
    }
}

fn severity_style(severity: Severity, text: String) -> StyledObject<String> {
    match severity {
        Severity::Critical => style(text).red().bold(),
        Severity::High => style(text).red(),
        Severity::Medium => style(text).yellow(),
        Severity::Low => style(text).blue(),
    }
}

fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Passed => "✅",
        Status::Suggestion => "💡",
        Status::Error => "⚠️ ",
    }
}

/// Render report as formatted terminal output
pub fn render(report: &ScanReport, options: &RenderOptions) -> String {
    let mut out = String::new();
    render_summary(&mut out, &report.summary, options);

    for category in report.categories.values() {
        render_category(&mut out, category, options);
    }

    if report.categories.is_empty() {
        let _ = writeln!(out, "{}", paint(options, style("No checks executed").dim()));
    }

    out
}

fn render_summary(out: &mut String, summary: &ScanSummary, options: &RenderOptions) {
    let _ = writeln!(out, "{}", paint(options, style("📊 Scan Results:").bold()));
    let _ = writeln!(out, "{}", paint(options, style("─".repeat(38)).dim()));
    let _ = writeln!(out, "  {:<20} {:>6}", "Total Checks", summary.total_rules);
    let _ = writeln!(out, "  {:<20} {:>6}", "✅ Passed", summary.passed);
    let _ = writeln!(out, "  {:<20} {:>6}", "💡 Suggestions", summary.suggestions);
    let _ = writeln!(out, "  {:<20} {:>6}", "⚠️  Errors", summary.errors);
    let _ = writeln!(out, "{}", paint(options, style("─".repeat(38)).dim()));

    let score = summary.health_score;
    let score_text = format!("{}/100", score);
    let score_styled = match score {
        80..=100 => style(score_text).green().bold(),
        50..=79 => style(score_text).yellow().bold(),
        _ => style(score_text).red().bold(),
    };
    let _ = writeln!(out, "  Health Score: {}", paint(options, score_styled));

    let parts: Vec<String> = Severity::all()
        .into_iter()
        .filter(|s| summary.count(*s) > 0)
        .map(|s| {
            let text = format!("{} {}", summary.count(s), s.as_str());
            paint(options, severity_style(s, text)).to_string()
        })
        .collect();
    if !parts.is_empty() {
        let _ = writeln!(out, "  {}", parts.join(" | "));
    }
    out.push('\n');
}

fn render_category(out: &mut String, category: &CategoryReport, options: &RenderOptions) {
    let icon = if category.suggestions > 0 || category.errors > 0 {
        "📝"
    } else {
        "✅"
    };
    let heading = format!(
        "{} {} ({} passed, {} suggestions)",
        icon, category.name, category.passed, category.suggestions
    );
    let _ = writeln!(out, "{}", paint(options, style(heading).bold()));

    for outcome in &category.rules {
        if outcome.status == Status::Suggestion && !options.show_suggestions {
            continue;
        }
        render_outcome(out, outcome, options);
    }
    if category.rules.is_empty() {
        let _ = writeln!(out, "  {}", paint(options, style("No checks executed").dim()));
    }
    out.push('\n');
}

fn render_outcome(out: &mut String, outcome: &Outcome, options: &RenderOptions) {
    let label = match outcome.severity {
        Some(severity) => {
            let tag = format!("[{}]", severity.as_str().to_uppercase());
            paint(options, severity_style(severity, tag)).to_string()
        }
        None => "[UNKNOWN]".to_string(),
    };
    let _ = writeln!(
        out,
        "  {} {} {}",
        status_icon(outcome.status),
        label,
        outcome.message
    );

    if !options.show_tips || outcome.status != Status::Suggestion {
        return;
    }
    if let Some(recommendation) = outcome.recommendation() {
        let _ = writeln!(
            out,
            "     {}",
            paint(options, style(format!("→ {}", recommendation)).dim())
        );
    }
    if let Some(url) = outcome.documentation_url() {
        let _ = writeln!(out, "     {}", paint(options, style(format!("📖 {}", url)).dim()));
    }
}
