//! Run report rendering

use crate::cli::OutputFormat;
use crate::relocate::{FileOutcome, RunReport};

/// Render a report in the requested format
pub fn format_report(report: &RunReport, format: OutputFormat, verbose: bool) -> String {
    match format {
        OutputFormat::Text => format_text(report, verbose),
        OutputFormat::Json => format_json(report),
    }
}

/// Pretty JSON, one object per file plus the tally
pub fn format_json(report: &RunReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_default()
}

/// Human-readable report: one line per file with an action, then the tally.
///
/// Files without a block are listed only when `verbose` is set.
pub fn format_text(report: &RunReport, verbose: bool) -> String {
    let mut out = String::new();
    let verb = if report.dry_run { "would relocate" } else { "relocated" };

    for file in &report.files {
        let path = file.path.display();
        match &file.outcome {
            FileOutcome::Relocated {
                destination,
                tests,
                support,
                ..
            } => {
                out.push_str(&format!(
                    "{verb:<14} {path} -> {} ({tests} tests",
                    destination.display()
                ));
                if *support > 0 {
                    out.push_str(&format!(", {support} helpers"));
                }
                out.push_str(")\n");
            }
            FileOutcome::NoBlockFound if verbose => {
                out.push_str(&format!("{:<14} {path}\n", "no block"));
            }
            FileOutcome::NoBlockFound => {}
            FileOutcome::Malformed { reason, .. } => {
                out.push_str(&format!("{:<14} {path}: {reason}\n", "malformed"));
            }
            FileOutcome::Skipped { reason, .. } => {
                out.push_str(&format!("{:<14} {path}: {reason}\n", "skipped"));
            }
        }
    }

    out.push_str(&format!(
        "\n{} scanned: {} written, {} no block, {} malformed, {} skipped\n",
        report.scanned(),
        report.written,
        report.no_block,
        report.malformed,
        report.skipped
    ));

    let malformed: Vec<String> = report
        .malformed_paths()
        .map(|p| p.display().to_string())
        .collect();
    if !malformed.is_empty() {
        out.push_str(&format!("malformed: {}\n", malformed.join(", ")));
    }
    let skipped: Vec<String> = report
        .skipped_paths()
        .map(|p| p.display().to_string())
        .collect();
    if !skipped.is_empty() {
        out.push_str(&format!("skipped: {}\n", skipped.join(", ")));
    }

    out.trim_end().to_string()
}
