//! Plain text report

use super::Report;

const RULE: &str = "═══════════════════════════════════════════════";

/// Render the report as aligned ASCII tables, one per group
pub fn render(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n  Signal Status\n{}\n", RULE, RULE));
    out.push_str(&format!("State:   {}\n", report.state));
    out.push_str(&format!("Version: {}\n", report.version));
    out.push_str(&format!("Signals: {}\n", report.signal_count()));

    for group in &report.groups {
        out.push_str(&format!("\n[{}]\n", group.name.trim_end()));
        if group.statuses.is_empty() {
            out.push_str("  (no signals)\n");
            continue;
        }

        out.push_str(&row("SIGNAL", "KIND", "VALUE", "UPDATED"));
        for status in &group.statuses {
            out.push_str(&row(
                status.signal_id.as_str(),
                status.kind.as_str(),
                &status.value.to_string(),
                &status.updated_at.format("%H:%M:%S%.3f").to_string(),
            ));
        }
    }

    out
}

fn row(signal: &str, kind: &str, value: &str, updated: &str) -> String {
    format!("  {:<10} {:<22} {:<12} {}\n", signal, kind, value, updated)
}
