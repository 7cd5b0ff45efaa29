//! JSON report

use super::Report;
use anyhow::{Context, Result};
use serde::Serialize;
use signal_status::{SignalStatus, TrackingState};

#[derive(Serialize)]
struct JsonReport<'a> {
    state: TrackingState,
    version: u64,
    generated_at: String,
    groups: Vec<JsonGroup<'a>>,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    name: &'a str,
    statuses: &'a [SignalStatus],
}

/// Render the report as pretty-printed JSON
pub fn render(report: &Report) -> Result<String> {
    let doc = JsonReport {
        state: report.state,
        version: report.version,
        generated_at: chrono::Utc::now().to_rfc3339(),
        groups: report
            .groups
            .iter()
            .map(|group| JsonGroup {
                name: &group.name,
                statuses: &group.statuses,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&doc).context("Failed to serialize JSON report")
}
