//! Report generation
//!
//! Renders a tracker snapshot as a TXT table or a JSON document.

pub mod json;
pub mod txt;

use crate::config::OutputFormat;
use signal_status::{CategoryView, Snapshot, TrackingState};

/// Which part of the snapshot to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportView {
    /// Every signal, grouped by the configured categories
    Categories(Vec<String>),
    /// Signals whose identifier starts with a prefix
    Prefix(String),
    /// Exactly one signal
    Single(String),
}

/// Everything a report shows, resolved from one snapshot
#[derive(Debug, Clone)]
pub struct Report {
    pub state: TrackingState,
    pub version: u64,
    pub groups: Vec<CategoryView>,
}

impl Report {
    /// Resolve `view` against `snapshot`
    pub fn build(snapshot: &Snapshot, state: TrackingState, view: &ReportView) -> Self {
        let groups = match view {
            ReportView::Categories(prefixes) => snapshot.categorize(prefixes.as_slice()),
            ReportView::Prefix(prefix) => vec![CategoryView {
                name: prefix.clone(),
                statuses: snapshot.by_prefix(prefix),
            }],
            ReportView::Single(signal_id) => vec![CategoryView {
                name: signal_id.clone(),
                statuses: snapshot.single(signal_id).into_iter().collect(),
            }],
        };

        Self {
            state,
            version: snapshot.version(),
            groups,
        }
    }

    /// Number of statuses across all groups
    pub fn signal_count(&self) -> usize {
        self.groups.iter().map(|group| group.statuses.len()).sum()
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Txt => Ok(txt::render(self)),
            OutputFormat::Json => json::render(self),
        }
    }
}
