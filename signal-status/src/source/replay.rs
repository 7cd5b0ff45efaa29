//! Replay of recorded signal logs
//!
//! A replay log holds one JSON signal record per line. Blank lines and lines
//! starting with `#` are skipped. A line that is not valid JSON ends the
//! stream with a fault naming the line.

use super::{SignalSource, SignalStream};
use crate::config::SourceSelectors;
use crate::record::decode_record;
use crate::types::{Result, SignalEvent, TrackerError};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;

/// Source that replays a JSON-lines signal log
#[derive(Debug, Clone)]
pub struct ReplaySource {
    path: PathBuf,
    interval: Option<Duration>,
}

impl ReplaySource {
    /// Replay `path` as fast as the consumer reads
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            interval: None,
        }
    }

    /// Builder method: wait `interval` before each record
    pub fn with_interval(mut self, interval: Option<Duration>) -> Self {
        self.interval = interval;
        self
    }

    /// Log file being replayed
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delay applied before each record, if any
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

#[async_trait]
impl SignalSource for ReplaySource {
    async fn subscribe(&self, selectors: &SourceSelectors) -> Result<SignalStream> {
        log::info!("Replaying signal log {:?} for {}", self.path, selectors);

        let file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|e| TrackerError::Subscribe(format!("{:?}: {}", self.path, e)))?;

        let lines = LinesStream::new(BufReader::new(file).lines())
            .enumerate()
            .filter_map(|(idx, line)| async move { parse_line(idx + 1, line) });

        let stream = match self.interval {
            Some(interval) => lines
                .then(move |item| async move {
                    tokio::time::sleep(interval).await;
                    item
                })
                .boxed(),
            None => lines.boxed(),
        };

        Ok(stream)
    }
}

/// Turn one log line into a stream item; `None` for lines that carry no record
fn parse_line(line_no: usize, line: std::io::Result<String>) -> Option<Result<SignalEvent>> {
    let line = match line {
        Ok(line) => line,
        Err(e) => return Some(Err(TrackerError::Io(e))),
    };

    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    Some(decode_record(trimmed).map_err(|e| TrackerError::InvalidRecord {
        line: line_no,
        reason: e.to_string(),
    }))
}
