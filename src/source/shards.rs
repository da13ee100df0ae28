use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};
use walkdir::WalkDir;

use super::{EventSource, decode_row};
use crate::config::ColumnMapping;
use crate::constants::source::{LOAD_REPORT_EVERY, SHARD_EXTENSIONS};
use crate::data::{Event, EventTable};
use crate::errors::PipelineError;
use crate::types::SourceId;

/// Source backed by one shard file or a directory of shard files.
///
/// Directories are walked recursively; shards load in sorted path order so
/// row order is stable across runs. JSON-lines shards (`.jsonl`, `.ndjson`)
/// are always supported; `.parquet` shards require the `parquet` feature.
#[derive(Clone, Debug)]
pub struct ShardSource {
    source_id: SourceId,
    path: PathBuf,
    shard_extensions: Vec<String>,
    max_rows: Option<usize>,
    columns: ColumnMapping,
}

impl ShardSource {
    /// Create a source over `path` using the default column mapping.
    pub fn new(source_id: impl Into<SourceId>, path: impl Into<PathBuf>) -> Self {
        Self {
            source_id: source_id.into(),
            path: path.into(),
            shard_extensions: SHARD_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            max_rows: None,
            columns: ColumnMapping::default(),
        }
    }

    /// Stop loading after `max_rows` rows.
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Restrict accepted shard extensions (case-insensitive, leading dot optional).
    pub fn with_shard_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.shard_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Shard files that `load` would read, in load order.
    pub fn shard_paths(&self) -> Result<Vec<PathBuf>, PipelineError> {
        if !self.path.exists() {
            return Err(self.unavailable(format!("{} does not exist", self.path.display())));
        }
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.path)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
        {
            if entry.file_type().is_file() && self.accepts(entry.path()) {
                paths.push(entry.path().to_path_buf());
            }
        }
        paths.sort();
        if paths.is_empty() {
            return Err(self.unavailable(format!(
                "no shard files found under {} with extensions {:?}",
                self.path.display(),
                self.shard_extensions
            )));
        }
        Ok(paths)
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.shard_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }

    fn unavailable(&self, reason: String) -> PipelineError {
        PipelineError::SourceUnavailable {
            source_id: self.source_id.clone(),
            reason,
        }
    }

    fn remaining(&self, loaded: usize) -> usize {
        self.max_rows
            .map(|cap| cap.saturating_sub(loaded))
            .unwrap_or(usize::MAX)
    }

    fn read_shard(&self, path: &Path, events: &mut Vec<Event>) -> Result<(), PipelineError> {
        let is_parquet = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));
        if is_parquet {
            self.read_parquet(path, events)
        } else {
            self.read_json_lines(path, events)
        }
    }

    fn push_row(&self, value: &Value, events: &mut Vec<Event>) -> Result<(), PipelineError> {
        let row = events.len();
        events.push(decode_row(value, row, &self.columns)?);
        if events.len() % LOAD_REPORT_EVERY == 0 {
            debug!(source = %self.source_id, rows = events.len(), "loading rows");
        }
        Ok(())
    }

    fn read_json_lines(&self, path: &Path, events: &mut Vec<Event>) -> Result<(), PipelineError> {
        let file = File::open(path).map_err(|err| {
            self.unavailable(format!("failed opening shard {}: {err}", path.display()))
        })?;
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            if self.remaining(events.len()) == 0 {
                break;
            }
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let value: Value =
                serde_json::from_str(line.trim()).map_err(|err| PipelineError::MalformedEvent {
                    row: events.len(),
                    details: format!(
                        "invalid JSON in {} line {}: {err}",
                        path.display(),
                        line_no + 1
                    ),
                })?;
            self.push_row(&value, events)?;
        }
        Ok(())
    }

    #[cfg(feature = "parquet")]
    fn read_parquet(&self, path: &Path, events: &mut Vec<Event>) -> Result<(), PipelineError> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path).map_err(|err| {
            self.unavailable(format!("failed opening parquet shard {}: {err}", path.display()))
        })?;
        let reader = SerializedFileReader::new(file).map_err(|err| {
            self.unavailable(format!("failed reading parquet shard {}: {err}", path.display()))
        })?;
        let rows = reader.get_row_iter(None).map_err(|err| {
            self.unavailable(format!("failed iterating parquet shard {}: {err}", path.display()))
        })?;
        for row in rows {
            if self.remaining(events.len()) == 0 {
                break;
            }
            let row = row.map_err(|err| {
                self.unavailable(format!(
                    "failed reading parquet row {} in {}: {err}",
                    events.len(),
                    path.display()
                ))
            })?;
            self.push_row(&row.to_json_value(), events)?;
        }
        Ok(())
    }

    #[cfg(not(feature = "parquet"))]
    fn read_parquet(&self, path: &Path, _events: &mut Vec<Event>) -> Result<(), PipelineError> {
        Err(self.unavailable(format!(
            "{} is a parquet shard but the `parquet` feature is disabled",
            path.display()
        )))
    }
}

impl EventSource for ShardSource {
    fn id(&self) -> &str {
        &self.source_id
    }

    fn load(&self) -> Result<EventTable, PipelineError> {
        let started = Instant::now();
        let shards = self.shard_paths()?;
        let mut events = Vec::new();
        for path in &shards {
            if self.remaining(events.len()) == 0 {
                break;
            }
            debug!(source = %self.source_id, shard = %path.display(), "reading shard");
            self.read_shard(path, &mut events)?;
        }
        info!(
            source = %self.source_id,
            shards = shards.len(),
            rows = events.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded event table"
        );
        Ok(EventTable {
            source_id: self.source_id.clone(),
            events,
        })
    }
}
