//! Tabular event sources and row decoding.
//!
//! Ownership model:
//! - `EventSource` is the pipeline-facing interface that yields a fully
//!   materialized `EventTable`.
//! - `decode_row` maps one JSON-shaped row onto an `Event` through a
//!   `ColumnMapping`; every backend funnels through it.

use serde_json::{Map, Value};

use crate::config::ColumnMapping;
use crate::data::{ArticleFields, Event, EventTable, PriceHistory, RelatedTopics};
use crate::errors::PipelineError;
use crate::types::SourceId;

/// Timestamp parsing helpers.
pub mod date_helpers;
/// File and directory backed sources.
pub mod shards;

pub use shards::ShardSource;

use date_helpers::{parse_timestamp, timestamp_from_epoch_millis};

/// Pipeline-facing tabular source.
///
/// For a fixed backing dataset, `load` must return rows in the same order on
/// every call.
pub trait EventSource: Send + Sync {
    /// Stable source identifier used in logs and errors.
    fn id(&self) -> &str;
    /// Materialize the full event table.
    fn load(&self) -> Result<EventTable, PipelineError>;
}

/// Source over already-decoded events.
#[derive(Clone, Debug)]
pub struct InMemorySource {
    id: SourceId,
    events: Vec<Event>,
}

impl InMemorySource {
    pub fn new(id: impl Into<SourceId>, events: Vec<Event>) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }

    /// Decode raw JSON rows up front; fails at the first malformed row.
    pub fn from_rows(
        id: impl Into<SourceId>,
        rows: &[Value],
        columns: &ColumnMapping,
    ) -> Result<Self, PipelineError> {
        let events = rows
            .iter()
            .enumerate()
            .map(|(row, value)| decode_row(value, row, columns))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(id, events))
    }
}

impl EventSource for InMemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<EventTable, PipelineError> {
        Ok(EventTable {
            source_id: self.id.clone(),
            events: self.events.clone(),
        })
    }
}

/// Decode one row into an `Event`.
///
/// Rows may be bare objects or wrapped as `{"row": {...}}`; a `row` column
/// holding a scalar is treated as ordinary data. Absent and null
/// columns become `None`; only a missing or unparseable timestamp fails.
pub fn decode_row(
    value: &Value,
    row: usize,
    columns: &ColumnMapping,
) -> Result<Event, PipelineError> {
    let payload = value
        .get("row")
        .filter(|inner| inner.is_object())
        .unwrap_or(value);
    let object = payload
        .as_object()
        .ok_or_else(|| PipelineError::MalformedEvent {
            row,
            details: "row is not a JSON object".to_string(),
        })?;

    let published_at = decode_timestamp(object, &columns.timestamp, row)?;
    let text = |name: &str| object.get(name).and_then(value_to_text);
    let number = |name: &str| object.get(name).and_then(value_to_number);

    Ok(Event {
        entity_id: text(&columns.entity),
        published_at,
        article: ArticleFields {
            body: text(&columns.body),
            title: text(&columns.title),
            article_type: text(&columns.article_type),
            publication: text(&columns.publication),
            author: text(&columns.author),
        },
        related_topics: object.get(&columns.related_topics).and_then(value_to_topics),
        prices: PriceHistory::from_array([
            number(&columns.prices[0]),
            number(&columns.prices[1]),
            number(&columns.prices[2]),
            number(&columns.prices[3]),
        ]),
        label: number(&columns.label),
        group_key: text(&columns.group_key),
    })
}

fn decode_timestamp(
    object: &Map<String, Value>,
    column: &str,
    row: usize,
) -> Result<crate::types::Timestamp, PipelineError> {
    let malformed = |details: String| PipelineError::MalformedEvent { row, details };
    match object.get(column) {
        None | Some(Value::Null) => Err(malformed(format!("missing timestamp column '{column}'"))),
        Some(Value::String(raw)) => parse_timestamp(raw)
            .ok_or_else(|| malformed(format!("unparseable timestamp '{raw}' in '{column}'"))),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(timestamp_from_epoch_millis)
            .ok_or_else(|| malformed(format!("timestamp {n} in '{column}' is not epoch millis"))),
        Some(other) => Err(malformed(format!(
            "timestamp in '{column}' has unsupported type: {other}"
        ))),
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn value_to_topics(value: &Value) -> Option<RelatedTopics> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(RelatedTopics::List(
            items.iter().filter_map(value_to_text).collect(),
        )),
        other => value_to_text(other).map(RelatedTopics::Text),
    }
}
