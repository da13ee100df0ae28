#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runners shared by the crate's binaries.
pub mod apps;
/// Example assembly over a full event table.
pub mod assembler;
/// Seams to tokenizer, model, and weight collaborators.
pub mod collaborators;
/// Pipeline configuration types.
pub mod config;
/// Centralized constants used across serializer, sources, and tasks.
pub mod constants;
/// Event, example, and task types.
pub mod data;
/// Per-entity grouping of events.
pub mod grouping;
mod hash;
/// Window-fill and category-skew metrics.
pub mod metrics;
/// Canonical text layout for examples.
pub mod serializer;
/// Tabular event sources.
pub mod source;
/// Category-based task partitioning.
pub mod tasks;
/// Shared type aliases.
pub mod types;
/// Prior-article window selection.
pub mod window;

mod errors;

pub use assembler::{assemble, assemble_with_index, assemble_with_progress};
pub use collaborators::{
    ModelConfig, ModelInitializer, TokenizerCollaborator, WeightLoader, WeightLocation,
};
pub use config::{ColumnMapping, PipelineConfig};
pub use data::{
    ArticleFields, Event, EventTable, Example, ExampleSet, PriceHistory, RelatedTopics, Task,
};
pub use errors::PipelineError;
pub use grouping::{EntityGroup, EntityIndex};
pub use serializer::serialize;
pub use source::{EventSource, InMemorySource, ShardSource};
pub use tasks::{make_tasks, make_tasks_seeded};
pub use types::{ColumnName, EntityId, GroupKey, SerializedText, SourceId, Timestamp};
pub use window::{Window, select_window};
