use serde::{Deserialize, Serialize};

use crate::constants::columns;
use crate::constants::tasks::{DEFAULT_NUM_TASKS, DEFAULT_SEED};
use crate::constants::window::DEFAULT_WINDOW_SIZE;
use crate::errors::PipelineError;
use crate::types::ColumnName;

/// Source column names mapped onto event fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Entity (ticker symbol) column.
    pub entity: ColumnName,
    /// Publication timestamp column.
    pub timestamp: ColumnName,
    /// Article body column.
    pub body: ColumnName,
    pub title: ColumnName,
    pub article_type: ColumnName,
    pub publication: ColumnName,
    pub author: ColumnName,
    /// Related stocks/topics column (string or list).
    pub related_topics: ColumnName,
    /// Price observation columns, oldest first: -96h, -48h, -24h, 0h.
    pub prices: [ColumnName; 4],
    /// Prediction target column (+720h).
    pub label: ColumnName,
    /// Categorical column used for task partitioning.
    pub group_key: ColumnName,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            entity: columns::ENTITY.to_string(),
            timestamp: columns::TIMESTAMP.to_string(),
            body: columns::BODY.to_string(),
            title: columns::TITLE.to_string(),
            article_type: columns::ARTICLE_TYPE.to_string(),
            publication: columns::PUBLICATION.to_string(),
            author: columns::AUTHOR.to_string(),
            related_topics: columns::RELATED_TOPICS.to_string(),
            prices: [
                columns::PRICE_96H.to_string(),
                columns::PRICE_48H.to_string(),
                columns::PRICE_24H.to_string(),
                columns::PRICE_RELEASE.to_string(),
            ],
            label: columns::LABEL.to_string(),
            group_key: columns::GROUP_KEY.to_string(),
        }
    }
}

impl ColumnMapping {
    fn names(&self) -> impl Iterator<Item = &ColumnName> {
        [
            &self.entity,
            &self.timestamp,
            &self.body,
            &self.title,
            &self.article_type,
            &self.publication,
            &self.author,
            &self.related_topics,
            &self.label,
            &self.group_key,
        ]
        .into_iter()
        .chain(self.prices.iter())
    }
}

/// Top-level pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of prior articles per example (K).
    pub window_size: usize,
    /// Number of categories sampled by the task partitioner.
    pub num_tasks: usize,
    /// RNG seed used for reproducible task sampling.
    pub seed: u64,
    /// Source column names.
    pub columns: ColumnMapping,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            num_tasks: DEFAULT_NUM_TASKS,
            seed: DEFAULT_SEED,
            columns: ColumnMapping::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject configurations that cannot produce tasks or decode rows.
    ///
    /// A `window_size` of zero is valid and yields current-article-only examples.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.num_tasks == 0 {
            return Err(PipelineError::Configuration(
                "num_tasks must be > 0".to_string(),
            ));
        }
        if let Some(empty) = self.columns.names().position(|name| name.trim().is_empty()) {
            return Err(PipelineError::Configuration(format!(
                "column mapping entry {empty} is empty"
            )));
        }
        Ok(())
    }
}
