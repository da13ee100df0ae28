use serde::{Deserialize, Serialize};
use crate::hash::examples_fingerprint;

pub use crate::types::{EntityId, GroupKey, SerializedText, Timestamp};

/// Free-text fields of one news article. Any of them may be absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleFields {
    pub body: Option<String>,
    pub title: Option<String>,
    pub article_type: Option<String>,
    pub publication: Option<String>,
    pub author: Option<String>,
}

/// Related stocks/topics as delivered by the source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelatedTopics {
    /// Pre-rendered string (the common case).
    Text(String),
    /// Individual topic entries.
    List(Vec<String>),
}

/// Weighted-average prices observed before the article, oldest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Price 96 hours before publication.
    pub before_96h: Option<f64>,
    /// Price 48 hours before publication.
    pub before_48h: Option<f64>,
    /// Price 24 hours before publication.
    pub before_24h: Option<f64>,
    /// Price at publication.
    pub at_release: Option<f64>,
}

impl PriceHistory {
    /// Build from four observations ordered -96h, -48h, -24h, 0h.
    pub fn from_array(values: [Option<f64>; 4]) -> Self {
        let [before_96h, before_48h, before_24h, at_release] = values;
        Self {
            before_96h,
            before_48h,
            before_24h,
            at_release,
        }
    }

    /// Observations ordered -96h, -48h, -24h, 0h.
    pub fn as_array(&self) -> [Option<f64>; 4] {
        [
            self.before_96h,
            self.before_48h,
            self.before_24h,
            self.at_release,
        ]
    }
}

/// One row of the news/price table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Entity (ticker) the article is about. `None` forms its own group.
    pub entity_id: Option<EntityId>,
    /// Publication time used for ordering and leakage checks.
    pub published_at: Timestamp,
    pub article: ArticleFields,
    pub related_topics: Option<RelatedTopics>,
    pub prices: PriceHistory,
    /// Prediction target: weighted-average price 720 hours after publication.
    pub label: Option<f64>,
    /// Category (sector) used for task partitioning.
    pub group_key: Option<GroupKey>,
}

impl Event {
    /// Create an event with only identity and time populated.
    pub fn new(entity_id: impl Into<EntityId>, published_at: Timestamp) -> Self {
        Self {
            entity_id: Some(entity_id.into()),
            published_at,
            article: ArticleFields::default(),
            related_topics: None,
            prices: PriceHistory::default(),
            label: None,
            group_key: None,
        }
    }

    pub fn with_article(mut self, article: ArticleFields) -> Self {
        self.article = article;
        self
    }

    pub fn with_related_topics(mut self, topics: RelatedTopics) -> Self {
        self.related_topics = Some(topics);
        self
    }

    pub fn with_prices(mut self, prices: PriceHistory) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_label(mut self, label: f64) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_group_key(mut self, group_key: impl Into<GroupKey>) -> Self {
        self.group_key = Some(group_key.into());
        self
    }
}

/// Fully materialized event table plus the id of the source that produced it.
#[derive(Clone, Debug, Default)]
pub struct EventTable {
    pub source_id: String,
    pub events: Vec<Event>,
}

impl EventTable {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Borrowed view of one assembled example.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Example<'a> {
    pub text: &'a str,
    pub label: Option<f64>,
    pub group_key: Option<&'a str>,
}

/// Parallel, index-aligned example columns.
///
/// `texts[i]`, `labels[i]`, and `group_keys[i]` all derive from input event `i`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleSet {
    pub texts: Vec<SerializedText>,
    pub labels: Vec<Option<f64>>,
    pub group_keys: Vec<Option<GroupKey>>,
}

impl ExampleSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            texts: Vec::with_capacity(capacity),
            labels: Vec::with_capacity(capacity),
            group_keys: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn push(&mut self, text: SerializedText, label: Option<f64>, group_key: Option<GroupKey>) {
        self.texts.push(text);
        self.labels.push(label);
        self.group_keys.push(group_key);
    }

    pub fn get(&self, idx: usize) -> Option<Example<'_>> {
        Some(Example {
            text: self.texts.get(idx)?,
            label: *self.labels.get(idx)?,
            group_key: self.group_keys.get(idx)?.as_deref(),
        })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Example<'_>> {
        self.texts
            .iter()
            .zip(&self.labels)
            .zip(&self.group_keys)
            .map(|((text, label), group_key)| Example {
                text,
                label: *label,
                group_key: group_key.as_deref(),
            })
    }

    /// Copy the examples at `indices`, preserving the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut subset = Self::with_capacity(indices.len());
        for &idx in indices {
            if idx < self.len() {
                subset.push(
                    self.texts[idx].clone(),
                    self.labels[idx],
                    self.group_keys[idx].clone(),
                );
            }
        }
        subset
    }

    /// Order-sensitive hash over every column; equal sets hash equally.
    pub fn fingerprint(&self) -> u64 {
        examples_fingerprint(self.iter())
    }
}

/// Subset of examples sharing one sampled category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Task {
    /// Category shared by every example in the task.
    pub group_key: Option<GroupKey>,
    pub examples: ExampleSet,
}

impl Task {
    /// Display name of the task (the category, or the missing placeholder).
    pub fn name(&self) -> &str {
        self.group_key
            .as_deref()
            .unwrap_or(crate::constants::serializer::MISSING_PLACEHOLDER)
    }
}
