/// Constants used by window selection.
pub mod window {
    /// Maximum number of prior articles serialized ahead of the current one.
    pub const DEFAULT_WINDOW_SIZE: usize = 10;
}

/// Constants used by the record serializer.
///
/// Labels and ordering form the layout contract consumed by downstream
/// tokenizers; changing any of them changes every serialized example.
pub mod serializer {
    /// Text emitted in place of any absent field value.
    pub const MISSING_PLACEHOLDER: &str = "None";
    /// Separator used when related topics arrive as a list.
    pub const TOPIC_LIST_SEPARATOR: &str = ", ";
    /// Line closing each prior-article block.
    pub const BLOCK_DELIMITER: &str = "\n---\n";
    /// Render format for timestamps. `%.f` adds sub-second digits only when
    /// the fraction is non-zero.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

    pub const PREV_DATE: &str = "Previous Article Date: ";
    pub const PREV_CONTENT: &str = "Previous Article Content: ";
    pub const PREV_TITLE: &str = "Previous Article Title: ";
    pub const PREV_TYPE: &str = "Previous Article Type: ";
    pub const PREV_PUBLICATION: &str = "Previous Article Publication: ";
    pub const PREV_AUTHOR: &str = "Previous Publication Author: ";

    pub const CUR_SYMBOL: &str = "Symbol: ";
    /// Label for the current article's date line.
    pub const CUR_DATE: &str = "Security: ";
    pub const CUR_RELATED: &str = "Related Stocks/Topics: ";
    pub const CUR_CONTENT: &str = "Article Content: ";
    pub const CUR_TITLE: &str = "Article Title: ";
    pub const CUR_TYPE: &str = "Article Type: ";
    pub const CUR_PUBLICATION: &str = "Article Publication: ";
    pub const CUR_AUTHOR: &str = "Publication Author: ";
    pub const CUR_PRICE_96H: &str = "Stock Price 4 days before: ";
    pub const CUR_PRICE_48H: &str = "Stock Price 2 days before: ";
    pub const CUR_PRICE_24H: &str = "Stock Price 1 day before: ";
    pub const CUR_PRICE_RELEASE: &str = "Stock Price at release: ";
}

/// Default column names of the news/price table.
pub mod columns {
    pub const ENTITY: &str = "Symbol";
    pub const TIMESTAMP: &str = "Date";
    pub const BODY: &str = "Article";
    pub const TITLE: &str = "Title";
    pub const ARTICLE_TYPE: &str = "articleType";
    pub const PUBLICATION: &str = "Publication";
    pub const AUTHOR: &str = "Author";
    pub const RELATED_TOPICS: &str = "RelatedStocksList";
    pub const PRICE_96H: &str = "weighted_avg_-96_hrs";
    pub const PRICE_48H: &str = "weighted_avg_-48_hrs";
    pub const PRICE_24H: &str = "weighted_avg_-24_hrs";
    pub const PRICE_RELEASE: &str = "weighted_avg_0_hrs";
    pub const LABEL: &str = "weighted_avg_720_hrs";
    pub const GROUP_KEY: &str = "Sector";
}

/// Constants used by the task partitioner.
pub mod tasks {
    /// Number of sectors sampled when the caller does not override it.
    pub const DEFAULT_NUM_TASKS: usize = 3;
    /// Seed used for reproducible task sampling.
    pub const DEFAULT_SEED: u64 = 42;
}

/// Constants used by tabular sources.
pub mod source {
    /// Shard extensions accepted by `ShardSource`.
    pub const SHARD_EXTENSIONS: [&str; 3] = ["jsonl", "ndjson", "parquet"];
    /// Rows between progress log lines while loading large tables.
    pub const LOAD_REPORT_EVERY: usize = 50_000;
}

/// Constants used by collaborator helpers.
pub mod collaborators {
    /// File name of a model configuration inside a weights directory.
    pub const MODEL_CONFIG_FILENAME: &str = "config.json";
    /// File name of serialized model weights.
    pub const MODEL_WEIGHTS_FILENAME: &str = "model_weights.pth";
}
