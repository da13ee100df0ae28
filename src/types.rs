/// Entity identifier shared by all events of one security.
/// Examples: `AAPL`, `MSFT`
pub type EntityId = String;
/// Categorical key used to partition examples into tasks.
/// Examples: `Technology`, `Healthcare`
pub type GroupKey = String;
/// Identifier for the tabular source that produced a table.
/// Examples: `sc454k_test`, `fixtures/news.jsonl`
pub type SourceId = String;
/// Naive publication timestamp; no timezone is attached or assumed.
/// Example: `2023-04-17 13:05:00`
pub type Timestamp = chrono::NaiveDateTime;
/// Name of a column in the source table.
/// Examples: `Symbol`, `weighted_avg_720_hrs`
pub type ColumnName = String;
/// Serialized model-ready text for one example.
pub type SerializedText = String;
