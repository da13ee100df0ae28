use crate::constants::serializer::MISSING_PLACEHOLDER;
use crate::data::{Event, ExampleSet};
use crate::grouping::EntityIndex;
use crate::tasks::category_rows;
use crate::window::select_window;

/// Aggregate skew metrics for per-category example counts.
#[derive(Clone, Debug, PartialEq)]
pub struct CategorySkew {
    pub total: usize,
    pub categories: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub max_share: f64,
    pub min_share: f64,
    pub ratio: f64,
    pub per_category: Vec<CategoryShare>,
}

/// One category's share of the example set.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryShare {
    /// Category name; missing keys use the serializer placeholder.
    pub category: String,
    pub count: usize,
    pub share: f64,
}

/// Compute skew metrics over the group keys of `examples`.
///
/// Returns `None` for an empty set. `per_category` is sorted by count
/// descending, then name.
pub fn category_skew(examples: &ExampleSet) -> Option<CategorySkew> {
    let counts: Vec<(String, usize)> = category_rows(examples)
        .into_iter()
        .map(|(key, rows)| {
            (
                key.unwrap_or_else(|| MISSING_PLACEHOLDER.to_string()),
                rows.len(),
            )
        })
        .collect();
    let min = counts.iter().map(|(_, count)| *count).min()?;
    let max = counts.iter().map(|(_, count)| *count).max()?;
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    let categories = counts.len();
    let share = |count: usize| count as f64 / total as f64;

    let mut per_category: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category,
            count,
            share: share(count),
        })
        .collect();
    per_category.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

    Some(CategorySkew {
        total,
        categories,
        min,
        max,
        mean: total as f64 / categories as f64,
        max_share: share(max),
        min_share: share(min),
        ratio: max as f64 / min as f64,
        per_category,
    })
}

/// How full the per-example windows are.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowStats {
    pub examples: usize,
    pub window_size: usize,
    /// Examples with no prior article.
    pub empty: usize,
    /// Examples whose window reached `window_size`.
    pub full: usize,
    pub mean_len: f64,
}

impl WindowStats {
    /// Empty statistics for window size `k`.
    pub fn new(k: usize) -> Self {
        Self {
            examples: 0,
            window_size: k,
            empty: 0,
            full: 0,
            mean_len: 0.0,
        }
    }

    /// Fold one example's window length into the running totals.
    pub fn record(&mut self, window_len: usize) {
        self.examples += 1;
        if window_len == 0 {
            self.empty += 1;
        }
        if self.window_size > 0 && window_len == self.window_size {
            self.full += 1;
        }
        self.mean_len += (window_len as f64 - self.mean_len) / self.examples as f64;
    }
}

/// Window fill statistics for `events` under window size `k`.
///
/// Selects every window again; during assembly prefer feeding
/// [`WindowStats::record`] from `assemble_with_index`.
pub fn window_stats(events: &[Event], index: &EntityIndex, k: usize) -> WindowStats {
    let mut stats = WindowStats::new(k);
    for (row, event) in events.iter().enumerate() {
        let len = index
            .group_for_row(row)
            .map(|group| select_window(group, events, event.published_at, k).len())
            .unwrap_or(0);
        stats.record(len);
    }
    stats
}
