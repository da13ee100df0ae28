//! Example assembly: one serialized example per input event.

use std::time::Instant;

use tracing::{debug, info};

use crate::data::{Event, ExampleSet};
use crate::grouping::EntityIndex;
use crate::serializer::serialize;
use crate::window::{Window, select_window};

/// Assemble one example per event using windows of at most `window_size` prior articles.
///
/// Output columns are index-aligned with `events`; no event is dropped.
pub fn assemble(events: &[Event], window_size: usize) -> ExampleSet {
    assemble_with_progress(events, window_size, |_, _| {})
}

/// Same as [`assemble`], invoking `on_row(done, total)` after each event.
pub fn assemble_with_progress(
    events: &[Event],
    window_size: usize,
    mut on_row: impl FnMut(usize, usize),
) -> ExampleSet {
    let index = EntityIndex::build(events);
    debug!(
        rows = events.len(),
        entities = index.len(),
        "built entity index"
    );
    assemble_with_index(events, &index, window_size, |done, total, _| {
        on_row(done, total)
    })
}

/// Assemble over an index the caller already built from `events`.
///
/// `on_row(done, total, window)` sees each row's window right after its
/// example is pushed, so callers can gather window metrics without
/// selecting windows a second time.
pub fn assemble_with_index(
    events: &[Event],
    index: &EntityIndex,
    window_size: usize,
    mut on_row: impl FnMut(usize, usize, &Window<'_>),
) -> ExampleSet {
    let started = Instant::now();
    let total = events.len();
    let mut examples = ExampleSet::with_capacity(total);
    for (row, event) in events.iter().enumerate() {
        let window = match index.group_for_row(row) {
            Some(group) => select_window(group, events, event.published_at, window_size),
            None => Window::default(),
        };
        examples.push(
            serialize(&window, event),
            event.label,
            event.group_key.clone(),
        );
        on_row(row + 1, total, &window);
    }

    info!(
        examples = examples.len(),
        entities = index.len(),
        window_size,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "assembled examples"
    );
    examples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::serializer::{BLOCK_DELIMITER, PREV_DATE};
    use crate::data::{ArticleFields, Timestamp};
    use chrono::NaiveDate;

    fn at(day: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2022, 9, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn event(entity: &str, day: u32, sector: &str) -> Event {
        Event::new(entity, at(day))
            .with_article(ArticleFields {
                title: Some(format!("{entity} day {day}")),
                ..ArticleFields::default()
            })
            .with_label(day as f64)
            .with_group_key(sector)
    }

    #[test]
    fn columns_align_with_input_rows() {
        let events = vec![
            event("AAA", 3, "Tech"),
            event("BBB", 1, "Energy"),
            event("AAA", 1, "Tech"),
        ];
        let examples = assemble(&events, 10);

        assert_eq!(examples.len(), 3);
        assert_eq!(examples.labels, vec![Some(3.0), Some(1.0), Some(1.0)]);
        assert_eq!(
            examples.group_keys,
            vec![
                Some("Tech".to_string()),
                Some("Energy".to_string()),
                Some("Tech".to_string())
            ]
        );
        assert!(examples.texts[0].contains("Previous Article Title: AAA day 1"));
        assert!(examples.texts[0].contains("Article Title: AAA day 3"));
        assert!(!examples.texts[1].contains(PREV_DATE));
        assert!(!examples.texts[2].contains(PREV_DATE));
    }

    #[test]
    fn window_size_bounds_prior_blocks() {
        let events: Vec<Event> = (1..=8).map(|day| event("AAA", day, "Tech")).collect();
        let examples = assemble(&events, 3);
        let counts: Vec<usize> = examples
            .texts
            .iter()
            .map(|text| text.matches(BLOCK_DELIMITER).count())
            .collect();
        assert_eq!(counts, vec![0, 1, 2, 3, 3, 3, 3, 3]);
    }

    #[test]
    fn progress_reports_every_row() {
        let events: Vec<Event> = (1..=4).map(|day| event("AAA", day, "Tech")).collect();
        let mut seen = Vec::new();
        assemble_with_progress(&events, 2, |done, total| seen.push((done, total)));
        assert_eq!(seen, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn prebuilt_index_matches_assemble() {
        let events = vec![
            event("AAA", 4, "Tech"),
            event("BBB", 2, "Energy"),
            event("AAA", 1, "Tech"),
            event("AAA", 2, "Tech"),
            event("BBB", 5, "Energy"),
        ];
        let index = EntityIndex::build(&events);
        let mut window_lens = Vec::new();
        let examples = assemble_with_index(&events, &index, 2, |_, _, window| {
            window_lens.push(window.len())
        });

        assert_eq!(examples, assemble(&events, 2));
        assert_eq!(window_lens, vec![2, 0, 0, 1, 1]);
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let examples = assemble(&[], 10);
        assert!(examples.is_empty());
    }
}
