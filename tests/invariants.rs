use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use article_windows::{
    ArticleFields, Event, ExampleSet, PipelineError, PriceHistory, Timestamp, assemble,
    make_tasks_seeded,
};

const PREV_TITLE: &str = "Previous Article Title: ";
const PREV_DATE: &str = "Previous Article Date: ";
const CUR_DATE: &str = "Security: ";

fn base() -> Timestamp {
    NaiveDate::from_ymd_opt(2021, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn at(offset: i64) -> Timestamp {
    base() + Duration::hours(offset)
}

/// Shuffled multi-entity table with deliberate timestamp collisions.
fn random_events(seed: u64, rows: usize) -> Vec<Event> {
    let mut rng = StdRng::seed_from_u64(seed);
    let entities = ["AAA", "BBB", "CCC", "DDD"];
    let sectors = ["Tech", "Energy", "Health"];
    (0..rows)
        .map(|row| {
            let entity = entities[rng.random_range(0..entities.len())];
            let mut event = Event::new(entity, at(rng.random_range(0..40)))
                .with_article(ArticleFields {
                    title: Some(format!("row {row}")),
                    author: if rng.random_bool(0.2) {
                        None
                    } else {
                        Some("Desk".to_string())
                    },
                    ..ArticleFields::default()
                })
                .with_prices(PriceHistory::from_array([Some(1.0), None, Some(2.0), Some(3.0)]))
                .with_label(row as f64)
                .with_group_key(sectors[rng.random_range(0..sectors.len())]);
            if rng.random_bool(0.05) {
                event.entity_id = None;
            }
            event
        })
        .collect()
}

fn prefixed_values<'a>(text: &'a str, prefix: &str) -> Vec<&'a str> {
    text.lines()
        .filter_map(|line| line.strip_prefix(prefix))
        .collect()
}

fn prior_rows(text: &str) -> Vec<usize> {
    prefixed_values(text, PREV_TITLE)
        .into_iter()
        .map(|title| title.trim_start_matches("row ").parse().unwrap())
        .collect()
}

fn expected_window(events: &[Event], row: usize, k: usize) -> Vec<usize> {
    let current = &events[row];
    let mut prior: Vec<usize> = (0..events.len())
        .filter(|&j| {
            events[j].entity_id == current.entity_id
                && events[j].published_at < current.published_at
        })
        .collect();
    prior.sort_by_key(|&j| (events[j].published_at, j));
    let start = prior.len().saturating_sub(k);
    prior[start..].to_vec()
}

#[test]
fn windows_never_leak_and_stay_bounded() {
    for (seed, k) in [(1u64, 3usize), (2, 10), (3, 1), (4, 0)] {
        let events = random_events(seed, 120);
        let examples = assemble(&events, k);
        for (row, text) in examples.texts.iter().enumerate() {
            let current = prefixed_values(text, CUR_DATE);
            assert_eq!(current.len(), 1, "exactly one current block");
            let priors = prefixed_values(text, PREV_DATE);
            assert!(priors.len() <= k);
            for date in priors {
                // Fixed-width timestamps compare chronologically as strings.
                assert!(date < current[0], "row {row}: {date} !< {}", current[0]);
            }
        }
    }
}

#[test]
fn windows_hold_the_most_recent_prior_events() {
    let events = random_events(17, 150);
    let k = 4;
    let examples = assemble(&events, k);
    for row in 0..events.len() {
        assert_eq!(
            prior_rows(&examples.texts[row]),
            expected_window(&events, row, k),
            "row {row}"
        );
    }
}

#[test]
fn output_is_total_and_index_aligned() {
    let events = random_events(5, 90);
    let examples = assemble(&events, 10);
    assert_eq!(examples.texts.len(), events.len());
    assert_eq!(examples.labels.len(), events.len());
    assert_eq!(examples.group_keys.len(), events.len());
    for (row, event) in events.iter().enumerate() {
        assert_eq!(examples.labels[row], event.label);
        assert_eq!(examples.group_keys[row], event.group_key);
        assert!(
            examples.texts[row].contains(&format!("\nArticle Title: row {row}\n")),
            "row {row} text belongs to another event"
        );
    }
}

#[test]
fn assembly_is_idempotent() {
    let events = random_events(8, 80);
    let first = assemble(&events, 5);
    let second = assemble(&events, 5);
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn spaced_history_selects_latest_two() {
    let events: Vec<Event> = [1, 2, 3, 5, 9]
        .into_iter()
        .map(|offset| {
            Event::new("AAA", at(offset)).with_article(ArticleFields {
                title: Some(format!("row {}", offset)),
                ..ArticleFields::default()
            })
        })
        .collect();
    let examples = assemble(&events, 2);
    // Titles carry the hour offset here.
    assert_eq!(prior_rows(&examples.texts[4]), vec![3, 5]);
}

#[test]
fn single_event_has_only_current_block() {
    let events = vec![
        Event::new("BBB", at(0))
            .with_article(ArticleFields {
                body: Some("only article".to_string()),
                ..ArticleFields::default()
            })
            .with_label(10.0),
    ];
    let examples = assemble(&events, 10);
    let text = &examples.texts[0];
    assert!(!text.contains("Previous Article"));
    assert!(!text.contains("---"));
    assert!(text.starts_with("Symbol: BBB\nSecurity: 2021-01-01 00:00:00\n"));
    assert!(text.contains("\nArticle Content: only article\n"));
    assert!(text.ends_with("\nStock Price at release: None"));
}

#[test]
fn null_author_renders_placeholder() {
    let events = vec![
        Event::new("CCC", at(0)).with_article(ArticleFields {
            author: Some("First Author".to_string()),
            ..ArticleFields::default()
        }),
        Event::new("CCC", at(1)),
    ];
    let examples = assemble(&events, 10);
    let text = &examples.texts[1];
    assert!(text.contains("\nPrevious Publication Author: First Author\n"));
    assert!(text.contains("\nPublication Author: None\n"));
}

fn keyed(keys: &[&str]) -> ExampleSet {
    let mut set = ExampleSet::default();
    for (idx, key) in keys.iter().enumerate() {
        set.push(format!("example {idx}"), Some(idx as f64), Some(key.to_string()));
    }
    set
}

#[test]
fn category_sufficiency_is_exact() {
    let set = keyed(&["A", "B", "C", "A", "B"]);
    for requested in 1..=5 {
        let result = make_tasks_seeded(&set, requested, 3);
        if requested <= 3 {
            assert_eq!(result.unwrap().len(), requested);
        } else {
            assert!(matches!(
                result,
                Err(PipelineError::InsufficientCategories { available: 3, .. })
            ));
        }
    }
}
