//! Category-based task partitioning for sequential evaluation.

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::data::{ExampleSet, GroupKey, Task};
use crate::errors::PipelineError;

/// Distinct group keys in first-appearance order, with their example rows.
pub fn category_rows(examples: &ExampleSet) -> IndexMap<Option<GroupKey>, Vec<usize>> {
    let mut categories: IndexMap<Option<GroupKey>, Vec<usize>> = IndexMap::new();
    for (row, group_key) in examples.group_keys.iter().enumerate() {
        match categories.get_mut(group_key) {
            Some(rows) => rows.push(row),
            None => {
                categories.insert(group_key.clone(), vec![row]);
            }
        }
    }
    categories
}

/// Sample `num_tasks` distinct categories uniformly without replacement and
/// slice `examples` by each of them.
///
/// Each task keeps the original relative order of its examples. A missing
/// group key counts as its own category.
pub fn make_tasks<R: Rng + ?Sized>(
    examples: &ExampleSet,
    num_tasks: usize,
    rng: &mut R,
) -> Result<Vec<Task>, PipelineError> {
    let categories = category_rows(examples);
    if categories.len() < num_tasks {
        return Err(PipelineError::InsufficientCategories {
            available: categories.len(),
            requested: num_tasks,
        });
    }

    let picked = rand::seq::index::sample(rng, categories.len(), num_tasks);
    let tasks: Vec<Task> = picked
        .into_iter()
        .filter_map(|position| categories.get_index(position))
        .map(|(group_key, rows)| Task {
            group_key: group_key.clone(),
            examples: examples.select(rows),
        })
        .collect();

    info!(
        tasks = tasks.len(),
        available = categories.len(),
        categories = ?tasks.iter().map(Task::name).collect::<Vec<_>>(),
        "partitioned examples into tasks"
    );
    Ok(tasks)
}

/// [`make_tasks`] driven by a `StdRng` seeded with `seed`.
pub fn make_tasks_seeded(
    examples: &ExampleSet,
    num_tasks: usize,
    seed: u64,
) -> Result<Vec<Task>, PipelineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    make_tasks(examples, num_tasks, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn examples(keys: &[Option<&str>]) -> ExampleSet {
        let mut set = ExampleSet::default();
        for (idx, key) in keys.iter().enumerate() {
            set.push(format!("text {idx}"), Some(idx as f64), key.map(str::to_string));
        }
        set
    }

    #[test]
    fn insufficient_categories_is_reported() {
        let set = examples(&[Some("Tech"), Some("Energy"), Some("Tech")]);
        let err = make_tasks_seeded(&set, 3, 7).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InsufficientCategories {
                available: 2,
                requested: 3
            }
        ));
    }

    #[test]
    fn exact_category_count_is_sufficient() {
        let set = examples(&[Some("Tech"), Some("Energy"), Some("Tech")]);
        let tasks = make_tasks_seeded(&set, 2, 7).unwrap();
        assert_eq!(tasks.len(), 2);
        let mut names: Vec<&str> = tasks.iter().map(Task::name).collect();
        names.sort();
        assert_eq!(names, vec!["Energy", "Tech"]);
    }

    #[test]
    fn tasks_hold_only_their_category_in_original_order() {
        let set = examples(&[
            Some("Tech"),
            Some("Energy"),
            Some("Tech"),
            None,
            Some("Tech"),
            Some("Health"),
        ]);
        let tasks = make_tasks_seeded(&set, 4, 11).unwrap();
        for task in &tasks {
            assert!(task
                .examples
                .group_keys
                .iter()
                .all(|key| key == &task.group_key));
        }
        let tech = tasks
            .iter()
            .find(|task| task.group_key.as_deref() == Some("Tech"))
            .unwrap();
        assert_eq!(
            tech.examples.texts,
            vec!["text 0".to_string(), "text 2".to_string(), "text 4".to_string()]
        );
        assert!(tasks.iter().any(|task| task.group_key.is_none()));
    }

    #[test]
    fn sampled_categories_are_distinct_and_seed_reproducible() {
        let keys: Vec<String> = (0..12).map(|i| format!("sector_{i}")).collect();
        let set = examples(&keys.iter().map(|k| Some(k.as_str())).collect::<Vec<_>>());

        let first = make_tasks_seeded(&set, 5, 99).unwrap();
        let second = make_tasks_seeded(&set, 5, 99).unwrap();
        assert_eq!(first, second);

        let mut names: Vec<&str> = first.iter().map(Task::name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn zero_tasks_yields_no_tasks() {
        let set = examples(&[Some("Tech")]);
        assert!(make_tasks_seeded(&set, 0, 1).unwrap().is_empty());
    }

    #[test]
    fn category_rows_follow_first_appearance() {
        let set = examples(&[Some("B"), Some("A"), Some("B")]);
        let rows = category_rows(&set);
        let keys: Vec<_> = rows.keys().cloned().collect();
        assert_eq!(keys, vec![Some("B".to_string()), Some("A".to_string())]);
        assert_eq!(rows[&Some("B".to_string())], vec![0, 2]);
    }
}
