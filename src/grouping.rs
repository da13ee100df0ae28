//! Entity grouping.
//!
//! Builds the per-entity index once so every row's window lookup reuses the
//! same cached group instead of re-filtering the full table.

use indexmap::IndexMap;

use crate::data::{EntityId, Event, Timestamp};

/// All rows of one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityGroup {
    entity_id: Option<EntityId>,
    members: Vec<usize>,
    chronological: Vec<(Timestamp, usize)>,
}

impl EntityGroup {
    fn new(entity_id: Option<EntityId>) -> Self {
        Self {
            entity_id,
            members: Vec::new(),
            chronological: Vec::new(),
        }
    }

    /// Entity shared by every member; `None` groups rows without an entity id.
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Member row indices in original input order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// `(timestamp, row)` pairs sorted ascending; equal timestamps keep input order.
    pub fn chronological(&self) -> &[(Timestamp, usize)] {
        &self.chronological
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Mapping from entity id to its group, plus a row -> group lookup.
///
/// Groups are kept in first-appearance order.
#[derive(Clone, Debug, Default)]
pub struct EntityIndex {
    groups: IndexMap<Option<EntityId>, EntityGroup>,
    row_groups: Vec<usize>,
}

impl EntityIndex {
    /// Group `events` in a single pass.
    pub fn build(events: &[Event]) -> Self {
        let mut groups: IndexMap<Option<EntityId>, EntityGroup> = IndexMap::new();
        let mut row_groups = Vec::with_capacity(events.len());

        for (row, event) in events.iter().enumerate() {
            let entry = groups.entry(event.entity_id.clone());
            row_groups.push(entry.index());
            let group = entry.or_insert_with(|| EntityGroup::new(event.entity_id.clone()));
            group.members.push(row);
            group.chronological.push((event.published_at, row));
        }

        for group in groups.values_mut() {
            // Stable sort: rows sharing a timestamp stay in input order.
            group.chronological.sort_by_key(|&(published_at, _)| published_at);
        }

        Self { groups, row_groups }
    }

    /// Group containing input row `row`.
    pub fn group_for_row(&self, row: usize) -> Option<&EntityGroup> {
        let position = *self.row_groups.get(row)?;
        self.groups.get_index(position).map(|(_, group)| group)
    }

    /// Group for `entity_id` (`None` looks up rows without an entity id).
    pub fn group(&self, entity_id: Option<&str>) -> Option<&EntityGroup> {
        self.groups.get(&entity_id.map(str::to_string))
    }

    /// Number of distinct entities.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of rows indexed.
    pub fn rows(&self) -> usize {
        self.row_groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityGroup> {
        self.groups.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn groups_preserve_input_order_and_first_appearance() {
        let events = vec![
            Event::new("BBB", at(5)),
            Event::new("AAA", at(3)),
            Event::new("BBB", at(1)),
            Event::new("AAA", at(2)),
        ];
        let index = EntityIndex::build(&events);

        assert_eq!(index.len(), 2);
        assert_eq!(index.rows(), 4);
        let order: Vec<_> = index.iter().map(|g| g.entity_id().unwrap()).collect();
        assert_eq!(order, vec!["BBB", "AAA"]);

        let bbb = index.group(Some("BBB")).unwrap();
        assert_eq!(bbb.members(), &[0, 2]);
        let chronological: Vec<usize> = bbb.chronological().iter().map(|&(_, row)| row).collect();
        assert_eq!(chronological, vec![2, 0]);
    }

    #[test]
    fn missing_entity_forms_its_own_group() {
        let mut orphan = Event::new("unused", at(1));
        orphan.entity_id = None;
        let mut orphan_two = Event::new("unused", at(2));
        orphan_two.entity_id = None;
        let events = vec![orphan, Event::new("AAA", at(1)), orphan_two];
        let index = EntityIndex::build(&events);

        let missing = index.group(None).unwrap();
        assert_eq!(missing.members(), &[0, 2]);
        assert_eq!(missing.entity_id(), None);
        assert_eq!(index.group_for_row(2), Some(missing));
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let events = vec![
            Event::new("AAA", at(4)),
            Event::new("AAA", at(2)),
            Event::new("AAA", at(4)),
            Event::new("AAA", at(2)),
        ];
        let index = EntityIndex::build(&events);
        let rows: Vec<usize> = index
            .group(Some("AAA"))
            .unwrap()
            .chronological()
            .iter()
            .map(|&(_, row)| row)
            .collect();
        assert_eq!(rows, vec![1, 3, 0, 2]);
    }

    #[test]
    fn empty_table_has_no_groups() {
        let index = EntityIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.group_for_row(0).is_none());
    }
}
