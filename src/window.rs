//! Window selection over a cached entity group.

use crate::data::{Event, Timestamp};
use crate::grouping::EntityGroup;

/// Up to K prior events of one entity, oldest first.
///
/// Every member was published strictly before the reference timestamp.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Window<'a> {
    members: Vec<&'a Event>,
}

impl<'a> Window<'a> {
    pub fn members(&self) -> &[&'a Event] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.members.iter().copied()
    }
}

/// Select the `k` most recent events of `group` published strictly before `reference`.
///
/// Events sharing the reference timestamp are excluded. Fewer than `k`
/// qualifying events yields a shorter window; none yields an empty one.
pub fn select_window<'a>(
    group: &EntityGroup,
    events: &'a [Event],
    reference: Timestamp,
    k: usize,
) -> Window<'a> {
    let chronological = group.chronological();
    let end = chronological.partition_point(|&(published_at, _)| published_at < reference);
    let start = end.saturating_sub(k);
    let members = chronological[start..end]
        .iter()
        .filter_map(|&(_, row)| events.get(row))
        .collect();
    Window { members }
}
