//! Display ordering
//!
//! Both orderings return borrowed projections; the store's canonical order is
//! never modified. All sorts are stable so store order breaks ties.

use std::cmp::Ordering;

use crate::timers::TrackedEntity;

use super::EntityStore;

/// Urgency order: timed bosses first, soonest target first, idle bosses
/// last in store order.
pub fn urgency_order(entities: &[TrackedEntity]) -> Vec<&TrackedEntity> {
    let mut sorted: Vec<&TrackedEntity> = entities.iter().collect();
    sorted.sort_by(|a, b| compare_urgency(a, b));
    sorted
}

fn compare_urgency(a: &TrackedEntity, b: &TrackedEntity) -> Ordering {
    match (a.target_time, b.target_time) {
        (Some(ta), Some(tb)) => ta.cmp(&tb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort modes for the selection list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionSort {
    /// Store order
    #[default]
    Default,
    NameAsc,
    NameDesc,
    /// Shortest respawn interval first
    IntervalAsc,
    IntervalDesc,
    /// Selected bosses first
    CheckedFirst,
}

/// Bosses shown in the selection list, filtered by a case-insensitive
/// name search and sorted by `sort`.
pub fn selection_list<'a>(
    store: &'a EntityStore,
    sort: SelectionSort,
    search: &str,
) -> Vec<&'a TrackedEntity> {
    let needle = search.trim().to_lowercase();
    let mut list: Vec<&TrackedEntity> = store
        .entities()
        .iter()
        .filter(|e| e.include_in_selection_list)
        .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
        .collect();

    match sort {
        SelectionSort::Default => {}
        SelectionSort::NameAsc => list.sort_by_key(|e| e.name.to_lowercase()),
        SelectionSort::NameDesc => {
            list.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()))
        }
        SelectionSort::IntervalAsc => {
            list.sort_by(|a, b| a.respawn_hours.total_cmp(&b.respawn_hours))
        }
        SelectionSort::IntervalDesc => {
            list.sort_by(|a, b| b.respawn_hours.total_cmp(&a.respawn_hours))
        }
        SelectionSort::CheckedFirst => list.sort_by_key(|e| !store.is_selected(e.id)),
    }
    list
}
