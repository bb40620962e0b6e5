//! Column reconciliation planning.
//!
//! The planners are pure: they read the canonical status list, the user's
//! stored rows and (for saves) the submitted layout, and describe the rows to
//! insert and the rows to overwrite. Adapters apply a plan inside one
//! transaction.

use super::{ColumnInput, ColumnPreference, NewColumnPreference, ProjectStatus, StatusId};
use crate::project::domain::{ProjectId, UserId};
use std::collections::{HashMap, HashSet};

/// Rows a reconciliation wants written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPlan {
    inserts: Vec<NewColumnPreference>,
    updates: Vec<ColumnPreference>,
}

impl ColumnPlan {
    /// Rows to create.
    #[must_use]
    pub fn inserts(&self) -> &[NewColumnPreference] {
        &self.inserts
    }

    /// Existing rows whose position or visibility changed.
    #[must_use]
    pub fn updates(&self) -> &[ColumnPreference] {
        &self.updates
    }

    /// Returns `true` when nothing needs writing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }

    /// Splits the plan into inserts and updates.
    #[must_use]
    pub fn into_parts(self) -> (Vec<NewColumnPreference>, Vec<ColumnPreference>) {
        (self.inserts, self.updates)
    }
}

/// Hands out positions after a seed maximum.
struct PositionCounter(i32);

impl PositionCounter {
    const fn after(max: Option<i32>) -> Self {
        match max {
            Some(value) => Self(value),
            None => Self(-1),
        }
    }

    const fn next(&mut self) -> i32 {
        self.0 = self.0.saturating_add(1);
        self.0
    }
}

/// Plans the rows needed so that every canonical status has a preference.
///
/// Missing rows are visible and appended after the highest stored position.
/// Stored rows are never touched.
#[must_use]
pub fn plan_missing_columns(
    project_id: ProjectId,
    user_id: UserId,
    statuses: &[ProjectStatus],
    existing: &[ColumnPreference],
) -> Vec<NewColumnPreference> {
    let covered: HashSet<StatusId> = existing.iter().map(ColumnPreference::status_id).collect();
    let mut positions = PositionCounter::after(existing.iter().map(ColumnPreference::position).max());

    statuses
        .iter()
        .filter(|status| !covered.contains(&status.id()))
        .map(|status| NewColumnPreference {
            project_id,
            user_id,
            status_id: status.id(),
            position: positions.next(),
            is_visible: true,
        })
        .collect()
}

/// Plans the rows that apply a submitted layout.
///
/// Statuses the layout names take the submitted position and visibility; the
/// first entry for a status wins. Entries for statuses outside `statuses` are
/// dropped. Statuses the layout omits are hidden, never removed: a stored row
/// keeps its position unless it was never placed or the layout hands that
/// position to another column, in which case it moves after the highest
/// submitted position. Omitted statuses without a row get a hidden row there
/// too.
#[must_use]
pub fn plan_saved_columns(
    project_id: ProjectId,
    user_id: UserId,
    statuses: &[ProjectStatus],
    existing: &[ColumnPreference],
    incoming: &[ColumnInput],
) -> ColumnPlan {
    let known: HashSet<StatusId> = statuses.iter().map(ProjectStatus::id).collect();
    let mut requested: HashMap<StatusId, ColumnInput> = HashMap::new();
    for entry in incoming.iter().filter(|entry| known.contains(&entry.status_id)) {
        requested.entry(entry.status_id).or_insert(*entry);
    }
    let claimed: HashSet<i32> = requested.values().map(|entry| entry.position).collect();
    let stored: HashMap<StatusId, &ColumnPreference> = existing
        .iter()
        .map(|preference| (preference.status_id(), preference))
        .collect();
    let mut positions = PositionCounter::after(incoming.iter().map(|entry| entry.position).max());

    let mut plan = ColumnPlan::default();
    for status in statuses {
        let status_id = status.id();
        match (requested.get(&status_id), stored.get(&status_id)) {
            (Some(entry), Some(current)) => {
                let mut updated = **current;
                updated.set_layout(entry.position, entry.is_visible);
                push_if_changed(&mut plan, current, updated);
            }
            (Some(entry), None) => plan.inserts.push(NewColumnPreference {
                project_id,
                user_id,
                status_id,
                position: entry.position,
                is_visible: entry.is_visible,
            }),
            (None, Some(current)) => {
                let keeps_position =
                    current.is_placed() && !claimed.contains(&current.position());
                let position = if keeps_position {
                    current.position()
                } else {
                    positions.next()
                };
                let mut updated = **current;
                updated.set_layout(position, false);
                push_if_changed(&mut plan, current, updated);
            }
            (None, None) => plan.inserts.push(NewColumnPreference {
                project_id,
                user_id,
                status_id,
                position: positions.next(),
                is_visible: false,
            }),
        }
    }
    plan
}

fn push_if_changed(plan: &mut ColumnPlan, current: &ColumnPreference, updated: ColumnPreference) {
    if updated != *current {
        plan.updates.push(updated);
    }
}

/// Orders preferences left to right, ties broken by status id.
pub fn order_by_position(preferences: &mut [ColumnPreference]) {
    preferences.sort_by_key(|preference| (preference.position(), preference.status_id()));
}
