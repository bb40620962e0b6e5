//! Tests for the column reconciliation planners.

use super::fixtures::{PROJECT, USER, preference, status};
use crate::workflow::domain::{
    ColumnInput, NewColumnPreference, StatusId, order_by_position, plan_missing_columns,
    plan_saved_columns,
};
use rstest::rstest;

fn layout(entries: &[(i64, i32, bool)]) -> Vec<ColumnInput> {
    entries
        .iter()
        .map(|&(status_id, position, visible)| ColumnInput::new(StatusId::new(status_id), position, visible))
        .collect()
}

fn new_row(status_id: i64, position: i32, is_visible: bool) -> NewColumnPreference {
    NewColumnPreference {
        project_id: PROJECT,
        user_id: USER,
        status_id: StatusId::new(status_id),
        position,
        is_visible,
    }
}

#[rstest]
fn missing_columns_start_at_zero_for_new_user() {
    let statuses = vec![
        status(1, 0, "To Do", true),
        status(2, 1, "Doing", false),
        status(3, 2, "Done", false),
    ];
    let planned = plan_missing_columns(PROJECT, USER, &statuses, &[]);
    assert_eq!(
        planned,
        vec![new_row(1, 0, true), new_row(2, 1, true), new_row(3, 2, true)]
    );
}

#[rstest]
fn missing_columns_append_after_highest_stored_position() {
    let statuses = vec![
        status(1, 0, "To Do", true),
        status(2, 1, "Doing", false),
        status(3, 2, "Done", false),
    ];
    let existing = vec![preference(20, 1, 4, false), preference(21, 2, 0, true)];
    let planned = plan_missing_columns(PROJECT, USER, &statuses, &existing);
    assert_eq!(planned, vec![new_row(3, 5, true)]);
}

#[rstest]
fn missing_columns_plan_nothing_when_covered() {
    let statuses = vec![status(1, 0, "To Do", true)];
    let existing = vec![preference(20, 1, 0, true)];
    assert!(plan_missing_columns(PROJECT, USER, &statuses, &existing).is_empty());
}

#[rstest]
fn empty_save_hides_every_status_and_keeps_valid_positions() {
    let statuses = vec![
        status(1, 0, "To Do", true),
        status(2, 1, "Doing", false),
        status(3, 2, "Done", false),
    ];
    let existing = vec![preference(20, 1, 3, true), preference(21, 2, -1, true)];

    let plan = plan_saved_columns(PROJECT, USER, &statuses, &existing, &[]);

    assert_eq!(
        plan.updates(),
        &[preference(20, 1, 3, false), preference(21, 2, 0, false)]
    );
    assert_eq!(plan.inserts(), &[new_row(3, 1, false)]);
}

#[rstest]
fn unknown_status_entries_are_dropped() {
    let statuses = vec![status(1, 0, "To Do", true)];
    let existing = vec![preference(20, 1, 0, true)];

    let plan = plan_saved_columns(
        PROJECT,
        USER,
        &statuses,
        &existing,
        &layout(&[(99, 0, true), (1, 0, true)]),
    );

    assert!(plan.is_empty());
}

#[rstest]
fn first_entry_for_a_status_wins() {
    let statuses = vec![status(1, 0, "To Do", true)];
    let plan = plan_saved_columns(
        PROJECT,
        USER,
        &statuses,
        &[],
        &layout(&[(1, 2, true), (1, 5, false)]),
    );
    assert_eq!(plan.inserts(), &[new_row(1, 2, true)]);
}

#[rstest]
fn omitted_status_moves_when_its_position_is_taken() {
    let statuses = vec![
        status(1, 0, "To Do", true),
        status(2, 1, "Doing", false),
        status(3, 2, "Done", false),
    ];
    let existing = vec![
        preference(20, 1, 0, true),
        preference(21, 2, 1, true),
        preference(22, 3, 2, true),
    ];

    let plan = plan_saved_columns(
        PROJECT,
        USER,
        &statuses,
        &existing,
        &layout(&[(2, 0, true), (3, 1, true)]),
    );

    let (inserts, mut updates) = plan.into_parts();
    assert!(inserts.is_empty());
    order_by_position(&mut updates);
    assert_eq!(
        updates,
        vec![
            preference(21, 2, 0, true),
            preference(22, 3, 1, true),
            preference(20, 1, 2, false),
        ]
    );
}

#[rstest]
fn hidden_rows_append_after_highest_submitted_position() {
    let statuses = vec![
        status(1, 0, "To Do", true),
        status(2, 1, "Doing", false),
        status(3, 2, "Done", false),
    ];

    let plan = plan_saved_columns(PROJECT, USER, &statuses, &[], &layout(&[(3, 7, true)]));

    assert_eq!(
        plan.inserts(),
        &[new_row(1, 8, false), new_row(2, 9, false), new_row(3, 7, true)]
    );
}

#[rstest]
fn ordering_breaks_position_ties_by_status_id() {
    let mut rows = vec![
        preference(1, 5, 1, true),
        preference(2, 3, 1, true),
        preference(3, 9, 0, false),
    ];
    order_by_position(&mut rows);
    let statuses: Vec<i64> = rows.iter().map(|row| row.status_id().value()).collect();
    assert_eq!(statuses, vec![9, 3, 5]);
}
