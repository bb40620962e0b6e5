//! Membership gate in front of the board facade.

use super::helpers::{Tracker, tracker};
use rstest::rstest;
use taskflow::board::BoardError;
use taskflow::error::ErrorKind;
use taskflow::workflow::domain::ColumnInput;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_and_admins_reach_the_board(tracker: Tracker) -> Result<(), eyre::Report> {
    let member = tracker.user("Member").await?;
    let admin = tracker.admin("Admin").await?;
    let project = tracker.project_with_members("ACC", &[member.id()]).await?;

    let as_member = tracker
        .board
        .get_columns(&member.caller(), project.id())
        .await?;
    let as_admin = tracker
        .board
        .list_statuses(&admin.caller(), project.id())
        .await?;

    eyre::ensure!(as_member.len() == 4, "expected four columns");
    eyre::ensure!(as_admin.len() == 4, "expected four statuses");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_are_denied_before_any_lookup(tracker: Tracker) -> Result<(), eyre::Report> {
    let member = tracker.user("Member").await?;
    let outsider = tracker.user("Outsider").await?;
    let project = tracker.project_with_members("DENY", &[member.id()]).await?;

    let result = tracker
        .board
        .create_status(&outsider.caller(), project.id(), "Sneaky")
        .await;

    let Err(err) = result else {
        eyre::bail!("outsider should be denied");
    };
    eyre::ensure!(
        matches!(err, BoardError::AccessDenied { .. }),
        "expected access denied, got {err:?}"
    );
    eyre::ensure!(err.kind() == ErrorKind::AccessDenied, "wrong error kind");
    eyre::ensure!(err.kind().is_caller_error(), "denial is not retryable");
    let statuses = tracker
        .board
        .list_statuses(&member.caller(), project.id())
        .await?;
    eyre::ensure!(
        statuses.iter().all(|status| status.name != "Sneaky"),
        "denied request must not change state"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_member_loses_access(tracker: Tracker) -> Result<(), eyre::Report> {
    let member = tracker.user("Member").await?;
    let project = tracker.project_with_members("GONE", &[member.id()]).await?;
    tracker.projects.remove_member(project.id(), member.id()).await?;

    let result = tracker
        .board
        .get_columns(&member.caller(), project.id())
        .await;

    eyre::ensure!(
        matches!(result, Err(BoardError::AccessDenied { .. })),
        "expected access denied, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_member_keeps_their_own_layout(tracker: Tracker) -> Result<(), eyre::Report> {
    let first = tracker.user("First").await?;
    let second = tracker.user("Second").await?;
    let project = tracker
        .project_with_members("TWO", &[first.id(), second.id()])
        .await?;
    let member = first.caller();
    let columns = tracker.board.get_columns(&member, project.id()).await?;
    let done = columns
        .last()
        .ok_or_else(|| eyre::eyre!("expected columns"))?
        .status_id;

    tracker
        .board
        .save_columns(&member, project.id(), vec![ColumnInput::new(done, 0, true)])
        .await?;

    let mine = tracker.board.get_columns(&member, project.id()).await?;
    let theirs = tracker
        .board
        .get_columns(&second.caller(), project.id())
        .await?;
    let visible_mine = mine.iter().filter(|column| column.is_visible).count();
    let visible_theirs = theirs.iter().filter(|column| column.is_visible).count();
    eyre::ensure!(visible_mine == 1, "expected one visible column, found {visible_mine}");
    eyre::ensure!(visible_theirs == 4, "expected four visible columns, found {visible_theirs}");
    eyre::ensure!(
        mine.first().map(|column| column.status_name.as_str()) == Some("Done"),
        "saved column should lead the board"
    );
    Ok(())
}
