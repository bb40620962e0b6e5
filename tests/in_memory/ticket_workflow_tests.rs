//! Tickets bound to workflow statuses.

use super::helpers::{Tracker, tracker};
use rstest::rstest;
use taskflow::board::BoardError;
use taskflow::error::ErrorKind;
use taskflow::project::domain::CallerIdentity;
use taskflow::ticket::{domain::TicketChanges, services::CreateTicketRequest};
use taskflow::workflow::services::WorkflowServiceError;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_in_use_cannot_be_deleted_until_ticket_moves(
    tracker: Tracker,
) -> Result<(), eyre::Report> {
    let owner = tracker.user("Owner").await?.id();
    let project = tracker.project_with_members("FLOW", &[owner]).await?;
    let caller = CallerIdentity::user(owner);
    let statuses = tracker.board.list_statuses(&caller, project.id()).await?;
    let find = |name: &str| {
        statuses
            .iter()
            .find(|status| status.name == name)
            .map(|status| status.id)
            .ok_or_else(|| eyre::eyre!("missing status {name}"))
    };
    let review = find("In Review")?;
    let done = find("Done")?;
    let ticket = tracker
        .tickets
        .create_ticket(
            CreateTicketRequest::new(project.id(), owner, "Needs review").with_status(review),
        )
        .await?;

    let blocked = tracker.board.delete_status(&caller, project.id(), review).await;
    let Err(err) = blocked else {
        eyre::bail!("status in use should not be deleted");
    };
    eyre::ensure!(
        matches!(err, BoardError::Workflow(WorkflowServiceError::StatusInUse(_))),
        "expected status in use, got {err:?}"
    );
    eyre::ensure!(err.kind() == ErrorKind::Conflict, "wrong error kind");

    tracker
        .tickets
        .update_ticket(ticket.id(), TicketChanges::new().with_status(done))
        .await?;
    tracker.board.delete_status(&caller, project.id(), review).await?;

    let columns = tracker.board.get_columns(&caller, project.id()).await?;
    eyre::ensure!(columns.len() == 3, "expected three columns, found {}", columns.len());
    eyre::ensure!(
        columns.iter().all(|column| column.status_id != review),
        "deleted status must not keep a column"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn renamed_status_shows_in_columns(tracker: Tracker) -> Result<(), eyre::Report> {
    let owner = tracker.user("Owner").await?.id();
    let project = tracker.project_with_members("NAME", &[owner]).await?;
    let caller = CallerIdentity::user(owner);
    let columns = tracker.board.get_columns(&caller, project.id()).await?;
    let first = columns
        .first()
        .ok_or_else(|| eyre::eyre!("expected columns"))?
        .status_id;

    tracker
        .board
        .update_status(&caller, project.id(), first, "Backlog")
        .await?;

    let renamed = tracker.board.get_columns(&caller, project.id()).await?;
    eyre::ensure!(
        renamed.first().map(|column| column.status_name.as_str()) == Some("Backlog"),
        "column should show the new name"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_its_tickets(tracker: Tracker) -> Result<(), eyre::Report> {
    let owner = tracker.user("Owner").await?.id();
    let project = tracker.project_with_members("TEMP", &[owner]).await?;
    let ticket = tracker
        .tickets
        .create_ticket(CreateTicketRequest::new(project.id(), owner, "Short lived"))
        .await?;
    tracker
        .tickets
        .add_comment(ticket.id(), owner, "soon gone")
        .await?;

    tracker.projects.delete_project(project.id()).await?;

    eyre::ensure!(
        tracker.tickets.get_ticket(ticket.id()).await?.is_none(),
        "ticket should be removed with its project"
    );
    eyre::ensure!(
        tracker.tickets.list_tickets(project.id()).await?.is_empty(),
        "project should have no tickets"
    );
    eyre::ensure!(
        tracker.publisher.routing_keys() == vec!["ticket.created", "ticket.commented"],
        "unexpected notifications: {:?}",
        tracker.publisher.routing_keys()
    );
    Ok(())
}
