//! Project membership and deletion against `PostgreSQL`.

use super::helpers::{TrackerDb, test_runtime};
use diesel::prelude::*;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskflow::persistence::postgres::schema::{
    kanban_column_preferences, project_members, project_statuses, ticket_comments, tickets,
};
use taskflow::project::ports::{ProjectRepository, ProjectRepositoryError};
use taskflow::user::ports::UserRepository;
use taskflow::ticket::services::CreateTicketRequest;
use taskflow::project::domain::UserId;
use taskflow::workflow::domain::WorkflowTemplate;

#[derive(Debug, PartialEq, Eq)]
struct Remaining {
    statuses: i64,
    columns: i64,
    tickets: i64,
    comments: i64,
    members: i64,
}

fn remaining(connection: &mut PgConnection, project_id: i64) -> QueryResult<Remaining> {
    let project_tickets = tickets::table
        .filter(tickets::project_id.eq(project_id))
        .select(tickets::id);
    Ok(Remaining {
        statuses: project_statuses::table
            .filter(project_statuses::project_id.eq(project_id))
            .count()
            .get_result(connection)?,
        columns: kanban_column_preferences::table
            .filter(kanban_column_preferences::project_id.eq(project_id))
            .count()
            .get_result(connection)?,
        tickets: tickets::table
            .filter(tickets::project_id.eq(project_id))
            .count()
            .get_result(connection)?,
        comments: ticket_comments::table
            .filter(ticket_comments::ticket_id.eq_any(project_tickets))
            .count()
            .get_result(connection)?,
        members: project_members::table
            .filter(project_members::project_id.eq(project_id))
            .count()
            .get_result(connection)?,
    })
}

#[rstest]
fn deleting_a_project_removes_everything_it_owns(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "prj_delete", 2)?;
    rt.block_on(async {
        let owner = db.user("Owner").await?;
        let doomed = db.project("GONE", &WorkflowTemplate::standard()).await?;
        let kept = db.project("KEPT", &WorkflowTemplate::standard()).await?;
        for project in [&doomed, &kept] {
            db.projects.add_member(project.id(), owner.id()).await?;
            db.columns()
                .get_or_create_columns(project.id(), owner.id())
                .await?;
            let ticket = db
                .ticket_service()
                .create_ticket(CreateTicketRequest::new(project.id(), owner.id(), "Work"))
                .await?;
            db.ticket_service()
                .add_comment(ticket.id(), owner.id(), "Noted")
                .await?;
        }

        let (doomed_id, kept_id) = (doomed.id().value(), kept.id().value());
        let before = db.query(move |connection| remaining(connection, doomed_id)).await?;
        eyre::ensure!(
            before.tickets == 1 && before.comments == 1 && before.columns == 4,
            "unexpected starting rows {before:?}"
        );

        eyre::ensure!(db.projects.delete(doomed.id()).await?, "project should be deleted");
        eyre::ensure!(
            !db.projects.delete(doomed.id()).await?,
            "a second delete should report nothing removed"
        );

        let gone = db.query(move |connection| remaining(connection, doomed_id)).await?;
        let expected_gone = Remaining {
            statuses: 0,
            columns: 0,
            tickets: 0,
            comments: 0,
            members: 0,
        };
        eyre::ensure!(gone == expected_gone, "rows left behind: {gone:?}");

        let untouched = db.query(move |connection| remaining(connection, kept_id)).await?;
        let expected_kept = Remaining {
            statuses: 4,
            columns: 4,
            tickets: 1,
            comments: 1,
            members: 1,
        };
        eyre::ensure!(untouched == expected_kept, "other project changed: {untouched:?}");
        eyre::ensure!(
            db.users.find_by_id(owner.id()).await?.is_some(),
            "users outlive the projects they belonged to"
        );
        Ok(())
    })
}

#[rstest]
fn members_are_listed_by_display_name(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "prj_members", 2)?;
    rt.block_on(async {
        let project = db.project("TEAM", &WorkflowTemplate::standard()).await?;
        for name in ["Robin", "Casey", "Morgan"] {
            let user = db.user(name).await?;
            eyre::ensure!(
                db.projects.add_member(project.id(), user.id()).await?,
                "{name} should be added"
            );
        }
        db.user("Avery").await?;

        let names: Vec<String> = db
            .projects
            .list_members(project.id())
            .await?
            .iter()
            .map(|user| user.display_name().as_str().to_owned())
            .collect();
        eyre::ensure!(
            names == ["Casey", "Morgan", "Robin"],
            "unexpected member order {names:?}"
        );
        Ok(())
    })
}

#[rstest]
fn adding_an_unknown_user_is_rejected(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "prj_unknown", 2)?;
    rt.block_on(async {
        let project = db.project("TEAM", &WorkflowTemplate::standard()).await?;
        let missing = UserId::new(8_888);
        let result = db.projects.add_member(project.id(), missing).await;
        eyre::ensure!(
            matches!(result, Err(ProjectRepositoryError::UserNotFound(id)) if id == missing),
            "unexpected result {result:?}"
        );
        let members = db.projects.list_members(project.id()).await?;
        eyre::ensure!(members.is_empty(), "no membership should be stored");
        Ok(())
    })
}
