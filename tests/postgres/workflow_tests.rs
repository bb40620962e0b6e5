//! Status registry transactions against `PostgreSQL`.

use super::helpers::{TrackerDb, test_runtime};
use diesel::prelude::*;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskflow::error::ErrorKind;
use taskflow::persistence::postgres::schema::{kanban_column_preferences, project_statuses};
use taskflow::ticket::services::CreateTicketRequest;
use taskflow::workflow::{
    domain::{NewProjectStatus, SortOrder, StatusName, WorkflowTemplate},
    ports::{WorkflowRepository, WorkflowRepositoryError},
    services::WorkflowServiceError,
};

#[rstest]
fn duplicate_status_name_is_rejected_ignoring_case(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "wf_dup", 2)?;
    rt.block_on(async {
        let project = db.project("DUP", &WorkflowTemplate::standard()).await?;
        let registry = db.registry();

        let result = registry.create_status(project.id(), "  to do ").await;

        let Err(err) = result else {
            eyre::bail!("case-insensitive duplicate should be rejected");
        };
        eyre::ensure!(
            matches!(err, WorkflowServiceError::DuplicateStatusName { .. }),
            "expected duplicate name, got {err:?}"
        );
        eyre::ensure!(err.kind() == ErrorKind::Conflict, "wrong error kind");
        let statuses = registry.list_statuses(project.id()).await?;
        eyre::ensure!(statuses.len() == 4, "no status should be added");
        Ok(())
    })
}

#[rstest]
fn unique_index_backs_the_name_check(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "wf_index", 2)?;
    rt.block_on(async {
        let project = db.project("IDX", &WorkflowTemplate::standard()).await?;
        let draft = NewProjectStatus::new(
            project.id(),
            StatusName::new("DONE")?,
            SortOrder::new(9),
            false,
        );

        let result = db
            .workflow
            .transaction(move |tx| tx.insert_status(&draft))
            .await;

        eyre::ensure!(
            matches!(result, Err(WorkflowRepositoryError::DuplicateStatusName { .. })),
            "expected the unique index to reject the name, got {result:?}"
        );
        Ok(())
    })
}

#[rstest]
fn status_in_use_is_kept_until_its_tickets_move(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "wf_in_use", 2)?;
    rt.block_on(async {
        let reporter = db.user("Reporter").await?;
        let project = db.project("USE", &WorkflowTemplate::standard()).await?;
        let registry = db.registry();
        let default_id = registry.resolve_default_status_id(project.id()).await?;
        db.ticket_service()
            .create_ticket(CreateTicketRequest::new(project.id(), reporter.id(), "Pinned"))
            .await?;

        let result = registry.delete_status(project.id(), default_id).await;

        let Err(err) = result else {
            eyre::bail!("status in use should not be deleted");
        };
        eyre::ensure!(
            matches!(err, WorkflowServiceError::StatusInUse(id) if id == default_id),
            "expected status in use, got {err:?}"
        );
        eyre::ensure!(
            registry.find_status(project.id(), default_id).await?.is_some(),
            "status must survive the failed delete"
        );
        Ok(())
    })
}

#[rstest]
fn deleting_a_status_removes_its_columns(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "wf_cascade", 2)?;
    rt.block_on(async {
        let owner = db.user("Owner").await?;
        let project = db.project("CAS", &WorkflowTemplate::standard()).await?;
        let columns = db.columns().get_or_create_columns(project.id(), owner.id()).await?;
        let review = columns
            .get(2)
            .ok_or_else(|| eyre::eyre!("expected four columns"))?
            .status_id();

        db.registry().delete_status(project.id(), review).await?;

        let remaining = db.columns().get_or_create_columns(project.id(), owner.id()).await?;
        eyre::ensure!(remaining.len() == 3, "expected three columns");
        eyre::ensure!(
            remaining.iter().all(|column| column.status_id() != review),
            "deleted status must not keep a column"
        );
        let orphans = db
            .query(move |connection| {
                kanban_column_preferences::table
                    .filter(kanban_column_preferences::status_id.eq(review.value()))
                    .count()
                    .get_result::<i64>(connection)
            })
            .await?;
        eyre::ensure!(orphans == 0, "preference rows must go with the status");
        Ok(())
    })
}

#[rstest]
fn failed_transaction_leaves_no_partial_writes(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "wf_rollback", 2)?;
    rt.block_on(async {
        let project = db.project("ROLL", &WorkflowTemplate::empty()).await?;
        let project_id = project.id();
        let draft =
            NewProjectStatus::new(project_id, StatusName::new("Open")?, SortOrder::new(0), true);

        let result = db
            .workflow
            .transaction(move |tx| -> Result<(), eyre::Report> {
                tx.insert_status(&draft)?;
                eyre::bail!("abandon after the first write")
            })
            .await;

        eyre::ensure!(result.is_err(), "work error should surface");
        let stored = db
            .query(move |connection| {
                project_statuses::table
                    .filter(project_statuses::project_id.eq(project_id.value()))
                    .count()
                    .get_result::<i64>(connection)
            })
            .await?;
        eyre::ensure!(stored == 0, "rolled back status must not be stored");
        Ok(())
    })
}
