//! Ticket key allocation against `PostgreSQL`.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use super::helpers::{TrackerDb, test_runtime};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskflow::error::ErrorKind;
use taskflow::project::domain::ProjectId;
use taskflow::ticket::services::{CreateTicketRequest, TicketServiceError};
use taskflow::workflow::domain::WorkflowTemplate;

const CREATORS: usize = 6;

#[rstest]
fn keys_follow_the_project_sequence(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "tkt_seq", 2)?;
    rt.block_on(async {
        let reporter = db.user("Reporter").await?;
        let demo = db.project("DEMO", &WorkflowTemplate::standard()).await?;
        let other = db.project("OPS", &WorkflowTemplate::standard()).await?;
        let service = db.ticket_service();

        let mut keys = Vec::new();
        for title in ["First", "Second", "Third"] {
            let ticket = service
                .create_ticket(CreateTicketRequest::new(demo.id(), reporter.id(), title))
                .await?;
            keys.push((ticket.sequence(), ticket.key().as_str().to_owned()));
        }
        let elsewhere = service
            .create_ticket(CreateTicketRequest::new(other.id(), reporter.id(), "Elsewhere"))
            .await?;

        eyre::ensure!(
            keys == [
                (1, "DEMO-1".to_owned()),
                (2, "DEMO-2".to_owned()),
                (3, "DEMO-3".to_owned()),
            ],
            "unexpected keys {keys:?}"
        );
        eyre::ensure!(
            elsewhere.key().as_str() == "OPS-1",
            "each project numbers its own tickets, got {}",
            elsewhere.key()
        );
        let found = service.get_ticket_by_key("demo-2").await?;
        eyre::ensure!(
            found.map(|ticket| ticket.sequence()) == Some(2),
            "keys should resolve ignoring case"
        );
        Ok(())
    })
}

#[rstest]
fn concurrent_creation_allocates_distinct_keys(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "tkt_race", 6)?;
    rt.block_on(async {
        let reporter = db.user("Reporter").await?;
        let project = db.project("RACE", &WorkflowTemplate::standard()).await?;
        let attempts = NonZeroU32::new(32).ok_or_else(|| eyre::eyre!("zero attempts"))?;
        let (project_id, reporter_id) = (project.id(), reporter.id());

        let mut handles = Vec::with_capacity(CREATORS);
        for n in 0..CREATORS {
            let service = db.ticket_service().with_key_allocation_attempts(attempts);
            handles.push(tokio::spawn(async move {
                service
                    .create_ticket(CreateTicketRequest::new(
                        project_id,
                        reporter_id,
                        format!("Ticket {n}"),
                    ))
                    .await
            }));
        }
        let mut sequences = BTreeSet::new();
        for handle in handles {
            sequences.insert(handle.await??.sequence());
        }

        let expected: BTreeSet<u64> = (1..=6).collect();
        eyre::ensure!(
            sequences == expected,
            "expected sequences 1..=6 without gaps, got {sequences:?}"
        );
        Ok(())
    })
}

#[rstest]
fn status_from_another_project_is_rejected(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "tkt_status", 2)?;
    rt.block_on(async {
        let reporter = db.user("Reporter").await?;
        let demo = db.project("DEMO", &WorkflowTemplate::standard()).await?;
        let other = db.project("OPS", &WorkflowTemplate::standard()).await?;
        let foreign = db
            .registry()
            .list_statuses(other.id())
            .await?
            .first()
            .map(|status| status.id())
            .ok_or_else(|| eyre::eyre!("expected seeded statuses"))?;

        let request =
            CreateTicketRequest::new(demo.id(), reporter.id(), "Misplaced").with_status(foreign);
        let Err(err) = db.ticket_service().create_ticket(request).await else {
            eyre::bail!("a foreign status should be rejected");
        };
        eyre::ensure!(
            matches!(err, TicketServiceError::StatusNotFound { .. }),
            "unexpected error {err:?}"
        );
        eyre::ensure!(err.kind() == ErrorKind::NotFound, "unexpected kind");
        let stored = db.ticket_service().list_tickets(demo.id()).await?;
        eyre::ensure!(stored.is_empty(), "nothing should be stored");
        Ok(())
    })
}

#[rstest]
fn ticket_in_unknown_project_is_not_found(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "tkt_project", 2)?;
    rt.block_on(async {
        let reporter = db.user("Reporter").await?;
        let missing = ProjectId::new(9_999);
        let Err(err) = db
            .ticket_service()
            .create_ticket(CreateTicketRequest::new(missing, reporter.id(), "Lost"))
            .await
        else {
            eyre::bail!("an unknown project should be rejected");
        };
        eyre::ensure!(
            matches!(err, TicketServiceError::ProjectNotFound(id) if id == missing),
            "unexpected error {err:?}"
        );
        eyre::ensure!(err.kind() == ErrorKind::NotFound, "unexpected kind");
        Ok(())
    })
}
