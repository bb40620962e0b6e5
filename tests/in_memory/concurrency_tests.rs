//! Key allocation under concurrent ticket creation.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::helpers::{Tracker, tracker};
use rstest::rstest;
use taskflow::project::domain::UserId;
use taskflow::ticket::services::CreateTicketRequest;

const REPORTER: UserId = UserId::new(1);
const TICKETS: u64 = 12;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creations_receive_distinct_sequential_keys(
    tracker: Tracker,
) -> Result<(), eyre::Report> {
    let project = tracker.project_with_members("RACE", &[]).await?;
    let shared = Arc::new(tracker);

    let mut handles = Vec::new();
    for index in 0..TICKETS {
        let worker = Arc::clone(&shared);
        let project_id = project.id();
        handles.push(tokio::spawn(async move {
            worker
                .tickets
                .create_ticket(CreateTicketRequest::new(
                    project_id,
                    REPORTER,
                    format!("Ticket {index}"),
                ))
                .await
        }));
    }

    let mut sequences = BTreeSet::new();
    for handle in handles {
        let ticket = handle.await??;
        sequences.insert(ticket.sequence());
    }

    let expected: BTreeSet<u64> = (1..=TICKETS).collect();
    eyre::ensure!(sequences == expected, "unexpected sequences {sequences:?}");
    Ok(())
}
