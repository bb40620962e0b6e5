//! Column preferences against `PostgreSQL`.

use super::helpers::{TrackerDb, test_runtime};
use diesel::prelude::*;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskflow::persistence::postgres::schema::kanban_column_preferences;
use taskflow::workflow::domain::{
    ColumnInput, ColumnPreference, NewColumnPreference, WorkflowTemplate,
};
use taskflow::workflow::ports::{WorkflowRepository, WorkflowRepositoryError};

const LOADERS: usize = 8;

fn layout(columns: &[ColumnPreference]) -> Vec<(i64, i32, bool)> {
    columns
        .iter()
        .map(|column| (column.status_id().value(), column.position(), column.is_visible()))
        .collect()
}

#[rstest]
fn concurrent_first_loads_create_each_column_once(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "col_race", 8)?;
    rt.block_on(async {
        let owner = db.user("Owner").await?;
        let project = db.project("RACE", &WorkflowTemplate::standard()).await?;
        let (project_id, user_id) = (project.id(), owner.id());

        let mut handles = Vec::with_capacity(LOADERS);
        for _ in 0..LOADERS {
            let columns = db.columns();
            handles.push(tokio::spawn(async move {
                columns.get_or_create_columns(project_id, user_id).await
            }));
        }
        let mut layouts = Vec::with_capacity(LOADERS);
        for handle in handles {
            layouts.push(layout(&handle.await??));
        }

        let first = layouts
            .first()
            .ok_or_else(|| eyre::eyre!("expected loader results"))?;
        eyre::ensure!(first.len() == 4, "expected four columns, got {first:?}");
        eyre::ensure!(
            layouts.iter().all(|other| other == first),
            "every loader should see the same layout: {layouts:?}"
        );
        let stored = db
            .query(move |connection| {
                kanban_column_preferences::table
                    .filter(kanban_column_preferences::project_id.eq(project_id.value()))
                    .filter(kanban_column_preferences::user_id.eq(user_id.value()))
                    .count()
                    .get_result::<i64>(connection)
            })
            .await?;
        eyre::ensure!(stored == 4, "expected one row per status, found {stored}");
        Ok(())
    })
}

#[rstest]
fn saved_layout_survives_reload(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "col_save", 2)?;
    rt.block_on(async {
        let owner = db.user("Owner").await?;
        let project = db.project("SAVE", &WorkflowTemplate::standard()).await?;
        let service = db.columns();
        let initial = service.get_or_create_columns(project.id(), owner.id()).await?;
        let ids: Vec<_> = initial.iter().map(ColumnPreference::status_id).collect();
        let [todo, doing, review, done] = ids.as_slice() else {
            eyre::bail!("expected four columns, got {ids:?}");
        };

        service
            .save_columns(
                project.id(),
                owner.id(),
                vec![
                    ColumnInput::new(*done, 0, true),
                    ColumnInput::new(*todo, 1, true),
                    ColumnInput::new(*doing, 2, false),
                ],
            )
            .await?;
        let reloaded = service.get_or_create_columns(project.id(), owner.id()).await?;

        let expected = vec![
            (done.value(), 0, true),
            (todo.value(), 1, true),
            (doing.value(), 2, false),
            (review.value(), 3, false),
        ];
        eyre::ensure!(
            layout(&reloaded) == expected,
            "unexpected layout {:?}",
            layout(&reloaded)
        );
        Ok(())
    })
}

#[rstest]
fn interrupted_save_keeps_the_previous_layout(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let rt = test_runtime()?;
    let db = TrackerDb::create(shared_test_cluster, "col_abort", 2)?;
    rt.block_on(async {
        let owner = db.user("Owner").await?;
        let project = db.project("ABORT", &WorkflowTemplate::standard()).await?;
        let service = db.columns();
        let before = service.get_or_create_columns(project.id(), owner.id()).await?;
        let duplicate = before
            .first()
            .map(|column| NewColumnPreference {
                project_id: column.project_id(),
                user_id: column.user_id(),
                status_id: column.status_id(),
                position: 9,
                is_visible: true,
            })
            .ok_or_else(|| eyre::eyre!("expected seeded columns"))?;
        let stored = before.clone();

        // Hide every column, then collide with the owner/status index.
        let result = db
            .workflow
            .transaction(move |tx| -> Result<(), WorkflowRepositoryError> {
                for mut column in stored {
                    column.set_layout(column.position(), false);
                    tx.update_column_preference(&column)?;
                }
                tx.insert_column_preferences(&[duplicate])?;
                Ok(())
            })
            .await;

        eyre::ensure!(
            matches!(result, Err(WorkflowRepositoryError::DuplicateColumnPreference(_))),
            "unexpected result {result:?}"
        );
        let after = service.get_or_create_columns(project.id(), owner.id()).await?;
        eyre::ensure!(
            layout(&after) == layout(&before),
            "the aborted save must not hide any column: {:?}",
            layout(&after)
        );
        Ok(())
    })
}
