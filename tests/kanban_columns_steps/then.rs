//! Then steps for Kanban column BDD scenarios.

use super::world::{ColumnSpec, ColumnsWorld, parse_layout};
use rstest_bdd_macros::then;
use taskflow::board::BoardError;

#[then(r#"the columns are "{layout}""#)]
fn columns_are(world: &ColumnsWorld, layout: String) -> Result<(), eyre::Report> {
    let expected = parse_layout(&layout)?;
    let actual: Vec<ColumnSpec> = world
        .columns
        .iter()
        .map(|column| ColumnSpec {
            name: column.status_name.clone(),
            position: column.position,
            is_visible: column.is_visible,
        })
        .collect();
    eyre::ensure!(
        actual == expected,
        "expected columns {expected:?}, found {actual:?}"
    );
    Ok(())
}

#[then("the request is denied")]
fn request_is_denied(world: &ColumnsWorld) -> Result<(), eyre::Report> {
    let error = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the request to fail"))?;
    eyre::ensure!(
        matches!(error, BoardError::AccessDenied { .. }),
        "expected access denied, got {error:?}"
    );
    eyre::ensure!(world.columns.is_empty(), "denied caller must not see columns");
    Ok(())
}
