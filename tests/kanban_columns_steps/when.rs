//! When steps for Kanban column BDD scenarios.

use super::world::{ADMIN, ColumnsWorld, parse_layout, run_async};
use rstest_bdd_macros::when;
use taskflow::project::domain::CallerIdentity;
use taskflow::workflow::domain::ColumnInput;

#[when("the member loads their columns")]
fn member_loads_columns(world: &mut ColumnsWorld) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let caller = world.caller()?;
    world.columns = run_async(world.board.get_columns(&caller, project_id))
        .map_err(|err| eyre::eyre!("get_columns failed: {err}"))?;
    Ok(())
}

#[when(r#"the member saves the layout "{layout}""#)]
fn member_saves_layout(world: &mut ColumnsWorld, layout: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let caller = world.caller()?;
    let mut incoming = Vec::new();
    for entry in parse_layout(&layout)? {
        let column = world
            .columns
            .iter()
            .find(|column| column.status_name == entry.name)
            .ok_or_else(|| eyre::eyre!("no column named '{}'", entry.name))?;
        incoming.push(ColumnInput::new(
            column.status_id,
            entry.position,
            entry.is_visible,
        ));
    }
    world.columns = run_async(world.board.save_columns(&caller, project_id, incoming))
        .map_err(|err| eyre::eyre!("save_columns failed: {err}"))?;
    Ok(())
}

#[when("the member saves an empty layout")]
fn member_saves_empty_layout(world: &mut ColumnsWorld) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let caller = world.caller()?;
    world.columns = run_async(world.board.save_columns(&caller, project_id, Vec::new()))
        .map_err(|err| eyre::eyre!("save_columns failed: {err}"))?;
    Ok(())
}

#[when(r#"a status named "{name}" is added"#)]
fn status_added(world: &mut ColumnsWorld, name: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    run_async(
        world
            .board
            .create_status(&CallerIdentity::admin(ADMIN), project_id, name),
    )
    .map_err(|err| eyre::eyre!("create_status failed: {err}"))?;
    Ok(())
}

#[when(r#"user "{name}" loads their columns without being a member"#)]
fn outsider_loads_columns(world: &mut ColumnsWorld, name: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let caller = world.register(&name)?.caller();
    world.caller = Some(caller);
    match run_async(world.board.get_columns(&caller, project_id)) {
        Ok(columns) => world.columns = columns,
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}
