//! Given steps for Kanban column BDD scenarios.

use super::world::{ADMIN, ColumnsWorld, run_async};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use taskflow::project::{
    domain::{CallerIdentity, NewProject, ProjectKey, ProjectName},
    ports::ProjectRepository,
};
use taskflow::workflow::domain::WorkflowTemplate;

#[given(r#"a project "{key}" with statuses "{names}""#)]
fn a_project_with_statuses(
    world: &mut ColumnsWorld,
    key: String,
    names: String,
) -> Result<(), eyre::Report> {
    let new_project = NewProject::new(
        ProjectKey::new(key.as_str())?,
        ProjectName::new(format!("{key} board"))?,
        None,
        &DefaultClock,
    )?;
    let project = run_async(
        world
            .projects
            .create(&new_project, &WorkflowTemplate::empty()),
    )
    .wrap_err("create scenario project")?;
    let admin = CallerIdentity::admin(ADMIN);
    for name in names.split(',').map(str::trim) {
        run_async(world.board.create_status(&admin, project.id(), name))
            .wrap_err_with(|| format!("create status '{name}'"))?;
    }
    world.project = Some(project);
    Ok(())
}

#[given(r#"user "{name}" is a member of the project"#)]
fn user_is_member(world: &mut ColumnsWorld, name: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let member = world.register(&name).wrap_err("register scenario member")?;
    run_async(world.projects.add_member(project_id, member.id()))
        .wrap_err("add scenario member")?;
    world.caller = Some(member.caller());
    Ok(())
}

#[given("the member has loaded their columns")]
fn member_has_loaded_columns(world: &mut ColumnsWorld) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let caller = world.caller()?;
    world.columns = run_async(world.board.get_columns(&caller, project_id))
        .wrap_err("load columns before the scenario action")?;
    Ok(())
}
