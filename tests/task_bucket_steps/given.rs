//! Given steps for task bucket BDD scenarios.

use super::world::{BucketWorld, run_async};
use daylist::task::{adapters::memory::StoreOperation, domain::Session};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a signed-in user at "{timestamp}""#)]
fn signed_in_user(world: &mut BucketWorld, timestamp: String) -> Result<(), eyre::Report> {
    world.set_time(&timestamp)?;
    world.sessions.sign_in(Session::new(world.owner));
    run_async(world.engine.initialize()).wrap_err("load empty collection")?;
    Ok(())
}

#[given(r#"nobody is signed in at "{timestamp}""#)]
fn nobody_signed_in(world: &mut BucketWorld, timestamp: String) -> Result<(), eyre::Report> {
    world.set_time(&timestamp)?;
    world.sessions.sign_out();
    Ok(())
}

#[given(r#"the user has added the task "{text}""#)]
fn task_added(world: &mut BucketWorld, text: String) -> Result<(), eyre::Report> {
    run_async(world.engine.add_task(&text))
        .wrap_err("add task in scenario setup")?
        .ok_or_else(|| eyre::eyre!("task {text:?} was not created"))?;
    Ok(())
}

#[given(r#"the user has toggled "{text}" at "{timestamp}""#)]
fn task_toggled(
    world: &mut BucketWorld,
    text: String,
    timestamp: String,
) -> Result<(), eyre::Report> {
    world.set_time(&timestamp)?;
    let task = world.task_named(&text)?;
    run_async(world.engine.toggle_task(task.id())).wrap_err("toggle task in scenario setup")?;
    Ok(())
}

#[given("the store will fail the next completion update")]
fn store_fails_next_update(world: &mut BucketWorld) -> Result<(), eyre::Report> {
    world
        .store
        .fail_next(StoreOperation::UpdateCompletion, "connection reset")
        .wrap_err("queue store failure")?;
    Ok(())
}
