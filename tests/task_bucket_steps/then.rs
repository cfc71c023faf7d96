//! Then steps for task bucket BDD scenarios.

use super::world::{BucketWorld, bucket_labelled};
use rstest_bdd_macros::then;

#[then(r#"the "{label}" bucket lists "{text}""#)]
fn bucket_lists(world: &BucketWorld, label: String, text: String) -> Result<(), eyre::Report> {
    let buckets = world.buckets();
    let listed: Vec<&str> = buckets
        .bucket(bucket_labelled(&label)?)
        .iter()
        .map(|task| task.text().as_str())
        .collect();
    eyre::ensure!(
        listed == [text.as_str()],
        "expected {label:?} to list only {text:?}, found {listed:?}"
    );
    Ok(())
}

#[then(r#"the "{label}" bucket is empty"#)]
fn bucket_is_empty(world: &BucketWorld, label: String) -> Result<(), eyre::Report> {
    let buckets = world.buckets();
    let tasks = buckets.bucket(bucket_labelled(&label)?);
    eyre::ensure!(tasks.is_empty(), "expected {label:?} to be empty, found {tasks:?}");
    Ok(())
}

#[then("every bucket is empty")]
fn every_bucket_is_empty(world: &BucketWorld) -> Result<(), eyre::Report> {
    let buckets = world.buckets();
    eyre::ensure!(buckets.is_empty(), "expected no bucketed tasks, found {buckets:?}");
    Ok(())
}

#[then("{count:usize} task is outside every bucket")]
fn tasks_outside_buckets(world: &BucketWorld, count: usize) -> Result<(), eyre::Report> {
    let unbucketed = world.buckets().unbucketed;
    eyre::ensure!(
        unbucketed == count,
        "expected {count} unbucketed tasks, found {unbucketed}"
    );
    Ok(())
}

#[then(r#"the operation fails with "{message}""#)]
fn operation_fails_with(world: &BucketWorld, message: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no operation was attempted"))?;
    let Err(err) = result else {
        return Err(eyre::eyre!("expected the operation to fail"));
    };
    eyre::ensure!(
        err.to_string() == message,
        "expected error {message:?}, got {err}"
    );
    let recorded = world.engine.last_error().map(|recorded| recorded.to_string());
    eyre::ensure!(
        recorded.as_deref() == Some(message.as_str()),
        "engine should record the error, found {recorded:?}"
    );
    Ok(())
}
