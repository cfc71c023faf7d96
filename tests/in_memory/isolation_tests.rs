//! Per-user scoping and session changes.

use super::helpers::{Tracker, texts, tracker};
use daylist::task::{
    domain::{Session, TaskId},
    ports::RemoteStoreError,
    services::TaskStoreError,
};
use eyre::{OptionExt, ensure};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_only_see_their_own_tasks(tracker: Tracker) -> eyre::Result<()> {
    let other = tracker.second_user();
    tracker.engine.initialize().await?;
    other.engine.initialize().await?;

    tracker.engine.add_task("mine").await?;
    other.engine.add_task("theirs").await?;
    tracker.engine.initialize().await?;
    other.engine.initialize().await?;

    assert_eq!(texts(&tracker.engine.tasks()), ["mine"]);
    assert_eq!(texts(&other.engine.tasks()), ["theirs"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn another_users_task_cannot_be_changed(tracker: Tracker) -> eyre::Result<()> {
    let other = tracker.second_user();
    other.engine.initialize().await?;
    let theirs = other
        .engine
        .add_task("theirs")
        .await?
        .ok_or_eyre("task should be created")?;

    let result = tracker.engine.remove_task(theirs.id()).await;

    match result {
        Err(TaskStoreError::Remote(RemoteStoreError::NotFound(id))) => {
            assert_eq!(id, theirs.id());
        }
        other_result => eyre::bail!("expected NotFound, got {other_result:?}"),
    }
    ensure!(
        other.store.peek(other.owner, theirs.id())?.is_some(),
        "task must survive"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn signing_out_blocks_every_operation(tracker: Tracker) -> eyre::Result<()> {
    tracker.engine.initialize().await?;
    let task = tracker
        .engine
        .add_task("before sign-out")
        .await?
        .ok_or_eyre("task should be created")?;
    let requests_before = tracker.store.request_count()?;
    tracker.sessions.sign_out();

    for result in [
        tracker.engine.add_task("after sign-out").await.map(|_| ()),
        tracker.engine.toggle_task(task.id()).await.map(|_| ()),
        tracker.engine.remove_task(TaskId::new()).await.map(|_| ()),
        tracker.engine.initialize().await,
    ] {
        ensure!(
            matches!(result, Err(TaskStoreError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );
    }
    assert_eq!(tracker.store.request_count()?, requests_before);
    let kept = tracker.engine.task(task.id()).ok_or_eyre("task kept")?;
    ensure!(!kept.is_completed(), "rejected toggle should roll back");

    tracker.sessions.sign_in(Session::new(tracker.owner));
    tracker.engine.toggle_task(task.id()).await?;
    ensure!(tracker.engine.last_error().is_none(), "error should clear");
    Ok(())
}
