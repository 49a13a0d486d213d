//! Racing conditional transitions against the in-memory adapter.

use std::sync::Arc;

use super::helpers::{Workspace, workspace};
use rstest::rstest;
use teamtask::{TrackerError, identity::domain::Role, task::domain::TaskStatus};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exactly_one_concurrent_start_wins(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let member = workspace.register("Grace", Role::Member);
    let team = workspace.team(&admin).await;
    let task = workspace.assign(&admin, &team, member.user_id(), None).await;
    let tracker = Arc::new(workspace.tracker);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let racer = Arc::clone(&tracker);
            let task_id = task.id();
            let caller = member.user_id();
            tokio::spawn(async move { racer.start_task(task_id, caller).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => winners += 1,
            Err(TrackerError::Validation(_)) => {}
            Err(other) => return Err(eyre::eyre!("unexpected failure: {other}")),
        }
    }
    eyre::ensure!(winners == 1, "expected one winning start, got {winners}");

    let stored = tracker.find_task(task.id()).await?;
    eyre::ensure!(stored.status() == TaskStatus::InProgress, "task should be in progress");
    Ok(())
}
