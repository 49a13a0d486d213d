//! Hard deletion and ownership cascades against `PostgreSQL`.

use super::helpers::{PostgresWorkspace, postgres_workspace};
use rstest::rstest;
use teamtask::{
    TrackerError,
    identity::domain::Role,
    task::{ports::TaskRepository, services::CreateTaskRequest},
    tracker::DeletionMode,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hard_delete_removes_task_and_ownership(
    postgres_workspace: Result<PostgresWorkspace, eyre::Report>,
) -> Result<(), eyre::Report> {
    let workspace = postgres_workspace?;
    let admin = workspace.register("Ada", Role::Admin)?;
    let team = workspace.team(&admin).await?;
    let task = workspace
        .tracker
        .create_task(CreateTaskRequest::new("Archive logs", team.id()), &admin)
        .await?;

    workspace
        .tracker
        .delete_task(task.id(), &admin, DeletionMode::Hard)
        .await?;

    eyre::ensure!(
        workspace.tasks.find_by_id(task.id()).await?.is_none(),
        "task row should be gone"
    );
    eyre::ensure!(
        workspace.tasks.find_ownership(task.id()).await?.is_none(),
        "ownership record should be gone"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn soft_delete_keeps_row_for_audit(
    postgres_workspace: Result<PostgresWorkspace, eyre::Report>,
) -> Result<(), eyre::Report> {
    let workspace = postgres_workspace?;
    let admin = workspace.register("Ada", Role::Admin)?;
    let team = workspace.team(&admin).await?;
    let task = workspace
        .tracker
        .create_task(CreateTaskRequest::new("Archive logs", team.id()), &admin)
        .await?;

    workspace
        .tracker
        .delete_task(task.id(), &admin, DeletionMode::Soft)
        .await?;

    let lookup = workspace.tracker.find_task(task.id()).await;
    eyre::ensure!(
        matches!(lookup, Err(TrackerError::NotFound { .. })),
        "soft-deleted task should be hidden"
    );
    let view = workspace.tracker.get_with_audit_trail(task.id()).await?;
    eyre::ensure!(view.task().is_deleted(), "audit view should show the deleted row");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_deletion_cascades_to_tasks(
    postgres_workspace: Result<PostgresWorkspace, eyre::Report>,
) -> Result<(), eyre::Report> {
    let workspace = postgres_workspace?;
    let admin = workspace.register("Ada", Role::Admin)?;
    let team = workspace.team(&admin).await?;
    let live = workspace
        .tracker
        .create_task(CreateTaskRequest::new("Archive logs", team.id()), &admin)
        .await?;
    let retired = workspace
        .tracker
        .create_task(CreateTaskRequest::new("Prune images", team.id()), &admin)
        .await?;
    workspace
        .tracker
        .delete_task(retired.id(), &admin, DeletionMode::Soft)
        .await?;

    workspace.tracker.delete_team(team.id(), &admin).await?;

    for id in [live.id(), retired.id()] {
        eyre::ensure!(
            workspace.tasks.find_by_id(id).await?.is_none(),
            "team deletion should remove task {id}"
        );
        eyre::ensure!(
            workspace.tasks.find_ownership(id).await?.is_none(),
            "team deletion should remove the ownership of task {id}"
        );
    }
    Ok(())
}
