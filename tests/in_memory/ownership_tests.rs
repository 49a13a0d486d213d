//! Ownership-based delete authorization through the tracker facade.

use super::helpers::{Workspace, workspace};
use rstest::rstest;
use teamtask::{
    TrackerError,
    authorization::Operation,
    identity::domain::{Caller, Role},
    task::ports::TaskRepository,
    tracker::DeletionMode,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn demoted_creator_loses_task_deletion(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let team = workspace.team(&admin).await;
    let task = workspace.assign(&admin, &team, admin.user_id(), None).await;

    eyre::ensure!(
        workspace.tracker.can_delete_task(task.id(), &admin).await?,
        "admin creator may delete"
    );
    let demoted = Caller::member(admin.user_id());
    eyre::ensure!(
        !workspace.tracker.can_delete_task(task.id(), &demoted).await?,
        "demoted creator may not delete"
    );
    let result = workspace
        .tracker
        .delete_task(task.id(), &demoted, DeletionMode::Hard)
        .await;
    eyre::ensure!(
        matches!(
            result,
            Err(TrackerError::Authorization(Operation::DeleteTask))
        ),
        "denied deletion should surface as authorization error, got {result:?}"
    );
    workspace.tracker.find_task(task.id()).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn promoted_member_cannot_delete_earlier_task(
    workspace: Workspace,
) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let member = workspace.register("Grace", Role::Member);
    let team = workspace.team(&admin).await;
    let task = workspace
        .assign(&member, &team, member.user_id(), None)
        .await;

    let promoted = Caller::admin(member.user_id());
    eyre::ensure!(
        !workspace.tracker.can_delete_task(task.id(), &promoted).await?,
        "task created as a member stays undeletable after promotion"
    );
    eyre::ensure!(
        !workspace.tracker.can_delete_task(task.id(), &admin).await?,
        "another admin did not create the task"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_creator_keeps_team_deletion(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let other = workspace.register("Linus", Role::Admin);
    let team = workspace.team(&admin).await;

    eyre::ensure!(
        workspace
            .tracker
            .can_delete_team(team.id(), admin.user_id())
            .await?,
        "creator may delete the team regardless of role"
    );
    let refused = workspace.tracker.delete_team(team.id(), &other).await;
    eyre::ensure!(
        matches!(
            refused,
            Err(TrackerError::Authorization(Operation::DeleteTeam))
        ),
        "non-creator should be denied, got {refused:?}"
    );

    workspace
        .tracker
        .delete_team(team.id(), &Caller::member(admin.user_id()))
        .await?;
    let lookup = workspace.tracker.find_team(team.id()).await;
    eyre::ensure!(
        matches!(lookup, Err(TrackerError::NotFound { .. })),
        "deleted team should be gone"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn soft_and_hard_deletion_differ(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let team = workspace.team(&admin).await;
    let soft = workspace.assign(&admin, &team, admin.user_id(), None).await;
    let hard = workspace.assign(&admin, &team, admin.user_id(), None).await;

    workspace
        .tracker
        .delete_task(soft.id(), &admin, DeletionMode::Soft)
        .await?;
    workspace
        .tracker
        .delete_task(hard.id(), &admin, DeletionMode::Hard)
        .await?;

    let soft_view = workspace.tracker.get_with_audit_trail(soft.id()).await?;
    eyre::ensure!(soft_view.task().is_deleted(), "soft-deleted row should remain");
    let hard_view = workspace.tracker.get_with_audit_trail(hard.id()).await;
    eyre::ensure!(
        matches!(hard_view, Err(TrackerError::NotFound { .. })),
        "hard-deleted row should be gone"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_deletion_removes_its_tasks(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let team = workspace.team(&admin).await;
    let other_team = workspace.team(&admin).await;
    let live = workspace.assign(&admin, &team, admin.user_id(), None).await;
    let retired = workspace.assign(&admin, &team, admin.user_id(), None).await;
    let survivor = workspace
        .assign(&admin, &other_team, admin.user_id(), None)
        .await;
    workspace
        .tracker
        .delete_task(retired.id(), &admin, DeletionMode::Soft)
        .await?;

    workspace.tracker.delete_team(team.id(), &admin).await?;

    for id in [live.id(), retired.id()] {
        let view = workspace.tracker.get_with_audit_trail(id).await;
        eyre::ensure!(
            matches!(view, Err(TrackerError::NotFound { .. })),
            "task {id} of the deleted team should be gone, got {view:?}"
        );
        eyre::ensure!(
            workspace.tasks.find_ownership(id).await?.is_none(),
            "ownership of task {id} should be gone"
        );
    }
    workspace.tracker.find_task(survivor.id()).await?;
    Ok(())
}
