//! In-memory integration tests for the task lifecycle.

use super::helpers::{Workspace, workspace};
use chrono::Duration;
use rstest::rstest;
use teamtask::{
    TrackerError,
    identity::domain::Role,
    task::{domain::TaskStatus, services::CompletionOutcome},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_walks_task_to_completion(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let member = workspace.register("Grace", Role::Member);
    let team = workspace.team(&admin).await;
    let task = workspace
        .assign(&admin, &team, member.user_id(), Some(Duration::days(2)))
        .await;
    eyre::ensure!(task.status() == TaskStatus::Assigned, "new task should be assigned");

    let started = workspace
        .tracker
        .start_task(task.id(), member.user_id())
        .await?;
    eyre::ensure!(started.status() == TaskStatus::InProgress, "task should be in progress");
    eyre::ensure!(started.started_at().is_some(), "start time should be recorded");

    let outcome = workspace
        .tracker
        .complete_task(task.id(), member.user_id(), None)
        .await?;
    let CompletionOutcome::Completed(completed) = outcome else {
        return Err(eyre::eyre!("on-time completion should not need a reason"));
    };
    eyre::ensure!(completed.status() == TaskStatus::Completed, "task should be completed");
    eyre::ensure!(
        completed.completed_by() == Some(member.user_id()),
        "completer should be the assignee"
    );
    eyre::ensure!(!completed.is_late_submission(), "completion should be on time");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_completion_waits_for_a_reason(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let member = workspace.register("Grace", Role::Member);
    let team = workspace.team(&admin).await;
    let task = workspace
        .assign(&admin, &team, member.user_id(), Some(Duration::hours(-1)))
        .await;
    workspace
        .tracker
        .start_task(task.id(), member.user_id())
        .await?;

    let first = workspace
        .tracker
        .complete_task(task.id(), member.user_id(), None)
        .await?;
    eyre::ensure!(
        first
            == CompletionOutcome::LateReasonRequired {
                due_date: task.due_date().ok_or_else(|| eyre::eyre!("missing due date"))?,
            },
        "late completion without a reason should be held back, got {first:?}"
    );
    let unchanged = workspace.tracker.find_task(task.id()).await?;
    eyre::ensure!(
        unchanged.status() == TaskStatus::InProgress,
        "held-back completion must not change the task"
    );

    let second = workspace
        .tracker
        .complete_task(task.id(), member.user_id(), Some("  traffic ".to_owned()))
        .await?;
    let CompletionOutcome::Completed(completed) = second else {
        return Err(eyre::eyre!("completion with a reason should succeed"));
    };
    eyre::ensure!(
        completed.late_submission_reason().map(|reason| reason.as_str()) == Some("traffic"),
        "reason should be stored trimmed"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_reason_is_rejected(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let member = workspace.register("Grace", Role::Member);
    let team = workspace.team(&admin).await;
    let task = workspace
        .assign(&admin, &team, member.user_id(), Some(Duration::hours(-1)))
        .await;
    workspace
        .tracker
        .start_task(task.id(), member.user_id())
        .await?;

    let result = workspace
        .tracker
        .complete_task(task.id(), member.user_id(), Some("   ".to_owned()))
        .await;
    eyre::ensure!(
        matches!(result, Err(TrackerError::Validation(_))),
        "blank reason should be a validation error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassigning_completed_task_resets_it(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let first = workspace.register("Grace", Role::Member);
    let second = workspace.register("Linus", Role::Member);
    let team = workspace.team(&admin).await;
    let task = workspace.assign(&admin, &team, first.user_id(), None).await;
    workspace
        .tracker
        .start_task(task.id(), first.user_id())
        .await?;
    workspace
        .tracker
        .complete_task(task.id(), first.user_id(), None)
        .await?;

    let reassigned = workspace
        .tracker
        .assign_to_user(task.id(), second.user_id(), admin.user_id())
        .await?;

    eyre::ensure!(reassigned.status() == TaskStatus::Assigned, "status should reset");
    eyre::ensure!(reassigned.assigned_to() == second.user_id(), "assignee should change");
    eyre::ensure!(reassigned.completed_at().is_none(), "completion should be cleared");
    eyre::ensure!(reassigned.started_at().is_none(), "start should be cleared");

    let refused = workspace
        .tracker
        .start_task(task.id(), first.user_id())
        .await;
    eyre::ensure!(
        matches!(refused, Err(TrackerError::Validation(_))),
        "previous assignee should no longer start the task"
    );
    workspace
        .tracker
        .start_task(task.id(), second.user_id())
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_skip_soft_deleted_tasks(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let member = workspace.register("Grace", Role::Member);
    let team = workspace.team(&admin).await;
    let kept = workspace.assign(&admin, &team, member.user_id(), None).await;
    let removed = workspace.assign(&admin, &team, member.user_id(), None).await;

    workspace.tracker.soft_delete(removed.id()).await?;

    let for_team = workspace.tracker.tasks_for_team(team.id()).await?;
    let for_member = workspace
        .tracker
        .tasks_assigned_to(member.user_id())
        .await?;
    let team_ids: Vec<_> = for_team.iter().map(|task| task.id()).collect();
    let member_ids: Vec<_> = for_member.iter().map(|task| task.id()).collect();
    eyre::ensure!(team_ids == vec![kept.id()], "team listing should hold only the live task");
    eyre::ensure!(member_ids == vec![kept.id()], "assignee listing should hold only the live task");

    let lookup = workspace.tracker.find_task(removed.id()).await;
    eyre::ensure!(
        matches!(lookup, Err(TrackerError::NotFound { .. })),
        "soft-deleted task should not be found"
    );
    Ok(())
}
