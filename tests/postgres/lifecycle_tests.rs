//! Conditional transitions against `PostgreSQL`.

use std::sync::Arc;

use super::helpers::{PostgresWorkspace, postgres_workspace};
use chrono::{Duration, Utc};
use rstest::rstest;
use teamtask::{
    TrackerError,
    identity::domain::Role,
    task::{
        domain::{ConditionalTransition, StatusChange, TaskStatus},
        ports::TaskRepository,
        services::{CompletionOutcome, CreateTaskRequest},
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn late_completion_round_trips_reason(
    postgres_workspace: Result<PostgresWorkspace, eyre::Report>,
) -> Result<(), eyre::Report> {
    let workspace = postgres_workspace?;
    let admin = workspace.register("Ada", Role::Admin)?;
    let member = workspace.register("Grace", Role::Member)?;
    let team = workspace.team(&admin).await?;
    let task = workspace
        .tracker
        .create_task(
            CreateTaskRequest::new("Rotate credentials", team.id())
                .with_assignee(member.user_id())
                .with_due_date(Utc::now() - Duration::hours(1)),
            &admin,
        )
        .await?;

    workspace
        .tracker
        .start_task(task.id(), member.user_id())
        .await?;
    let held = workspace
        .tracker
        .complete_task(task.id(), member.user_id(), None)
        .await?;
    eyre::ensure!(
        matches!(held, CompletionOutcome::LateReasonRequired { .. }),
        "late completion without a reason should be held back"
    );
    workspace
        .tracker
        .complete_task(task.id(), member.user_id(), Some("traffic".to_owned()))
        .await?;

    let view = workspace.tracker.get_with_audit_trail(task.id()).await?;
    eyre::ensure!(view.task().status() == TaskStatus::Completed, "task should be completed");
    eyre::ensure!(view.is_late_submission(), "completion was late");
    eyre::ensure!(
        view.task()
            .late_submission_reason()
            .map(|reason| reason.as_str())
            == Some("traffic"),
        "reason should be persisted"
    );
    eyre::ensure!(
        view.assignee().map(|profile| profile.display_name()) == Some("Grace"),
        "assignee profile should resolve from the users table"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_one_concurrent_start_updates_the_row(
    postgres_workspace: Result<PostgresWorkspace, eyre::Report>,
) -> Result<(), eyre::Report> {
    let workspace = postgres_workspace?;
    let admin = workspace.register("Ada", Role::Admin)?;
    let member = workspace.register("Grace", Role::Member)?;
    let team = workspace.team(&admin).await?;
    let task = workspace
        .tracker
        .create_task(
            CreateTaskRequest::new("Rotate credentials", team.id()).with_assignee(member.user_id()),
            &admin,
        )
        .await?;
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
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wrong_caller_leaves_row_untouched(
    postgres_workspace: Result<PostgresWorkspace, eyre::Report>,
) -> Result<(), eyre::Report> {
    let workspace = postgres_workspace?;
    let admin = workspace.register("Ada", Role::Admin)?;
    let member = workspace.register("Grace", Role::Member)?;
    let team = workspace.team(&admin).await?;
    let task = workspace
        .tracker
        .create_task(
            CreateTaskRequest::new("Rotate credentials", team.id()).with_assignee(member.user_id()),
            &admin,
        )
        .await?;

    let refused = workspace.tracker.start_task(task.id(), admin.user_id()).await;
    eyre::ensure!(
        matches!(refused, Err(TrackerError::Validation(_))),
        "non-assignee start should be refused, got {refused:?}"
    );
    let stored = workspace.tracker.find_task(task.id()).await?;
    eyre::ensure!(
        stored.status() == TaskStatus::Assigned && stored.started_at().is_none(),
        "refused start must not modify the row"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unexplained_overdue_completion_updates_no_row(
    postgres_workspace: Result<PostgresWorkspace, eyre::Report>,
) -> Result<(), eyre::Report> {
    let workspace = postgres_workspace?;
    let admin = workspace.register("Ada", Role::Admin)?;
    let member = workspace.register("Grace", Role::Member)?;
    let team = workspace.team(&admin).await?;
    let task = workspace
        .tracker
        .create_task(
            CreateTaskRequest::new("Rotate credentials", team.id())
                .with_assignee(member.user_id())
                .with_due_date(Utc::now() - Duration::hours(1)),
            &admin,
        )
        .await?;
    workspace
        .tracker
        .start_task(task.id(), member.user_id())
        .await?;

    let unexplained = ConditionalTransition::new(
        task.id(),
        member.user_id(),
        StatusChange::Complete {
            at: Utc::now(),
            by: member.user_id(),
            late_reason: None,
        },
    );
    let applied = workspace.tasks.apply_transition(&unexplained).await?;

    eyre::ensure!(applied.is_none(), "overdue completion without a reason must not match");
    let stored = workspace.tracker.find_task(task.id()).await?;
    eyre::ensure!(
        stored.status() == TaskStatus::InProgress && stored.completed_at().is_none(),
        "row should still be in progress"
    );
    Ok(())
}
