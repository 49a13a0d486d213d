//! Audit projection through the tracker facade.

use super::helpers::{Workspace, workspace};
use chrono::Duration;
use rstest::rstest;
use teamtask::{identity::domain::Role, task::domain::TimelineEvent};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn late_submission_appears_in_timeline(workspace: Workspace) -> Result<(), eyre::Report> {
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
    workspace
        .tracker
        .complete_task(task.id(), member.user_id(), Some("traffic".to_owned()))
        .await?;

    let view = workspace.tracker.get_with_audit_trail(task.id()).await?;

    eyre::ensure!(view.is_late_submission(), "completion was late");
    eyre::ensure!(
        view.assignee().map(|profile| profile.display_name()) == Some("Grace"),
        "assignee profile should resolve"
    );
    eyre::ensure!(
        view.assigner().map(|profile| profile.display_name()) == Some("Ada"),
        "assigner profile should resolve"
    );
    let events: Vec<_> = view.timeline().iter().map(|entry| entry.event()).collect();
    eyre::ensure!(
        events
            == vec![
                TimelineEvent::Created,
                TimelineEvent::Assigned,
                TimelineEvent::Started,
                TimelineEvent::Completed,
            ],
        "unexpected timeline: {events:?}"
    );
    let descriptions: Vec<_> = view
        .timeline()
        .iter()
        .map(|entry| entry.description().to_owned())
        .collect();
    eyre::ensure!(
        descriptions.last().map(String::as_str)
            == Some("Completed by Grace after the due date: traffic"),
        "unexpected completion entry: {descriptions:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn audit_view_serializes_late_flag(workspace: Workspace) -> Result<(), eyre::Report> {
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
    workspace
        .tracker
        .complete_task(task.id(), member.user_id(), Some("traffic".to_owned()))
        .await?;

    let view = workspace.tracker.get_with_audit_trail(task.id()).await?;
    let json = serde_json::to_value(&view)?;

    eyre::ensure!(
        json.get("is_late_submission") == Some(&serde_json::Value::Bool(true)),
        "serialized view should flag the late submission: {json}"
    );
    eyre::ensure!(
        json.get("task")
            .and_then(|task| task.get("late_submission_reason"))
            .and_then(serde_json::Value::as_str)
            == Some("traffic"),
        "serialized task should carry the reason: {json}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unresolved_users_render_by_id(workspace: Workspace) -> Result<(), eyre::Report> {
    let admin = workspace.register("Ada", Role::Admin);
    let team = workspace.team(&admin).await;
    let stranger = teamtask::identity::domain::UserId::new();
    let task = workspace.assign(&admin, &team, stranger, None).await;

    let view = workspace.tracker.get_with_audit_trail(task.id()).await?;

    eyre::ensure!(view.assignee().is_none(), "unknown assignee has no profile");
    let assigned = view
        .timeline()
        .iter()
        .find(|entry| entry.event() == TimelineEvent::Assigned)
        .ok_or_else(|| eyre::eyre!("missing assignment entry"))?;
    eyre::ensure!(
        assigned.description() == format!("Assigned to {stranger} by Ada"),
        "unexpected assignment entry: {}",
        assigned.description()
    );
    Ok(())
}
