//! When steps for late submission BDD scenarios.

use super::world::{LateSubmissionWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use teamtask::task::services::CompletionOutcome;

#[when(r#""{name}" starts the task"#)]
fn start_task(world: &mut LateSubmissionWorld, name: String) -> Result<(), eyre::Report> {
    let caller = world.user(&name)?;
    let task_id = world.task()?.id();
    let started = run_async(world.tracker.start_task(task_id, caller.user_id()))
        .wrap_err("start task in late submission scenario")?;
    world.task = Some(started);
    Ok(())
}

#[when(r#""{name}" completes the task without a reason"#)]
fn complete_without_reason(
    world: &mut LateSubmissionWorld,
    name: String,
) -> Result<(), eyre::Report> {
    complete(world, &name, None)
}

#[when(r#""{name}" completes the task with reason "{reason}""#)]
fn complete_with_reason(
    world: &mut LateSubmissionWorld,
    name: String,
    reason: String,
) -> Result<(), eyre::Report> {
    complete(world, &name, Some(reason))
}

fn complete(
    world: &mut LateSubmissionWorld,
    name: &str,
    reason: Option<String>,
) -> Result<(), eyre::Report> {
    let caller = world.user(name)?;
    let task_id = world.task()?.id();
    let result = run_async(
        world
            .tracker
            .complete_task(task_id, caller.user_id(), reason),
    );
    if let Ok(CompletionOutcome::Completed(ref task)) = result {
        world.task = Some(task.clone());
    }
    world.last_completion = Some(result);
    Ok(())
}
