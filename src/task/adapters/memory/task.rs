//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::domain::UserId;
use crate::task::{
    domain::{ConditionalTransition, OwnedTask, Reassignment, Task, TaskId, TaskOwnership},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::team::domain::TeamId;

/// Thread-safe in-memory task repository.
///
/// A single write lock covers each check-and-mutate, which gives conditional
/// transitions the same at-most-one-winner guarantee as a conditional
/// `UPDATE`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    ownerships: HashMap<TaskId, TaskOwnership>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a task without an ownership record, mirroring rows that
    /// predate the ownership ledger.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task already
    /// exists.
    pub fn store_legacy(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Rejects entries that collide with stored tasks or with each other.
fn check_insertable<'a>(
    state: &InMemoryTaskState,
    entries: impl IntoIterator<Item = &'a OwnedTask>,
) -> TaskRepositoryResult<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        let id = entry.task().id();
        if state.tasks.contains_key(&id) || !seen.insert(id) {
            return Err(TaskRepositoryError::DuplicateTask(id));
        }
    }
    Ok(())
}

fn insert(state: &mut InMemoryTaskState, entry: &OwnedTask) {
    let task = entry.task();
    state.tasks.insert(task.id(), task.clone());
    state.ownerships.insert(task.id(), *entry.ownership());
}

/// Collects live tasks matching `predicate`, newest first.
fn live_tasks(state: &InMemoryTaskState, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
    let mut tasks: Vec<Task> = state
        .tasks
        .values()
        .filter(|task| !task.is_deleted() && predicate(task))
        .cloned()
        .collect();
    tasks.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
    tasks
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store_with_ownership(&self, entry: &OwnedTask) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        check_insertable(&state, [entry])?;
        insert(&mut state, entry);
        Ok(())
    }

    async fn store_batch(&self, entries: &[OwnedTask]) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        check_insertable(&state, entries)?;
        for entry in entries {
            insert(&mut state, entry);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_ownership(&self, id: TaskId) -> TaskRepositoryResult<Option<TaskOwnership>> {
        let state = self.read()?;
        Ok(state.ownerships.get(&id).copied())
    }

    async fn find_by_team(&self, team_id: TeamId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(live_tasks(&state, |task| task.team_id() == team_id))
    }

    async fn find_by_assignee(&self, user_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(live_tasks(&state, |task| task.assigned_to() == user_id))
    }

    async fn apply_transition(
        &self,
        transition: &ConditionalTransition,
    ) -> TaskRepositoryResult<Option<Task>> {
        let mut state = self.write()?;
        let Some(task) = state.tasks.get_mut(&transition.task_id()) else {
            return Ok(None);
        };
        if !transition.matches(task) {
            return Ok(None);
        }
        task.apply_change(transition.change())
            .map_err(TaskRepositoryError::persistence)?;
        Ok(Some(task.clone()))
    }

    async fn reassign(
        &self,
        id: TaskId,
        reassignment: &Reassignment,
    ) -> TaskRepositoryResult<Option<Task>> {
        let mut state = self.write()?;
        let Some(task) = state.tasks.get_mut(&id).filter(|task| !task.is_deleted()) else {
            return Ok(None);
        };
        task.reassign(reassignment);
        Ok(Some(task.clone()))
    }

    async fn soft_delete(&self, id: TaskId, at: DateTime<Utc>) -> TaskRepositoryResult<bool> {
        let mut state = self.write()?;
        let Some(task) = state.tasks.get_mut(&id).filter(|task| !task.is_deleted()) else {
            return Ok(false);
        };
        task.mark_deleted(at);
        Ok(true)
    }

    async fn hard_delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.write()?;
        state.ownerships.remove(&id);
        Ok(state.tasks.remove(&id).is_some())
    }

    async fn hard_delete_by_team(&self, team_id: TeamId) -> TaskRepositoryResult<usize> {
        let mut state = self.write()?;
        let doomed: Vec<TaskId> = state
            .tasks
            .values()
            .filter(|task| task.team_id() == team_id)
            .map(Task::id)
            .collect();
        for id in &doomed {
            state.tasks.remove(id);
            state.ownerships.remove(id);
        }
        Ok(doomed.len())
    }
}
