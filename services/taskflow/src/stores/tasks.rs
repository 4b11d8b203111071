//! services/taskflow/src/stores/tasks.rs
//!
//! The per-user task collection: loading, saving, and every mutation the task
//! list and kanban board perform.

use crate::adapters::records::TaskRecord;
use crate::error::TaskError;
use crate::stores::{json, keys};
use chrono::Utc;
use std::sync::Arc;
use taskflow_core::domain::{NewTask, Task, TaskPatch, TaskStatus};
use taskflow_core::ports::{KeyValueStore, PortResult};
use taskflow_core::tasks::{validate_task, validate_title};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct TaskStore {
    store: Arc<dyn KeyValueStore>,
}

impl TaskStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The user's tasks in stored order. Never fails: an absent or unreadable
    /// collection is logged and read as empty.
    pub fn load_tasks(&self, user_id: &str) -> Vec<Task> {
        self.read_tasks(user_id).unwrap_or_else(|e| {
            warn!(user_id, error = %e, "could not load tasks");
            Vec::new()
        })
    }

    /// Overwrites the user's collection. Failures are logged and returned.
    pub fn save_tasks(&self, user_id: &str, tasks: &[Task]) -> PortResult<()> {
        let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from_domain).collect();
        json::write(self.store.as_ref(), &keys::tasks(user_id), &records)?;
        debug!(user_id, count = records.len(), "tasks saved");
        Ok(())
    }

    /// Validates, creates and prepends a pending task.
    pub fn add_task(&self, user_id: &str, input: NewTask) -> Result<Task, TaskError> {
        let report = validate_task(&input);
        if !report.valid {
            return Err(TaskError::Validation(report));
        }
        let mut tasks = self.read_tasks(user_id)?;
        let task = Task::new(input, Utc::now());
        tasks.insert(0, task.clone());
        self.save_tasks(user_id, &tasks)?;
        Ok(task)
    }

    pub fn update_task(
        &self,
        user_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<Task, TaskError> {
        if let Some(title) = &patch.title {
            let report = validate_title(title);
            if !report.valid {
                return Err(TaskError::Validation(report));
            }
        }
        self.modify(user_id, task_id, |task| task.apply(patch, Utc::now()))
    }

    /// Moves a task to another workflow state (a kanban drop).
    pub fn move_task(
        &self,
        user_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<Task, TaskError> {
        self.modify(user_id, task_id, |task| task.transition(status, Utc::now()))
    }

    /// Completed becomes pending; anything else becomes completed.
    pub fn toggle_complete(&self, user_id: &str, task_id: &str) -> Result<Task, TaskError> {
        self.modify(user_id, task_id, |task| {
            let next = if task.is_completed() {
                TaskStatus::Pending
            } else {
                TaskStatus::Completed
            };
            task.transition(next, Utc::now());
        })
    }

    /// Removes a task for good and returns it.
    pub fn delete_task(&self, user_id: &str, task_id: &str) -> Result<Task, TaskError> {
        let mut tasks = self.read_tasks(user_id)?;
        let index = tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
        let removed = tasks.remove(index);
        self.save_tasks(user_id, &tasks)?;
        Ok(removed)
    }

    /// Strict read used by mutations; storage and decode errors propagate.
    fn read_tasks(&self, user_id: &str) -> PortResult<Vec<Task>> {
        let records: Option<Vec<TaskRecord>> =
            json::read(self.store.as_ref(), &keys::tasks(user_id))?;
        Ok(records
            .unwrap_or_default()
            .into_iter()
            .map(TaskRecord::to_domain)
            .collect())
    }

    fn modify(
        &self,
        user_id: &str,
        task_id: &str,
        change: impl FnOnce(&mut Task),
    ) -> Result<Task, TaskError> {
        let mut tasks = self.read_tasks(user_id)?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
        change(task);
        let updated = task.clone();
        self.save_tasks(user_id, &tasks)?;
        Ok(updated)
    }
}
