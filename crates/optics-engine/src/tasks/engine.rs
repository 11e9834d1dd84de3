//! Guided exercise sequencing.
//!
//! Tasks unlock in order: a task is locked until its predecessor is completed.
//! At most one task is active; whenever none is, the first unlocked and
//! uncompleted task is set up and activated. Progress lives in the scene
//! (`SceneState::progress`) so checks and UI read a single source of truth.

use serde::Serialize;

use crate::api::types::{SessionEvent, TaskId};
use crate::core::scene::{SceneState, TaskProgress};

/// Lines spoken or shown by the guide character for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuideLines {
    pub instruction: &'static str,
    pub completion: &'static str,
    pub hint: &'static str,
}

/// A static exercise definition.
///
/// `validate` must be pure and cheap: it runs after every scene mutation.
/// `setup` primes the scene fields the exercise relies on.
#[derive(Clone)]
pub struct Task {
    pub id: TaskId,
    pub title: &'static str,
    pub description: &'static str,
    pub instructions: &'static [&'static str],
    pub hint: &'static str,
    pub guide: GuideLines,
    pub validate: fn(&SceneState) -> bool,
    pub setup: fn(&mut SceneState),
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").field("id", &self.id).field("title", &self.title).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Locked,
    Unlocked,
    Active,
    Completed,
}

/// Read-only view of a task for the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub title: &'static str,
    pub description: &'static str,
    pub instructions: &'static [&'static str],
    pub hint: &'static str,
    pub status: TaskStatus,
    pub locked: bool,
    pub completed: bool,
}

/// Ordered list of exercises plus the transitions between them.
#[derive(Debug, Clone)]
pub struct TaskEngine {
    tasks: Vec<Task>,
}

impl TaskEngine {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Task `idx` is locked iff its predecessor is not completed.
    pub fn is_locked(&self, idx: usize, progress: &TaskProgress) -> bool {
        idx > 0
            && self
                .tasks
                .get(idx - 1)
                .is_some_and(|prev| !progress.is_completed(prev.id))
    }

    pub fn status(&self, idx: usize, progress: &TaskProgress) -> TaskStatus {
        let id = self.tasks[idx].id;
        if progress.is_completed(id) {
            TaskStatus::Completed
        } else if progress.active_task_id == Some(id) {
            TaskStatus::Active
        } else if self.is_locked(idx, progress) {
            TaskStatus::Locked
        } else {
            TaskStatus::Unlocked
        }
    }

    /// `locked` follows the predecessor alone, so a task completed ahead of
    /// its predecessor still reports locked.
    pub fn snapshots(&self, progress: &TaskProgress) -> Vec<TaskSnapshot> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| {
                let status = self.status(idx, progress);
                TaskSnapshot {
                    id: task.id,
                    title: task.title,
                    description: task.description,
                    instructions: task.instructions,
                    hint: task.hint,
                    status,
                    locked: self.is_locked(idx, progress),
                    completed: status == TaskStatus::Completed,
                }
            })
            .collect()
    }

    pub fn active_task(&self, progress: &TaskProgress) -> Option<&Task> {
        progress.active_task_id.and_then(|id| self.get(id))
    }

    /// Run the active task's check; complete it if satisfied.
    /// Returns the completed task's ID.
    pub fn evaluate(&self, scene: &mut SceneState, events: &mut Vec<SessionEvent>) -> Option<TaskId> {
        let task = self.active_task(&scene.progress)?;
        if !(task.validate)(scene) {
            return None;
        }
        let id = task.id;
        self.complete(id, false, scene, events).then_some(id)
    }

    /// Mark a task completed without consulting its check when `skipped`.
    /// Returns false for unknown or already completed tasks.
    pub fn complete(
        &self,
        id: &str,
        skipped: bool,
        scene: &mut SceneState,
        events: &mut Vec<SessionEvent>,
    ) -> bool {
        let Some(idx) = self.index_of(id) else {
            log::warn!("complete: unknown task {id}");
            return false;
        };
        let id = self.tasks[idx].id;
        let progress = &mut scene.progress;
        if progress.is_completed(id) {
            return false;
        }

        if progress.active_task_id == Some(id) {
            progress.active_task_id = None;
        }
        progress.completed_tasks.push(id);
        log::info!("task {id} completed{}", if skipped { " (skipped)" } else { "" });
        events.push(SessionEvent::TaskCompleted { id, skipped });

        if let Some(next) = self.tasks.get(idx + 1) {
            if !progress.is_completed(next.id) {
                log::info!("task {} unlocked", next.id);
                events.push(SessionEvent::TaskUnlocked { id: next.id });
            }
        }
        true
    }

    /// Make `id` the active task and run its setup.
    /// Locked, completed and unknown tasks are refused.
    pub fn activate(&self, id: &str, scene: &mut SceneState, events: &mut Vec<SessionEvent>) -> bool {
        let Some(idx) = self.index_of(id) else {
            log::warn!("activate: unknown task {id}");
            return false;
        };
        match self.status(idx, &scene.progress) {
            TaskStatus::Locked => {
                log::warn!("activate: task {id} is locked");
                false
            }
            TaskStatus::Completed => {
                log::warn!("activate: task {id} is already completed");
                false
            }
            TaskStatus::Active => true,
            TaskStatus::Unlocked => {
                let task = &self.tasks[idx];
                (task.setup)(scene);
                scene.task_anchor = scene.object;
                scene.progress.active_task_id = Some(task.id);
                log::info!("task {} activated", task.id);
                events.push(SessionEvent::TaskActivated { id: task.id });
                true
            }
        }
    }

    /// If no task is active, activate the first unlocked, uncompleted one.
    pub fn advance(&self, scene: &mut SceneState, events: &mut Vec<SessionEvent>) -> Option<TaskId> {
        if scene.progress.active_task_id.is_some() {
            return None;
        }
        let next = (0..self.tasks.len())
            .find(|&idx| self.status(idx, &scene.progress) == TaskStatus::Unlocked)
            .map(|idx| self.tasks[idx].id)?;
        self.activate(next, scene, events).then_some(next)
    }
}
