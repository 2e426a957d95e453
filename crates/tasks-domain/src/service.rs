//! Task application service.
//!
//! Wires reversible commands, the undo/redo history and a persistence port
//! together, and publishes every successful mutation through observables.
//! Each change is written to the repository before anything is published,
//! so listeners always see what was actually persisted.

use std::rc::Rc;

use crate::commands::{
    AddTask, DeleteTask, ReversibleCommand, TaskChange, TransitionState, UpdateTask,
};
use crate::filter::TaskPredicate;
use crate::history::CommandStack;
use crate::sort::OrderedSorter;
use crate::{Task, TaskId, TaskRepository, TaskState};
use tasks_core::{AppConfig, Observable, TaskError, TaskResult};

pub struct TaskService<R> {
    repository: R,
    commands: CommandStack,
    tasks: Observable<Vec<Task>>,
    filtered_tasks: Observable<Vec<Task>>,
    can_undo: Observable<bool>,
    can_redo: Observable<bool>,
    filter: Option<TaskPredicate>,
    sorter: Option<OrderedSorter>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_history(repository, CommandStack::new())
    }

    pub fn with_history(repository: R, commands: CommandStack) -> Self {
        Self {
            repository,
            commands,
            tasks: Observable::default(),
            filtered_tasks: Observable::default(),
            can_undo: Observable::new(false),
            can_redo: Observable::new(false),
            filter: None,
            sorter: None,
        }
    }

    /// Build a service honouring the configured history limit.
    pub fn from_config(repository: R, config: &AppConfig) -> Self {
        let commands = match config.history_limit {
            Some(limit) => CommandStack::with_limit(limit),
            None => CommandStack::new(),
        };
        Self::with_history(repository, commands)
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    /// All tasks, sorted by the active sorter. Emits on every mutation.
    pub fn tasks_property(&self) -> &Observable<Vec<Task>> {
        &self.tasks
    }

    /// Tasks matching the active filter, sorted. Emits on every mutation and
    /// on filter or sort changes.
    pub fn filtered_tasks_property(&self) -> &Observable<Vec<Task>> {
        &self.filtered_tasks
    }

    pub fn can_undo_property(&self) -> &Observable<bool> {
        &self.can_undo
    }

    pub fn can_redo_property(&self) -> &Observable<bool> {
        &self.can_redo
    }

    /// Re-read the repository and publish the result.
    pub fn reload(&mut self) -> TaskResult<()> {
        let tasks = self.repository.tasks()?;
        tracing::debug!("Reloaded {} tasks", tasks.len());
        self.publish(tasks);
        Ok(())
    }

    /// Snapshot from the last reload.
    pub fn tasks(&self) -> Rc<Vec<Task>> {
        self.tasks.value()
    }

    pub fn filtered_tasks(&self) -> Rc<Vec<Task>> {
        self.filtered_tasks.value()
    }

    pub fn task(&self, id: TaskId) -> TaskResult<Task> {
        self.repository.task(id)
    }

    /// One past the highest id in the last snapshot. Fails once the id
    /// space is used up.
    pub fn next_id(&self) -> TaskResult<TaskId> {
        match self.tasks.value().iter().map(Task::id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                TaskError::IllegalState(format!("no task id left after {}", max))
            }),
        }
    }

    pub fn add_task(&mut self, task: Task) -> TaskResult<Task> {
        tracing::info!("Creating task: {} (id: {})", task.title(), task.id());
        self.perform(AddTask::new(task.clone()))?;
        Ok(task)
    }

    /// Create a task with the next free id.
    pub fn create_task(
        &mut self,
        title: &str,
        description: &str,
        state: TaskState,
    ) -> TaskResult<Task> {
        let task = Task::new(self.next_id()?, title, description, state)?;
        self.add_task(task)
    }

    pub fn update_task(
        &mut self,
        id: TaskId,
        title: &str,
        description: &str,
        state: TaskState,
    ) -> TaskResult<Task> {
        let before = self.repository.task(id)?;
        let after = Task::new(id, title, description, state)?;
        self.perform(UpdateTask::new(before, after.clone()))?;
        tracing::info!("Updated task {}", id);
        Ok(after)
    }

    pub fn delete_task(&mut self, id: TaskId) -> TaskResult<()> {
        let snapshot = self.repository.task(id)?;
        self.perform(DeleteTask::new(snapshot))?;
        tracing::info!("Deleted task {}", id);
        Ok(())
    }

    /// Delete each id as its own undoable step. Unknown ids are skipped.
    /// Returns how many tasks were deleted.
    ///
    /// Stops at the first failure. Deletions made before it stay persisted
    /// and are published before the error is returned.
    pub fn delete_tasks(&mut self, ids: impl IntoIterator<Item = TaskId>) -> TaskResult<usize> {
        let mut deleted = 0;
        let mut failure = None;
        for id in ids {
            let result = match self.repository.task(id) {
                Ok(snapshot) => self.record(DeleteTask::new(snapshot)).map(|_| ()),
                Err(TaskError::NotFound(_)) => {
                    tracing::warn!("Skipping delete of missing task {}", id);
                    continue;
                }
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                tracing::warn!("Stopped deleting at task {}: {}", id, e);
                failure = Some(e);
                break;
            }
            deleted += 1;
        }

        if deleted > 0 {
            let published = self.publish_persisted();
            if failure.is_none() {
                published?;
            }
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(deleted),
        }
    }

    /// Remove every task. Not undoable; clears the history.
    pub fn delete_all(&mut self) -> TaskResult<()> {
        self.repository.delete_all_tasks()?;
        self.commands.clear();
        tracing::info!("Deleted all tasks");
        self.publish_persisted()
    }

    /// Move a task to `target`. Staying in the same state records nothing.
    pub fn transition_state(&mut self, id: TaskId, target: TaskState) -> TaskResult<Task> {
        let before = self.repository.task(id)?;
        if before.state() == target {
            return Ok(before);
        }
        let change = self.perform(TransitionState::new(before, target))?;
        tracing::info!("Moved task {} to {}", id, target);
        changed_task(change)
    }

    /// Move a task one step forward. A completed task is returned as is.
    pub fn advance_state(&mut self, id: TaskId) -> TaskResult<Task> {
        let before = self.repository.task(id)?;
        match before.state().next() {
            Some(next) => self.transition_state(id, next),
            None => Ok(before),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    pub fn undo(&mut self) -> TaskResult<()> {
        let repository = &mut self.repository;
        self.commands
            .undo_with(|change| change.apply_to(repository))?;
        self.publish_persisted()
    }

    pub fn redo(&mut self) -> TaskResult<()> {
        let repository = &mut self.repository;
        self.commands
            .redo_with(|change| change.apply_to(repository))?;
        self.publish_persisted()
    }

    pub fn set_filter(&mut self, predicate: TaskPredicate) {
        self.filter = Some(predicate);
        self.publish_filtered();
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.publish_filtered();
    }

    pub fn set_sort(&mut self, sorter: OrderedSorter) {
        self.sorter = Some(sorter);
        let tasks = self.tasks.value();
        self.publish(tasks.as_ref().clone());
    }

    pub fn clear_sort(&mut self) {
        self.sorter = None;
        self.reload_or_keep();
    }

    fn perform<C>(&mut self, command: C) -> TaskResult<TaskChange>
    where
        C: ReversibleCommand + 'static,
    {
        let change = self.record(command)?;
        self.publish_persisted()?;
        Ok(change)
    }

    /// Publish after a write that already reached the repository.
    ///
    /// The history flags always follow the stack, even when the repository
    /// cannot be read back.
    fn publish_persisted(&mut self) -> TaskResult<()> {
        let reloaded = self.reload();
        if let Err(e) = &reloaded {
            tracing::warn!("Failed to reload tasks after a write: {}", e);
            self.publish_history();
        }
        reloaded
    }

    /// Execute, persist and push `command` without publishing.
    fn record<C>(&mut self, command: C) -> TaskResult<TaskChange>
    where
        C: ReversibleCommand + 'static,
    {
        let repository = &mut self.repository;
        self.commands
            .perform_with(command, |change| change.apply_to(repository))
    }

    /// Return to storage order. Keeps the current snapshot unsorted when the
    /// repository cannot be read.
    fn reload_or_keep(&mut self) {
        if let Err(e) = self.reload() {
            tracing::warn!("Failed to reload tasks after clearing sort: {}", e);
            self.publish_filtered();
        }
    }

    fn publish(&mut self, mut tasks: Vec<Task>) {
        if let Some(sorter) = &self.sorter {
            sorter.sort_by(&mut tasks);
        }
        self.tasks.set_value(tasks);
        self.publish_filtered();
        self.publish_history();
    }

    fn publish_history(&self) {
        self.can_undo.set_value(self.commands.can_undo());
        self.can_redo.set_value(self.commands.can_redo());
    }

    fn publish_filtered(&self) {
        let tasks = self.tasks.value();
        let filtered = match &self.filter {
            Some(predicate) => predicate.apply(&tasks),
            None => tasks.as_ref().clone(),
        };
        self.filtered_tasks.set_value(filtered);
    }
}

fn changed_task(change: TaskChange) -> TaskResult<Task> {
    match change {
        TaskChange::Insert(task) | TaskChange::Update(task) => Ok(task),
        TaskChange::Remove(id) => Err(TaskError::IllegalState(format!(
            "expected task {} to be written, but it was removed",
            id
        ))),
    }
}
