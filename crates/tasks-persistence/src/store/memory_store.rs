use tasks_core::{TaskError, TaskResult, ValidationError};
use tasks_domain::{Task, TaskId, TaskRepository};

/// Vec-backed repository. Keeps insertion order; updates stay in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryTaskStore {
    tasks: Vec<Task>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store. Rejects duplicate ids.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> TaskResult<Self> {
        let mut store = Self::new();
        for task in tasks {
            store.add_task(task)?;
        }
        Ok(store)
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: TaskId) -> TaskResult<usize> {
        self.tasks
            .iter()
            .position(|t| t.id() == id)
            .ok_or_else(|| TaskError::NotFound(format!("task {}", id)))
    }
}

impl TaskRepository for InMemoryTaskStore {
    fn tasks(&self) -> TaskResult<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn task(&self, id: TaskId) -> TaskResult<Task> {
        let index = self.position(id)?;
        Ok(self.tasks[index].clone())
    }

    fn add_task(&mut self, task: Task) -> TaskResult<()> {
        if self.tasks.iter().any(|t| t.id() == task.id()) {
            return Err(ValidationError::DuplicateId(task.id()).into());
        }
        self.tasks.push(task);
        Ok(())
    }

    fn update_task(&mut self, task: Task) -> TaskResult<()> {
        let index = self.position(task.id())?;
        self.tasks[index] = task;
        Ok(())
    }

    fn delete_task(&mut self, id: TaskId) -> TaskResult<()> {
        let index = self.position(id)?;
        self.tasks.remove(index);
        Ok(())
    }

    fn delete_all_tasks(&mut self) -> TaskResult<()> {
        self.tasks.clear();
        Ok(())
    }
}
