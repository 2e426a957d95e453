use std::path::Path;
use tasks_core::{AppConfig, TaskResult};
use tasks_domain::{
    OrderedSorter, SortBy, SortOrder, Task, TaskFilters, TaskId, TaskRepository, TaskService,
    TaskState,
};
use tasks_persistence::{InMemoryTaskStore, JsonFileTaskStore};

/// Backing store picked at startup.
pub enum CliStore {
    Memory(InMemoryTaskStore),
    File(JsonFileTaskStore),
}

impl TaskRepository for CliStore {
    fn tasks(&self) -> TaskResult<Vec<Task>> {
        match self {
            Self::Memory(store) => store.tasks(),
            Self::File(store) => store.tasks(),
        }
    }

    fn task(&self, id: TaskId) -> TaskResult<Task> {
        match self {
            Self::Memory(store) => store.task(id),
            Self::File(store) => store.task(id),
        }
    }

    fn add_task(&mut self, task: Task) -> TaskResult<()> {
        match self {
            Self::Memory(store) => store.add_task(task),
            Self::File(store) => store.add_task(task),
        }
    }

    fn update_task(&mut self, task: Task) -> TaskResult<()> {
        match self {
            Self::Memory(store) => store.update_task(task),
            Self::File(store) => store.update_task(task),
        }
    }

    fn delete_task(&mut self, id: TaskId) -> TaskResult<()> {
        match self {
            Self::Memory(store) => store.delete_task(id),
            Self::File(store) => store.delete_task(id),
        }
    }

    fn delete_all_tasks(&mut self) -> TaskResult<()> {
        match self {
            Self::Memory(store) => store.delete_all_tasks(),
            Self::File(store) => store.delete_all_tasks(),
        }
    }
}

pub struct CliContext {
    service: TaskService<CliStore>,
    default_sort: SortBy,
}

impl CliContext {
    pub fn load(file_path: Option<&Path>, config: &AppConfig) -> anyhow::Result<Self> {
        let store = match file_path.or(config.data_file.as_deref()) {
            Some(path) => CliStore::File(JsonFileTaskStore::open(path)?),
            None => {
                tracing::debug!("No task file configured, using an in-memory store");
                CliStore::Memory(InMemoryTaskStore::new())
            }
        };

        let default_sort = config
            .effective_default_sort()
            .parse::<SortBy>()
            .unwrap_or_else(|e| {
                tracing::warn!("Ignoring configured sort: {}", e);
                SortBy::default()
            });

        let mut service = TaskService::from_config(store, config);
        service.reload()?;

        Ok(Self {
            service,
            default_sort,
        })
    }

    pub fn add_task(
        &mut self,
        title: &str,
        description: &str,
        state: TaskState,
    ) -> TaskResult<Task> {
        self.service.create_task(title, description, state)
    }

    pub fn list_tasks(
        &mut self,
        filters: &TaskFilters,
        sort: Option<SortBy>,
        descending: bool,
    ) -> Vec<Task> {
        let order = if descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        self.service.set_filter(filters.to_predicate());
        self.service
            .set_sort(OrderedSorter::new(sort.unwrap_or(self.default_sort), order));
        self.service.filtered_tasks().as_ref().clone()
    }

    pub fn get_task(&self, id: TaskId) -> TaskResult<Task> {
        self.service.task(id)
    }

    /// Fields left as `None` keep their current value.
    pub fn update_task(
        &mut self,
        id: TaskId,
        title: Option<String>,
        description: Option<String>,
        state: Option<TaskState>,
    ) -> TaskResult<Task> {
        let current = self.service.task(id)?;
        let title = title.unwrap_or_else(|| current.title().to_string());
        let description = description.unwrap_or_else(|| current.description().to_string());
        let state = state.unwrap_or(current.state());
        self.service.update_task(id, &title, &description, state)
    }

    pub fn mark_task(&mut self, id: TaskId, state: TaskState) -> TaskResult<Task> {
        self.service.transition_state(id, state)
    }

    pub fn advance_task(&mut self, id: TaskId) -> TaskResult<Task> {
        self.service.advance_state(id)
    }

    pub fn delete_tasks(&mut self, ids: &[TaskId]) -> TaskResult<usize> {
        self.service.delete_tasks(ids.iter().copied())
    }

    pub fn clear(&mut self) -> TaskResult<()> {
        self.service.delete_all()
    }
}
