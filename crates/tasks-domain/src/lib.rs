pub mod commands;
pub mod filter;
pub mod history;
pub mod repository;
pub mod service;
pub mod sort;
pub mod task;
pub mod task_lifecycle;

pub use commands::{
    AddTask, DeleteTask, ReversibleCommand, StateMutator, TaskChange, TransitionState, UpdateTask,
};
pub use filter::{TaskFilter, TaskFilters, TaskPredicate};
pub use history::CommandStack;
pub use repository::TaskRepository;
pub use service::TaskService;
pub use sort::{OrderedSorter, SortBy, SortOrder};
pub use task::{Task, TaskId};
pub use task_lifecycle::TaskState;
