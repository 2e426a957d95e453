use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tasks_domain::{SortBy, TaskId, TaskState};

#[derive(Parser)]
#[command(name = "tasks")]
#[command(about = "A small task tracker with a forward-only lifecycle", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the task file (or set TASKS_FILE env var). Without one, the
    /// configured data file is used, else tasks live in memory for this run.
    #[arg(long, short, global = true, value_name = "FILE", env = "TASKS_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new task
    Add(AddArgs),
    /// List tasks, optionally filtered and sorted
    List(ListArgs),
    /// Get a specific task
    Get {
        #[arg(long)]
        id: TaskId,
    },
    /// Update a task's fields
    Update(UpdateArgs),
    /// Move a task to a later state
    Mark {
        #[arg(long)]
        id: TaskId,
        #[arg(long)]
        state: TaskState,
    },
    /// Move a task one step forward
    Advance {
        #[arg(long)]
        id: TaskId,
    },
    /// Delete tasks; unknown ids are skipped
    Delete {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<TaskId>,
    },
    /// Delete every task
    Clear,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "todo")]
    pub state: TaskState,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long)]
    pub state: Option<TaskState>,
    /// Case-insensitive title substring
    #[arg(long)]
    pub title: Option<String>,
    /// Case-insensitive description substring
    #[arg(long)]
    pub description: Option<String>,
    /// id, title or state; defaults to the configured sort
    #[arg(long)]
    pub sort: Option<SortBy>,
    #[arg(long)]
    pub desc: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub id: TaskId,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub state: Option<TaskState>,
}
