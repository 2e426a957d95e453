use crate::store::atomic_writer::AtomicWriter;
use crate::store::memory_store::InMemoryTaskStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tasks_core::{TaskError, TaskResult};
use tasks_domain::{Task, TaskId, TaskRepository};

pub const FORMAT_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMetadata {
    pub format_version: u32,
    pub saved_at: DateTime<Utc>,
}

impl StoreMetadata {
    pub fn now() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            saved_at: Utc::now(),
        }
    }
}

/// On-disk layout of a task file.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: StoreMetadata,
    pub tasks: Vec<Task>,
}

/// JSON file-backed repository.
///
/// The whole collection is held in memory and rewritten atomically after
/// every mutation. A mutation whose write fails leaves both the file and the
/// in-memory view untouched.
#[derive(Debug, Clone)]
pub struct JsonFileTaskStore {
    path: PathBuf,
    inner: InMemoryTaskStore,
    metadata: Option<StoreMetadata>,
}

impl JsonFileTaskStore {
    /// Open the file at `path`, or start empty when it does not exist yet.
    /// Nothing is written until the first mutation.
    pub fn open(path: impl AsRef<Path>) -> TaskResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            tracing::debug!("No task file at {}, starting empty", path.display());
            return Ok(Self {
                path,
                inner: InMemoryTaskStore::new(),
                metadata: None,
            });
        }

        let bytes = AtomicWriter::read_all(&path)?;
        let (tasks, metadata) = decode(&bytes, &path)?;
        let inner = InMemoryTaskStore::with_tasks(tasks)?;

        tracing::info!(
            "Loaded {} tasks ({} bytes) from {}",
            inner.len(),
            bytes.len(),
            path.display()
        );

        Ok(Self {
            path,
            inner,
            metadata,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata of the last load or save; `None` before the file exists or
    /// when it was read from the legacy layout.
    pub fn metadata(&self) -> Option<&StoreMetadata> {
        self.metadata.as_ref()
    }

    fn save(&self, tasks: &[Task]) -> TaskResult<StoreMetadata> {
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: StoreMetadata::now(),
            tasks: tasks.to_vec(),
        };
        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| TaskError::Serialization(e.to_string()))?;

        AtomicWriter::write_atomic(&self.path, &json_bytes)?;

        tracing::info!(
            "Saved {} bytes to {}",
            json_bytes.len(),
            self.path.display()
        );
        Ok(envelope.metadata)
    }

    /// Apply `mutation` to a copy, persist the copy, then adopt it.
    fn commit<F>(&mut self, mutation: F) -> TaskResult<()>
    where
        F: FnOnce(&mut InMemoryTaskStore) -> TaskResult<()>,
    {
        let mut next = self.inner.clone();
        mutation(&mut next)?;
        let metadata = self.save(next.as_slice())?;
        self.inner = next;
        self.metadata = Some(metadata);
        Ok(())
    }
}

/// Accepts the current envelope and the legacy bare array of tasks.
fn decode(bytes: &[u8], path: &Path) -> TaskResult<(Vec<Task>, Option<StoreMetadata>)> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| TaskError::Serialization(e.to_string()))?;

    if value.is_array() {
        tracing::info!(
            "Detected legacy task list at {}; it will be rewritten on the next save",
            path.display()
        );
        let tasks: Vec<Task> =
            serde_json::from_value(value).map_err(|e| TaskError::Serialization(e.to_string()))?;
        return Ok((tasks, None));
    }

    let envelope: JsonEnvelope =
        serde_json::from_value(value).map_err(|e| TaskError::Serialization(e.to_string()))?;
    if envelope.version != FORMAT_VERSION {
        return Err(TaskError::Serialization(format!(
            "Unsupported format version: {}",
            envelope.version
        )));
    }
    Ok((envelope.tasks, Some(envelope.metadata)))
}

impl TaskRepository for JsonFileTaskStore {
    fn tasks(&self) -> TaskResult<Vec<Task>> {
        self.inner.tasks()
    }

    fn task(&self, id: TaskId) -> TaskResult<Task> {
        self.inner.task(id)
    }

    fn add_task(&mut self, task: Task) -> TaskResult<()> {
        self.commit(|store| store.add_task(task))
    }

    fn update_task(&mut self, task: Task) -> TaskResult<()> {
        self.commit(|store| store.update_task(task))
    }

    fn delete_task(&mut self, id: TaskId) -> TaskResult<()> {
        self.commit(|store| store.delete_task(id))
    }

    fn delete_all_tasks(&mut self) -> TaskResult<()> {
        self.commit(|store| store.delete_all_tasks())
    }
}
