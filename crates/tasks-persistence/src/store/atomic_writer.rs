use std::fs;
use std::io::Write;
use std::path::Path;
use tasks_core::{TaskError, TaskResult};

/// Atomic file writer that prevents data corruption.
/// Uses the write-to-temp-file then rename pattern.
pub struct AtomicWriter;

impl AtomicWriter {
    /// Write data to a file atomically.
    ///
    /// The temp file lives in the target's directory so the rename stays on
    /// one filesystem. Missing parent directories are created.
    pub fn write_atomic(path: &Path, data: &[u8]) -> TaskResult<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(data)?;
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(path)
            .map_err(|e| TaskError::Io(e.error))?;

        tracing::debug!(
            "Atomically wrote {} bytes to {}",
            data.len(),
            path.display()
        );
        Ok(())
    }

    pub fn read_all(path: &Path) -> TaskResult<Vec<u8>> {
        let data = fs::read(path)?;
        tracing::debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(data)
    }
}
