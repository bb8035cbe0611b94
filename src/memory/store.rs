//! Append-only memory file.

use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Name of the memory file under the sandbox root.
pub const MEMORY_FILE_NAME: &str = "AGENTS.md";

/// Timestamp format used in entry headings.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that can occur reading or appending memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryError {
    /// The memory file involved.
    pub path: PathBuf,
    /// The underlying error reason.
    pub reason: String,
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "memory file '{}' is not accessible: {}; check permissions on the repository root",
            self.path.display(),
            self.reason
        )
    }
}

impl std::error::Error for MemoryError {}

/// The persistent memory file of one working tree.
///
/// Appends are serialized through an internal lock, so concurrent
/// `save_memory` calls from one turn never interleave. Share the store by
/// `Arc` to share the lock.
#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MemoryStore {
    /// Creates a store for `{root}/AGENTS.md`. Nothing is touched on disk.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join(MEMORY_FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the memory file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `content` under a heading with the current local time.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError` if the file cannot be opened or written.
    pub async fn append(&self, content: &str) -> Result<(), MemoryError> {
        self.append_at(content, Local::now()).await
    }

    /// Appends `content` under a heading with the given time.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError` if the file cannot be opened or written.
    pub async fn append_at(&self, content: &str, at: DateTime<Local>) -> Result<(), MemoryError> {
        let entry = format_entry(content, at);
        let _guard = self.write_lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.error(e))?;
        file.write_all(entry.as_bytes())
            .await
            .map_err(|e| self.error(e))?;
        file.flush().await.map_err(|e| self.error(e))?;

        tracing::debug!(path = %self.path.display(), bytes = content.len(), "memory appended");
        Ok(())
    }

    /// Reads the whole file. A missing or blank file yields `None`.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError` for read failures other than absence.
    pub async fn load(&self) -> Result<Option<String>, MemoryError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                Ok((!text.trim().is_empty()).then_some(text))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.error(e)),
        }
    }

    fn error(&self, e: std::io::Error) -> MemoryError {
        MemoryError {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}

/// Formats one memory entry.
#[must_use]
pub fn format_entry(content: &str, at: DateTime<Local>) -> String {
    format!("\n## {}\n\n{content}\n", at.format(TIMESTAMP_FORMAT))
}
