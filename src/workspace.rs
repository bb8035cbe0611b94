//! Repository preparation for the CLI.
//!
//! The agent can run directly on a working tree or on a disposable copy of
//! it, so a demo session always starts from the same files.

use crate::error::AgentError;
use crate::types::SessionId;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Prefix of ephemeral copy directories under the system temp dir.
pub const EPHEMERAL_PREFIX: &str = "agent-demo-";

/// What to do when the repository path does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRepository {
    /// Create an empty directory and continue
    Create,
    /// Fail
    Reject,
}

/// Ensures `repo` exists as a directory.
///
/// # Errors
///
/// Returns a workspace error if the path is missing under
/// [`MissingRepository::Reject`], is not a directory, or cannot be created.
pub fn prepare_repository(repo: &Path, missing: MissingRepository) -> Result<(), AgentError> {
    if repo.exists() {
        if !repo.is_dir() {
            return Err(AgentError::workspace(repo, "not a directory"));
        }
        return Ok(());
    }

    match missing {
        MissingRepository::Reject => Err(AgentError::workspace(repo, "repository path does not exist")),
        MissingRepository::Create => {
            tracing::warn!(path = %repo.display(), "repository path does not exist, creating it");
            fs::create_dir_all(repo).map_err(|e| AgentError::workspace(repo, e.to_string()))
        }
    }
}

/// Returns where the ephemeral copy for `session` lives.
#[must_use]
pub fn ephemeral_path(session: &SessionId) -> PathBuf {
    std::env::temp_dir().join(format!("{EPHEMERAL_PREFIX}{session}"))
}

/// Copies `repo` to a fresh directory for `session` and returns its path.
///
/// # Errors
///
/// Returns a workspace error if the destination already exists or any entry
/// cannot be copied.
pub fn ephemeral_copy(repo: &Path, session: &SessionId) -> Result<PathBuf, AgentError> {
    copy_tree(repo, &ephemeral_path(session))
}

/// Copies the tree at `src` into `dest`, which must not exist yet.
///
/// Symlinks are not followed; regular files and directories are copied.
///
/// # Errors
///
/// Returns a workspace error naming the entry that failed.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<PathBuf, AgentError> {
    if dest.exists() {
        return Err(AgentError::workspace(dest, "destination already exists"));
    }

    let mut files = 0usize;
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|e| AgentError::workspace(src, e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| AgentError::workspace(entry.path(), e.to_string()))?;
        let target = dest.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| AgentError::workspace(&target, e.to_string()))?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)
                .map_err(|e| AgentError::workspace(entry.path(), e.to_string()))?;
            files += 1;
        }
    }

    tracing::debug!(src = %src.display(), dest = %dest.display(), files, "copied repository");
    Ok(dest.to_path_buf())
}
