//! Sandboxed path resolution.
//!
//! Provides `Sandbox`, the boundary between model-issued relative paths and
//! the real filesystem. Reads are confined to the sandbox root; writes are
//! additionally confined to a separately configured write root.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Files larger than this are skipped by content search.
pub const DEFAULT_MAX_TEXT_FILE_BYTES: u64 = 2_000_000;

/// Extensions treated as binary regardless of content.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "pyc", "pyo", "so", "dylib", "dll", "exe", "bin", "dat", "db", "sqlite", "jpg", "jpeg", "png",
    "gif", "bmp", "ico", "pdf", "zip", "tar", "gz", "bz2", "xz", "7z", "rar",
];

/// Error returned when a path fails a sandbox check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SandboxError {
    /// The path resolves outside the sandbox root.
    Traversal {
        /// The path as supplied by the caller.
        requested: String,
    },
    /// The path is readable but lies outside the write root.
    WriteOutsideRoot {
        /// Fully resolved target.
        attempted: PathBuf,
        /// The write root it had to fall under.
        allowed: PathBuf,
    },
    /// A root directory could not be resolved or created.
    Io {
        /// The path involved.
        path: PathBuf,
        /// The underlying error reason.
        reason: String,
    },
}

impl fmt::Display for SandboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Traversal { requested } => write!(f, "Path traversal detected: {requested}"),
            Self::WriteOutsideRoot { attempted, allowed } => write!(
                f,
                "Write blocked: path outside workspace\n  Attempted: {}\n  Allowed: {}\n  (Set AGENT_WRITE_ROOT env var to change)",
                attempted.display(),
                allowed.display()
            ),
            Self::Io { path, reason } => write!(
                f,
                "cannot resolve '{}': {reason}; verify the directory exists and is accessible",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SandboxError {}

/// Read and write containment for one working tree.
///
/// # Example
///
/// ```rust,ignore
/// use coding_agent::tools::security::Sandbox;
///
/// let sandbox = Sandbox::new("/home/user/project", "/home/user/project/workspace")?;
/// let path = sandbox.resolve("src/main.rs")?;
/// assert!(sandbox.resolve("../../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sandbox {
    /// Canonical read root.
    root: PathBuf,
    /// Write root; may not exist until the first write.
    write_root: PathBuf,
}

impl Sandbox {
    /// Creates a sandbox over an existing `root`.
    ///
    /// A relative `write_root` is taken relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns `SandboxError::Io` if `root` cannot be canonicalized.
    pub fn new(root: impl AsRef<Path>, write_root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        let root = root.as_ref();
        let root = root.canonicalize().map_err(|e| SandboxError::Io {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        let write_root = if write_root.as_ref().is_absolute() {
            write_root.as_ref().to_path_buf()
        } else {
            root.join(write_root)
        };
        Ok(Self { root, write_root })
    }

    /// Returns the canonical read root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configured write root.
    #[must_use]
    pub fn write_root(&self) -> &Path {
        &self.write_root
    }

    /// Resolves `relative` against the root, following `..` and symlinks.
    ///
    /// # Errors
    ///
    /// Returns `SandboxError::Traversal` if the result leaves the root.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, SandboxError> {
        let resolved = resolve_lenient(&self.root.join(relative));
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(SandboxError::Traversal {
                requested: relative.to_string(),
            })
        }
    }

    /// Verifies that `path` lies under the write root, creating the root on
    /// first use. Returns the resolved path.
    ///
    /// # Errors
    ///
    /// Returns `SandboxError::WriteOutsideRoot` for paths outside the write
    /// root, or `SandboxError::Io` if the write root cannot be created.
    pub fn check_writable(&self, path: &Path) -> Result<PathBuf, SandboxError> {
        if !self.write_root.exists() {
            std::fs::create_dir_all(&self.write_root).map_err(|e| SandboxError::Io {
                path: self.write_root.clone(),
                reason: e.to_string(),
            })?;
        }
        let allowed = self
            .write_root
            .canonicalize()
            .map_err(|e| SandboxError::Io {
                path: self.write_root.clone(),
                reason: e.to_string(),
            })?;

        let attempted = resolve_lenient(path);
        if attempted.starts_with(&allowed) {
            Ok(attempted)
        } else {
            Err(SandboxError::WriteOutsideRoot { attempted, allowed })
        }
    }

    /// Renders `path` relative to the root for display to the model.
    #[must_use]
    pub fn relative_display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }
}

/// Symlink expansions allowed in one resolution before giving up.
const MAX_SYMLINK_HOPS: usize = 40;

/// Resolves `path` without requiring it to exist.
///
/// Every symlink along the way is expanded, including links whose target
/// does not exist yet. Components past the last existing one are applied
/// lexically. Too many expansions yield an empty path, which no root
/// contains.
fn resolve_lenient(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    let mut pending: Vec<PathBuf> = path
        .components()
        .rev()
        .map(|component| PathBuf::from(component.as_os_str()))
        .collect();
    let mut hops = 0;

    while let Some(next) = pending.pop() {
        let Some(component) = next.components().next() else {
            continue;
        };
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                let is_link = std::fs::symlink_metadata(&resolved)
                    .is_ok_and(|metadata| metadata.file_type().is_symlink());
                if !is_link {
                    continue;
                }
                hops += 1;
                if hops > MAX_SYMLINK_HOPS {
                    return PathBuf::new();
                }
                let Ok(target) = std::fs::read_link(&resolved) else {
                    return PathBuf::new();
                };
                resolved.pop();
                pending.extend(
                    target
                        .components()
                        .rev()
                        .map(|component| PathBuf::from(component.as_os_str())),
                );
            }
        }
    }
    resolved
}

/// Returns true if `path` is a regular file no larger than `max_size` bytes
/// whose extension is not on the binary denylist.
#[must_use]
pub fn is_eligible_text_file(path: &Path, max_size: u64) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() || metadata.len() > max_size {
        return false;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => !BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sandbox(dir: &TempDir) -> Sandbox {
        Sandbox::new(dir.path(), "workspace").unwrap()
    }

    #[test]
    fn new_fails_for_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = Sandbox::new(dir.path().join("absent"), "workspace");
        assert!(matches!(result, Err(SandboxError::Io { .. })));
    }

    #[test]
    fn relative_write_root_is_under_root() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        assert_eq!(
            sandbox.write_root(),
            dir.path().canonicalize().unwrap().join("workspace")
        );
    }

    #[test]
    fn resolve_succeeds_within_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/app.py"), "x = 1").unwrap();

        let resolved = sandbox(&dir).resolve("src/app.py").unwrap();
        assert_eq!(resolved, dir.path().canonicalize().unwrap().join("src/app.py"));
    }

    #[test]
    fn resolve_allows_paths_that_do_not_exist_yet() {
        let dir = TempDir::new().unwrap();
        let resolved = sandbox(&dir).resolve("new/dir/file.txt").unwrap();
        assert!(resolved.ends_with("new/dir/file.txt"));
    }

    #[test]
    fn resolve_catches_path_traversal() {
        let dir = TempDir::new().unwrap();
        let error = sandbox(&dir).resolve("../../etc/passwd").unwrap_err();
        assert_eq!(error.to_string(), "Path traversal detected: ../../etc/passwd");
    }

    #[test]
    fn resolve_catches_traversal_through_missing_directories() {
        let dir = TempDir::new().unwrap();
        let result = sandbox(&dir).resolve("ghost/../../outside.txt");
        assert!(matches!(result, Err(SandboxError::Traversal { .. })));
    }

    #[test]
    fn resolve_permits_inner_parent_segments() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        let resolved = sandbox(&dir).resolve("a/../b.txt").unwrap();
        assert_eq!(resolved, dir.path().canonicalize().unwrap().join("b.txt"));
    }

    #[test]
    fn resolve_rejects_absolute_paths_outside_root() {
        let dir = TempDir::new().unwrap();
        assert!(sandbox(&dir).resolve("/etc/passwd").is_err());
    }

    #[test]
    fn resolve_rejects_sibling_with_shared_prefix() {
        let parent = TempDir::new().unwrap();
        let root = parent.path().join("repo");
        let sibling = parent.path().join("repo-secrets");
        fs::create_dir(&root).unwrap();
        fs::create_dir(&sibling).unwrap();

        let sandbox = Sandbox::new(&root, "workspace").unwrap();
        assert!(sandbox.resolve("../repo-secrets/key").is_err());
    }

    #[test]
    fn check_writable_creates_write_root() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        let target = sandbox.resolve("workspace/notes.md").unwrap();

        assert!(sandbox.check_writable(&target).is_ok());
        assert!(dir.path().join("workspace").is_dir());
    }

    #[test]
    fn check_writable_blocks_readable_paths_outside_write_root() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        let target = sandbox.resolve("src/app.py").unwrap();

        let error = sandbox.check_writable(&target).unwrap_err();
        let message = error.to_string();
        assert!(message.starts_with("Write blocked: path outside workspace"));
        assert!(message.contains("AGENT_WRITE_ROOT"));
    }

    #[test]
    fn relative_display_strips_root() {
        let dir = TempDir::new().unwrap();
        let sandbox = sandbox(&dir);
        let path = sandbox.root().join("src").join("x.py");
        assert_eq!(sandbox.relative_display(&path), "src/x.py");
    }

    #[test]
    fn text_file_eligibility() {
        let dir = TempDir::new().unwrap();
        let text = dir.path().join("notes.txt");
        let image = dir.path().join("logo.PNG");
        fs::write(&text, "hello").unwrap();
        fs::write(&image, "not really a png").unwrap();

        assert!(is_eligible_text_file(&text, DEFAULT_MAX_TEXT_FILE_BYTES));
        assert!(!is_eligible_text_file(&image, DEFAULT_MAX_TEXT_FILE_BYTES));
        assert!(!is_eligible_text_file(dir.path(), DEFAULT_MAX_TEXT_FILE_BYTES));
        assert!(!is_eligible_text_file(&text, 2));
        assert!(!is_eligible_text_file(&dir.path().join("missing"), 10));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_follows_symlinks_within_root() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.txt");
        fs::write(&real, "content").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("link.txt")).unwrap();

        let resolved = sandbox(&dir).resolve("link.txt").unwrap();
        assert_eq!(resolved, real.canonicalize().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_blocks_symlink_escaping_root() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("escape")).unwrap();

        let result = sandbox(&root).resolve("escape/secret.txt");
        assert!(matches!(result, Err(SandboxError::Traversal { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_followed_to_its_target() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::create_dir(root.path().join("workspace")).unwrap();
        let target = outside.path().join("pwned.txt");
        std::os::unix::fs::symlink(&target, root.path().join("workspace/link.txt")).unwrap();

        let sandbox = sandbox(&root);
        let result = sandbox.resolve("workspace/link.txt");
        assert!(matches!(result, Err(SandboxError::Traversal { .. })));

        let forged = sandbox.root().join("workspace/link.txt");
        assert!(matches!(
            sandbox.check_writable(&forged),
            Err(SandboxError::WriteOutsideRoot { .. })
        ));
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_within_write_root_resolves_to_target() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("workspace")).unwrap();
        std::os::unix::fs::symlink("fresh.txt", dir.path().join("workspace/alias.txt")).unwrap();

        let sandbox = sandbox(&dir);
        let resolved = sandbox.resolve("workspace/alias.txt").unwrap();
        assert_eq!(resolved, sandbox.root().join("workspace/fresh.txt"));
        assert_eq!(sandbox.check_writable(&resolved).unwrap(), resolved);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink("b", dir.path().join("a")).unwrap();
        std::os::unix::fs::symlink("a", dir.path().join("b")).unwrap();

        let result = sandbox(&dir).resolve("a/file.txt");
        assert!(matches!(result, Err(SandboxError::Traversal { .. })));
    }
}
