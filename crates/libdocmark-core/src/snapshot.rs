//! JSON snapshot of the comment registry, for hosts that keep state between runs.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::debug;

use crate::error::DocmarkError;
use crate::registry::CommentRegistry;

/// Default snapshot location, relative to the project root
pub const DEFAULT_SNAPSHOT_PATH: &str = ".docmark/comments.json";

/// Load a snapshot. A missing file is the empty registry.
pub fn load_snapshot(path: &Path) -> Result<CommentRegistry, DocmarkError> {
    if !path.exists() {
        debug!(path = %path.display(), "no snapshot, starting empty");
        return Ok(CommentRegistry::new());
    }
    let content = std::fs::read_to_string(path)?;
    let registry: CommentRegistry = serde_json::from_str(&content)?;
    debug!(path = %path.display(), files = registry.file_count(), "loaded snapshot");
    Ok(registry)
}

/// Save a snapshot, replacing the file atomically
pub fn save_snapshot(path: &Path, registry: &CommentRegistry) -> Result<(), DocmarkError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut content = serde_json::to_string_pretty(registry)?;
    content.push('\n');

    let tmp_path = sibling(path, ".tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    debug!(path = %path.display(), files = registry.file_count(), "saved snapshot");
    Ok(())
}

/// `<path><suffix>`, e.g. `comments.json.lock`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Path of the lock file guarding a snapshot
pub fn lock_path(snapshot_path: &Path) -> PathBuf {
    sibling(snapshot_path, ".lock")
}

/// Exclusive lock over a snapshot file, released on drop.
///
/// Lock file is `<snapshot>.lock` next to the snapshot.
pub struct SnapshotLock {
    _lock_file: File,
    path: PathBuf,
}

impl SnapshotLock {
    /// Acquire the lock, retrying with exponential backoff until `timeout`.
    ///
    /// Returns `DocmarkError::DbBusy` if the timeout expires first.
    pub fn acquire(snapshot_path: &Path, timeout: Duration) -> Result<Self, DocmarkError> {
        if let Some(parent) = snapshot_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let lock_path = lock_path(snapshot_path);
        let lock_file = File::create(&lock_path)?;

        let start = Instant::now();
        let mut delay = Duration::from_millis(10);

        loop {
            match lock_file.try_lock_exclusive() {
                Ok(()) => break,
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(delay);
                    delay = (delay * 2).min(Duration::from_millis(200));
                }
                Err(e) => {
                    return Err(DocmarkError::DbBusy(format!(
                        "Timeout waiting for snapshot lock {}: {}",
                        lock_path.display(),
                        e
                    )))
                }
            }
        }

        Ok(Self {
            _lock_file: lock_file,
            path: snapshot_path.to_path_buf(),
        })
    }

    /// Path of the snapshot this lock guards
    pub fn snapshot_path(&self) -> &Path {
        &self.path
    }
}

/// Load, mutate and save a snapshot while holding its lock
pub fn with_snapshot<T, F>(path: &Path, timeout: Duration, f: F) -> Result<T, DocmarkError>
where
    F: FnOnce(&mut CommentRegistry) -> T,
{
    let lock = SnapshotLock::acquire(path, timeout)?;
    let mut registry = load_snapshot(lock.snapshot_path())?;
    let out = f(&mut registry);
    save_snapshot(lock.snapshot_path(), &registry)?;
    Ok(out)
}
