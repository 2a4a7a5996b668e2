use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use walkdir::WalkDir;

use crate::error::{BvolError, Result};

const ARTIFACT_PREFIX: &str = "plot_";
const ARTIFACT_SUFFIX: &str = ".png";
const STAGING_PREFIX: &str = ".staging-";

/// Rendered steric maps keyed by record id.
pub trait ArtifactStore: Send + Sync {
    /// Canonical location of `id`'s artifact, whether or not it exists.
    /// `None` when `id` cannot name an artifact.
    fn path(&self, id: &str) -> Option<PathBuf>;

    fn contains(&self, id: &str) -> bool;

    /// Stores `bytes` so that a reader never observes a partial artifact.
    fn put(&self, id: &str, bytes: &[u8]) -> Result<()>;

    fn read(&self, id: &str) -> Result<Vec<u8>>;

    /// Returns whether an artifact was removed.
    fn delete(&self, id: &str) -> Result<bool>;
}

pub fn artifact_file_name(id: &str) -> String {
    format!("{ARTIFACT_PREFIX}{id}{ARTIFACT_SUFFIX}")
}

// Ids are generated hex tokens; anything else could escape the directory.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    /// Opens (creating if needed) the artifact directory and removes artifacts
    /// and staging files left by a previous process: records do not survive a
    /// restart, so neither may their artifacts.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let store = Self {
            dir: dir.to_path_buf(),
        };
        let purged = store.purge_orphans()?;
        if purged > 0 {
            tracing::info!(dir = %dir.display(), purged, "removed stale artifacts");
        }
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn purge_orphans(&self) -> Result<usize> {
        let mut purged = 0;
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let name = entry.file_name().to_string_lossy();
            let stale = (name.starts_with(ARTIFACT_PREFIX) && name.ends_with(ARTIFACT_SUFFIX))
                || name.starts_with(STAGING_PREFIX);
            if stale {
                fs::remove_file(entry.path())?;
                purged += 1;
            }
        }
        Ok(purged)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn path(&self, id: &str) -> Option<PathBuf> {
        is_valid_id(id).then(|| self.dir.join(artifact_file_name(id)))
    }

    fn contains(&self, id: &str) -> bool {
        self.path(id).is_some_and(|p| p.is_file())
    }

    fn put(&self, id: &str, bytes: &[u8]) -> Result<()> {
        let dest = self
            .path(id)
            .ok_or_else(|| BvolError::ArtifactPersistFailed(format!("invalid id {id:?}")))?;
        let persist_err = |e: std::io::Error| BvolError::ArtifactPersistFailed(e.to_string());

        // Stage next to the destination so the final rename stays on one filesystem.
        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&self.dir)
            .map_err(persist_err)?;
        staged.write_all(bytes).map_err(persist_err)?;
        staged.as_file().sync_all().map_err(persist_err)?;
        staged
            .persist(&dest)
            .map_err(|e| BvolError::ArtifactPersistFailed(e.error.to_string()))?;
        Ok(())
    }

    fn read(&self, id: &str) -> Result<Vec<u8>> {
        let path = self
            .path(id)
            .ok_or_else(|| BvolError::ArtifactNotFound(id.to_string()))?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BvolError::ArtifactNotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let Some(path) = self.path(id) else {
            return Ok(false);
        };
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store, handy for tests and ephemeral runs.
#[derive(Default)]
pub struct MemArtifactStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ArtifactStore for MemArtifactStore {
    fn path(&self, id: &str) -> Option<PathBuf> {
        is_valid_id(id).then(|| PathBuf::from(artifact_file_name(id)))
    }

    fn contains(&self, id: &str) -> bool {
        self.blobs().contains_key(id)
    }

    fn put(&self, id: &str, bytes: &[u8]) -> Result<()> {
        if !is_valid_id(id) {
            return Err(BvolError::ArtifactPersistFailed(format!("invalid id {id:?}")));
        }
        self.blobs().insert(id.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, id: &str) -> Result<Vec<u8>> {
        self.blobs()
            .get(id)
            .cloned()
            .ok_or_else(|| BvolError::ArtifactNotFound(id.to_string()))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.blobs().remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_put_read_delete_cycle() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(&tmp.path().join("plots")).unwrap();
        let id = "abc123";
        assert!(!store.contains(id));

        store.put(id, b"png-bytes").unwrap();
        assert!(store.contains(id));
        let path = store.path(id).unwrap();
        assert_eq!(path.file_name().unwrap(), "plot_abc123.png");
        assert_eq!(fs::read(&path).unwrap(), b"png-bytes");
        assert_eq!(store.read(id).unwrap(), b"png-bytes");

        assert!(store.delete(id).unwrap());
        assert!(!store.delete(id).unwrap());
        assert!(matches!(store.read(id), Err(BvolError::ArtifactNotFound(_))));
    }

    #[test]
    fn fs_put_leaves_no_staging_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(tmp.path()).unwrap();
        store.put("a1", b"one").unwrap();
        store.put("a1", b"two").unwrap();
        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["plot_a1.png".to_string()]);
        assert_eq!(store.read("a1").unwrap(), b"two");
    }

    #[test]
    fn open_purges_stale_artifacts_only() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("plot_old.png"), b"x").unwrap();
        fs::write(tmp.path().join(".staging-xyz"), b"x").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"keep").unwrap();
        let store = FsArtifactStore::open(tmp.path()).unwrap();
        assert!(!store.contains("old"));
        assert!(tmp.path().join("notes.txt").exists());
        assert!(!tmp.path().join(".staging-xyz").exists());
    }

    #[test]
    fn traversal_ids_never_resolve() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(tmp.path()).unwrap();
        assert!(store.path("../etc/passwd").is_none());
        assert!(!store.contains("../x"));
        assert!(matches!(
            store.read("../x"),
            Err(BvolError::ArtifactNotFound(_))
        ));
        assert!(!store.delete("a/b").unwrap());
        assert!(store.put("a/b", b"x").is_err());
    }

    #[test]
    fn mem_store_behaves_like_fs() {
        let store = MemArtifactStore::new();
        store.put("m1", b"data").unwrap();
        assert!(store.contains("m1"));
        assert_eq!(store.path("m1").unwrap(), PathBuf::from("plot_m1.png"));
        assert_eq!(store.read("m1").unwrap(), b"data");
        assert!(store.delete("m1").unwrap());
        assert!(!store.contains("m1"));
        assert!(matches!(store.read("m1"), Err(BvolError::ArtifactNotFound(_))));
    }
}
