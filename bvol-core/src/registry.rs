use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{BvolError, Result};
use crate::pipeline::{AnalysisRequest, Analyzer};
use crate::store::artifacts::ArtifactStore;
use crate::store::records::{MoleculeRecord, RecordStore};
use crate::xyz::Structure;

/// Owns the record store and its artifacts.
///
/// Every mutation, and every artifact read, runs under one lock so a record
/// and its artifact appear and disappear together.
pub struct MoleculeRegistry {
    records: Mutex<RecordStore>,
    artifacts: Arc<dyn ArtifactStore>,
    analyzer: Analyzer,
}

impl MoleculeRegistry {
    pub fn new(analyzer: Analyzer, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self {
            records: Mutex::new(RecordStore::new()),
            artifacts,
            analyzer,
        }
    }

    fn records(&self) -> MutexGuard<'_, RecordStore> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs the full upload pipeline and stores the result.
    ///
    /// The analysis runs without holding the lock; only persisting the
    /// artifact and appending the record are serialized.
    pub fn ingest(&self, structure: &Structure, req: &AnalysisRequest) -> Result<MoleculeRecord> {
        let analysis = self.analyzer.analyze(structure, req)?;
        self.store(
            &structure.name,
            analysis.buried_volume_fraction,
            analysis.steric_map.as_deref(),
        )
    }

    /// Adds a record without an artifact.
    pub fn create(&self, name: &str, buried_volume_fraction: f64) -> String {
        let mut records = self.records();
        let id = records.create(name, buried_volume_fraction);
        let created_at = records
            .get(&id)
            .map(MoleculeRecord::created_at_rfc3339)
            .unwrap_or_default();
        tracing::info!(%id, name, buried_volume_fraction, %created_at, "molecule added");
        id
    }

    /// Adds a record together with its artifact. When the artifact cannot be
    /// persisted no record is created.
    pub fn create_with_artifact(
        &self,
        name: &str,
        buried_volume_fraction: f64,
        artifact: Option<&[u8]>,
    ) -> Result<String> {
        self.store(name, buried_volume_fraction, artifact)
            .map(|rec| rec.id)
    }

    fn store(
        &self,
        name: &str,
        buried_volume_fraction: f64,
        artifact: Option<&[u8]>,
    ) -> Result<MoleculeRecord> {
        let mut records = self.records();
        let record = MoleculeRecord::new(records.fresh_id(), name, buried_volume_fraction);

        if let Some(bytes) = artifact {
            if let Err(e) = self.artifacts.put(&record.id, bytes) {
                tracing::warn!(id = %record.id, error = %e, "artifact persist failed; record not created");
                return Err(match e {
                    BvolError::ArtifactPersistFailed(_) => e,
                    other => BvolError::ArtifactPersistFailed(other.to_string()),
                });
            }
        }

        records.insert(record.clone());
        tracing::info!(
            id = %record.id,
            name,
            buried_volume_fraction,
            steric_map = artifact.is_some(),
            created_at = %record.created_at_rfc3339(),
            "molecule added"
        );
        Ok(record)
    }

    /// Snapshot in insertion order.
    pub fn list(&self) -> Vec<MoleculeRecord> {
        self.records().list().to_vec()
    }

    pub fn get(&self, id: &str) -> Option<MoleculeRecord> {
        self.records().get(id).cloned()
    }

    /// Removes the record and its artifact. `Ok(false)` when no record had `id`.
    ///
    /// The artifact goes first; if it cannot be removed the record stays.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.records();
        if !records.contains(id) {
            tracing::debug!(%id, "delete of unknown molecule");
            return Ok(false);
        }
        let had_artifact = self.artifacts.delete(id).inspect_err(|e| {
            tracing::warn!(%id, error = %e, "artifact delete failed; record kept");
        })?;
        records.remove(id);
        tracing::info!(%id, had_artifact, "molecule removed");
        Ok(true)
    }

    pub fn artifact_path(&self, id: &str) -> Result<PathBuf> {
        let _records = self.records();
        if !self.artifacts.contains(id) {
            return Err(BvolError::ArtifactNotFound(id.to_string()));
        }
        self.artifacts
            .path(id)
            .ok_or_else(|| BvolError::ArtifactNotFound(id.to_string()))
    }

    pub fn artifact_bytes(&self, id: &str) -> Result<Vec<u8>> {
        let _records = self.records();
        self.artifacts.read(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{StubEngine, StubRenderer};
    use crate::store::artifacts::{FsArtifactStore, MemArtifactStore};
    use crate::xyz::read_xyz;
    use std::io::Cursor;

    const FE_OH: &str = "3\niron test\nFe 0 0 0\nO 1 0 0\nH 0 1 0\n";

    struct BrokenStore;

    impl ArtifactStore for BrokenStore {
        fn path(&self, id: &str) -> Option<PathBuf> {
            Some(PathBuf::from(id))
        }
        fn contains(&self, _id: &str) -> bool {
            false
        }
        fn put(&self, _id: &str, _bytes: &[u8]) -> Result<()> {
            Err(BvolError::Io(std::io::Error::other("read-only filesystem")))
        }
        fn read(&self, id: &str) -> Result<Vec<u8>> {
            Err(BvolError::ArtifactNotFound(id.to_string()))
        }
        fn delete(&self, _id: &str) -> Result<bool> {
            Ok(false)
        }
    }

    /// Stores artifacts in memory but refuses to delete them until unlocked.
    struct StickyStore {
        inner: MemArtifactStore,
        locked: std::sync::atomic::AtomicBool,
    }

    impl StickyStore {
        fn new() -> Self {
            Self {
                inner: MemArtifactStore::new(),
                locked: std::sync::atomic::AtomicBool::new(true),
            }
        }

        fn unlock(&self) {
            self.locked
                .store(false, std::sync::atomic::Ordering::SeqCst);
        }
    }

    impl ArtifactStore for StickyStore {
        fn path(&self, id: &str) -> Option<PathBuf> {
            self.inner.path(id)
        }
        fn contains(&self, id: &str) -> bool {
            self.inner.contains(id)
        }
        fn put(&self, id: &str, bytes: &[u8]) -> Result<()> {
            self.inner.put(id, bytes)
        }
        fn read(&self, id: &str) -> Result<Vec<u8>> {
            self.inner.read(id)
        }
        fn delete(&self, id: &str) -> Result<bool> {
            if self.locked.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(BvolError::Io(std::io::Error::from(
                    std::io::ErrorKind::PermissionDenied,
                )));
            }
            self.inner.delete(id)
        }
    }

    fn registry_with(artifacts: Arc<dyn ArtifactStore>) -> MoleculeRegistry {
        let analyzer = Analyzer::new(
            Arc::new(StubEngine::returning(0.42)),
            Arc::new(StubRenderer::writing(b"\x89PNG stub")),
        );
        MoleculeRegistry::new(analyzer, artifacts)
    }

    fn registry() -> MoleculeRegistry {
        registry_with(Arc::new(MemArtifactStore::new()))
    }

    fn fe_oh() -> Structure {
        read_xyz(&mut Cursor::new(FE_OH)).unwrap()
    }

    #[test]
    fn ingest_without_axis_stores_exact_fraction() {
        let reg = registry();
        let rec = reg.ingest(&fe_oh(), &AnalysisRequest::default()).unwrap();
        assert_eq!(rec.name, "iron test");
        assert_eq!(rec.buried_volume_fraction, 0.42);

        let listed = reg.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], rec);
        assert!(matches!(
            reg.artifact_path(&rec.id),
            Err(BvolError::ArtifactNotFound(_))
        ));
    }

    #[test]
    fn ingest_with_axis_stores_artifact() {
        let reg = registry();
        let req = AnalysisRequest {
            z_axis_atoms: vec![1, 2],
            ..Default::default()
        };
        let rec = reg.ingest(&fe_oh(), &req).unwrap();
        let path = reg.artifact_path(&rec.id).unwrap();
        assert_eq!(path, PathBuf::from(format!("plot_{}.png", rec.id)));
        assert_eq!(reg.artifact_bytes(&rec.id).unwrap(), b"\x89PNG stub");
    }

    #[test]
    fn failed_center_leaves_store_untouched() {
        let reg = registry();
        let s = read_xyz(&mut Cursor::new("1\nc\nC 0 0 0\n")).unwrap();
        let err = reg.ingest(&s, &AnalysisRequest::default()).unwrap_err();
        assert!(matches!(err, BvolError::NoCenterAtomFound));
        assert!(reg.list().is_empty());
    }

    #[test]
    fn failed_artifact_persist_creates_no_record() {
        let reg = registry_with(Arc::new(BrokenStore));
        let req = AnalysisRequest {
            z_axis_atoms: vec![1],
            ..Default::default()
        };
        let err = reg.ingest(&fe_oh(), &req).unwrap_err();
        assert!(matches!(err, BvolError::ArtifactPersistFailed(_)));
        assert!(reg.list().is_empty());

        // Records without artifacts never touch the store.
        reg.ingest(&fe_oh(), &AnalysisRequest::default()).unwrap();
        assert_eq!(reg.list().len(), 1);
    }

    #[test]
    fn list_is_idempotent() {
        let reg = registry();
        reg.create("a", 0.1);
        reg.create("b", 0.2);
        assert_eq!(reg.list(), reg.list());
    }

    #[test]
    fn delete_removes_record_and_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(FsArtifactStore::open(tmp.path()).unwrap());
        let reg = registry_with(store.clone());
        let keep = reg.create("keep", 0.5);
        let id = reg
            .create_with_artifact("gone", 0.25, Some(b"img"))
            .unwrap();
        let path = reg.artifact_path(&id).unwrap();
        assert!(path.is_file());

        assert!(reg.delete(&id).unwrap());
        assert!(!path.exists());
        assert!(reg.get(&id).is_none());
        assert!(matches!(
            reg.artifact_path(&id),
            Err(BvolError::ArtifactNotFound(_))
        ));
        let ids: Vec<String> = reg.list().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn delete_unknown_id_reports_not_found() {
        let reg = registry();
        reg.create("a", 0.1);
        let before = reg.list();
        assert!(!reg.delete("doesnotexist").unwrap());
        assert_eq!(reg.list(), before);
    }

    #[test]
    fn artifact_deleted_out_of_band_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let reg = registry_with(Arc::new(FsArtifactStore::open(tmp.path()).unwrap()));
        let id = reg.create_with_artifact("x", 0.3, Some(b"img")).unwrap();
        std::fs::remove_file(reg.artifact_path(&id).unwrap()).unwrap();
        assert!(matches!(
            reg.artifact_bytes(&id),
            Err(BvolError::ArtifactNotFound(_))
        ));
        // The record itself survives and can still be deleted.
        assert!(reg.delete(&id).unwrap());
    }

    #[test]
    fn failed_artifact_delete_keeps_record() {
        let store = Arc::new(StickyStore::new());
        let reg = registry_with(store.clone());
        let id = reg.create_with_artifact("pinned", 0.3, Some(b"img")).unwrap();

        assert!(matches!(reg.delete(&id), Err(BvolError::Io(_))));
        assert!(reg.get(&id).is_some());
        assert_eq!(reg.artifact_bytes(&id).unwrap(), b"img");

        store.unlock();
        assert!(reg.delete(&id).unwrap());
        assert!(reg.get(&id).is_none());
        assert!(!store.contains(&id));
    }

    #[test]
    fn concurrent_creates_and_deletes_keep_pairs_together() {
        let reg = registry();
        let seeded: Vec<String> = (0..16)
            .map(|i| {
                reg.create_with_artifact(&format!("seed{i}"), 0.1, Some(b"img"))
                    .unwrap()
            })
            .collect();

        std::thread::scope(|s| {
            for chunk in seeded.chunks(4) {
                let reg = &reg;
                s.spawn(move || {
                    for id in chunk {
                        assert!(reg.delete(id).unwrap());
                    }
                });
            }
            for t in 0..4 {
                let reg = &reg;
                s.spawn(move || {
                    for i in 0..8 {
                        let name = format!("new{t}-{i}");
                        let artifact = (i % 2 == 0).then_some(&b"img"[..]);
                        reg.create_with_artifact(&name, 0.2, artifact).unwrap();
                    }
                });
            }
        });

        let listed = reg.list();
        assert_eq!(listed.len(), 32);
        for id in &seeded {
            assert!(reg.get(id).is_none());
            assert!(reg.artifact_bytes(id).is_err());
        }
        let with_maps = listed
            .iter()
            .filter(|r| reg.artifact_bytes(&r.id).is_ok())
            .count();
        assert_eq!(with_maps, 16);
    }
}
