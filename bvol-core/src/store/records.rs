use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Clone, Debug, PartialEq)]
pub struct MoleculeRecord {
    pub id: String,
    pub name: String,
    pub buried_volume_fraction: f64,
    pub created_at: OffsetDateTime,
}

impl MoleculeRecord {
    pub fn new(id: String, name: &str, buried_volume_fraction: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            buried_volume_fraction,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// `created_at` as RFC 3339, e.g. `2026-10-19T08:15:00.123Z`.
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.created_at.to_string())
    }
}

/// Insertion-ordered records keyed by id.
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    records: Vec<MoleculeRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record with a fresh id and returns that id.
    pub fn create(&mut self, name: &str, buried_volume_fraction: f64) -> String {
        let id = self.fresh_id();
        self.records
            .push(MoleculeRecord::new(id.clone(), name, buried_volume_fraction));
        id
    }

    /// An id not used by any record in the store.
    pub fn fresh_id(&self) -> String {
        loop {
            let id = new_id();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Appends `record`; returns false, leaving the store unchanged, if its
    /// id is already taken.
    pub fn insert(&mut self, record: MoleculeRecord) -> bool {
        if self.contains(&record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn list(&self) -> &[MoleculeRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&MoleculeRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: &str) -> Option<MoleculeRecord> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 32 lowercase hex chars, no dashes.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_appends_in_order() {
        let mut store = RecordStore::new();
        let a = store.create("first", 0.1);
        let b = store.create("second", 0.2);
        let ids: Vec<&str> = store.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), b.as_str()]);
        assert_eq!(store.get(&b).unwrap().name, "second");
        assert_eq!(store.get(&a).unwrap().buried_volume_fraction, 0.1);
    }

    #[test]
    fn ids_are_unique_hex() {
        let mut store = RecordStore::new();
        let a = store.create("x", 0.0);
        let b = store.create("x", 0.0);
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut store = RecordStore::new();
        let id = store.create("a", 0.1);
        assert!(!store.insert(MoleculeRecord::new(id.clone(), "dup", 0.9)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().name, "a");
        assert!(store.insert(MoleculeRecord::new(store.fresh_id(), "b", 0.2)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut store = RecordStore::new();
        let a = store.create("a", 0.1);
        let b = store.create("b", 0.2);
        let c = store.create("c", 0.3);
        assert_eq!(store.remove(&b).unwrap().name, "b");
        assert!(store.remove(&b).is_none());
        let ids: Vec<&str> = store.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), c.as_str()]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn creation_time_formats_as_rfc3339() {
        let rec = MoleculeRecord::new(new_id(), "stamped", 0.5);
        let stamp = rec.created_at_rfc3339();
        assert!(stamp.starts_with(&rec.created_at.year().to_string()));
        assert_eq!(stamp.as_bytes()[10], b'T');
        assert!(stamp.ends_with('Z'));
    }
}
