use crate::error::StoreError;
use crate::model::ProgressRecord;
use std::sync::Mutex;

/// Durable home for [`ProgressRecord`]s. The real backend is a plain REST
/// resource (implemented in `colorbook-client`); tests and the wasm host
/// use [`MemoryStore`]. `Send` so the auto-flush thread can own a session.
pub trait ProgressStore: Send {
    /// One record for (user, image). `Err(NotFound)` means no progress yet.
    fn fetch(&self, user_id: &str, svg_id: &str) -> Result<ProgressRecord, StoreError>;

    /// All records for a user, optionally narrowed to one image.
    fn list(&self, user_id: &str, svg_id: Option<&str>) -> Result<Vec<ProgressRecord>, StoreError>;

    /// Persist a new record; returns the backend-assigned id.
    fn create(&self, record: &ProgressRecord) -> Result<String, StoreError>;

    /// Overwrite the record with `record.id` (last-writer-wins).
    fn update(&self, record: &ProgressRecord) -> Result<(), StoreError>;

    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// In-process store used by tests and offline sessions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    records: Vec<ProgressRecord>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Snapshot of everything stored, for assertions.
    pub fn records(&self) -> Vec<ProgressRecord> {
        self.inner.lock().unwrap().records.clone()
    }
}

impl ProgressStore for MemoryStore {
    fn fetch(&self, user_id: &str, svg_id: &str) -> Result<ProgressRecord, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .records
            .iter()
            .find(|r| r.user_id == user_id && r.svg_id == svg_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn list(&self, user_id: &str, svg_id: Option<&str>) -> Result<Vec<ProgressRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .filter(|r| r.user_id == user_id && svg_id.map_or(true, |s| r.svg_id == s))
            .cloned()
            .collect())
    }

    fn create(&self, record: &ProgressRecord) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let id = format!("mem-{}", inner.next_id);
        inner.next_id += 1;
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        inner.records.push(stored);
        Ok(id)
    }

    fn update(&self, record: &ProgressRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let id = record.id.as_deref().ok_or(StoreError::NotFound)?;
        match inner.records.iter_mut().find(|r| r.id.as_deref() == Some(id)) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.records.len();
        inner.records.retain(|r| r.id.as_deref() != Some(id));
        if inner.records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
