//! Ordered, write-through store of workout records.

use crate::WorkoutRecord;
use crate::export::{ImportError, export_document, import_document};
use crate::persistence::KeyValueStore;
use std::fmt;

/// Key the record document is saved under.
pub const STORAGE_KEY: &str = "workouts";

/// Session-stable handle for a stored record.
///
/// Handles are assigned in increasing order when records enter the store and
/// are never reused, so a handle held across a deletion either still points
/// at the same record or at nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub record: WorkoutRecord,
}

#[derive(Debug)]
pub enum StoreError {
    IndexOutOfRange { index: usize, len: usize },
    UnknownRecord(RecordId),
    /// Writing to or reading from the backend failed.
    Persistence(std::io::Error),
    /// Saved data exists but is not a valid record document.
    Corrupt(ImportError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IndexOutOfRange { index, len } => {
                write!(f, "Index {index} out of range for {len} workouts")
            }
            StoreError::UnknownRecord(id) => write!(f, "No workout with id {id}"),
            StoreError::Persistence(e) => write!(f, "Persistence unavailable: {e}"),
            StoreError::Corrupt(e) => write!(f, "Saved workouts are unreadable: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Persistence(e) => Some(e),
            StoreError::Corrupt(e) => Some(e),
            StoreError::IndexOutOfRange { .. } | StoreError::UnknownRecord(_) => None,
        }
    }
}

/// Ordered workout records, persisted after every change.
///
/// A mutation is only kept when the backend accepted the new document;
/// otherwise the store is rolled back and [`StoreError::Persistence`] is
/// returned.
pub struct RecordStore<S: KeyValueStore> {
    backend: S,
    entries: Vec<StoredRecord>,
    next_id: u64,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Load previously saved records. Missing data yields an empty store.
    pub fn open(backend: S) -> Result<Self, StoreError> {
        let saved = backend.load(STORAGE_KEY).map_err(StoreError::Persistence)?;
        let mut store = Self {
            backend,
            entries: Vec::new(),
            next_id: 0,
        };
        if let Some(text) = saved {
            let records = import_document(&text).map_err(StoreError::Corrupt)?;
            store.entries = store.assign_ids(records);
        }
        log::info!("Opened record store with {} workouts", store.entries.len());
        Ok(store)
    }

    fn assign_ids(&mut self, records: Vec<WorkoutRecord>) -> Vec<StoredRecord> {
        records
            .into_iter()
            .map(|record| StoredRecord {
                id: self.allocate_id(),
                record,
            })
            .collect()
    }

    fn allocate_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let text = export_document(&self.records()).map_err(|e| {
            StoreError::Persistence(std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;
        self.backend
            .save(STORAGE_KEY, &text)
            .map_err(StoreError::Persistence)
    }

    pub fn add(&mut self, record: WorkoutRecord) -> Result<RecordId, StoreError> {
        let id = self.allocate_id();
        self.entries.push(StoredRecord { id, record });
        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(e);
        }
        log::debug!("Added workout {id}");
        Ok(id)
    }

    pub fn update(&mut self, id: RecordId, record: WorkoutRecord) -> Result<(), StoreError> {
        let index = self.position(id).ok_or(StoreError::UnknownRecord(id))?;
        self.update_at(index, record)
    }

    /// Overwrite the record at `index`, keeping its id.
    pub fn update_at(&mut self, index: usize, record: WorkoutRecord) -> Result<(), StoreError> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        let previous = std::mem::replace(&mut slot.record, record);
        if let Err(e) = self.persist() {
            self.entries[index].record = previous;
            return Err(e);
        }
        log::debug!("Updated workout at index {index}");
        Ok(())
    }

    pub fn delete(&mut self, id: RecordId) -> Result<WorkoutRecord, StoreError> {
        let index = self.position(id).ok_or(StoreError::UnknownRecord(id))?;
        self.delete_at(index)
    }

    /// Remove the record at `index`; later records shift down by one.
    pub fn delete_at(&mut self, index: usize) -> Result<WorkoutRecord, StoreError> {
        if index >= self.entries.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        if let Err(e) = self.persist() {
            self.entries.insert(index, removed);
            return Err(e);
        }
        log::debug!("Deleted workout {} at index {index}", removed.id);
        Ok(removed.record)
    }

    /// Swap in a whole new record list. Every record gets a fresh id.
    pub fn replace_all(&mut self, records: Vec<WorkoutRecord>) -> Result<(), StoreError> {
        let fresh = self.assign_ids(records);
        let previous = std::mem::replace(&mut self.entries, fresh);
        if let Err(e) = self.persist() {
            self.entries = previous;
            return Err(e);
        }
        log::info!("Replaced store contents with {} workouts", self.entries.len());
        Ok(())
    }

    pub fn list(&self) -> &[StoredRecord] {
        &self.entries
    }

    pub fn records(&self) -> Vec<WorkoutRecord> {
        self.entries.iter().map(|e| e.record.clone()).collect()
    }

    pub fn get(&self, id: RecordId) -> Option<&WorkoutRecord> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.record)
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Records other than `id`, in store order.
    pub fn others(&self, id: RecordId) -> impl Iterator<Item = &WorkoutRecord> {
        self.entries
            .iter()
            .filter(move |e| e.id != id)
            .map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }
}
