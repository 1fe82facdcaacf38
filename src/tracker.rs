//! Session state tying the store, PR tagging and derived views together.

use crate::analysis::{ExerciseBest, best_weights};
use crate::colors::{Color, ExerciseColorizer};
use crate::export::{self, ImportError};
use crate::form::WorkoutInput;
use crate::persistence::KeyValueStore;
use crate::plotting::{SeriesPoint, VisibleRecord, all_series_grouped, distinct_exercises, visible_list};
use crate::store::{RecordId, RecordStore, StoreError};
use crate::WorkoutRecord;
use chrono::{Local, NaiveDate};
use std::fmt;

#[derive(Debug)]
pub enum TrackerError {
    Store(StoreError),
    Import(ImportError),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Store(e) => write!(f, "{e}"),
            TrackerError::Import(e) => write!(f, "Import failed: {e}"),
        }
    }
}

impl std::error::Error for TrackerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackerError::Store(e) => Some(e),
            TrackerError::Import(e) => Some(e),
        }
    }
}

impl From<StoreError> for TrackerError {
    fn from(e: StoreError) -> Self {
        TrackerError::Store(e)
    }
}

impl From<ImportError> for TrackerError {
    fn from(e: ImportError) -> Self {
        TrackerError::Import(e)
    }
}

/// One chart line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub exercise: String,
    pub color: Color,
    pub points: Vec<SeriesPoint>,
}

/// Everything the list, drop-down and chart need to redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerView {
    pub exercises: Vec<String>,
    pub visible: Vec<VisibleRecord>,
    pub series: Vec<ChartSeries>,
    pub bests: Vec<ExerciseBest>,
}

pub struct Tracker<S: KeyValueStore> {
    store: RecordStore<S>,
    colors: ExerciseColorizer,
    filter: Option<String>,
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn open(backend: S) -> Result<Self, StoreError> {
        Ok(Self {
            store: RecordStore::open(backend)?,
            colors: ExerciseColorizer::new(),
            filter: None,
        })
    }

    /// Log a workout dated today (local time).
    pub fn log_workout(&mut self, input: &WorkoutInput) -> Result<(RecordId, WorkoutRecord), TrackerError> {
        self.log_workout_on(input, Local::now().date_naive())
    }

    pub fn log_workout_on(
        &mut self,
        input: &WorkoutInput,
        date: NaiveDate,
    ) -> Result<(RecordId, WorkoutRecord), TrackerError> {
        let record = WorkoutRecord::from_input(input, date, self.store.list().iter().map(|e| &e.record));
        let id = self.store.add(record.clone())?;
        if record.is_pr {
            log::info!("New PR for {}: {}", record.exercise, record.weight);
        }
        Ok((id, record))
    }

    /// Overwrite a workout in place.
    ///
    /// The creation date is kept. The PR flag is recomputed against every
    /// other record, so the edited entry's previous weight does not count.
    pub fn edit_workout(&mut self, id: RecordId, input: &WorkoutInput) -> Result<WorkoutRecord, TrackerError> {
        let date = self
            .store
            .get(id)
            .ok_or(StoreError::UnknownRecord(id))?
            .date;
        let record = WorkoutRecord::from_input(input, date, self.store.others(id));
        self.store.update(id, record.clone())?;
        self.drop_stale_filter();
        Ok(record)
    }

    pub fn delete_workout(&mut self, id: RecordId) -> Result<WorkoutRecord, TrackerError> {
        let removed = self.store.delete(id)?;
        self.drop_stale_filter();
        Ok(removed)
    }

    /// Replace every workout with the contents of an exported document.
    ///
    /// Returns the number of imported workouts. On any error the current
    /// workouts are kept.
    pub fn import_document(&mut self, text: &str) -> Result<usize, TrackerError> {
        let records = export::import_document(text)?;
        self.import_records(records)
    }

    /// Replace every workout with already validated records, such as the
    /// result of [`export::load_records_json`].
    pub fn import_records(&mut self, records: Vec<WorkoutRecord>) -> Result<usize, TrackerError> {
        let count = records.len();
        self.store.replace_all(records)?;
        self.drop_stale_filter();
        log::info!("Imported {count} workouts");
        Ok(count)
    }

    pub fn export_document(&self) -> serde_json::Result<String> {
        let records = self.store.records();
        log::info!("Exporting {} workouts", records.len());
        export::export_document(&records)
    }

    /// Restrict the history list to one exercise. Empty means all; a name
    /// with no stored workouts is dropped.
    pub fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter.filter(|f| !f.is_empty());
        self.drop_stale_filter();
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    fn drop_stale_filter(&mut self) {
        if let Some(f) = &self.filter {
            if !self.store.list().iter().any(|e| &e.record.exercise == f) {
                log::debug!("Clearing filter {f}, no workouts left");
                self.filter = None;
            }
        }
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn colors(&self) -> &ExerciseColorizer {
        &self.colors
    }

    /// Fresh snapshot of all derived views.
    ///
    /// The chart always shows every exercise; the filter only applies to
    /// the history list.
    pub fn view(&mut self) -> TrackerView {
        let records = self.store.records();
        let series = all_series_grouped(&records)
            .into_iter()
            .map(|(exercise, points)| ChartSeries {
                color: self.colors.color_for(&exercise),
                exercise,
                points,
            })
            .collect();
        TrackerView {
            exercises: distinct_exercises(&records),
            visible: visible_list(self.store.list(), self.filter.as_deref()),
            series,
            bests: best_weights(&records),
        }
    }
}
