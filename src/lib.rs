//! Workout record model, persistence and the derived views used by the
//! tracker front-end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod colors;
pub mod export;
pub mod form;
pub mod persistence;
pub mod plotting;
pub mod settings;
pub mod store;
pub mod tracker;

pub use analysis::{ExerciseBest, best_weights, is_personal_record};
pub use colors::{Color, ExerciseColorizer};
pub use export::{ImportError, export_document, import_document};
pub use form::{FormError, WorkoutForm, WorkoutInput};
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use plotting::{SeriesPoint, VisibleRecord, all_series_grouped, distinct_exercises, series_for, visible_list};
pub use settings::{Settings, WeightUnit};
pub use store::{RecordId, RecordStore, StoreError, StoredRecord};
pub use tracker::{ChartSeries, Tracker, TrackerError, TrackerView};

/// One logged set-group for one exercise on one day.
///
/// `is_pr` is computed once when the record is written and then kept as-is;
/// later edits or deletions of other records do not change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub date: NaiveDate,
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    #[serde(rename = "isPR")]
    pub is_pr: bool,
}

impl WorkoutRecord {
    /// Build a record from validated input, tagging it against `existing`.
    pub fn from_input<'a>(
        input: &WorkoutInput,
        date: NaiveDate,
        existing: impl IntoIterator<Item = &'a WorkoutRecord>,
    ) -> Self {
        let is_pr = is_personal_record(&input.exercise, input.weight, existing);
        Self {
            date,
            exercise: input.exercise.clone(),
            sets: input.sets,
            reps: input.reps,
            weight: input.weight,
            is_pr,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_records() -> Vec<WorkoutRecord> {
    let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
    vec![
        WorkoutRecord {
            date: d("2026-01-05"),
            exercise: "Bench Press".into(),
            sets: 3,
            reps: 8,
            weight: 150.0,
            is_pr: false,
        },
        WorkoutRecord {
            date: d("2026-01-06"),
            exercise: "Bench Press".into(),
            sets: 3,
            reps: 8,
            weight: 155.0,
            is_pr: true,
        },
        WorkoutRecord {
            date: d("2026-01-05"),
            exercise: "Squat".into(),
            sets: 4,
            reps: 6,
            weight: 200.0,
            is_pr: false,
        },
    ]
}
