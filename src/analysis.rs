// Module for personal record detection
use crate::WorkoutRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Decide whether lifting `weight` on `exercise` beats every entry in
/// `existing` for the same exercise.
///
/// The previous best defaults to `0` when no matching entries exist, so any
/// positive weight on a new exercise counts as a record. Callers pass the
/// records as they stood right before the write; when editing, the record
/// being replaced must not be part of `existing`.
pub fn is_personal_record<'a>(
    exercise: &str,
    weight: f64,
    existing: impl IntoIterator<Item = &'a WorkoutRecord>,
) -> bool {
    let best = existing
        .into_iter()
        .filter(|r| r.exercise == exercise)
        .fold(0.0_f64, |max, r| max.max(r.weight));
    weight > best
}

/// Best lift recorded for a single exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseBest {
    pub exercise: String,
    pub best_weight: f64,
    pub date: NaiveDate,
    pub entries: usize,
}

/// Summarize the heaviest entry per exercise.
///
/// Exercises are returned in order of first appearance. When the best weight
/// was hit on several days the earliest entry in store order wins.
pub fn best_weights(records: &[WorkoutRecord]) -> Vec<ExerciseBest> {
    let mut out: Vec<ExerciseBest> = Vec::new();
    for r in records {
        match out.iter_mut().find(|b| b.exercise == r.exercise) {
            Some(best) => {
                best.entries += 1;
                if r.weight > best.best_weight {
                    best.best_weight = r.weight;
                    best.date = r.date;
                }
            }
            None => out.push(ExerciseBest {
                exercise: r.exercise.clone(),
                best_weight: r.weight,
                date: r.date,
                entries: 1,
            }),
        }
    }
    log::debug!("Computed best weights for {} exercises", out.len());
    out
}
