use crate::WorkoutRecord;
use std::fmt;

/// Validated values for creating or editing a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutInput {
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    EmptyExercise,
    InvalidNumber { field: &'static str, value: String },
    NotPositive { field: &'static str },
    InvalidWeight(f64),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::EmptyExercise => write!(f, "Exercise name is required"),
            FormError::InvalidNumber { field, value } => {
                write!(f, "{field} must be a number, got '{value}'")
            }
            FormError::NotPositive { field } => write!(f, "{field} must be at least 1"),
            FormError::InvalidWeight(w) => write!(f, "Weight must not be negative, got {w}"),
        }
    }
}

impl std::error::Error for FormError {}

/// Raw text as typed into the entry form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutForm {
    pub exercise: String,
    pub sets: String,
    pub reps: String,
    pub weight: String,
}

impl WorkoutForm {
    /// Pre-fill the form with an existing record for editing.
    pub fn from_record(record: &WorkoutRecord) -> Self {
        Self {
            exercise: record.exercise.clone(),
            sets: record.sets.to_string(),
            reps: record.reps.to_string(),
            weight: record.weight.to_string(),
        }
    }

    pub fn validate(&self) -> Result<WorkoutInput, FormError> {
        let exercise = self.exercise.trim();
        if exercise.is_empty() {
            return Err(FormError::EmptyExercise);
        }
        let sets = parse_count("Sets", &self.sets)?;
        let reps = parse_count("Reps", &self.reps)?;
        let weight: f64 = self
            .weight
            .trim()
            .parse()
            .map_err(|_| FormError::InvalidNumber {
                field: "Weight",
                value: self.weight.clone(),
            })?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(FormError::InvalidWeight(weight));
        }
        Ok(WorkoutInput {
            exercise: exercise.to_string(),
            sets,
            reps,
            weight,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn parse_count(field: &'static str, value: &str) -> Result<u32, FormError> {
    let n: u32 = value.trim().parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_string(),
    })?;
    if n == 0 {
        return Err(FormError::NotPositive { field });
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(exercise: &str, sets: &str, reps: &str, weight: &str) -> WorkoutForm {
        WorkoutForm {
            exercise: exercise.into(),
            sets: sets.into(),
            reps: reps.into(),
            weight: weight.into(),
        }
    }

    #[test]
    fn valid_form() {
        let input = form("  Bench Press ", "3", " 8", "152.5").validate().unwrap();
        assert_eq!(
            input,
            WorkoutInput {
                exercise: "Bench Press".into(),
                sets: 3,
                reps: 8,
                weight: 152.5,
            }
        );
    }

    #[test]
    fn bodyweight_zero_is_allowed() {
        assert_eq!(form("Pull Up", "3", "10", "0").validate().unwrap().weight, 0.0);
    }

    #[test]
    fn rejects_bad_fields() {
        assert_eq!(form("", "3", "8", "100").validate(), Err(FormError::EmptyExercise));
        assert_eq!(
            form("Row", "three", "8", "100").validate(),
            Err(FormError::InvalidNumber {
                field: "Sets",
                value: "three".into()
            })
        );
        assert_eq!(
            form("Row", "3", "0", "100").validate(),
            Err(FormError::NotPositive { field: "Reps" })
        );
        assert_eq!(
            form("Row", "3", "-2", "100").validate(),
            Err(FormError::InvalidNumber {
                field: "Reps",
                value: "-2".into()
            })
        );
        assert_eq!(form("Row", "3", "8", "-5").validate(), Err(FormError::InvalidWeight(-5.0)));
        assert!(matches!(
            form("Row", "3", "8", "inf").validate(),
            Err(FormError::InvalidWeight(_))
        ));
        assert!(matches!(
            form("Row", "3", "8", "heavy").validate(),
            Err(FormError::InvalidNumber { field: "Weight", .. })
        ));
    }

    #[test]
    fn prefill_from_record() {
        let rec = crate::sample_records().remove(0);
        let f = WorkoutForm::from_record(&rec);
        assert_eq!(f, form("Bench Press", "3", "8", "150"));
        assert_eq!(f.validate().unwrap().weight, 150.0);
    }
}
