use crate::WorkoutRecord;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Suggested file name when offering an export for download.
pub const EXPORT_FILE_NAME: &str = "workouts.json";

#[derive(Debug)]
pub enum ImportError {
    /// The text is not valid JSON.
    MalformedJson(serde_json::Error),
    /// The document parsed but its top level is not an array.
    NotAList,
    /// An element of the array is not a valid workout record.
    InvalidRecord { index: usize, reason: String },
    /// The import file could not be read.
    Io(std::io::Error),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::MalformedJson(e) => write!(f, "Malformed JSON: {e}"),
            ImportError::NotAList => write!(f, "Expected a list of workouts"),
            ImportError::InvalidRecord { index, reason } => {
                write!(f, "Invalid workout at position {index}: {reason}")
            }
            ImportError::Io(e) => write!(f, "Failed to read import file: {e}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::MalformedJson(e) => Some(e),
            ImportError::Io(e) => Some(e),
            ImportError::NotAList | ImportError::InvalidRecord { .. } => None,
        }
    }
}

/// Serialize the full record list as an indented JSON array.
pub fn export_document(records: &[WorkoutRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Parse and validate an exported document.
///
/// The whole document is rejected on the first invalid element; nothing is
/// returned partially. The `isPR` flags are taken as they are.
pub fn import_document(text: &str) -> Result<Vec<WorkoutRecord>, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::MalformedJson)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAList);
    };
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let record: WorkoutRecord =
            serde_json::from_value(item).map_err(|e| ImportError::InvalidRecord {
                index,
                reason: e.to_string(),
            })?;
        check_record(&record).map_err(|reason| ImportError::InvalidRecord { index, reason })?;
        records.push(record);
    }
    Ok(records)
}

fn check_record(r: &WorkoutRecord) -> Result<(), String> {
    if r.exercise.trim().is_empty() {
        return Err("exercise name is empty".into());
    }
    if r.sets == 0 {
        return Err("sets must be positive".into());
    }
    if r.reps == 0 {
        return Err("reps must be positive".into());
    }
    if !r.weight.is_finite() || r.weight < 0.0 {
        return Err(format!("weight {} is not a non-negative number", r.weight));
    }
    Ok(())
}

/// Write the exported document to `path`, byte for byte.
pub fn save_records_json<P: AsRef<Path>>(path: P, records: &[WorkoutRecord]) -> std::io::Result<()> {
    let text = export_document(records)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(path, text)
}

pub fn load_records_json<P: AsRef<Path>>(path: P) -> Result<Vec<WorkoutRecord>, ImportError> {
    let text = std::fs::read_to_string(path).map_err(ImportError::Io)?;
    import_document(&text)
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

pub fn save_records_csv<P: AsRef<Path>>(path: P, records: &[WorkoutRecord]) -> csv::Result<()> {
    write_csv(std::fs::File::create(path)?, records)
}
