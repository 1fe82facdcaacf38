use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::WorkoutRecord;
use crate::store::{RecordId, StoredRecord};

/// One point of an exercise's weight progression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub weight: f64,
    pub is_pr: bool,
}

/// A record as shown in the history list, with the handles needed to edit
/// or delete it.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRecord {
    pub index: usize,
    pub id: RecordId,
    pub record: WorkoutRecord,
}

/// Return the unique exercise names in order of first appearance.
pub fn distinct_exercises(records: &[WorkoutRecord]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.exercise.as_str()))
        .map(|r| r.exercise.clone())
        .collect()
}

/// Weight over time for a single exercise.
///
/// Points are sorted by date. The sort is stable, so entries logged on the
/// same day keep their store order.
pub fn series_for(records: &[WorkoutRecord], exercise: &str) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = records
        .iter()
        .filter(|r| r.exercise == exercise)
        .map(|r| SeriesPoint {
            date: r.date,
            weight: r.weight,
            is_pr: r.is_pr,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// One series per distinct exercise, for drawing every exercise on one chart.
pub fn all_series_grouped(records: &[WorkoutRecord]) -> Vec<(String, Vec<SeriesPoint>)> {
    distinct_exercises(records)
        .into_iter()
        .map(|ex| {
            let series = series_for(records, &ex);
            (ex, series)
        })
        .collect()
}

/// Records in store order, limited to `active_filter` when it names an
/// exercise. `None` or an empty filter lets everything through.
pub fn visible_list(entries: &[StoredRecord], active_filter: Option<&str>) -> Vec<VisibleRecord> {
    let filter = active_filter.filter(|f| !f.is_empty());
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| filter.map_or(true, |f| e.record.exercise == f))
        .map(|(index, e)| VisibleRecord {
            index,
            id: e.id,
            record: e.record.clone(),
        })
        .collect()
}

/// Map a series to `[x, y]` plot coordinates with the date as days since
/// the common era.
pub fn chart_points(series: &[SeriesPoint]) -> Vec<[f64; 2]> {
    series
        .iter()
        .map(|p| [p.date.num_days_from_ce() as f64, p.weight])
        .collect()
}

/// Plot coordinates of the personal record points only.
pub fn pr_points(series: &[SeriesPoint]) -> Vec<[f64; 2]> {
    series
        .iter()
        .filter(|p| p.is_pr)
        .map(|p| [p.date.num_days_from_ce() as f64, p.weight])
        .collect()
}

/// Inverse of the x mapping used by [`chart_points`].
pub fn date_from_x(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sample_records;
    use crate::store::RecordStore;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rec(date: &str, exercise: &str, weight: f64) -> WorkoutRecord {
        WorkoutRecord {
            date: d(date),
            exercise: exercise.into(),
            sets: 3,
            reps: 5,
            weight,
            is_pr: false,
        }
    }

    #[test]
    fn test_distinct_exercises_first_appearance() {
        let records = vec![
            rec("2024-01-03", "Squat", 100.0),
            rec("2024-01-01", "Bench", 80.0),
            rec("2024-01-02", "Squat", 105.0),
            rec("2024-01-02", "Deadlift", 140.0),
            rec("2024-01-04", "Bench", 82.5),
        ];
        assert_eq!(distinct_exercises(&records), vec!["Squat", "Bench", "Deadlift"]);
        assert!(distinct_exercises(&[]).is_empty());
    }

    #[test]
    fn test_series_sorted_by_date() {
        let records = vec![
            rec("2024-01-03", "Squat", 110.0),
            rec("2024-01-01", "Squat", 100.0),
            rec("2024-01-02", "Bench", 80.0),
            rec("2024-01-02", "Squat", 105.0),
        ];
        let series = series_for(&records, "Squat");
        let weights: Vec<f64> = series.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![100.0, 105.0, 110.0]);
        assert!(series.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_series_ties_keep_store_order() {
        let records = vec![
            rec("2024-01-02", "Squat", 120.0),
            rec("2024-01-01", "Squat", 100.0),
            rec("2024-01-02", "Squat", 90.0),
            rec("2024-01-02", "Squat", 130.0),
        ];
        let weights: Vec<f64> = series_for(&records, "Squat").iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![100.0, 120.0, 90.0, 130.0]);
    }

    #[test]
    fn test_series_unknown_exercise() {
        assert!(series_for(&sample_records(), "Curl").is_empty());
    }

    #[test]
    fn test_all_series_grouped() {
        let grouped = all_series_grouped(&sample_records());
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "Bench Press");
        assert_eq!(grouped[0].1.len(), 2);
        assert!(grouped[0].1[1].is_pr);
        assert_eq!(grouped[1].0, "Squat");
        assert_eq!(grouped[1].1.len(), 1);
    }

    #[test]
    fn test_visible_list_filter() {
        let mut store = RecordStore::open(MemoryStore::new()).unwrap();
        for r in sample_records() {
            store.add(r).unwrap();
        }
        let all = visible_list(store.list(), None);
        assert_eq!(all.len(), 3);
        assert_eq!(visible_list(store.list(), Some("")).len(), 3);

        let squat = visible_list(store.list(), Some("Squat"));
        assert_eq!(squat.len(), 1);
        assert_eq!(squat[0].index, 2);
        assert_eq!(squat[0].id, store.list()[2].id);

        assert!(visible_list(store.list(), Some("Curl")).is_empty());
    }

    #[test]
    fn test_chart_points() {
        let series = series_for(&sample_records(), "Bench Press");
        let points = chart_points(&series);
        let d5 = d("2026-01-05").num_days_from_ce() as f64;
        assert_eq!(points, vec![[d5, 150.0], [d5 + 1.0, 155.0]]);
        assert_eq!(pr_points(&series), vec![[d5 + 1.0, 155.0]]);
        assert_eq!(date_from_x(d5), Some(d("2026-01-05")));
    }
}
