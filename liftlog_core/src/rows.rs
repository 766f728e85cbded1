//! CSV-backed row source for workout assembly.
//!
//! The service's storage layer hands the assembler a lazy row cursor. For
//! offline tooling the same rows travel as a CSV export; this module reads
//! one lazily (so the assembler sees mid-stream errors as they happen) and
//! writes one back from a flattened workout.

use crate::{Error, Result, Set, WorkoutRow};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// CSV row format for workout exports.
///
/// The set columns are blank for an exercise with no sets yet; otherwise
/// all of them must be present.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    workout_id: i64,
    workout_name: String,
    started_at: String,
    ended_at: String,
    user_id: String,
    exercise_id: i64,
    exercise_name: String,
    #[serde(default)]
    notes: String,
    reps: Option<u32>,
    weight: Option<i32>,
    duration_ms: Option<u64>,
    rest_ms: Option<u64>,
    set_order: Option<i64>,
}

fn parse_instant(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Corrupt(format!("invalid {} timestamp {:?}: {}", field, value, e)))
}

impl TryFrom<CsvRow> for WorkoutRow {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let set = match (row.reps, row.weight, row.duration_ms, row.rest_ms, row.set_order) {
            (None, None, None, None, None) => None,
            (Some(reps), Some(weight), Some(duration_ms), Some(rest_ms), Some(order)) => {
                Some(Set {
                    reps,
                    weight,
                    duration_ms,
                    rest_ms,
                    order,
                })
            }
            _ => {
                return Err(Error::Corrupt(format!(
                    "exercise {} row has partially blank set columns",
                    row.exercise_id
                )))
            }
        };

        Ok(WorkoutRow {
            workout_id: row.workout_id,
            workout_name: row.workout_name,
            started_at: parse_instant("started_at", &row.started_at)?,
            ended_at: parse_instant("ended_at", &row.ended_at)?,
            user_id: row.user_id,
            exercise_id: row.exercise_id,
            exercise_name: row.exercise_name,
            notes: row.notes,
            set,
        })
    }
}

impl From<&WorkoutRow> for CsvRow {
    fn from(row: &WorkoutRow) -> Self {
        CsvRow {
            workout_id: row.workout_id,
            workout_name: row.workout_name.clone(),
            started_at: row.started_at.to_rfc3339(),
            ended_at: row.ended_at.to_rfc3339(),
            user_id: row.user_id.clone(),
            exercise_id: row.exercise_id,
            exercise_name: row.exercise_name.clone(),
            notes: row.notes.clone(),
            reps: row.set.as_ref().map(|s| s.reps),
            weight: row.set.as_ref().map(|s| s.weight),
            duration_ms: row.set.as_ref().map(|s| s.duration_ms),
            rest_ms: row.set.as_ref().map(|s| s.rest_ms),
            set_order: row.set.as_ref().map(|s| s.order),
        }
    }
}

/// Lazy row cursor over a workout CSV export.
///
/// Dropping the source closes the underlying reader, so early exits on the
/// error path release the file promptly.
pub struct CsvRowSource {
    inner: csv::DeserializeRecordsIntoIter<File, CsvRow>,
}

impl CsvRowSource {
    /// Open a CSV export for reading
    pub fn open(path: &Path) -> Result<Self> {
        let reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
        Ok(Self {
            inner: reader.into_deserialize(),
        })
    }
}

impl Iterator for CsvRowSource {
    type Item = Result<WorkoutRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.inner.next()?;
        Some(record.map_err(Error::from).and_then(WorkoutRow::try_from))
    }
}

/// Write flattened workout rows as a CSV export
pub fn write_rows(path: &Path, rows: &[WorkoutRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble_workout;
    use chrono::TimeZone;

    fn sample_rows() -> Vec<WorkoutRow> {
        let started_at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
        let ended_at = Utc.with_ymd_and_hms(2024, 3, 1, 19, 0, 0).unwrap();
        let base = WorkoutRow {
            workout_id: 42,
            workout_name: "Leg day".into(),
            started_at,
            ended_at,
            user_id: "u1".into(),
            exercise_id: 1,
            exercise_name: "Squat".into(),
            notes: "belt on".into(),
            set: None,
        };

        let mut with_set = base.clone();
        with_set.set = Some(Set {
            reps: 5,
            weight: 100,
            duration_ms: 25_000,
            rest_ms: 120_000,
            order: 0,
        });

        let mut empty_exercise = base.clone();
        empty_exercise.exercise_id = 2;
        empty_exercise.exercise_name = "Calf raise".into();
        empty_exercise.notes = String::new();

        vec![with_set, empty_exercise]
    }

    #[test]
    fn test_write_then_read_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workout.csv");

        let rows = sample_rows();
        write_rows(&csv_path, &rows).unwrap();

        let read: Vec<WorkoutRow> = CsvRowSource::open(&csv_path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(read, rows);
    }

    #[test]
    fn test_csv_feeds_assembler() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workout.csv");
        write_rows(&csv_path, &sample_rows()).unwrap();

        let workout = assemble_workout(CsvRowSource::open(&csv_path).unwrap()).unwrap();
        assert_eq!(workout.id, 42);
        assert_eq!(workout.exercises.len(), 2);
        assert_eq!(workout.exercises[0].sets.len(), 1);
        assert!(workout.exercises[1].sets.is_empty());
    }

    #[test]
    fn test_partial_set_columns_are_corrupt() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workout.csv");
        std::fs::write(
            &csv_path,
            "workout_id,workout_name,started_at,ended_at,user_id,exercise_id,exercise_name,notes,reps,weight,duration_ms,rest_ms,set_order\n\
             42,Leg day,2024-03-01T18:00:00+00:00,2024-03-01T19:00:00+00:00,u1,1,Squat,,5,,,,0\n",
        )
        .unwrap();

        let result: Result<Vec<WorkoutRow>> = CsvRowSource::open(&csv_path).unwrap().collect();
        assert!(matches!(result.unwrap_err(), Error::Corrupt(_)));
    }

    #[test]
    fn test_bad_timestamp_is_corrupt() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workout.csv");
        std::fs::write(
            &csv_path,
            "workout_id,workout_name,started_at,ended_at,user_id,exercise_id,exercise_name,notes,reps,weight,duration_ms,rest_ms,set_order\n\
             42,Leg day,yesterday,2024-03-01T19:00:00+00:00,u1,1,Squat,,,,,,\n",
        )
        .unwrap();

        let result: Result<Vec<WorkoutRow>> = CsvRowSource::open(&csv_path).unwrap().collect();
        assert!(matches!(result.unwrap_err(), Error::Corrupt(_)));
    }
}
