//! Hierarchy assembler: flat join rows to one nested workout.
//!
//! The storage layer returns one denormalized row per set (or one set-less
//! row for an exercise with no sets). This module folds that sequence into
//! a `Workout` with its exercises in first-seen order and each exercise's
//! sets ordered by the explicit order column.

use crate::ordering::sort_sets_by_order;
use crate::{Error, Exercise, Result, Workout, WorkoutRow};
use std::collections::HashMap;

/// Assemble one workout from an ordered sequence of join rows.
///
/// The cursor is drained to completion: a mid-stream read error aborts the
/// whole assembly rather than silently truncating the result. Zero rows is
/// `NotFound` (the caller must not render a blank workout), and rows that
/// disagree on workout identity are `Inconsistent`.
pub fn assemble_workout<I>(rows: I) -> Result<Workout>
where
    I: IntoIterator<Item = Result<WorkoutRow>>,
{
    let mut workout: Option<Workout> = None;
    let mut exercises: Vec<Exercise> = Vec::new();
    let mut slots: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let row = row?;

        match &workout {
            None => {
                workout = Some(Workout {
                    id: row.workout_id,
                    name: row.workout_name.clone(),
                    started_at: row.started_at,
                    ended_at: row.ended_at,
                    user_id: row.user_id.clone(),
                    exercises: Vec::new(),
                });
            }
            Some(w) if w.id != row.workout_id => {
                return Err(Error::Inconsistent(format!(
                    "rows span workouts {} and {}",
                    w.id, row.workout_id
                )));
            }
            Some(_) => {}
        }

        // Group by exercise id, preserving first-seen order
        let slot = match slots.get(&row.exercise_id) {
            Some(&slot) => slot,
            None => {
                exercises.push(Exercise {
                    id: row.exercise_id,
                    name: row.exercise_name.clone(),
                    notes: row.notes.clone(),
                    sets: Vec::new(),
                    expected: Vec::new(),
                });
                slots.insert(row.exercise_id, exercises.len() - 1);
                exercises.len() - 1
            }
        };

        if let Some(set) = row.set {
            exercises[slot].sets.push(set);
        }
    }

    let mut workout = workout.ok_or_else(|| Error::NotFound("no rows for workout".into()))?;

    for exercise in &mut exercises {
        sort_sets_by_order(&mut exercise.sets);
    }
    workout.exercises = exercises;

    tracing::debug!(
        "Assembled workout {} with {} exercises",
        workout.id,
        workout.exercises.len()
    );
    Ok(workout)
}
