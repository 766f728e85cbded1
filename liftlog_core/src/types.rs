//! Core domain types for the Liftlog user-state system.
//!
//! This module defines:
//! - The workout hierarchy (workouts, exercises, sets)
//! - The flat row shape produced by the storage layer's join
//! - The decoded form of a stored user blob

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Workout Hierarchy
// ============================================================================

/// A single set within an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Set {
    pub reps: u32,
    /// Weight in a caller-defined unit (may be negative for assisted work)
    pub weight: i32,
    /// Time in milliseconds taken to perform the set
    pub duration_ms: u64,
    /// Time in milliseconds of rest before the next set
    pub rest_ms: u64,
    /// Display order within the owning exercise
    pub order: i64,
}

/// An exercise within a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub notes: String,
    /// Sets actually performed, in display order
    pub sets: Vec<Set>,
    /// Planned sets, positionally correlated with `sets`.
    ///
    /// Lengths may differ: a shorter `sets` list means the trailing
    /// expectations have no corresponding performance yet. Neither list
    /// is ever null-padded to match the other.
    pub expected: Vec<Set>,
}

/// A workout session with its ordered exercises
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workout {
    pub id: i64,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Back-reference to the owning user (not ownership)
    pub user_id: String,
    pub exercises: Vec<Exercise>,
}

impl Workout {
    /// Flatten the hierarchy back into display-ordered rows.
    ///
    /// Produces one row per set, and a single set-less row for an exercise
    /// with no sets, so that `assemble_workout` round-trips the result.
    pub fn flatten(&self) -> Vec<WorkoutRow> {
        let mut rows = Vec::new();
        for exercise in &self.exercises {
            if exercise.sets.is_empty() {
                rows.push(self.row_for(exercise, None));
                continue;
            }
            for set in &exercise.sets {
                rows.push(self.row_for(exercise, Some(set.clone())));
            }
        }
        rows
    }

    fn row_for(&self, exercise: &Exercise, set: Option<Set>) -> WorkoutRow {
        WorkoutRow {
            workout_id: self.id,
            workout_name: self.name.clone(),
            started_at: self.started_at,
            ended_at: self.ended_at,
            user_id: self.user_id.clone(),
            exercise_id: exercise.id,
            exercise_name: exercise.name.clone(),
            notes: exercise.notes.clone(),
            set,
        }
    }
}

// ============================================================================
// Flat Row Shape
// ============================================================================

/// One denormalized row from the storage layer's workout join.
///
/// Each row carries the workout and exercise columns alongside at most one
/// set. `set` is `None` when the exercise has no sets yet (an outer join
/// produces one such row so the exercise still appears).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkoutRow {
    pub workout_id: i64,
    pub workout_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub user_id: String,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub notes: String,
    pub set: Option<Set>,
}

// ============================================================================
// Stored User Blob
// ============================================================================

/// The decoded form of a user's stored blob.
///
/// The store itself never interprets blobs; this type exists so upstream
/// write paths can check a payload is well-formed before accepting it, and
/// so account creation can mint an initial blob.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UserState {
    #[serde(default)]
    pub name: String,
    /// Workouts keyed by start time (unix seconds)
    #[serde(default)]
    pub workouts: BTreeMap<i64, Workout>,
    /// The user's personal list of workout templates
    #[serde(default)]
    pub templates: Vec<Workout>,
    /// Favorite exercises; only `expected` is populated, `sets` stays empty
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}
