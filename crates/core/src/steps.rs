//! The task step state machine.
//!
//! A task moves pending -> in_progress -> completed while each step carries
//! its own sub-state (incomplete, completed, skipped). Only completing a step
//! can flip the task to completed; a skip records the step as done but leaves
//! the task open until something is actually completed.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{StepRecord, TaskProgress, TaskStatus};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepError {
    #[error("step index {index} is out of range for a task with {step_count} steps")]
    OutOfRange { index: usize, step_count: usize },
}

/// What a step action did to the surrounding task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The task stays in progress.
    InProgress,
    /// This action completed the task (flipped exactly now).
    TaskCompleted,
}

impl StepOutcome {
    #[must_use]
    pub fn just_completed(self) -> bool {
        matches!(self, StepOutcome::TaskCompleted)
    }
}

/// Seeds progress for a task being opened for the first time: one incomplete
/// record per step, pointer at the first step, status in_progress.
#[must_use]
pub fn start_task(step_count: usize, now: DateTime<Utc>) -> TaskProgress {
    TaskProgress {
        status: TaskStatus::InProgress,
        current_step: 0,
        step_progress: vec![StepRecord::default(); step_count],
        started_at: Some(now),
        completed_at: None,
    }
}

fn check_index(index: usize, step_count: usize) -> Result<(), StepError> {
    if index >= step_count {
        return Err(StepError::OutOfRange { index, step_count });
    }
    Ok(())
}

/// Stored documents may carry fewer records than the task has steps (the
/// curriculum can grow after progress was recorded). Pad up to the index.
fn record_mut(progress: &mut TaskProgress, index: usize) -> &mut StepRecord {
    if progress.step_progress.len() <= index {
        progress.step_progress.resize(index + 1, StepRecord::default());
    }
    &mut progress.step_progress[index]
}

fn advance_pointer(progress: &mut TaskProgress, index: usize, step_count: usize) {
    if index == progress.current_step {
        progress.current_step = (index + 1).min(step_count);
    }
}

/// Marks a step completed and advances the pointer when the completed step is
/// the current one. When every record is completed the task flips to
/// completed, exactly once.
///
/// # Errors
///
/// Returns `StepError::OutOfRange` when the index is not a valid step.
pub fn complete_step(
    progress: &mut TaskProgress,
    index: usize,
    step_count: usize,
    now: DateTime<Utc>,
) -> Result<StepOutcome, StepError> {
    check_index(index, step_count)?;

    let record = record_mut(progress, index);
    record.completed = true;
    record.completed_at = Some(now);

    advance_pointer(progress, index, step_count);

    let all_completed = progress.step_progress.len() >= step_count
        && progress.step_progress.iter().all(|record| record.completed);
    if all_completed && progress.status != TaskStatus::Completed {
        progress.status = TaskStatus::Completed;
        progress.completed_at = Some(now);
        return Ok(StepOutcome::TaskCompleted);
    }

    Ok(StepOutcome::InProgress)
}

/// Marks a step skipped (recorded as done) and advances the pointer. Skipping
/// never completes the task by itself.
///
/// # Errors
///
/// Returns `StepError::OutOfRange` when the index is not a valid step.
pub fn skip_step(
    progress: &mut TaskProgress,
    index: usize,
    step_count: usize,
    now: DateTime<Utc>,
) -> Result<(), StepError> {
    check_index(index, step_count)?;

    let record = record_mut(progress, index);
    record.completed = true;
    record.skipped = true;
    record.completed_at = Some(now);

    advance_pointer(progress, index, step_count);
    Ok(())
}

/// Reverts a step to incomplete, rewinds the pointer to it, and reopens the
/// task when it had been completed.
///
/// # Errors
///
/// Returns `StepError::OutOfRange` when the index is not a valid step.
pub fn uncomplete_step(
    progress: &mut TaskProgress,
    index: usize,
    step_count: usize,
) -> Result<(), StepError> {
    check_index(index, step_count)?;

    let record = record_mut(progress, index);
    record.completed = false;
    record.skipped = false;
    record.completed_at = None;

    progress.status = TaskStatus::InProgress;
    progress.current_step = progress.current_step.min(index);
    progress.completed_at = None;
    Ok(())
}
