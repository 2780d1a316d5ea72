//! The progress calculator: pure functions of (curriculum, progress).
//!
//! Percentages are always `round(completed / total * 100)` and 0 when the
//! total is 0, so every value lands in 0..=100.

use crate::model::{
    Chapter, StudentProgress, Subject, SubjectProgress, Task, TaskProgress,
};

/// Rounded percentage, 0 when `total` is 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Completed/total task counts for a curriculum slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskTally {
    pub completed: usize,
    pub total: usize,
}

impl TaskTally {
    #[must_use]
    pub fn percent(&self) -> u8 {
        percent(self.completed, self.total)
    }
}

fn task_completed(progress: Option<&TaskProgress>) -> bool {
    progress.is_some_and(|task| task.status.is_completed())
}

/// Overall percentage across every subject the student has progress for.
///
/// Counts all tasks of each enrolled subject's curriculum; a task counts as
/// completed only when its status is completed.
#[must_use]
pub fn overall_progress(subjects: &[Subject], progress: &StudentProgress) -> u8 {
    let mut tally = TaskTally::default();
    for (subject_id, subject_progress) in &progress.subjects {
        let Some(subject) = subjects.iter().find(|subject| &subject.id == subject_id) else {
            continue;
        };
        for task in subject.tasks() {
            tally.total += 1;
            if task_completed(subject_progress.task(&task.id)) {
                tally.completed += 1;
            }
        }
    }
    tally.percent()
}

/// Completed/total tasks for one subject.
#[must_use]
pub fn subject_tally(subject: &Subject, progress: &StudentProgress) -> TaskTally {
    let subject_progress = progress.subject(&subject.id);
    let mut tally = TaskTally::default();
    for task in subject.tasks() {
        tally.total += 1;
        let task_progress = subject_progress.and_then(|entry| entry.task(&task.id));
        if task_completed(task_progress) {
            tally.completed += 1;
        }
    }
    tally
}

/// Completed/total tasks for one chapter.
#[must_use]
pub fn chapter_tally(chapter: &Chapter, subject_progress: Option<&SubjectProgress>) -> TaskTally {
    let mut tally = TaskTally {
        completed: 0,
        total: chapter.tasks.len(),
    };
    for task in &chapter.tasks {
        let task_progress = subject_progress.and_then(|entry| entry.task(&task.id));
        if task_completed(task_progress) {
            tally.completed += 1;
        }
    }
    tally
}

/// Percentage of a task's steps recorded as done (skipped steps included).
#[must_use]
pub fn step_percent(progress: Option<&TaskProgress>, step_count: usize) -> u8 {
    let completed = progress.map_or(0, TaskProgress::completed_steps);
    percent(completed, step_count)
}

/// A task is unlocked only when every prerequisite is completed.
#[must_use]
pub fn is_unlocked(task: &Task, subject_progress: Option<&SubjectProgress>) -> bool {
    task.prerequisites.iter().all(|prerequisite| {
        task_completed(subject_progress.and_then(|entry| entry.task(prerequisite)))
    })
}
