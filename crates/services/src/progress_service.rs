use std::sync::Arc;

use backend::{ProgressRepository, SubjectStats};
use tracker_core::model::{
    StudentId, StudentProgress, Subject, SubjectId, Task, TaskId, TaskProgress,
};
use tracker_core::steps;
use tracker_core::{Clock, progress};

use crate::error::ProgressServiceError;

/// Result of acting on a step: the task's updated progress plus whether this
/// very action completed the task (drives the celebration toast).
#[derive(Debug, Clone, PartialEq)]
pub struct StepAction {
    pub progress: TaskProgress,
    pub just_completed: bool,
}

/// Orchestrates the fetch-modify-save progress workflows.
///
/// Every mutation loads the student's whole progress document, applies the
/// state machine, and stores the document back; last writer wins.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, progress }
    }

    /// Load a student's progress document.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Backend` if the backend call fails.
    pub async fn load(&self, student_id: &StudentId) -> Result<StudentProgress, ProgressServiceError> {
        let document = self.progress.get_progress(student_id).await?;
        Ok(document)
    }

    /// Load a student's progress, guaranteeing an entry for the given subject
    /// (documents written before an enrollment change may lack one).
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Backend` if the backend call fails.
    pub async fn load_for_subject(
        &self,
        student_id: &StudentId,
        subject: &Subject,
    ) -> Result<StudentProgress, ProgressServiceError> {
        let mut document = self.progress.get_progress(student_id).await?;
        if document.ensure_subject(subject) {
            self.progress.save_progress(&document).await?;
        }
        Ok(document)
    }

    /// Open a task, seeding its progress on first open.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::TaskNotFound` for an unknown task,
    /// `ProgressServiceError::TaskLocked` when a prerequisite is incomplete,
    /// and `ProgressServiceError::Backend` for backend failures.
    pub async fn open_task(
        &self,
        student_id: &StudentId,
        subject: &Subject,
        task_id: &TaskId,
    ) -> Result<TaskProgress, ProgressServiceError> {
        let task = find_task(subject, task_id)?;
        let mut document = self.load_for_subject(student_id, subject).await?;

        if !progress::is_unlocked(task, document.subject(&subject.id)) {
            return Err(ProgressServiceError::TaskLocked(task_id.clone()));
        }

        if let Some(existing) = document.task(&subject.id, task_id) {
            return Ok(existing.clone());
        }

        let seeded = steps::start_task(task.step_count(), self.clock.now());
        document.put_task(&subject.id, task_id.clone(), seeded.clone());
        self.progress.save_progress(&document).await?;
        tracing::debug!(student_id = %student_id, task_id = %task_id, "task started");
        Ok(seeded)
    }

    /// Mark a step completed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::TaskNotFound`, `::Step` for a bad
    /// index, or `::Backend` for backend failures.
    pub async fn complete_step(
        &self,
        student_id: &StudentId,
        subject: &Subject,
        task_id: &TaskId,
        index: usize,
    ) -> Result<StepAction, ProgressServiceError> {
        self.apply_step(student_id, subject, task_id, |entry, step_count, now| {
            let outcome = steps::complete_step(entry, index, step_count, now)?;
            Ok(outcome.just_completed())
        })
        .await
    }

    /// Mark a step skipped (recorded as done, task left open).
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::TaskNotFound`, `::Step` for a bad
    /// index, or `::Backend` for backend failures.
    pub async fn skip_step(
        &self,
        student_id: &StudentId,
        subject: &Subject,
        task_id: &TaskId,
        index: usize,
    ) -> Result<StepAction, ProgressServiceError> {
        self.apply_step(student_id, subject, task_id, |entry, step_count, now| {
            steps::skip_step(entry, index, step_count, now)?;
            Ok(false)
        })
        .await
    }

    /// Revert a step to incomplete, reopening the task if needed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::TaskNotFound`, `::Step` for a bad
    /// index, or `::Backend` for backend failures.
    pub async fn uncomplete_step(
        &self,
        student_id: &StudentId,
        subject: &Subject,
        task_id: &TaskId,
        index: usize,
    ) -> Result<StepAction, ProgressServiceError> {
        self.apply_step(student_id, subject, task_id, |entry, step_count, _now| {
            steps::uncomplete_step(entry, index, step_count)?;
            Ok(false)
        })
        .await
    }

    async fn apply_step<F>(
        &self,
        student_id: &StudentId,
        subject: &Subject,
        task_id: &TaskId,
        action: F,
    ) -> Result<StepAction, ProgressServiceError>
    where
        F: FnOnce(
            &mut TaskProgress,
            usize,
            chrono::DateTime<chrono::Utc>,
        ) -> Result<bool, ProgressServiceError>,
    {
        let task = find_task(subject, task_id)?;
        let step_count = task.step_count();
        let now = self.clock.now();

        let mut document = self.load_for_subject(student_id, subject).await?;
        let mut entry = document
            .task(&subject.id, task_id)
            .cloned()
            .unwrap_or_else(|| steps::start_task(step_count, now));

        let just_completed = action(&mut entry, step_count, now)?;

        document.put_task(&subject.id, task_id.clone(), entry.clone());
        self.progress.save_progress(&document).await?;

        if just_completed {
            tracing::debug!(student_id = %student_id, task_id = %task_id, "task completed");
        }
        Ok(StepAction {
            progress: entry,
            just_completed,
        })
    }

    /// Delete a task's progress entry entirely. Returns true when an entry
    /// was removed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Backend` if the backend call fails.
    pub async fn reset_task(
        &self,
        student_id: &StudentId,
        subject_id: &SubjectId,
        task_id: &TaskId,
    ) -> Result<bool, ProgressServiceError> {
        let mut document = self.progress.get_progress(student_id).await?;
        if !document.remove_task(subject_id, task_id) {
            return Ok(false);
        }
        self.progress.save_progress(&document).await?;
        tracing::debug!(student_id = %student_id, task_id = %task_id, "task reset");
        Ok(true)
    }

    /// Server-computed completed/total stats for one subject.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Backend` if the backend call fails.
    pub async fn subject_stats(
        &self,
        student_id: &StudentId,
        subject_id: &SubjectId,
    ) -> Result<SubjectStats, ProgressServiceError> {
        let stats = self.progress.subject_stats(student_id, subject_id).await?;
        Ok(stats)
    }
}

fn find_task<'a>(subject: &'a Subject, task_id: &TaskId) -> Result<&'a Task, ProgressServiceError> {
    subject
        .find_task(task_id)
        .ok_or_else(|| ProgressServiceError::TaskNotFound(task_id.clone()))
}
