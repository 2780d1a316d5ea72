//! Shared error types for the services crate.

use thiserror::Error;

use backend::BackendError;
use tracker_core::model::{CurriculumError, StudentError, SubjectError, TaskDraftError, TaskId};
use tracker_core::steps::StepError;

/// Errors emitted by `StudentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudentServiceError {
    #[error(transparent)]
    Student(#[from] StudentError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors emitted by `SubjectService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubjectServiceError {
    #[error("chapter name cannot be empty")]
    EmptyChapterName,
    #[error(transparent)]
    Subject(#[from] SubjectError),
    #[error(transparent)]
    Task(#[from] TaskDraftError),
    #[error(transparent)]
    Curriculum(#[from] CurriculumError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("task {0} is locked behind incomplete prerequisites")]
    TaskLocked(TaskId),
    #[error(transparent)]
    Step(#[from] StepError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsServiceError {
    #[error(transparent)]
    Backend(#[from] BackendError),
}
