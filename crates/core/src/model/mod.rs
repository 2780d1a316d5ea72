mod ids;
mod progress;
mod student;
mod subject;

pub use ids::{ChapterId, LevelId, StudentId, SubjectId, TaskId};
pub use progress::{
    StepRecord, StepState, StudentProgress, SubjectProgress, TaskProgress, TaskStatus,
};
pub use student::{DEFAULT_AVATAR, DEFAULT_GRADE, Student, StudentDraft, StudentError};
pub use subject::{
    Chapter, CurriculumError, Level, Subject, SubjectError, Task, TaskDraft, TaskDraftError,
    TaskKind,
};
