use tracker_core::model::{
    ChapterId, Student, StudentProgress, Subject, SubjectId, TaskId, TaskStatus,
};
use tracker_core::progress::{chapter_tally, is_unlocked, step_percent, subject_tally};

/// Card on the student dashboard, one per enrolled subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectCardVm {
    pub id: SubjectId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub percent: u8,
    pub tasks_label: String,
}

/// Row in the admin subject list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectAdminRowVm {
    pub id: SubjectId,
    pub title: String,
    pub meta_line: String,
    pub description: String,
}

/// One task row on the subject page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRowVm {
    pub id: TaskId,
    pub name: String,
    pub status_icon: &'static str,
    pub stars: String,
    pub step_percent: u8,
    pub meta_label: String,
    pub locked: bool,
    pub action_label: &'static str,
    pub can_reset: bool,
}

/// A chapter with its progress bar and task rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterVm {
    pub id: ChapterId,
    pub name: String,
    pub description: String,
    pub percent: u8,
    pub tasks: Vec<TaskRowVm>,
}

/// Difficulty as a star string.
#[must_use]
pub fn stars(difficulty: u8) -> String {
    "\u{2B50}".repeat(usize::from(difficulty.clamp(1, 5)))
}

/// Dashboard cards for the subjects the student is enrolled in, in enrollment
/// order.
#[must_use]
pub fn map_subject_cards(
    student: &Student,
    subjects: &[Subject],
    progress: &StudentProgress,
) -> Vec<SubjectCardVm> {
    student
        .subjects
        .iter()
        .filter_map(|subject_id| subjects.iter().find(|subject| &subject.id == subject_id))
        .map(|subject| {
            let tally = subject_tally(subject, progress);
            SubjectCardVm {
                id: subject.id.clone(),
                name: subject.name.clone(),
                icon: subject.icon.clone(),
                color: subject.color.clone(),
                percent: tally.percent(),
                tasks_label: format!("{}/{} tasks", tally.completed, tally.total),
            }
        })
        .collect()
}

/// Admin list rows, one per subject.
#[must_use]
pub fn map_subject_admin_rows(subjects: &[Subject]) -> Vec<SubjectAdminRowVm> {
    subjects
        .iter()
        .map(|subject| SubjectAdminRowVm {
            id: subject.id.clone(),
            title: format!("{} {}", subject.icon, subject.name),
            meta_line: format!("ID: {} | Tasks: {}", subject.id, subject.task_count()),
            description: if subject.description.is_empty() {
                "No description".to_owned()
            } else {
                subject.description.clone()
            },
        })
        .collect()
}

/// Chapters with task rows for the subject page.
#[must_use]
pub fn map_chapters(subject: &Subject, progress: &StudentProgress) -> Vec<ChapterVm> {
    let subject_progress = progress.subject(&subject.id);

    subject
        .levels
        .iter()
        .flat_map(|level| &level.chapters)
        .map(|chapter| {
            let tally = chapter_tally(chapter, subject_progress);
            let tasks = chapter
                .tasks
                .iter()
                .map(|task| {
                    let task_progress = subject_progress.and_then(|entry| entry.task(&task.id));
                    let status = task_progress.map(|entry| entry.status);
                    let locked = !is_unlocked(task, subject_progress);

                    let status_icon = match status {
                        Some(TaskStatus::Completed) => "\u{2705}",
                        Some(TaskStatus::InProgress) => "\u{1F504}",
                        _ if locked => "\u{1F512}",
                        _ => "\u{23F3}",
                    };
                    let action_label = match status {
                        Some(TaskStatus::Completed) => "Review",
                        Some(TaskStatus::InProgress) => "Continue",
                        _ => "Start",
                    };

                    TaskRowVm {
                        id: task.id.clone(),
                        name: task.name.clone(),
                        status_icon,
                        stars: stars(task.difficulty),
                        step_percent: step_percent(task_progress, task.step_count()),
                        meta_label: format!("{} min | {}", task.estimated_time, task.kind.label()),
                        locked,
                        action_label,
                        can_reset: status.is_some_and(|status| status != TaskStatus::Pending),
                    }
                })
                .collect();

            ChapterVm {
                id: chapter.id.clone(),
                name: chapter.name.clone(),
                description: chapter.description.clone(),
                percent: tally.percent(),
                tasks,
            }
        })
        .collect()
}
