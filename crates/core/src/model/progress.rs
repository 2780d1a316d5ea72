use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::{LevelId, StudentId, SubjectId, TaskId};
use crate::model::subject::Subject;

/// Lifecycle of a task for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

/// Sub-state of a single step within a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Incomplete,
    Completed,
    Skipped,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Wire record for one step. `skipped` is only serialized when set, matching
/// the stored documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl StepRecord {
    #[must_use]
    pub fn state(&self) -> StepState {
        if !self.completed {
            StepState::Incomplete
        } else if self.skipped {
            StepState::Skipped
        } else {
            StepState::Completed
        }
    }
}

/// Progress of one student through one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub status: TaskStatus,
    #[serde(default)]
    pub current_step: usize,
    #[serde(default)]
    pub step_progress: Vec<StepRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskProgress {
    /// Number of steps recorded as completed (skipped steps included).
    #[must_use]
    pub fn completed_steps(&self) -> usize {
        self.step_progress
            .iter()
            .filter(|record| record.completed)
            .count()
    }

    /// Most recent activity timestamp, preferring completion over start.
    #[must_use]
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.completed_at.or(self.started_at)
    }
}

/// Progress of one student through one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProgress {
    pub current_level: LevelId,
    #[serde(default)]
    pub total_progress: u8,
    #[serde(default)]
    pub tasks: HashMap<TaskId, TaskProgress>,
}

impl SubjectProgress {
    /// Fresh entry for a subject the student just started.
    #[must_use]
    pub fn seeded(current_level: LevelId) -> Self {
        Self {
            current_level,
            total_progress: 0,
            tasks: HashMap::new(),
        }
    }

    #[must_use]
    pub fn task(&self, task_id: &TaskId) -> Option<&TaskProgress> {
        self.tasks.get(task_id)
    }
}

/// The whole progress document for one student, as stored on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    pub student_id: StudentId,
    #[serde(default)]
    pub subjects: HashMap<SubjectId, SubjectProgress>,
}

impl StudentProgress {
    /// Empty document for a student with no recorded progress.
    #[must_use]
    pub fn empty(student_id: StudentId) -> Self {
        Self {
            student_id,
            subjects: HashMap::new(),
        }
    }

    #[must_use]
    pub fn subject(&self, subject_id: &SubjectId) -> Option<&SubjectProgress> {
        self.subjects.get(subject_id)
    }

    /// Ensures an entry exists for the subject, seeding `currentLevel` from
    /// its first level. Returns true when a new entry was inserted.
    pub fn ensure_subject(&mut self, subject: &Subject) -> bool {
        if self.subjects.contains_key(&subject.id) {
            return false;
        }
        let level = subject
            .levels
            .first()
            .map_or_else(|| LevelId::new("grade_1"), |level| level.id.clone());
        self.subjects
            .insert(subject.id.clone(), SubjectProgress::seeded(level));
        true
    }

    #[must_use]
    pub fn task(&self, subject_id: &SubjectId, task_id: &TaskId) -> Option<&TaskProgress> {
        self.subjects.get(subject_id)?.tasks.get(task_id)
    }

    /// Stores a task's progress, overwriting any previous entry.
    ///
    /// Has no effect when the subject has no progress entry yet; callers seed
    /// one with [`StudentProgress::ensure_subject`] first.
    pub fn put_task(&mut self, subject_id: &SubjectId, task_id: TaskId, progress: TaskProgress) {
        if let Some(subject) = self.subjects.get_mut(subject_id) {
            subject.tasks.insert(task_id, progress);
        }
    }

    /// Deletes a task's progress entry entirely. Returns true when an entry
    /// was removed.
    pub fn remove_task(&mut self, subject_id: &SubjectId, task_id: &TaskId) -> bool {
        self.subjects
            .get_mut(subject_id)
            .is_some_and(|subject| subject.tasks.remove(task_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::subject::{Level, SubjectError};
    use crate::time::fixed_now;

    fn subject_with_levels(levels: Vec<Level>) -> Result<Subject, SubjectError> {
        let mut subject = Subject::new("math", "Math", "", "", "")?;
        subject.levels = levels;
        Ok(subject)
    }

    #[test]
    fn step_record_state_resolution() {
        let mut record = StepRecord::default();
        assert_eq!(record.state(), StepState::Incomplete);

        record.completed = true;
        assert_eq!(record.state(), StepState::Completed);

        record.skipped = true;
        assert_eq!(record.state(), StepState::Skipped);
    }

    #[test]
    fn ensure_subject_seeds_first_level_once() {
        let subject = subject_with_levels(vec![Level {
            id: LevelId::new("grade_3"),
            name: "Grade 3".to_owned(),
            chapters: Vec::new(),
        }])
        .unwrap();

        let mut progress = StudentProgress::empty(StudentId::new("student_001"));
        assert!(progress.ensure_subject(&subject));
        assert!(!progress.ensure_subject(&subject));

        let entry = progress.subject(&SubjectId::new("math")).unwrap();
        assert_eq!(entry.current_level, LevelId::new("grade_3"));
        assert_eq!(entry.total_progress, 0);
        assert!(entry.tasks.is_empty());
    }

    #[test]
    fn ensure_subject_falls_back_without_levels() {
        let subject = subject_with_levels(Vec::new()).unwrap();
        let mut progress = StudentProgress::empty(StudentId::new("student_001"));
        progress.ensure_subject(&subject);
        let entry = progress.subject(&SubjectId::new("math")).unwrap();
        assert_eq!(entry.current_level, LevelId::new("grade_1"));
    }

    #[test]
    fn remove_task_deletes_the_entry() {
        let subject = subject_with_levels(Vec::new()).unwrap();
        let mut progress = StudentProgress::empty(StudentId::new("student_001"));
        progress.ensure_subject(&subject);
        progress.put_task(
            &SubjectId::new("math"),
            TaskId::new("task_001"),
            TaskProgress {
                status: TaskStatus::InProgress,
                current_step: 0,
                step_progress: vec![StepRecord::default()],
                started_at: Some(fixed_now()),
                completed_at: None,
            },
        );

        assert!(progress.remove_task(&SubjectId::new("math"), &TaskId::new("task_001")));
        assert!(
            progress
                .task(&SubjectId::new("math"), &TaskId::new("task_001"))
                .is_none()
        );
        assert!(!progress.remove_task(&SubjectId::new("math"), &TaskId::new("task_001")));
    }

    #[test]
    fn wire_shape_round_trips() {
        let json = r#"{
            "studentId": "student_001",
            "subjects": {
                "math": {
                    "currentLevel": "grade_1",
                    "totalProgress": 0,
                    "tasks": {
                        "task_001": {
                            "status": "in_progress",
                            "currentStep": 1,
                            "stepProgress": [
                                {"completed": true, "completedAt": "2024-01-20T08:30:00Z"},
                                {"completed": true, "skipped": true, "completedAt": "2024-01-20T08:31:00Z"},
                                {"completed": false}
                            ],
                            "startedAt": "2024-01-20T08:00:00Z"
                        }
                    }
                }
            }
        }"#;

        let progress: StudentProgress = serde_json::from_str(json).unwrap();
        let task = progress
            .task(&SubjectId::new("math"), &TaskId::new("task_001"))
            .unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.completed_steps(), 2);
        assert_eq!(task.step_progress[1].state(), StepState::Skipped);

        let back = serde_json::to_string(&progress).unwrap();
        let reparsed: StudentProgress = serde_json::from_str(&back).unwrap();
        assert_eq!(reparsed, progress);
        // The skipped flag is omitted for unskipped steps.
        assert_eq!(back.matches("\"skipped\"").count(), 1);
    }

    #[test]
    fn last_activity_prefers_completion() {
        let started = fixed_now();
        let completed = started + chrono::Duration::minutes(30);
        let task = TaskProgress {
            status: TaskStatus::Completed,
            current_step: 1,
            step_progress: vec![StepRecord {
                completed: true,
                skipped: false,
                completed_at: Some(completed),
            }],
            started_at: Some(started),
            completed_at: Some(completed),
        };
        assert_eq!(task.last_activity(), Some(completed));
    }
}
