use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ChapterId, LevelId, SubjectId, TaskId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectError {
    #[error("subject id cannot be empty")]
    EmptyId,

    #[error("subject name cannot be empty")]
    EmptyName,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskDraftError {
    #[error("task name cannot be empty")]
    EmptyName,

    #[error("task difficulty must be between 1 and 5")]
    InvalidDifficulty,

    #[error("estimated time must be between 5 and 120 minutes")]
    InvalidEstimatedTime,

    #[error("a task needs at least one step")]
    NoSteps,
}

/// Errors from editing a subject's curriculum tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("level not found: {0}")]
    LevelNotFound(LevelId),

    #[error("chapter not found: {0}")]
    ChapterNotFound(ChapterId),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

/// What a task asks of the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Concept,
    Skill,
    Practice,
    Test,
}

impl TaskKind {
    /// Human-readable label for lists and forms.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TaskKind::Concept => "Concept",
            TaskKind::Skill => "Skill drill",
            TaskKind::Practice => "Practice",
            TaskKind::Test => "Test",
        }
    }
}

/// An atomic learning unit composed of ordered steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default = "default_estimated_time")]
    pub estimated_time: u32,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default)]
    pub prerequisites: Vec<TaskId>,
}

fn default_estimated_time() -> u32 {
    30
}

fn default_difficulty() -> u8 {
    1
}

impl Task {
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// Validated fields for creating or updating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    name: String,
    kind: TaskKind,
    difficulty: u8,
    estimated_time: u32,
    steps: Vec<String>,
    prerequisites: Vec<TaskId>,
}

impl TaskDraft {
    /// Creates a draft, trimming the name and step lines.
    ///
    /// # Errors
    ///
    /// Returns `TaskDraftError` when the name is empty, difficulty is outside
    /// 1..=5, estimated time is outside 5..=120, or no non-empty step remains.
    pub fn new(
        name: impl Into<String>,
        kind: TaskKind,
        difficulty: u8,
        estimated_time: u32,
        steps: Vec<String>,
        prerequisites: Vec<TaskId>,
    ) -> Result<Self, TaskDraftError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TaskDraftError::EmptyName);
        }
        if !(1..=5).contains(&difficulty) {
            return Err(TaskDraftError::InvalidDifficulty);
        }
        if !(5..=120).contains(&estimated_time) {
            return Err(TaskDraftError::InvalidEstimatedTime);
        }

        let steps: Vec<String> = steps
            .into_iter()
            .map(|step| step.trim().to_owned())
            .filter(|step| !step.is_empty())
            .collect();
        if steps.is_empty() {
            return Err(TaskDraftError::NoSteps);
        }

        Ok(Self {
            name: name.trim().to_owned(),
            kind,
            difficulty,
            estimated_time,
            steps,
            prerequisites,
        })
    }

    /// Materializes the draft into a task with the given id.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            name: self.name,
            kind: self.kind,
            steps: self.steps,
            estimated_time: self.estimated_time,
            difficulty: self.difficulty,
            prerequisites: self.prerequisites,
        }
    }

    /// Applies the draft onto an existing task, keeping its id.
    pub fn apply_to(self, task: &mut Task) {
        task.name = self.name;
        task.kind = self.kind;
        task.steps = self.steps;
        task.estimated_time = self.estimated_time;
        task.difficulty = self.difficulty;
        task.prerequisites = self.prerequisites;
    }
}

/// A group of tasks under one heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// An ordered stage of a subject's curriculum (for example a school year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// A subject with its full curriculum tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub levels: Vec<Level>,
}

impl Subject {
    /// Builds a new subject shell with no levels.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError` when id or name is empty after trimming.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, SubjectError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SubjectError::EmptyId);
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectError::EmptyName);
        }

        let icon = icon.into().trim().to_owned();
        let color = color.into().trim().to_owned();
        Ok(Self {
            id: SubjectId::new(id.trim()),
            name: name.trim().to_owned(),
            icon: if icon.is_empty() {
                "\u{1F4DA}".to_owned()
            } else {
                icon
            },
            color: if color.is_empty() {
                "#666666".to_owned()
            } else {
                color
            },
            description: description.into().trim().to_owned(),
            levels: Vec::new(),
        })
    }

    /// Total number of tasks across all levels and chapters.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.levels
            .iter()
            .flat_map(|level| &level.chapters)
            .map(|chapter| chapter.tasks.len())
            .sum()
    }

    /// Iterates every task in curriculum order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.levels
            .iter()
            .flat_map(|level| &level.chapters)
            .flat_map(|chapter| &chapter.tasks)
    }

    /// Finds a task anywhere in the tree.
    #[must_use]
    pub fn find_task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks().find(|task| &task.id == task_id)
    }

    fn find_task_mut(&mut self, task_id: &TaskId) -> Option<&mut Task> {
        self.levels
            .iter_mut()
            .flat_map(|level| &mut level.chapters)
            .flat_map(|chapter| &mut chapter.tasks)
            .find(|task| &task.id == task_id)
    }

    /// Finds a chapter anywhere in the tree, with its level id.
    #[must_use]
    pub fn find_chapter(&self, chapter_id: &ChapterId) -> Option<(&LevelId, &Chapter)> {
        self.levels.iter().find_map(|level| {
            level
                .chapters
                .iter()
                .find(|chapter| &chapter.id == chapter_id)
                .map(|chapter| (&level.id, chapter))
        })
    }

    fn level_mut(&mut self, level_id: &LevelId) -> Option<&mut Level> {
        self.levels.iter_mut().find(|level| &level.id == level_id)
    }

    /// Appends a chapter to the given level.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::LevelNotFound` when the level does not exist.
    pub fn add_chapter(
        &mut self,
        level_id: &LevelId,
        chapter: Chapter,
    ) -> Result<(), CurriculumError> {
        let level = self
            .level_mut(level_id)
            .ok_or_else(|| CurriculumError::LevelNotFound(level_id.clone()))?;
        level.chapters.push(chapter);
        Ok(())
    }

    /// Renames a chapter and, when `new_level_id` differs from its current
    /// level, moves it (with its tasks) to the end of the new level.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::ChapterNotFound` when the chapter does not
    /// exist, or `CurriculumError::LevelNotFound` for an unknown target level.
    pub fn update_chapter(
        &mut self,
        chapter_id: &ChapterId,
        name: impl Into<String>,
        description: impl Into<String>,
        new_level_id: &LevelId,
    ) -> Result<(), CurriculumError> {
        if self.level_mut(new_level_id).is_none() {
            return Err(CurriculumError::LevelNotFound(new_level_id.clone()));
        }

        let (current_level_id, _) = self
            .find_chapter(chapter_id)
            .ok_or_else(|| CurriculumError::ChapterNotFound(chapter_id.clone()))?;
        let current_level_id = current_level_id.clone();

        let name = name.into();
        let description = description.into();

        if current_level_id == *new_level_id {
            let chapter = self
                .chapter_mut(chapter_id)
                .ok_or_else(|| CurriculumError::ChapterNotFound(chapter_id.clone()))?;
            chapter.name = name;
            chapter.description = description;
            return Ok(());
        }

        let mut chapter = self
            .take_chapter(&current_level_id, chapter_id)
            .ok_or_else(|| CurriculumError::ChapterNotFound(chapter_id.clone()))?;
        chapter.name = name;
        chapter.description = description;
        // Checked above; the target level exists.
        if let Some(level) = self.level_mut(new_level_id) {
            level.chapters.push(chapter);
        }
        Ok(())
    }

    /// Removes a chapter and all of its tasks.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::ChapterNotFound` when the chapter does not
    /// exist.
    pub fn remove_chapter(&mut self, chapter_id: &ChapterId) -> Result<(), CurriculumError> {
        for level in &mut self.levels {
            if let Some(index) = level
                .chapters
                .iter()
                .position(|chapter| &chapter.id == chapter_id)
            {
                level.chapters.remove(index);
                return Ok(());
            }
        }
        Err(CurriculumError::ChapterNotFound(chapter_id.clone()))
    }

    fn chapter_mut(&mut self, chapter_id: &ChapterId) -> Option<&mut Chapter> {
        self.levels
            .iter_mut()
            .flat_map(|level| &mut level.chapters)
            .find(|chapter| &chapter.id == chapter_id)
    }

    fn take_chapter(&mut self, level_id: &LevelId, chapter_id: &ChapterId) -> Option<Chapter> {
        let level = self.level_mut(level_id)?;
        let index = level
            .chapters
            .iter()
            .position(|chapter| &chapter.id == chapter_id)?;
        Some(level.chapters.remove(index))
    }

    /// Appends a task to the given chapter.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::ChapterNotFound` when the chapter does not
    /// exist.
    pub fn add_task(&mut self, chapter_id: &ChapterId, task: Task) -> Result<(), CurriculumError> {
        let chapter = self
            .chapter_mut(chapter_id)
            .ok_or_else(|| CurriculumError::ChapterNotFound(chapter_id.clone()))?;
        chapter.tasks.push(task);
        Ok(())
    }

    /// Applies a draft onto an existing task, wherever it lives.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::TaskNotFound` when the task does not exist.
    pub fn update_task(&mut self, task_id: &TaskId, draft: TaskDraft) -> Result<(), CurriculumError> {
        let task = self
            .find_task_mut(task_id)
            .ok_or_else(|| CurriculumError::TaskNotFound(task_id.clone()))?;
        draft.apply_to(task);
        Ok(())
    }

    /// Copies a task within its chapter under a fresh id and a "(copy)" name.
    ///
    /// Returns the new task's id.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` when the chapter or task does not exist.
    pub fn duplicate_task(
        &mut self,
        chapter_id: &ChapterId,
        task_id: &TaskId,
    ) -> Result<TaskId, CurriculumError> {
        let chapter = self
            .chapter_mut(chapter_id)
            .ok_or_else(|| CurriculumError::ChapterNotFound(chapter_id.clone()))?;
        let original = chapter
            .tasks
            .iter()
            .find(|task| &task.id == task_id)
            .ok_or_else(|| CurriculumError::TaskNotFound(task_id.clone()))?;

        let mut copy = original.clone();
        copy.id = TaskId::mint();
        copy.name = format!("{} (copy)", original.name);
        let copy_id = copy.id.clone();
        chapter.tasks.push(copy);
        Ok(copy_id)
    }

    /// Removes a task from the given chapter.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` when the chapter or task does not exist.
    pub fn remove_task(
        &mut self,
        chapter_id: &ChapterId,
        task_id: &TaskId,
    ) -> Result<(), CurriculumError> {
        let chapter = self
            .chapter_mut(chapter_id)
            .ok_or_else(|| CurriculumError::ChapterNotFound(chapter_id.clone()))?;
        let index = chapter
            .tasks
            .iter()
            .position(|task| &task.id == task_id)
            .ok_or_else(|| CurriculumError::TaskNotFound(task_id.clone()))?;
        chapter.tasks.remove(index);
        Ok(())
    }

    /// Seeds an empty subject with a starter level and chapter, plus one
    /// sample task the user can edit or delete.
    pub fn scaffold_default_content(&mut self) {
        self.levels = vec![Level {
            id: LevelId::new("grade_1"),
            name: "Grade 1".to_owned(),
            chapters: vec![Chapter {
                id: ChapterId::mint(),
                name: "Getting started".to_owned(),
                description: "Introductory material".to_owned(),
                tasks: vec![Task {
                    id: TaskId::mint(),
                    name: "Sample task".to_owned(),
                    kind: TaskKind::Concept,
                    steps: vec![
                        "Learn the basic idea".to_owned(),
                        "Watch the intro material".to_owned(),
                        "Finish the starter exercise".to_owned(),
                        "Check your understanding".to_owned(),
                    ],
                    estimated_time: 20,
                    difficulty: 1,
                    prerequisites: Vec::new(),
                }],
            }],
        }];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_subject() -> Subject {
        let mut subject =
            Subject::new("math", "Math", "\u{1F9EE}", "#4285f4", "Numbers and counting").unwrap();
        subject.levels = vec![
            Level {
                id: LevelId::new("grade_1"),
                name: "Grade 1".to_owned(),
                chapters: vec![Chapter {
                    id: ChapterId::new("numbers"),
                    name: "Numbers".to_owned(),
                    description: "Counting to 100".to_owned(),
                    tasks: vec![
                        Task {
                            id: TaskId::new("task_001"),
                            name: "Count to ten".to_owned(),
                            kind: TaskKind::Concept,
                            steps: vec!["Count aloud".to_owned(), "Write the digits".to_owned()],
                            estimated_time: 30,
                            difficulty: 1,
                            prerequisites: Vec::new(),
                        },
                        Task {
                            id: TaskId::new("task_002"),
                            name: "Compare numbers".to_owned(),
                            kind: TaskKind::Skill,
                            steps: vec!["Learn < and >".to_owned()],
                            estimated_time: 25,
                            difficulty: 2,
                            prerequisites: vec![TaskId::new("task_001")],
                        },
                    ],
                }],
            },
            Level {
                id: LevelId::new("grade_2"),
                name: "Grade 2".to_owned(),
                chapters: Vec::new(),
            },
        ];
        subject
    }

    #[test]
    fn subject_new_rejects_empty_fields() {
        assert_eq!(
            Subject::new(" ", "Math", "", "", "").unwrap_err(),
            SubjectError::EmptyId
        );
        assert_eq!(
            Subject::new("math", "  ", "", "", "").unwrap_err(),
            SubjectError::EmptyName
        );
    }

    #[test]
    fn subject_new_applies_defaults() {
        let subject = Subject::new("art", "Art", "  ", " ", "").unwrap();
        assert_eq!(subject.icon, "\u{1F4DA}");
        assert_eq!(subject.color, "#666666");
        assert!(subject.levels.is_empty());
    }

    #[test]
    fn task_count_spans_levels() {
        let subject = sample_subject();
        assert_eq!(subject.task_count(), 2);
    }

    #[test]
    fn find_task_walks_the_tree() {
        let subject = sample_subject();
        let task = subject.find_task(&TaskId::new("task_002")).unwrap();
        assert_eq!(task.name, "Compare numbers");
        assert!(subject.find_task(&TaskId::new("missing")).is_none());
    }

    #[test]
    fn add_chapter_requires_existing_level() {
        let mut subject = sample_subject();
        let chapter = Chapter {
            id: ChapterId::new("shapes"),
            name: "Shapes".to_owned(),
            description: String::new(),
            tasks: Vec::new(),
        };
        let err = subject
            .add_chapter(&LevelId::new("grade_9"), chapter.clone())
            .unwrap_err();
        assert_eq!(err, CurriculumError::LevelNotFound(LevelId::new("grade_9")));

        subject
            .add_chapter(&LevelId::new("grade_2"), chapter)
            .unwrap();
        assert_eq!(subject.levels[1].chapters.len(), 1);
    }

    #[test]
    fn update_chapter_edits_in_place() {
        let mut subject = sample_subject();
        subject
            .update_chapter(
                &ChapterId::new("numbers"),
                "Numbers and digits",
                "Up to 1000",
                &LevelId::new("grade_1"),
            )
            .unwrap();
        let (_, chapter) = subject.find_chapter(&ChapterId::new("numbers")).unwrap();
        assert_eq!(chapter.name, "Numbers and digits");
        assert_eq!(chapter.description, "Up to 1000");
        assert_eq!(chapter.tasks.len(), 2);
    }

    #[test]
    fn update_chapter_moves_between_levels_with_tasks() {
        let mut subject = sample_subject();
        subject
            .update_chapter(
                &ChapterId::new("numbers"),
                "Numbers",
                "Counting to 100",
                &LevelId::new("grade_2"),
            )
            .unwrap();

        assert!(subject.levels[0].chapters.is_empty());
        let (level_id, chapter) = subject.find_chapter(&ChapterId::new("numbers")).unwrap();
        assert_eq!(level_id, &LevelId::new("grade_2"));
        assert_eq!(chapter.tasks.len(), 2);
    }

    #[test]
    fn remove_chapter_drops_tasks_with_it() {
        let mut subject = sample_subject();
        subject.remove_chapter(&ChapterId::new("numbers")).unwrap();
        assert_eq!(subject.task_count(), 0);

        let err = subject
            .remove_chapter(&ChapterId::new("numbers"))
            .unwrap_err();
        assert_eq!(
            err,
            CurriculumError::ChapterNotFound(ChapterId::new("numbers"))
        );
    }

    #[test]
    fn duplicate_task_mints_fresh_id_and_copy_name() {
        let mut subject = sample_subject();
        let copy_id = subject
            .duplicate_task(&ChapterId::new("numbers"), &TaskId::new("task_001"))
            .unwrap();
        assert_ne!(copy_id, TaskId::new("task_001"));

        let copy = subject.find_task(&copy_id).unwrap();
        assert_eq!(copy.name, "Count to ten (copy)");
        assert_eq!(copy.steps.len(), 2);
        assert_eq!(subject.task_count(), 3);
    }

    #[test]
    fn update_task_applies_draft() {
        let mut subject = sample_subject();
        let draft = TaskDraft::new(
            "Count to twenty",
            TaskKind::Practice,
            3,
            45,
            vec!["Count in pairs".to_owned()],
            vec![TaskId::new("task_001")],
        )
        .unwrap();
        subject
            .update_task(&TaskId::new("task_002"), draft)
            .unwrap();

        let task = subject.find_task(&TaskId::new("task_002")).unwrap();
        assert_eq!(task.name, "Count to twenty");
        assert_eq!(task.kind, TaskKind::Practice);
        assert_eq!(task.difficulty, 3);
        assert_eq!(task.steps, vec!["Count in pairs".to_owned()]);
    }

    #[test]
    fn remove_task_leaves_siblings() {
        let mut subject = sample_subject();
        subject
            .remove_task(&ChapterId::new("numbers"), &TaskId::new("task_001"))
            .unwrap();
        assert_eq!(subject.task_count(), 1);
        assert!(subject.find_task(&TaskId::new("task_002")).is_some());
    }

    #[test]
    fn task_draft_validates_bounds() {
        let steps = vec!["Step one".to_owned()];
        assert_eq!(
            TaskDraft::new("  ", TaskKind::Concept, 1, 30, steps.clone(), Vec::new()).unwrap_err(),
            TaskDraftError::EmptyName
        );
        assert_eq!(
            TaskDraft::new("T", TaskKind::Concept, 0, 30, steps.clone(), Vec::new()).unwrap_err(),
            TaskDraftError::InvalidDifficulty
        );
        assert_eq!(
            TaskDraft::new("T", TaskKind::Concept, 6, 30, steps.clone(), Vec::new()).unwrap_err(),
            TaskDraftError::InvalidDifficulty
        );
        assert_eq!(
            TaskDraft::new("T", TaskKind::Concept, 1, 4, steps.clone(), Vec::new()).unwrap_err(),
            TaskDraftError::InvalidEstimatedTime
        );
        assert_eq!(
            TaskDraft::new("T", TaskKind::Concept, 1, 121, steps, Vec::new()).unwrap_err(),
            TaskDraftError::InvalidEstimatedTime
        );
    }

    #[test]
    fn task_draft_drops_blank_step_lines() {
        let draft = TaskDraft::new(
            "T",
            TaskKind::Concept,
            1,
            30,
            vec!["  one  ".to_owned(), "   ".to_owned(), "two".to_owned()],
            Vec::new(),
        )
        .unwrap();
        let task = draft.into_task(TaskId::mint());
        assert_eq!(task.steps, vec!["one".to_owned(), "two".to_owned()]);

        let err = TaskDraft::new(
            "T",
            TaskKind::Concept,
            1,
            30,
            vec!["   ".to_owned()],
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, TaskDraftError::NoSteps);
    }

    #[test]
    fn scaffold_replaces_levels_with_starter_content() {
        let mut subject = Subject::new("art", "Art", "", "", "").unwrap();
        subject.scaffold_default_content();
        assert_eq!(subject.levels.len(), 1);
        assert_eq!(subject.task_count(), 1);
        assert_eq!(subject.levels[0].id, LevelId::new("grade_1"));
    }

    #[test]
    fn task_kind_round_trips_wire_names() {
        let json = serde_json::to_string(&TaskKind::Skill).unwrap();
        assert_eq!(json, "\"skill\"");
        let kind: TaskKind = serde_json::from_str("\"practice\"").unwrap();
        assert_eq!(kind, TaskKind::Practice);
    }

    #[test]
    fn task_deserializes_wire_shape_with_defaults() {
        let json = r#"{
            "id": "task_001",
            "name": "Count to ten",
            "type": "concept",
            "steps": ["Count aloud"]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.kind, TaskKind::Concept);
        assert_eq!(task.estimated_time, 30);
        assert_eq!(task.difficulty, 1);
        assert!(task.prerequisites.is_empty());
    }
}
