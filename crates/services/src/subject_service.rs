use std::sync::Arc;

use backend::SubjectRepository;
use tracker_core::model::{
    Chapter, ChapterId, Level, LevelId, Subject, SubjectId, TaskDraft, TaskId,
};

use crate::error::SubjectServiceError;

/// Orchestrates subjects and their curriculum trees.
///
/// The server stores each subject as one document, so every curriculum edit
/// is a fetch-modify-save round trip over the whole tree (last writer wins).
#[derive(Clone)]
pub struct SubjectService {
    subjects: Arc<dyn SubjectRepository>,
}

impl SubjectService {
    #[must_use]
    pub fn new(subjects: Arc<dyn SubjectRepository>) -> Self {
        Self { subjects }
    }

    /// List every subject with its curriculum.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Backend` if the backend call fails.
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, SubjectServiceError> {
        let subjects = self.subjects.list_subjects().await?;
        Ok(subjects)
    }

    /// Fetch one subject by id.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Backend` if the backend call fails or
    /// the subject does not exist.
    pub async fn get_subject(&self, id: &SubjectId) -> Result<Subject, SubjectServiceError> {
        let subject = self.subjects.get_subject(id).await?;
        Ok(subject)
    }

    /// Create a subject with a starter level and an empty first chapter, the
    /// shape the add-subject form produces.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Subject` for validation failures and
    /// `SubjectServiceError::Backend` when the id is already taken.
    pub async fn create_subject(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Subject, SubjectServiceError> {
        let mut subject = Subject::new(id, name, icon, color, description)?;
        subject.levels = vec![Level {
            id: LevelId::new("grade_1"),
            name: "Grade 1".to_owned(),
            chapters: vec![Chapter {
                id: ChapterId::new("chapter_1"),
                name: "First chapter".to_owned(),
                description: "Starter content".to_owned(),
                tasks: Vec::new(),
            }],
        }];

        self.subjects.add_subject(&subject).await?;
        tracing::debug!(subject_id = %subject.id, "subject created");
        Ok(subject)
    }

    /// Delete a subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Backend` if the backend call fails.
    pub async fn delete_subject(&self, id: &SubjectId) -> Result<(), SubjectServiceError> {
        self.subjects.delete_subject(id).await?;
        tracing::debug!(subject_id = %id, "subject deleted");
        Ok(())
    }

    /// Append a chapter to a level. Returns the new chapter's id.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::EmptyChapterName` for a blank name,
    /// `SubjectServiceError::Curriculum` for an unknown level, and
    /// `SubjectServiceError::Backend` for backend failures.
    pub async fn add_chapter(
        &self,
        subject_id: &SubjectId,
        level_id: &LevelId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<ChapterId, SubjectServiceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectServiceError::EmptyChapterName);
        }

        let mut subject = self.subjects.get_subject(subject_id).await?;
        let chapter = Chapter {
            id: ChapterId::mint(),
            name: name.trim().to_owned(),
            description: description.into().trim().to_owned(),
            tasks: Vec::new(),
        };
        let chapter_id = chapter.id.clone();
        subject.add_chapter(level_id, chapter)?;
        self.subjects.update_subject(&subject).await?;
        Ok(chapter_id)
    }

    /// Rename a chapter, optionally moving it (with its tasks) to another
    /// level.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::EmptyChapterName` for a blank name,
    /// `SubjectServiceError::Curriculum` for unknown nodes, and
    /// `SubjectServiceError::Backend` for backend failures.
    pub async fn update_chapter(
        &self,
        subject_id: &SubjectId,
        chapter_id: &ChapterId,
        name: impl Into<String>,
        description: impl Into<String>,
        level_id: &LevelId,
    ) -> Result<(), SubjectServiceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectServiceError::EmptyChapterName);
        }

        let mut subject = self.subjects.get_subject(subject_id).await?;
        subject.update_chapter(
            chapter_id,
            name.trim().to_owned(),
            description.into().trim().to_owned(),
            level_id,
        )?;
        self.subjects.update_subject(&subject).await?;
        Ok(())
    }

    /// Delete a chapter and every task under it.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Curriculum` for an unknown chapter and
    /// `SubjectServiceError::Backend` for backend failures.
    pub async fn delete_chapter(
        &self,
        subject_id: &SubjectId,
        chapter_id: &ChapterId,
    ) -> Result<(), SubjectServiceError> {
        let mut subject = self.subjects.get_subject(subject_id).await?;
        subject.remove_chapter(chapter_id)?;
        self.subjects.update_subject(&subject).await?;
        Ok(())
    }

    /// Append a task to a chapter. Returns the new task's id.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Curriculum` for an unknown chapter and
    /// `SubjectServiceError::Backend` for backend failures.
    pub async fn add_task(
        &self,
        subject_id: &SubjectId,
        chapter_id: &ChapterId,
        draft: TaskDraft,
    ) -> Result<TaskId, SubjectServiceError> {
        let mut subject = self.subjects.get_subject(subject_id).await?;
        let task = draft.into_task(TaskId::mint());
        let task_id = task.id.clone();
        subject.add_task(chapter_id, task)?;
        self.subjects.update_subject(&subject).await?;
        Ok(task_id)
    }

    /// Apply a draft onto an existing task, wherever it lives in the tree.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Curriculum` for an unknown task and
    /// `SubjectServiceError::Backend` for backend failures.
    pub async fn update_task(
        &self,
        subject_id: &SubjectId,
        task_id: &TaskId,
        draft: TaskDraft,
    ) -> Result<(), SubjectServiceError> {
        let mut subject = self.subjects.get_subject(subject_id).await?;
        subject.update_task(task_id, draft)?;
        self.subjects.update_subject(&subject).await?;
        Ok(())
    }

    /// Copy a task within its chapter. Returns the copy's id.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Curriculum` for unknown nodes and
    /// `SubjectServiceError::Backend` for backend failures.
    pub async fn duplicate_task(
        &self,
        subject_id: &SubjectId,
        chapter_id: &ChapterId,
        task_id: &TaskId,
    ) -> Result<TaskId, SubjectServiceError> {
        let mut subject = self.subjects.get_subject(subject_id).await?;
        let copy_id = subject.duplicate_task(chapter_id, task_id)?;
        self.subjects.update_subject(&subject).await?;
        Ok(copy_id)
    }

    /// Remove a task from a chapter.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Curriculum` for unknown nodes and
    /// `SubjectServiceError::Backend` for backend failures.
    pub async fn delete_task(
        &self,
        subject_id: &SubjectId,
        chapter_id: &ChapterId,
        task_id: &TaskId,
    ) -> Result<(), SubjectServiceError> {
        let mut subject = self.subjects.get_subject(subject_id).await?;
        subject.remove_task(chapter_id, task_id)?;
        self.subjects.update_subject(&subject).await?;
        Ok(())
    }

    /// Replace an empty subject's curriculum with the starter structure
    /// (one level, one chapter, one sample task).
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Backend` for backend failures.
    pub async fn scaffold_default_content(
        &self,
        subject_id: &SubjectId,
    ) -> Result<(), SubjectServiceError> {
        let mut subject = self.subjects.get_subject(subject_id).await?;
        subject.scaffold_default_content();
        self.subjects.update_subject(&subject).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::InMemoryBackend;
    use tracker_core::model::TaskKind;
    use tracker_core::time::fixed_clock;

    fn service() -> SubjectService {
        SubjectService::new(Arc::new(InMemoryBackend::with_clock(fixed_clock())))
    }

    fn task_draft(name: &str) -> TaskDraft {
        TaskDraft::new(
            name,
            TaskKind::Concept,
            1,
            30,
            vec!["one".to_owned(), "two".to_owned()],
            Vec::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_subject_seeds_starter_chapter() {
        let service = service();
        let subject = service
            .create_subject("math", "Math", "", "#4285f4", "Numbers")
            .await
            .unwrap();

        assert_eq!(subject.levels.len(), 1);
        assert_eq!(subject.levels[0].chapters.len(), 1);
        assert_eq!(subject.task_count(), 0);

        let fetched = service.get_subject(&SubjectId::new("math")).await.unwrap();
        assert_eq!(fetched, subject);
    }

    #[tokio::test]
    async fn add_chapter_rejects_blank_name() {
        let service = service();
        service
            .create_subject("math", "Math", "", "", "")
            .await
            .unwrap();

        let err = service
            .add_chapter(
                &SubjectId::new("math"),
                &LevelId::new("grade_1"),
                "   ",
                "",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SubjectServiceError::EmptyChapterName));
    }

    #[tokio::test]
    async fn task_edit_flow_persists_tree_changes() {
        let service = service();
        service
            .create_subject("math", "Math", "", "", "")
            .await
            .unwrap();
        let subject_id = SubjectId::new("math");
        let chapter_id = ChapterId::new("chapter_1");

        let task_id = service
            .add_task(&subject_id, &chapter_id, task_draft("Count to ten"))
            .await
            .unwrap();

        service
            .update_task(&subject_id, &task_id, task_draft("Count to twenty"))
            .await
            .unwrap();

        let copy_id = service
            .duplicate_task(&subject_id, &chapter_id, &task_id)
            .await
            .unwrap();

        let subject = service.get_subject(&subject_id).await.unwrap();
        assert_eq!(subject.task_count(), 2);
        assert_eq!(
            subject.find_task(&copy_id).unwrap().name,
            "Count to twenty (copy)"
        );

        service
            .delete_task(&subject_id, &chapter_id, &task_id)
            .await
            .unwrap();
        let subject = service.get_subject(&subject_id).await.unwrap();
        assert_eq!(subject.task_count(), 1);
        assert!(subject.find_task(&task_id).is_none());
    }
}
