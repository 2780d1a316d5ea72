use std::sync::Arc;

use backend::{BatchEnrollment, StudentRepository};
use tracker_core::model::{Student, StudentDraft, StudentId, SubjectId};

use crate::error::StudentServiceError;

/// Orchestrates the student roster against the backend.
#[derive(Clone)]
pub struct StudentService {
    students: Arc<dyn StudentRepository>,
}

impl StudentService {
    #[must_use]
    pub fn new(students: Arc<dyn StudentRepository>) -> Self {
        Self { students }
    }

    /// List every student, with the server-cached overall progress attached.
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::Backend` if the backend call fails.
    pub async fn list_students(&self) -> Result<Vec<Student>, StudentServiceError> {
        let students = self.students.list_students().await?;
        Ok(students)
    }

    /// Fetch one student by id.
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::Backend` if the backend call fails or
    /// the student does not exist.
    pub async fn get_student(&self, id: &StudentId) -> Result<Student, StudentServiceError> {
        let student = self.students.get_student(id).await?;
        Ok(student)
    }

    /// Create a student from a validated draft; the server assigns the id.
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::Backend` if the backend rejects the
    /// draft.
    pub async fn create_student(
        &self,
        draft: StudentDraft,
    ) -> Result<Student, StudentServiceError> {
        let student = self.students.add_student(&draft).await?;
        tracing::debug!(student_id = %student.id, "student created");
        Ok(student)
    }

    /// Replace a student's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::Backend` if the backend call fails.
    pub async fn update_student(
        &self,
        id: &StudentId,
        draft: StudentDraft,
    ) -> Result<(), StudentServiceError> {
        self.students.update_student(id, &draft).await?;
        Ok(())
    }

    /// Delete a student and, with them, their progress.
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::Backend` if the backend call fails.
    pub async fn delete_student(&self, id: &StudentId) -> Result<(), StudentServiceError> {
        self.students.delete_student(id).await?;
        tracing::debug!(student_id = %id, "student deleted");
        Ok(())
    }

    /// Enroll one subject for many students at once. Students already
    /// enrolled are skipped; the result reports how many were updated.
    ///
    /// # Errors
    ///
    /// Returns `StudentServiceError::Backend` if the backend rejects the
    /// batch.
    pub async fn enroll_subject(
        &self,
        subject_id: &SubjectId,
        student_ids: &[StudentId],
    ) -> Result<BatchEnrollment, StudentServiceError> {
        let outcome = self
            .students
            .add_subject_to_students(subject_id, student_ids)
            .await?;
        tracing::debug!(
            subject_id = %subject_id,
            updated = outcome.success_count,
            requested = outcome.total_count,
            "batch enrollment applied"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::InMemoryBackend;
    use tracker_core::time::fixed_clock;

    fn service() -> StudentService {
        StudentService::new(Arc::new(InMemoryBackend::with_clock(fixed_clock())))
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let service = service();
        let draft = StudentDraft::new("Mia", "", "Grade 2", "notes", Vec::new()).unwrap();
        let created = service.create_student(draft).await.unwrap();

        let fetched = service.get_student(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Mia");
        assert_eq!(fetched.grade, "Grade 2");
    }

    #[tokio::test]
    async fn update_replaces_editable_fields() {
        let service = service();
        let created = service
            .create_student(StudentDraft::new("Mia", "", "", "", Vec::new()).unwrap())
            .await
            .unwrap();

        let draft =
            StudentDraft::new("Mia R.", "", "", "", vec![SubjectId::new("math")]).unwrap();
        service.update_student(&created.id, draft).await.unwrap();

        let fetched = service.get_student(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Mia R.");
        assert!(fetched.is_enrolled(&SubjectId::new("math")));
    }

    #[tokio::test]
    async fn delete_removes_from_roster() {
        let service = service();
        let created = service
            .create_student(StudentDraft::new("Mia", "", "", "", Vec::new()).unwrap())
            .await
            .unwrap();

        service.delete_student(&created.id).await.unwrap();
        assert!(service.get_student(&created.id).await.is_err());
        assert!(service.list_students().await.unwrap().is_empty());
    }
}
