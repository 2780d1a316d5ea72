use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tracker_core::Clock;
use tracker_core::model::{
    Student, StudentDraft, StudentId, StudentProgress, Subject, SubjectId,
};
use tracker_core::progress::{overall_progress, subject_tally};

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Server-computed per-subject progress statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectStats {
    pub progress: u8,
    pub completed: u32,
    pub total: u32,
}

/// Server-computed overall statistics for the admin panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_students: u32,
    pub total_subjects: u32,
    pub average_progress: f64,
}

/// Result of a batch enrollment: how many students were actually updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEnrollment {
    pub success_count: u32,
    pub total_count: u32,
}

/// Repository contract for students, including the batch enrollment call.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// List every student; reads include the server-cached overall progress.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend cannot be reached or rejects the
    /// request.
    async fn list_students(&self) -> Result<Vec<Student>, BackendError>;

    /// Fetch one student by id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when the student does not exist.
    async fn get_student(&self, id: &StudentId) -> Result<Student, BackendError>;

    /// Create a student; the backend assigns the id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the draft.
    async fn add_student(&self, draft: &StudentDraft) -> Result<Student, BackendError>;

    /// Replace a student's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when the student does not exist.
    async fn update_student(
        &self,
        id: &StudentId,
        draft: &StudentDraft,
    ) -> Result<(), BackendError>;

    /// Delete a student.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend cannot complete the delete.
    async fn delete_student(&self, id: &StudentId) -> Result<(), BackendError>;

    /// Enroll one subject for many students; already-enrolled students are
    /// skipped, not errors.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the batch.
    async fn add_subject_to_students(
        &self,
        subject_id: &SubjectId,
        student_ids: &[StudentId],
    ) -> Result<BatchEnrollment, BackendError>;
}

/// Repository contract for subjects and their curriculum trees.
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// List every subject with its full curriculum.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend cannot be reached.
    async fn list_subjects(&self) -> Result<Vec<Subject>, BackendError>;

    /// Fetch one subject by id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when the subject does not exist.
    async fn get_subject(&self, id: &SubjectId) -> Result<Subject, BackendError>;

    /// Create a subject.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Conflict` (or a rejection) when the id is taken.
    async fn add_subject(&self, subject: &Subject) -> Result<(), BackendError>;

    /// Replace a subject document, curriculum tree included.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when the subject does not exist.
    async fn update_subject(&self, subject: &Subject) -> Result<(), BackendError>;

    /// Delete a subject.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend cannot complete the delete.
    async fn delete_subject(&self, id: &SubjectId) -> Result<(), BackendError>;
}

/// Repository contract for per-student progress documents.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch a student's progress document. The server seeds and syncs
    /// entries for the student's enrolled subjects on every read.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend cannot be reached.
    async fn get_progress(&self, student_id: &StudentId) -> Result<StudentProgress, BackendError>;

    /// Store a student's whole progress document (last writer wins).
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the document.
    async fn save_progress(&self, progress: &StudentProgress) -> Result<(), BackendError>;

    /// Server-computed completed/total stats for one subject.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend cannot be reached.
    async fn subject_stats(
        &self,
        student_id: &StudentId,
        subject_id: &SubjectId,
    ) -> Result<SubjectStats, BackendError>;
}

/// Repository contract for aggregate statistics.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Totals and average progress across all students.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend cannot be reached.
    async fn overall_stats(&self) -> Result<OverallStats, BackendError>;
}

/// Aggregates the repositories behind trait objects for easy adapter swapping.
#[derive(Clone)]
pub struct Backend {
    pub students: Arc<dyn StudentRepository>,
    pub subjects: Arc<dyn SubjectRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

impl Backend {
    /// Build a `Backend` over the in-memory adapter.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryBackend::new())
    }

    #[must_use]
    pub fn from_in_memory(backend: InMemoryBackend) -> Self {
        let students: Arc<dyn StudentRepository> = Arc::new(backend.clone());
        let subjects: Arc<dyn SubjectRepository> = Arc::new(backend.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(backend.clone());
        let stats: Arc<dyn StatsRepository> = Arc::new(backend);
        Self {
            students,
            subjects,
            progress,
            stats,
        }
    }
}

/// In-memory adapter for tests and prototyping.
///
/// Mirrors the server's observable behavior: assigned student ids, stamped
/// dates, duplicate-id conflicts, progress seeding/sync on reads, and the
/// aggregate stats shape.
#[derive(Clone)]
pub struct InMemoryBackend {
    clock: Clock,
    students: Arc<Mutex<Vec<Student>>>,
    subjects: Arc<Mutex<Vec<Subject>>>,
    progress: Arc<Mutex<HashMap<StudentId, StudentProgress>>>,
    next_student: Arc<AtomicU64>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::default_clock())
    }

    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            students: Arc::new(Mutex::new(Vec::new())),
            subjects: Arc::new(Mutex::new(Vec::new())),
            progress: Arc::new(Mutex::new(HashMap::new())),
            next_student: Arc::new(AtomicU64::new(1)),
        }
    }

    fn lock<'a, T>(mutex: &'a Mutex<T>) -> Result<std::sync::MutexGuard<'a, T>, BackendError> {
        mutex
            .lock()
            .map_err(|e| BackendError::Connection(e.to_string()))
    }

    fn student_from_draft(&self, draft: &StudentDraft) -> Student {
        let today = self.clock.now().date_naive();
        let n = self.next_student.fetch_add(1, Ordering::SeqCst);
        Student {
            id: StudentId::new(format!("student_{n:03}")),
            name: draft.name().to_owned(),
            avatar: draft.avatar().to_owned(),
            grade: draft.grade().to_owned(),
            notes: draft.notes().to_owned(),
            subjects: draft.subjects().to_vec(),
            created_at: Some(today),
            last_update: Some(today),
            overall_progress: None,
        }
    }

    /// Seed or drop subject entries so the document matches the enrollment,
    /// the way the server does on every progress read.
    fn synced_progress(
        student: &Student,
        subjects: &[Subject],
        documents: &mut HashMap<StudentId, StudentProgress>,
    ) -> StudentProgress {
        let document = documents
            .entry(student.id.clone())
            .or_insert_with(|| StudentProgress::empty(student.id.clone()));

        for subject_id in &student.subjects {
            if let Some(subject) = subjects.iter().find(|subject| &subject.id == subject_id) {
                document.ensure_subject(subject);
            }
        }
        document
            .subjects
            .retain(|subject_id, _| student.subjects.contains(subject_id));

        document.clone()
    }

    fn overall_for(
        student: &Student,
        subjects: &[Subject],
        documents: &mut HashMap<StudentId, StudentProgress>,
    ) -> u8 {
        let document = Self::synced_progress(student, subjects, documents);
        overall_progress(subjects, &document)
    }
}

#[async_trait]
impl StudentRepository for InMemoryBackend {
    async fn list_students(&self) -> Result<Vec<Student>, BackendError> {
        let students = Self::lock(&self.students)?;
        let subjects = Self::lock(&self.subjects)?;
        let mut documents = Self::lock(&self.progress)?;

        Ok(students
            .iter()
            .map(|student| {
                let mut student = student.clone();
                student.overall_progress =
                    Some(Self::overall_for(&student, &subjects, &mut documents));
                student
            })
            .collect())
    }

    async fn get_student(&self, id: &StudentId) -> Result<Student, BackendError> {
        let students = Self::lock(&self.students)?;
        let subjects = Self::lock(&self.subjects)?;
        let mut documents = Self::lock(&self.progress)?;

        let mut student = students
            .iter()
            .find(|student| &student.id == id)
            .cloned()
            .ok_or(BackendError::NotFound)?;
        student.overall_progress = Some(Self::overall_for(&student, &subjects, &mut documents));
        Ok(student)
    }

    async fn add_student(&self, draft: &StudentDraft) -> Result<Student, BackendError> {
        let student = self.student_from_draft(draft);
        let mut students = Self::lock(&self.students)?;
        students.push(student.clone());
        Ok(student)
    }

    async fn update_student(
        &self,
        id: &StudentId,
        draft: &StudentDraft,
    ) -> Result<(), BackendError> {
        let mut students = Self::lock(&self.students)?;
        let student = students
            .iter_mut()
            .find(|student| &student.id == id)
            .ok_or(BackendError::NotFound)?;

        student.name = draft.name().to_owned();
        student.avatar = draft.avatar().to_owned();
        student.grade = draft.grade().to_owned();
        student.notes = draft.notes().to_owned();
        student.subjects = draft.subjects().to_vec();
        student.last_update = Some(self.clock.now().date_naive());
        Ok(())
    }

    async fn delete_student(&self, id: &StudentId) -> Result<(), BackendError> {
        let mut students = Self::lock(&self.students)?;
        students.retain(|student| &student.id != id);
        let mut documents = Self::lock(&self.progress)?;
        documents.remove(id);
        Ok(())
    }

    async fn add_subject_to_students(
        &self,
        subject_id: &SubjectId,
        student_ids: &[StudentId],
    ) -> Result<BatchEnrollment, BackendError> {
        let mut students = Self::lock(&self.students)?;
        let today = self.clock.now().date_naive();

        let mut success_count = 0;
        for id in student_ids {
            let Some(student) = students.iter_mut().find(|student| &student.id == id) else {
                continue;
            };
            if student.subjects.contains(subject_id) {
                continue;
            }
            student.subjects.push(subject_id.clone());
            student.last_update = Some(today);
            success_count += 1;
        }

        Ok(BatchEnrollment {
            success_count,
            total_count: u32::try_from(student_ids.len())
                .map_err(|e| BackendError::Serialization(e.to_string()))?,
        })
    }
}

#[async_trait]
impl SubjectRepository for InMemoryBackend {
    async fn list_subjects(&self) -> Result<Vec<Subject>, BackendError> {
        let subjects = Self::lock(&self.subjects)?;
        Ok(subjects.clone())
    }

    async fn get_subject(&self, id: &SubjectId) -> Result<Subject, BackendError> {
        let subjects = Self::lock(&self.subjects)?;
        subjects
            .iter()
            .find(|subject| &subject.id == id)
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    async fn add_subject(&self, subject: &Subject) -> Result<(), BackendError> {
        let mut subjects = Self::lock(&self.subjects)?;
        if subjects.iter().any(|existing| existing.id == subject.id) {
            return Err(BackendError::Conflict);
        }
        subjects.push(subject.clone());
        Ok(())
    }

    async fn update_subject(&self, subject: &Subject) -> Result<(), BackendError> {
        let mut subjects = Self::lock(&self.subjects)?;
        let existing = subjects
            .iter_mut()
            .find(|existing| existing.id == subject.id)
            .ok_or(BackendError::NotFound)?;
        *existing = subject.clone();
        Ok(())
    }

    async fn delete_subject(&self, id: &SubjectId) -> Result<(), BackendError> {
        let mut subjects = Self::lock(&self.subjects)?;
        subjects.retain(|subject| &subject.id != id);
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryBackend {
    async fn get_progress(&self, student_id: &StudentId) -> Result<StudentProgress, BackendError> {
        let students = Self::lock(&self.students)?;
        let subjects = Self::lock(&self.subjects)?;
        let mut documents = Self::lock(&self.progress)?;

        let student = students
            .iter()
            .find(|student| &student.id == student_id)
            .ok_or(BackendError::NotFound)?;
        Ok(Self::synced_progress(student, &subjects, &mut documents))
    }

    async fn save_progress(&self, progress: &StudentProgress) -> Result<(), BackendError> {
        let mut documents = Self::lock(&self.progress)?;
        documents.insert(progress.student_id.clone(), progress.clone());
        Ok(())
    }

    async fn subject_stats(
        &self,
        student_id: &StudentId,
        subject_id: &SubjectId,
    ) -> Result<SubjectStats, BackendError> {
        let subjects = Self::lock(&self.subjects)?;
        let documents = Self::lock(&self.progress)?;

        let subject = subjects
            .iter()
            .find(|subject| &subject.id == subject_id)
            .ok_or(BackendError::NotFound)?;
        let empty = StudentProgress::empty(student_id.clone());
        let document = documents.get(student_id).unwrap_or(&empty);

        let tally = subject_tally(subject, document);
        Ok(SubjectStats {
            progress: tally.percent(),
            completed: u32::try_from(tally.completed).unwrap_or(u32::MAX),
            total: u32::try_from(tally.total).unwrap_or(u32::MAX),
        })
    }
}

#[async_trait]
impl StatsRepository for InMemoryBackend {
    async fn overall_stats(&self) -> Result<OverallStats, BackendError> {
        let students = Self::lock(&self.students)?;
        let subjects = Self::lock(&self.subjects)?;
        let mut documents = Self::lock(&self.progress)?;

        let total_students = u32::try_from(students.len()).unwrap_or(u32::MAX);
        let total_subjects = u32::try_from(subjects.len()).unwrap_or(u32::MAX);

        let average_progress = if students.is_empty() {
            0.0
        } else {
            let sum: f64 = students
                .iter()
                .map(|student| f64::from(Self::overall_for(student, &subjects, &mut documents)))
                .sum();
            (sum / students.len() as f64 * 10.0).round() / 10.0
        };

        Ok(OverallStats {
            total_students,
            total_subjects,
            average_progress,
        })
    }
}
