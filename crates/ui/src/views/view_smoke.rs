use std::sync::Arc;

use async_trait::async_trait;
use backend::{
    Backend, BackendError, BatchEnrollment, InMemoryBackend, ProgressRepository,
    StudentRepository, SubjectRepository,
};
use tracker_core::model::{
    Chapter, ChapterId, Level, LevelId, Student, StudentDraft, StudentId, Subject, SubjectId,
    Task, TaskId, TaskKind,
};
use tracker_core::time::fixed_clock;

use super::test_harness::{
    ViewKind, setup_view_harness, setup_view_harness_with_aggregate,
    setup_view_harness_with_backend,
};

fn sample_subject() -> Subject {
    let mut subject = Subject::new("math", "Math", "\u{1F9EE}", "#4285f4", "Numbers").unwrap();
    subject.levels = vec![Level {
        id: LevelId::new("grade_1"),
        name: "Grade 1".to_owned(),
        chapters: vec![Chapter {
            id: ChapterId::new("numbers"),
            name: "Numbers".to_owned(),
            description: "Counting".to_owned(),
            tasks: vec![Task {
                id: TaskId::new("task_001"),
                name: "Count to ten".to_owned(),
                kind: TaskKind::Concept,
                steps: vec!["Count aloud".to_owned(), "Write the digits".to_owned()],
                estimated_time: 30,
                difficulty: 1,
                prerequisites: Vec::new(),
            }],
        }],
    }];
    subject
}

async fn seeded_backend() -> (InMemoryBackend, StudentId) {
    let repo = InMemoryBackend::with_clock(fixed_clock());
    repo.add_subject(&sample_subject()).await.expect("seed subject");
    let student = repo
        .add_student(
            &StudentDraft::new("Mia", "\u{1F467}", "Grade 1", "", vec![SubjectId::new("math")])
                .unwrap(),
        )
        .await
        .expect("seed student");
    (repo, student.id)
}

#[tokio::test(flavor = "current_thread")]
async fn students_view_renders_roster_cards() {
    let (repo, _) = seeded_backend().await;
    let mut harness = setup_view_harness_with_backend(ViewKind::Students, repo);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Students"), "missing page title in {html}");
    assert!(html.contains("Mia"), "missing student card in {html}");
    assert!(html.contains("Overall: 0%"), "missing progress label in {html}");
    assert!(html.contains("Add student"), "missing add card in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn students_view_renders_empty_roster() {
    let mut harness = setup_view_harness(ViewKind::Students);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Add student"), "missing add card in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_renders_subject_cards_and_progress() {
    let (repo, student_id) = seeded_backend().await;
    let mut harness =
        setup_view_harness_with_backend(ViewKind::Dashboard(student_id.to_string()), repo);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Mia"), "missing student name in {html}");
    assert!(html.contains("Overall progress: 0%"), "missing overall in {html}");
    assert!(html.contains("Math"), "missing subject card in {html}");
    assert!(html.contains("0/1 tasks"), "missing tally in {html}");
    assert!(
        html.contains("No learning activity recorded yet."),
        "missing empty activity hint in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn subject_view_renders_chapters_and_lock_free_task() {
    let (repo, student_id) = seeded_backend().await;
    let mut harness = setup_view_harness_with_backend(
        ViewKind::Subject(student_id.to_string(), "math".to_owned()),
        repo,
    );
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Numbers"), "missing chapter in {html}");
    assert!(html.contains("Count to ten"), "missing task row in {html}");
    assert!(html.contains("Start"), "missing action label in {html}");
    assert!(
        html.contains("0/1 tasks complete"),
        "missing header stats in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn task_view_seeds_progress_and_renders_steps() {
    let (repo, student_id) = seeded_backend().await;
    let mut harness = setup_view_harness_with_backend(
        ViewKind::Task(
            student_id.to_string(),
            "math".to_owned(),
            "task_001".to_owned(),
        ),
        repo,
    );
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Count to ten"), "missing task title in {html}");
    assert!(html.contains("Step 1"), "missing step rows in {html}");
    assert!(html.contains("Count aloud"), "missing step text in {html}");
    assert!(html.contains("Mark done"), "missing actions in {html}");

    // Opening the view stored the seeded in_progress entry.
    let document = harness
        .backend
        .get_progress(&student_id)
        .await
        .expect("progress");
    assert!(
        document
            .task(&SubjectId::new("math"), &TaskId::new("task_001"))
            .is_some(),
        "open did not seed progress"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn admin_view_renders_stat_tiles() {
    let (repo, _) = seeded_backend().await;
    let mut harness = setup_view_harness_with_backend(ViewKind::Admin, repo);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Average progress"), "missing tiles in {html}");
    assert!(html.contains("Manage tasks"), "missing subject actions in {html}");
    assert!(html.contains("Enroll students"), "missing enroll action in {html}");
}

struct FailingStudents;

#[async_trait]
impl StudentRepository for FailingStudents {
    async fn list_students(&self) -> Result<Vec<Student>, BackendError> {
        Err(BackendError::Connection("connection refused".to_owned()))
    }

    async fn get_student(&self, _id: &StudentId) -> Result<Student, BackendError> {
        Err(BackendError::Connection("connection refused".to_owned()))
    }

    async fn add_student(&self, _draft: &StudentDraft) -> Result<Student, BackendError> {
        Err(BackendError::Connection("connection refused".to_owned()))
    }

    async fn update_student(
        &self,
        _id: &StudentId,
        _draft: &StudentDraft,
    ) -> Result<(), BackendError> {
        Err(BackendError::Connection("connection refused".to_owned()))
    }

    async fn delete_student(&self, _id: &StudentId) -> Result<(), BackendError> {
        Err(BackendError::Connection("connection refused".to_owned()))
    }

    async fn add_subject_to_students(
        &self,
        _subject_id: &SubjectId,
        _student_ids: &[StudentId],
    ) -> Result<BatchEnrollment, BackendError> {
        Err(BackendError::Connection("connection refused".to_owned()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn students_view_renders_error_state_with_retry() {
    let mut backend = Backend::in_memory();
    backend.students = Arc::new(FailingStudents);

    let mut harness = setup_view_harness_with_aggregate(ViewKind::Students, backend);
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("connection refused"),
        "missing error message in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}
