use backend::{Backend, InMemoryBackend};
use services::AppServices;
use tracker_core::model::{StudentDraft, SubjectId};
use tracker_core::time::fixed_clock;

fn app() -> AppServices {
    let backend = Backend::from_in_memory(InMemoryBackend::with_clock(fixed_clock()));
    AppServices::from_backend(&backend, fixed_clock())
}

#[tokio::test]
async fn batch_enrollment_updates_only_missing_students() {
    let app = app();
    app.subjects()
        .create_subject("science", "Science", "", "", "")
        .await
        .expect("create subject");

    let enrolled = app
        .students()
        .create_student(
            StudentDraft::new("Mia", "", "", "", vec![SubjectId::new("science")]).unwrap(),
        )
        .await
        .expect("create enrolled student");
    let fresh = app
        .students()
        .create_student(StudentDraft::new("Leo", "", "", "", Vec::new()).unwrap())
        .await
        .expect("create fresh student");

    let outcome = app
        .students()
        .enroll_subject(
            &SubjectId::new("science"),
            &[enrolled.id.clone(), fresh.id.clone()],
        )
        .await
        .expect("batch enroll");

    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.total_count, 2);

    let fresh = app.students().get_student(&fresh.id).await.expect("fetch");
    assert!(fresh.is_enrolled(&SubjectId::new("science")));

    // The synced progress document now carries a seeded entry.
    let document = app.progress().load(&fresh.id).await.expect("load progress");
    assert!(document.subject(&SubjectId::new("science")).is_some());
}

#[tokio::test]
async fn stats_follow_the_roster() {
    let app = app();
    app.subjects()
        .create_subject("math", "Math", "", "", "")
        .await
        .expect("create subject");
    app.students()
        .create_student(StudentDraft::new("Mia", "", "", "", Vec::new()).unwrap())
        .await
        .expect("create student");

    let stats = app.stats().overall().await.expect("stats");
    assert_eq!(stats.total_students, 1);
    assert_eq!(stats.total_subjects, 1);
}
