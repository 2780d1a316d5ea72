use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use tracker_core::model::{Student, StudentId, StudentProgress, Subject};
use tracker_core::progress::overall_progress;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{map_recent_activities, map_subject_cards};

const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq)]
struct DashboardData {
    student: Student,
    subjects: Vec<Subject>,
    progress: StudentProgress,
}

/// One student's dashboard: overall progress, subject cards, recent activity.
#[component]
pub fn DashboardView(student_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let students_service = ctx.students();
    let subjects_service = ctx.subjects();
    let progress_service = ctx.progress();
    let student_key = StudentId::new(student_id.clone());

    let resource = use_resource(move || {
        let students = students_service.clone();
        let subjects = subjects_service.clone();
        let progress = progress_service.clone();
        let student_key = student_key.clone();
        async move {
            let student = students
                .get_student(&student_key)
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            let subjects = subjects
                .list_subjects()
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            let document = progress
                .load(&student_key)
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            Ok::<_, ViewError>(DashboardData {
                student,
                subjects,
                progress: document,
            })
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page dashboard-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "view-error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(data) => {
                    let overall = overall_progress(&data.subjects, &data.progress);
                    let cards = map_subject_cards(&data.student, &data.subjects, &data.progress);
                    let activities =
                        map_recent_activities(&data.subjects, &data.progress, RECENT_ACTIVITY_LIMIT);
                    let sid = data.student.id.to_string();
                    let subject_cards = cards.iter().map(|card| {
                        let nav = navigator;
                        let student_id = sid.clone();
                        let subject_id = card.id.to_string();
                        rsx! {
                            div {
                                key: "{card.id}",
                                class: "subject-card",
                                style: "--subject-color: {card.color}",
                                onclick: move |_| {
                                    let _ = nav.push(Route::SubjectTasks {
                                        student_id: student_id.clone(),
                                        subject_id: subject_id.clone(),
                                    });
                                },
                                div { class: "subject-icon", "{card.icon}" }
                                div { class: "subject-name", "{card.name}" }
                                div { class: "subject-stats",
                                    div { "{card.percent}% complete" }
                                    div { "{card.tasks_label}" }
                                    div { class: "progress-bar",
                                        div {
                                            class: "progress-fill",
                                            style: "width: {card.percent}%",
                                        }
                                    }
                                }
                            }
                        }
                    });
                    rsx! {
                        header { class: "view-header dashboard-header",
                            Link { class: "back-link", to: Route::Students {}, "\u{2190} Students" }
                            div { class: "dashboard-identity",
                                span { class: "student-avatar", "{data.student.avatar}" }
                                h2 { class: "view-title", "{data.student.name}" }
                            }
                            div { class: "overall-progress",
                                span { class: "overall-progress-label", "Overall progress: {overall}%" }
                                div { class: "progress-bar",
                                    div { class: "progress-fill", style: "width: {overall}%" }
                                }
                            }
                        }
                        section { class: "dashboard-subjects",
                            h3 { class: "section-title", "Subjects" }
                            if cards.is_empty() {
                                p { class: "empty-hint", "No subjects yet. Enroll this student from the admin panel." }
                            } else {
                                div { class: "subject-grid",
                                    {subject_cards}
                                }
                            }
                        }
                        section { class: "dashboard-activity",
                            h3 { class: "section-title", "Recent activity" }
                            if activities.is_empty() {
                                p { class: "empty-hint", "No learning activity recorded yet." }
                            } else {
                                ul { class: "activity-list",
                                    for activity in activities {
                                        li { class: "activity-item",
                                            span { class: "activity-icon", "{activity.icon}" }
                                            div {
                                                div { class: "activity-title", "{activity.title}" }
                                                small { class: "activity-detail", "{activity.detail}" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
