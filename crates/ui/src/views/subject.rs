use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use backend::SubjectStats;
use tracker_core::model::{StudentId, StudentProgress, Subject, SubjectId, TaskId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::toast::Toaster;
use crate::views::modals::ConfirmModal;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_chapters;

#[derive(Clone, Debug, PartialEq)]
struct SubjectData {
    subject: Subject,
    progress: StudentProgress,
    stats: SubjectStats,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResetState {
    Idle,
    Resetting,
}

/// The chapters-and-tasks page for one subject of one student.
#[component]
pub fn SubjectView(student_id: String, subject_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let toaster = Toaster::from_context();
    let subjects_service = ctx.subjects();
    let progress_service = ctx.progress();
    let student_key = StudentId::new(student_id.clone());
    let subject_key = SubjectId::new(subject_id.clone());

    let progress_service_for_reset = progress_service.clone();
    let resource = use_resource(move || {
        let subjects = subjects_service.clone();
        let progress = progress_service.clone();
        let student_key = student_key.clone();
        let subject_key = subject_key.clone();
        async move {
            let subject = subjects
                .get_subject(&subject_key)
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            let document = progress
                .load_for_subject(&student_key, &subject)
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            let stats = progress
                .subject_stats(&student_key, &subject_key)
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            Ok::<_, ViewError>(SubjectData {
                subject,
                progress: document,
                stats,
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let mut reset_target = use_signal(|| None::<TaskId>);
    let mut reset_state = use_signal(|| ResetState::Idle);

    rsx! {
        div { class: "page subject-page",
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
                    let chapters = map_chapters(&data.subject, &data.progress);
                    let sid = student_id.clone();
                    let subj = subject_id.clone();
                    let chapter_blocks = chapters.iter().map(|chapter| {
                        let task_rows = chapter.tasks.iter().map(|row| {
                            let nav = navigator;
                            let open_student = sid.clone();
                            let open_subject = subj.clone();
                            let open_task = row.id.to_string();
                            let reset_id = row.id.clone();
                            let mut reset_target = reset_target;
                            let mut reset_state = reset_state;
                            let row_class = if row.locked {
                                "task-item task-item--locked"
                            } else {
                                "task-item"
                            };
                            rsx! {
                                div { key: "{row.id}", class: "{row_class}",
                                    div { class: "task-info",
                                        span { class: "task-status", "{row.status_icon}" }
                                        div {
                                            div { class: "task-name", "{row.name}" }
                                            div { class: "task-stats",
                                                "{row.stars} | {row.step_percent}% of steps | {row.meta_label}"
                                            }
                                        }
                                    }
                                    div { class: "task-actions",
                                        if row.locked {
                                            span { class: "task-locked-hint", "Complete the prerequisites first" }
                                        } else {
                                            button {
                                                class: "btn btn-primary",
                                                r#type: "button",
                                                onclick: move |_| {
                                                    let _ = nav.push(Route::TaskDetail {
                                                        student_id: open_student.clone(),
                                                        subject_id: open_subject.clone(),
                                                        task_id: open_task.clone(),
                                                    });
                                                },
                                                "{row.action_label}"
                                            }
                                            if row.can_reset {
                                                button {
                                                    class: "btn btn-secondary",
                                                    r#type: "button",
                                                    onclick: move |_| {
                                                        reset_state.set(ResetState::Idle);
                                                        reset_target.set(Some(reset_id.clone()));
                                                    },
                                                    "Reset"
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        });
                        rsx! {
                            div { key: "{chapter.id}", class: "chapter",
                                div { class: "chapter-header",
                                    div { class: "chapter-title", "{chapter.name}" }
                                    div { class: "chapter-meta",
                                        "{chapter.description} - {chapter.percent}% complete"
                                    }
                                    div { class: "progress-bar",
                                        div { class: "progress-fill", style: "width: {chapter.percent}%" }
                                    }
                                }
                                div { class: "task-list",
                                    {task_rows}
                                }
                            }
                        }
                    });
                    let confirm_student = sid.clone();
                    let confirm_subject = subj.clone();
                    rsx! {
                        header {
                            class: "view-header subject-header",
                            style: "background: {data.subject.color}",
                            Link {
                                class: "back-link",
                                to: Route::Dashboard { student_id: student_id.clone() },
                                "\u{2190} Dashboard"
                            }
                            h2 { class: "view-title", "{data.subject.icon} {data.subject.name}" }
                            p { class: "view-subtitle",
                                "{data.stats.completed}/{data.stats.total} tasks complete ({data.stats.progress}%)"
                            }
                        }
                        if chapters.is_empty() {
                            p { class: "empty-hint", "This subject has no content yet." }
                        } else {
                            div { class: "chapters",
                                {chapter_blocks}
                            }
                        }
                        if let Some(task_id) = reset_target() {
                            ConfirmModal {
                                title: "Reset this task?",
                                body: "All recorded progress for the task will be cleared.",
                                confirm_label: "Reset",
                                busy: reset_state() == ResetState::Resetting,
                                on_cancel: move |()| reset_target.set(None),
                                on_confirm: move |()| {
                                    let progress = progress_service_for_reset.clone();
                                    let student_key = StudentId::new(confirm_student.clone());
                                    let subject_key = SubjectId::new(confirm_subject.clone());
                                    let task_id = task_id.clone();
                                    let mut toaster = toaster;
                                    let mut reset_target = reset_target;
                                    let mut reset_state = reset_state;
                                    spawn(async move {
                                        reset_state.set(ResetState::Resetting);
                                        match progress.reset_task(&student_key, &subject_key, &task_id).await {
                                            Ok(_) => {
                                                toaster.success("Task reset");
                                                reset_target.set(None);
                                                reset_state.set(ResetState::Idle);
                                                let mut resource = resource;
                                                resource.restart();
                                            }
                                            Err(err) => {
                                                reset_state.set(ResetState::Idle);
                                                toaster.error(format!("Could not reset task: {err}"));
                                            }
                                        }
                                    });
                                },
                            }
                        }
                    }
                }
            }
        }
    }
}
