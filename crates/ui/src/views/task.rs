use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use services::ProgressServiceError;
use tracker_core::model::{StudentId, Subject, SubjectId, Task, TaskId, TaskProgress};

use crate::context::AppContext;
use crate::routes::Route;
use crate::toast::Toaster;
use crate::views::modals::ConfirmModal;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_task_detail;

#[derive(Clone, Debug, PartialEq)]
struct TaskData {
    subject: Subject,
    task: Task,
    progress: TaskProgress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepKind {
    Complete,
    Skip,
    Uncomplete,
}

/// One task's step-by-step page. Opening it seeds progress on first visit.
#[component]
pub fn TaskView(student_id: String, subject_id: String, task_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let toaster = Toaster::from_context();
    let subjects_service = ctx.subjects();
    let progress_service = ctx.progress();
    let student_key = StudentId::new(student_id.clone());
    let subject_key = SubjectId::new(subject_id.clone());
    let task_key = TaskId::new(task_id.clone());

    let progress_for_actions = progress_service.clone();
    let resource = use_resource(move || {
        let subjects = subjects_service.clone();
        let progress = progress_service.clone();
        let student_key = student_key.clone();
        let subject_key = subject_key.clone();
        let task_key = task_key.clone();
        async move {
            let subject = subjects
                .get_subject(&subject_key)
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            let task = subject
                .find_task(&task_key)
                .cloned()
                .ok_or_else(|| ViewError::Message(format!("Task not found: {task_key}")))?;
            let entry = progress
                .open_task(&student_key, &subject, &task_key)
                .await
                .map_err(|err| match err {
                    ProgressServiceError::TaskLocked(_) => ViewError::Message(
                        "This task is locked. Complete its prerequisites first.".to_owned(),
                    ),
                    other => ViewError::from_error(&other),
                })?;
            Ok::<_, ViewError>(TaskData {
                subject,
                task,
                progress: entry,
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let mut show_reset = use_signal(|| false);

    // One shared runner for the three step actions.
    let run_step_action = {
        let progress = progress_for_actions.clone();
        let student_id = student_id.clone();
        let task_id = task_id.clone();
        move |kind: StepKind, index: usize, subject: Subject, task_name: String| {
            let progress = progress.clone();
            let student_key = StudentId::new(student_id.clone());
            let task_key = TaskId::new(task_id.clone());
            let mut toaster = toaster;
            spawn(async move {
                let result = match kind {
                    StepKind::Complete => {
                        progress
                            .complete_step(&student_key, &subject, &task_key, index)
                            .await
                    }
                    StepKind::Skip => {
                        progress
                            .skip_step(&student_key, &subject, &task_key, index)
                            .await
                    }
                    StepKind::Uncomplete => {
                        progress
                            .uncomplete_step(&student_key, &subject, &task_key, index)
                            .await
                    }
                };
                match result {
                    Ok(action) => {
                        if action.just_completed {
                            toaster.success(format!("\u{1F389} Task complete: {task_name}!"));
                        }
                        let mut resource = resource;
                        resource.restart();
                    }
                    Err(err) => toaster.error(format!("Could not save progress: {err}")),
                }
            });
        }
    };

    rsx! {
        div { class: "page task-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "view-error", "{err.message()}" }
                    Link {
                        class: "btn btn-secondary",
                        to: Route::SubjectTasks {
                            student_id: student_id.clone(),
                            subject_id: subject_id.clone(),
                        },
                        "Back to tasks"
                    }
                },
                ViewState::Ready(data) => {
                    let vm = map_task_detail(&data.task, &data.progress);
                    let step_rows = vm.steps.iter().map(|step| {
                        let index = step.index;
                        let run_complete = run_step_action.clone();
                        let run_skip = run_step_action.clone();
                        let run_undo = run_step_action.clone();
                        let subject_a = data.subject.clone();
                        let subject_b = data.subject.clone();
                        let subject_c = data.subject.clone();
                        let name_a = data.task.name.clone();
                        let name_b = data.task.name.clone();
                        let name_c = data.task.name.clone();
                        rsx! {
                            div { key: "{step.index}", class: "{step.state.class()}",
                                div { class: "step-header",
                                    span { class: "step-icon", "{step.state.icon()}" }
                                    span { class: "step-title", "{step.title}" }
                                }
                                div { class: "step-description",
                                    "{step.description}"
                                    if let Some(label) = step.completed_at_label.as_ref() {
                                        br {}
                                        small { class: "step-done-at", "{label}" }
                                    }
                                }
                                div { class: "step-actions",
                                    if step.can_complete {
                                        button {
                                            class: "btn btn-primary",
                                            r#type: "button",
                                            onclick: move |_| run_complete(
                                                StepKind::Complete,
                                                index,
                                                subject_a.clone(),
                                                name_a.clone(),
                                            ),
                                            "\u{2705} Mark done"
                                        }
                                    }
                                    if step.can_skip {
                                        button {
                                            class: "btn btn-secondary",
                                            r#type: "button",
                                            onclick: move |_| run_skip(
                                                StepKind::Skip,
                                                index,
                                                subject_b.clone(),
                                                name_b.clone(),
                                            ),
                                            "\u{23ED}\u{FE0F} Skip"
                                        }
                                    }
                                    if step.can_uncomplete {
                                        button {
                                            class: "btn btn-secondary",
                                            r#type: "button",
                                            onclick: move |_| run_undo(
                                                StepKind::Uncomplete,
                                                index,
                                                subject_c.clone(),
                                                name_c.clone(),
                                            ),
                                            "\u{21A9}\u{FE0F} Undo"
                                        }
                                    }
                                }
                            }
                        }
                    });
                    let reset_student = student_id.clone();
                    let reset_subject = subject_id.clone();
                    let reset_task = task_id.clone();
                    rsx! {
                        header {
                            class: "view-header task-header",
                            style: "background: {data.subject.color}",
                            Link {
                                class: "back-link",
                                to: Route::SubjectTasks {
                                    student_id: student_id.clone(),
                                    subject_id: subject_id.clone(),
                                },
                                "\u{2190} {data.subject.name}"
                            }
                            h2 { class: "view-title", "\u{1F4CB} {vm.name}" }
                            p { class: "view-subtitle",
                                "{vm.stars} | {vm.time_label} | {vm.step_counter_label}"
                            }
                            div { class: "task-progress",
                                span { "{vm.percent}%" }
                                div { class: "progress-bar",
                                    div { class: "progress-fill", style: "width: {vm.percent}%" }
                                }
                            }
                            button {
                                class: "btn btn-secondary task-reset",
                                r#type: "button",
                                onclick: move |_| show_reset.set(true),
                                "Reset task"
                            }
                        }
                        div { class: "steps",
                            {step_rows}
                        }
                        if show_reset() {
                            ConfirmModal {
                                title: "Reset this task?",
                                body: "All recorded progress for the task will be cleared.",
                                confirm_label: "Reset",
                                busy: false,
                                on_cancel: move |()| show_reset.set(false),
                                on_confirm: move |()| {
                                    let progress = progress_for_actions.clone();
                                    let nav = navigator;
                                    let student_key = StudentId::new(reset_student.clone());
                                    let subject_key = SubjectId::new(reset_subject.clone());
                                    let task_key = TaskId::new(reset_task.clone());
                                    let back_student = reset_student.clone();
                                    let back_subject = reset_subject.clone();
                                    let mut toaster = toaster;
                                    let mut show_reset = show_reset;
                                    spawn(async move {
                                        match progress.reset_task(&student_key, &subject_key, &task_key).await {
                                            Ok(_) => {
                                                toaster.success("Task reset");
                                                show_reset.set(false);
                                                let _ = nav.push(Route::SubjectTasks {
                                                    student_id: back_student,
                                                    subject_id: back_subject,
                                                });
                                            }
                                            Err(err) => {
                                                show_reset.set(false);
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
