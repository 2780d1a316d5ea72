use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tracker_core::model::{Student, Subject};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::modals::StudentFormModal;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_student_cards;

#[derive(Clone, Debug, PartialEq)]
struct StudentsData {
    students: Vec<Student>,
    subjects: Vec<Subject>,
}

/// The student picker grid, the app's landing page.
#[component]
pub fn StudentsView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let students_service = ctx.students();
    let subjects_service = ctx.subjects();

    let resource = use_resource(move || {
        let students = students_service.clone();
        let subjects = subjects_service.clone();
        async move {
            let roster = students
                .list_students()
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            let subjects = subjects
                .list_subjects()
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            Ok::<_, ViewError>(StudentsData {
                students: roster,
                subjects,
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let mut show_add = use_signal(|| false);
    let mut edit_target = use_signal(|| None::<Student>);

    rsx! {
        div { class: "page students-page",
            header { class: "view-header",
                h2 { class: "view-title", "Students" }
                p { class: "view-subtitle", "Pick a student to see their learning progress." }
            }
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
                    let cards = map_student_cards(&data.students, &data.subjects);
                    let student_cards = cards.iter().map(|card| {
                        let nav = navigator;
                        let open_id = card.id.to_string();
                        let edit_source = data
                            .students
                            .iter()
                            .find(|student| student.id == card.id)
                            .cloned();
                        let mut edit_target = edit_target;
                        rsx! {
                            div {
                                key: "{card.id}",
                                class: "student-card",
                                onclick: move |_| {
                                    let _ = nav.push(Route::Dashboard {
                                        student_id: open_id.clone(),
                                    });
                                },
                                div { class: "student-avatar", "{card.avatar}" }
                                div { class: "student-name", "{card.name}" }
                                div { class: "student-progress", "{card.progress_label}" }
                                div { class: "student-subjects", "{card.subjects_label}" }
                                button {
                                    class: "student-edit",
                                    r#type: "button",
                                    title: "Edit student",
                                    onclick: move |evt| {
                                        evt.stop_propagation();
                                        edit_target.set(edit_source.clone());
                                    },
                                    "\u{270F}\u{FE0F}"
                                }
                            }
                        }
                    });
                    rsx! {
                        div { class: "student-grid",
                            {student_cards}
                            div {
                                class: "student-card student-card--add",
                                onclick: move |_| show_add.set(true),
                                div { class: "student-avatar", "\u{2795}" }
                                div { class: "student-name", "Add student" }
                            }
                        }
                        if show_add() {
                            StudentFormModal {
                                title: "Add student",
                                student: None,
                                subjects: data.subjects.clone(),
                                on_close: move |()| show_add.set(false),
                                on_saved: move |()| {
                                    show_add.set(false);
                                    let mut resource = resource;
                                    resource.restart();
                                },
                            }
                        }
                        if let Some(student) = edit_target() {
                            StudentFormModal {
                                title: "Edit student",
                                student: Some(student),
                                subjects: data.subjects.clone(),
                                on_close: move |()| edit_target.set(None),
                                on_saved: move |()| {
                                    edit_target.set(None);
                                    let mut resource = resource;
                                    resource.restart();
                                },
                            }
                        }
                    }
                }
            }
        }
    }
}
