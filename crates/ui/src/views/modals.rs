use dioxus::prelude::*;
use tracker_core::model::{Student, StudentDraft, Subject, SubjectId};

use crate::context::AppContext;
use crate::toast::Toaster;

/// Confirmation dialog for destructive actions.
#[component]
pub fn ConfirmModal(
    title: String,
    body: String,
    confirm_label: String,
    busy: bool,
    on_cancel: Callback<()>,
    on_confirm: Callback<()>,
) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| on_cancel.call(()),
            div {
                class: "modal",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "modal-title", "{title}" }
                p { class: "modal-body", "{body}" }
                div { class: "modal-actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-danger",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| on_confirm.call(()),
                        "{confirm_label}"
                    }
                }
            }
        }
    }
}

/// Add/edit form for a student. Passing a student prefills the form and turns
/// the save into an update.
#[component]
pub fn StudentFormModal(
    title: String,
    student: Option<Student>,
    subjects: Vec<Subject>,
    on_close: Callback<()>,
    on_saved: Callback<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let mut toaster = Toaster::from_context();

    let target_id = student.as_ref().map(|student| student.id.clone());
    let init_name = student
        .as_ref()
        .map(|student| student.name.clone())
        .unwrap_or_default();
    let init_avatar = student
        .as_ref()
        .map(|student| student.avatar.clone())
        .unwrap_or_default();
    let init_grade = student
        .as_ref()
        .map(|student| student.grade.clone())
        .unwrap_or_default();
    let init_notes = student
        .as_ref()
        .map(|student| student.notes.clone())
        .unwrap_or_default();
    let init_subjects = student
        .as_ref()
        .map(|student| student.subjects.clone())
        .unwrap_or_default();

    let mut name = use_signal(|| init_name);
    let mut avatar = use_signal(|| init_avatar);
    let mut grade = use_signal(|| init_grade);
    let mut notes = use_signal(|| init_notes);
    let mut selected = use_signal(|| init_subjects);
    let mut saving = use_signal(|| false);

    let subject_checkboxes = subjects.iter().map(|subject| {
        let subject_id = subject.id.clone();
        let checked = selected().contains(&subject_id);
        let label = format!("{} {}", subject.icon, subject.name);
        rsx! {
            label { class: "subject-checkbox",
                input {
                    r#type: "checkbox",
                    checked,
                    onchange: move |_| {
                        let mut picked = selected();
                        if let Some(index) = picked.iter().position(|id| id == &subject_id) {
                            picked.remove(index);
                        } else {
                            picked.push(subject_id.clone());
                        }
                        selected.set(picked);
                    },
                }
                span { "{label}" }
            }
        }
    });

    let students_service = ctx.students();
    let save = move |_| {
        let picked: Vec<SubjectId> = selected();
        if picked.is_empty() {
            toaster.error("Pick at least one subject");
            return;
        }
        let draft = match StudentDraft::new(name(), avatar(), grade(), notes(), picked) {
            Ok(draft) => draft,
            Err(err) => {
                toaster.error(err.to_string());
                return;
            }
        };

        let students = students_service.clone();
        let target_id = target_id.clone();
        let mut toaster = toaster;
        spawn(async move {
            saving.set(true);
            let result = match &target_id {
                Some(id) => students.update_student(id, draft).await,
                None => students.create_student(draft).await.map(|_| ()),
            };
            saving.set(false);
            match result {
                Ok(()) => {
                    toaster.success("Student saved");
                    on_saved.call(());
                }
                Err(err) => toaster.error(format!("Could not save student: {err}")),
            }
        });
    };

    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| on_close.call(()),
            div {
                class: "modal modal--form",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "modal-title", "{title}" }
                div { class: "form-group",
                    label { "Name" }
                    input {
                        r#type: "text",
                        value: "{name()}",
                        placeholder: "Student name",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Avatar" }
                    input {
                        r#type: "text",
                        value: "{avatar()}",
                        placeholder: "An emoji, e.g. \u{1F466}",
                        oninput: move |evt| avatar.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Grade" }
                    input {
                        r#type: "text",
                        value: "{grade()}",
                        placeholder: "Grade 1",
                        oninput: move |evt| grade.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Notes" }
                    textarea {
                        rows: 3,
                        value: "{notes()}",
                        oninput: move |evt| notes.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Subjects" }
                    div { class: "subject-checkboxes",
                        {subject_checkboxes}
                    }
                }
                div { class: "modal-actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: saving(),
                        onclick: save,
                        "Save"
                    }
                }
            }
        }
    }
}
