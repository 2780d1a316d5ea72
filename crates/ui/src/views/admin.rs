use dioxus::prelude::*;
use backend::OverallStats;
use tracker_core::model::{
    Chapter, ChapterId, Level, LevelId, Student, StudentId, Subject, SubjectId, Task, TaskDraft,
    TaskId, TaskKind,
};

use crate::context::AppContext;
use crate::toast::Toaster;
use crate::views::modals::{ConfirmModal, StudentFormModal};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{map_stat_tiles, map_student_admin_rows, map_subject_admin_rows};

#[derive(Clone, Debug, PartialEq)]
struct AdminData {
    stats: OverallStats,
    students: Vec<Student>,
    subjects: Vec<Subject>,
}

/// The admin panel: aggregate stats plus roster and curriculum management.
#[component]
pub fn AdminView() -> Element {
    let ctx = use_context::<AppContext>();
    let toaster = Toaster::from_context();
    let students_service = ctx.students();
    let subjects_service = ctx.subjects();
    let stats_service = ctx.stats();

    let students_for_actions = ctx.students();
    let subjects_for_actions = ctx.subjects();

    let resource = use_resource(move || {
        let students = students_service.clone();
        let subjects = subjects_service.clone();
        let stats = stats_service.clone();
        async move {
            let stats = stats
                .overall()
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            let roster = students
                .list_students()
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            let subjects = subjects
                .list_subjects()
                .await
                .map_err(|err| ViewError::from_error(&err))?;
            Ok::<_, ViewError>(AdminData {
                stats,
                students: roster,
                subjects,
            })
        }
    });
    let state = view_state_from_resource(&resource);

    let mut show_add_student = use_signal(|| false);
    let mut edit_student = use_signal(|| None::<Student>);
    let mut delete_student = use_signal(|| None::<Student>);
    let mut show_add_subject = use_signal(|| false);
    let mut delete_subject = use_signal(|| None::<Subject>);
    let mut manage_subject = use_signal(|| None::<SubjectId>);
    let mut enroll_subject = use_signal(|| None::<SubjectId>);

    rsx! {
        div { class: "page admin-page",
            header { class: "view-header",
                h2 { class: "view-title", "Admin" }
                p { class: "view-subtitle", "Manage students, subjects, and curricula." }
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
                    let tiles = map_stat_tiles(&data.stats);
                    let student_rows = map_student_admin_rows(&data.students, &data.subjects);
                    let subject_rows = map_subject_admin_rows(&data.subjects);

                    let student_items = student_rows.iter().map(|row| {
                        let edit_source = data
                            .students
                            .iter()
                            .find(|student| student.id == row.id)
                            .cloned();
                        let delete_source = edit_source.clone();
                        let mut edit_student = edit_student;
                        let mut delete_student = delete_student;
                        rsx! {
                            div { key: "{row.id}", class: "admin-row",
                                div { class: "admin-row-info",
                                    strong { "{row.title}" }
                                    div { class: "admin-row-meta", "{row.meta_line}" }
                                    div { class: "admin-row-meta", "{row.progress_line}" }
                                }
                                div { class: "admin-row-actions",
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        onclick: move |_| edit_student.set(edit_source.clone()),
                                        "Edit"
                                    }
                                    button {
                                        class: "btn btn-danger",
                                        r#type: "button",
                                        onclick: move |_| delete_student.set(delete_source.clone()),
                                        "Delete"
                                    }
                                }
                            }
                        }
                    });

                    let subject_items = subject_rows.iter().map(|row| {
                        let delete_source = data
                            .subjects
                            .iter()
                            .find(|subject| subject.id == row.id)
                            .cloned();
                        let manage_id = row.id.clone();
                        let enroll_id = row.id.clone();
                        let mut delete_subject = delete_subject;
                        let mut manage_subject = manage_subject;
                        let mut enroll_subject = enroll_subject;
                        rsx! {
                            div { key: "{row.id}", class: "admin-row",
                                div { class: "admin-row-info",
                                    strong { "{row.title}" }
                                    div { class: "admin-row-meta", "{row.meta_line}" }
                                    div { class: "admin-row-meta", "{row.description}" }
                                }
                                div { class: "admin-row-actions",
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        onclick: move |_| manage_subject.set(Some(manage_id.clone())),
                                        "Manage tasks"
                                    }
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        onclick: move |_| enroll_subject.set(Some(enroll_id.clone())),
                                        "Enroll students"
                                    }
                                    button {
                                        class: "btn btn-danger",
                                        r#type: "button",
                                        onclick: move |_| delete_subject.set(delete_source.clone()),
                                        "Delete"
                                    }
                                }
                            }
                        }
                    });

                    rsx! {
                        section { class: "admin-stats",
                            div { class: "stat-grid",
                                for tile in tiles {
                                    div { key: "{tile.label}", class: "stat-card",
                                        div { class: "stat-number", "{tile.value}" }
                                        div { class: "stat-label", "{tile.label}" }
                                    }
                                }
                            }
                        }

                        section { class: "admin-students",
                            div { class: "section-row",
                                h3 { class: "section-title", "Students" }
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    onclick: move |_| show_add_student.set(true),
                                    "Add student"
                                }
                            }
                            if student_rows.is_empty() {
                                p { class: "empty-hint", "No students yet." }
                            } else {
                                div { class: "admin-list",
                                    {student_items}
                                }
                            }
                        }

                        section { class: "admin-subjects",
                            div { class: "section-row",
                                h3 { class: "section-title", "Subjects" }
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    onclick: move |_| show_add_subject.set(true),
                                    "Add subject"
                                }
                            }
                            if subject_rows.is_empty() {
                                p { class: "empty-hint", "No subjects yet." }
                            } else {
                                div { class: "admin-list",
                                    {subject_items}
                                }
                            }
                        }

                        if show_add_student() {
                            StudentFormModal {
                                title: "Add student",
                                student: None,
                                subjects: data.subjects.clone(),
                                on_close: move |()| show_add_student.set(false),
                                on_saved: move |()| {
                                    show_add_student.set(false);
                                    let mut resource = resource;
                                    resource.restart();
                                },
                            }
                        }
                        if let Some(student) = edit_student() {
                            StudentFormModal {
                                title: "Edit student",
                                student: Some(student),
                                subjects: data.subjects.clone(),
                                on_close: move |()| edit_student.set(None),
                                on_saved: move |()| {
                                    edit_student.set(None);
                                    let mut resource = resource;
                                    resource.restart();
                                },
                            }
                        }
                        if let Some(student) = delete_student() {
                            ConfirmModal {
                                title: "Delete student?",
                                body: format!(
                                    "\"{}\" and all of their progress will be removed. This cannot be undone.",
                                    student.name
                                ),
                                confirm_label: "Delete",
                                busy: false,
                                on_cancel: move |()| delete_student.set(None),
                                on_confirm: {
                                    let students = students_for_actions.clone();
                                    let target = student.id.clone();
                                    let name = student.name.clone();
                                    move |()| {
                                        let students = students.clone();
                                        let target = target.clone();
                                        let name = name.clone();
                                        let mut toaster = toaster;
                                        let mut delete_student = delete_student;
                                        spawn(async move {
                                            match students.delete_student(&target).await {
                                                Ok(()) => {
                                                    toaster.success(format!("Student \"{name}\" deleted"));
                                                    delete_student.set(None);
                                                    let mut resource = resource;
                                                    resource.restart();
                                                }
                                                Err(err) => {
                                                    delete_student.set(None);
                                                    toaster.error(format!("Could not delete student: {err}"));
                                                }
                                            }
                                        });
                                    }
                                },
                            }
                        }
                        if show_add_subject() {
                            SubjectFormModal {
                                on_close: move |()| show_add_subject.set(false),
                                on_saved: move |()| {
                                    show_add_subject.set(false);
                                    let mut resource = resource;
                                    resource.restart();
                                },
                            }
                        }
                        if let Some(subject) = delete_subject() {
                            ConfirmModal {
                                title: "Delete subject?",
                                body: format!(
                                    "\"{}\" and its whole curriculum will be removed. This cannot be undone.",
                                    subject.name
                                ),
                                confirm_label: "Delete",
                                busy: false,
                                on_cancel: move |()| delete_subject.set(None),
                                on_confirm: {
                                    let subjects = subjects_for_actions.clone();
                                    let target = subject.id.clone();
                                    let name = subject.name.clone();
                                    move |()| {
                                        let subjects = subjects.clone();
                                        let target = target.clone();
                                        let name = name.clone();
                                        let mut toaster = toaster;
                                        let mut delete_subject = delete_subject;
                                        spawn(async move {
                                            match subjects.delete_subject(&target).await {
                                                Ok(()) => {
                                                    toaster.success(format!("Subject \"{name}\" deleted"));
                                                    delete_subject.set(None);
                                                    let mut resource = resource;
                                                    resource.restart();
                                                }
                                                Err(err) => {
                                                    delete_subject.set(None);
                                                    toaster.error(format!("Could not delete subject: {err}"));
                                                }
                                            }
                                        });
                                    }
                                },
                            }
                        }
                        if let Some(subject_id) = manage_subject() {
                            CurriculumManager {
                                subject_id,
                                on_close: move |()| {
                                    manage_subject.set(None);
                                    let mut resource = resource;
                                    resource.restart();
                                },
                            }
                        }
                        if let Some(subject_id) = enroll_subject() {
                            EnrollModal {
                                subject_id,
                                students: data.students.clone(),
                                on_close: move |()| enroll_subject.set(None),
                                on_saved: move |()| {
                                    enroll_subject.set(None);
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

/// Add-subject form.
#[component]
fn SubjectFormModal(on_close: Callback<()>, on_saved: Callback<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let toaster = Toaster::from_context();

    let mut id = use_signal(String::new);
    let mut name = use_signal(String::new);
    let mut icon = use_signal(String::new);
    let mut color = use_signal(|| "#666666".to_owned());
    let mut description = use_signal(String::new);
    let mut saving = use_signal(|| false);

    let subjects_service = ctx.subjects();
    let save = move |_| {
        let subjects = subjects_service.clone();
        let mut toaster = toaster;
        let (id, name, icon, color, description) =
            (id(), name(), icon(), color(), description());
        spawn(async move {
            saving.set(true);
            let result = subjects
                .create_subject(id, name, icon, color, description)
                .await;
            saving.set(false);
            match result {
                Ok(subject) => {
                    toaster.success(format!("Subject \"{}\" added", subject.name));
                    on_saved.call(());
                }
                Err(err) => toaster.error(format!("Could not add subject: {err}")),
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
                h3 { class: "modal-title", "Add subject" }
                div { class: "form-group",
                    label { "Id" }
                    input {
                        r#type: "text",
                        value: "{id()}",
                        placeholder: "e.g. math",
                        oninput: move |evt| id.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Name" }
                    input {
                        r#type: "text",
                        value: "{name()}",
                        placeholder: "Subject name",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Icon" }
                    input {
                        r#type: "text",
                        value: "{icon()}",
                        placeholder: "An emoji, e.g. \u{1F4DA}",
                        oninput: move |evt| icon.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Color" }
                    input {
                        r#type: "color",
                        value: "{color()}",
                        oninput: move |evt| color.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Description" }
                    textarea {
                        rows: 3,
                        value: "{description()}",
                        oninput: move |evt| description.set(evt.value()),
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
                        "Add"
                    }
                }
            }
        }
    }
}

/// Batch enrollment of one subject across the roster.
#[component]
fn EnrollModal(
    subject_id: SubjectId,
    students: Vec<Student>,
    on_close: Callback<()>,
    on_saved: Callback<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let toaster = Toaster::from_context();
    let mut picked = use_signal(Vec::<StudentId>::new);
    let mut saving = use_signal(|| false);

    let subject_for_rows = subject_id.clone();
    let rows = students.iter().map(move |student| {
        let already = student.is_enrolled(&subject_for_rows);
        let student_id = student.id.clone();
        let label = format!("{} {}", student.avatar, student.name);
        let checked = already || picked().contains(&student_id);
        rsx! {
            label { key: "{student_id}", class: "subject-checkbox",
                input {
                    r#type: "checkbox",
                    checked,
                    disabled: already,
                    onchange: move |_| {
                        let mut selection = picked();
                        if let Some(index) = selection.iter().position(|id| id == &student_id) {
                            selection.remove(index);
                        } else {
                            selection.push(student_id.clone());
                        }
                        picked.set(selection);
                    },
                }
                span { "{label}" }
                if already {
                    small { class: "enroll-hint", " (already enrolled)" }
                }
            }
        }
    });

    let students_service = ctx.students();
    let subject_for_save = subject_id.clone();
    let save = move |_| {
        let selection = picked();
        if selection.is_empty() {
            let mut toaster = toaster;
            toaster.error("Pick at least one student");
            return;
        }
        let students = students_service.clone();
        let subject_id = subject_for_save.clone();
        let mut toaster = toaster;
        spawn(async move {
            saving.set(true);
            let result = students.enroll_subject(&subject_id, &selection).await;
            saving.set(false);
            match result {
                Ok(outcome) => {
                    toaster.success(format!(
                        "Added the subject to {} of {} students",
                        outcome.success_count, outcome.total_count
                    ));
                    on_saved.call(());
                }
                Err(err) => toaster.error(format!("Could not enroll students: {err}")),
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
                h3 { class: "modal-title", "Enroll students" }
                p { class: "modal-body", "Add \"{subject_id}\" to the selected students." }
                div { class: "subject-checkboxes",
                    {rows}
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
                        "Enroll"
                    }
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum ChapterFormTarget {
    New,
    Edit(LevelId, Chapter),
}

#[derive(Clone, Debug, PartialEq)]
struct TaskFormTarget {
    chapter_id: ChapterId,
    task: Option<Task>,
}

/// Full-screen curriculum editor for one subject.
#[component]
fn CurriculumManager(subject_id: SubjectId, on_close: Callback<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let toaster = Toaster::from_context();
    let subjects_service = ctx.subjects();
    let subjects_for_actions = ctx.subjects();
    let subject_key = subject_id.clone();

    let resource = use_resource(move || {
        let subjects = subjects_service.clone();
        let subject_key = subject_key.clone();
        async move {
            subjects
                .get_subject(&subject_key)
                .await
                .map_err(|err| ViewError::from_error(&err))
        }
    });
    let state = view_state_from_resource(&resource);

    let mut chapter_form = use_signal(|| None::<ChapterFormTarget>);
    let mut task_form = use_signal(|| None::<TaskFormTarget>);
    let mut delete_chapter = use_signal(|| None::<Chapter>);
    let mut delete_task = use_signal(|| None::<(ChapterId, Task)>);

    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| on_close.call(()),
            div {
                class: "modal modal--wide",
                onclick: move |evt| evt.stop_propagation(),
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
                    ViewState::Ready(subject) => {
                        let levels = subject.levels.clone();
                        let level_blocks = subject.levels.iter().map(|level| {
                            let level_id = level.id.clone();
                            let chapter_blocks = level.chapters.iter().map(|chapter| {
                                let edit_target =
                                    ChapterFormTarget::Edit(level_id.clone(), chapter.clone());
                                let delete_target = chapter.clone();
                                let add_task_chapter = chapter.id.clone();
                                let mut chapter_form = chapter_form;
                                let mut delete_chapter = delete_chapter;
                                let mut task_form = task_form;
                                let task_items = chapter.tasks.iter().map(|task| {
                                    let edit_task_target = TaskFormTarget {
                                        chapter_id: chapter.id.clone(),
                                        task: Some(task.clone()),
                                    };
                                    let duplicate_target = (chapter.id.clone(), task.id.clone());
                                    let delete_task_target = (chapter.id.clone(), task.clone());
                                    let mut task_form = task_form;
                                    let mut delete_task = delete_task;
                                    let subjects = subjects_for_actions.clone();
                                    let dup_subject = subject.id.clone();
                                    let toaster = toaster;
                                    let prereq_label = if task.prerequisites.is_empty() {
                                        "none".to_owned()
                                    } else {
                                        task.prerequisites
                                            .iter()
                                            .map(ToString::to_string)
                                            .collect::<Vec<_>>()
                                            .join(", ")
                                    };
                                    rsx! {
                                        div { key: "{task.id}", class: "admin-row admin-row--task",
                                            div { class: "admin-row-info",
                                                strong { "\u{1F4CB} {task.name}" }
                                                div { class: "admin-row-meta",
                                                    "{task.kind.label()} | difficulty {task.difficulty}/5 | {task.estimated_time} min | {task.steps.len()} steps"
                                                }
                                                div { class: "admin-row-meta", "Prerequisites: {prereq_label}" }
                                                div { class: "admin-row-id", "ID: {task.id}" }
                                            }
                                            div { class: "admin-row-actions",
                                                button {
                                                    class: "btn btn-secondary",
                                                    r#type: "button",
                                                    onclick: move |_| task_form.set(Some(edit_task_target.clone())),
                                                    "Edit"
                                                }
                                                button {
                                                    class: "btn btn-secondary",
                                                    r#type: "button",
                                                    onclick: move |_| {
                                                        let subjects = subjects.clone();
                                                        let subject_id = dup_subject.clone();
                                                        let (chapter_id, task_id) = duplicate_target.clone();
                                                        let mut toaster = toaster;
                                                        spawn(async move {
                                                            match subjects
                                                                .duplicate_task(&subject_id, &chapter_id, &task_id)
                                                                .await
                                                            {
                                                                Ok(_) => {
                                                                    toaster.success("Task duplicated");
                                                                    let mut resource = resource;
                                                                    resource.restart();
                                                                }
                                                                Err(err) => toaster
                                                                    .error(format!("Could not duplicate task: {err}")),
                                                            }
                                                        });
                                                    },
                                                    "Duplicate"
                                                }
                                                button {
                                                    class: "btn btn-danger",
                                                    r#type: "button",
                                                    onclick: move |_| delete_task.set(Some(delete_task_target.clone())),
                                                    "Delete"
                                                }
                                            }
                                        }
                                    }
                                });
                                rsx! {
                                    div { key: "{chapter.id}", class: "chapter-admin",
                                        div { class: "chapter-admin-header",
                                            div {
                                                strong { "\u{1F4D6} {chapter.name}" }
                                                div { class: "admin-row-meta",
                                                    "{chapter.description} | {chapter.tasks.len()} tasks"
                                                }
                                            }
                                            div { class: "admin-row-actions",
                                                button {
                                                    class: "btn btn-secondary",
                                                    r#type: "button",
                                                    onclick: move |_| chapter_form.set(Some(edit_target.clone())),
                                                    "Edit"
                                                }
                                                button {
                                                    class: "btn btn-primary",
                                                    r#type: "button",
                                                    onclick: move |_| {
                                                        task_form.set(Some(TaskFormTarget {
                                                            chapter_id: add_task_chapter.clone(),
                                                            task: None,
                                                        }));
                                                    },
                                                    "Add task"
                                                }
                                                button {
                                                    class: "btn btn-danger",
                                                    r#type: "button",
                                                    onclick: move |_| delete_chapter.set(Some(delete_target.clone())),
                                                    "Delete"
                                                }
                                            }
                                        }
                                        if chapter.tasks.is_empty() {
                                            p { class: "empty-hint", "No tasks in this chapter yet." }
                                        } else {
                                            div { class: "admin-list",
                                                {task_items}
                                            }
                                        }
                                    }
                                }
                            });
                            rsx! {
                                div { key: "{level.id}", class: "level-admin",
                                    h4 { class: "level-admin-title", "\u{1F4DA} {level.name}" }
                                    if level.chapters.is_empty() {
                                        p { class: "empty-hint", "No chapters in this level yet." }
                                    } else {
                                        {chapter_blocks}
                                    }
                                }
                            }
                        });

                        let scaffold_subject = subject.id.clone();
                        let scaffold_subjects = subjects_for_actions.clone();
                        rsx! {
                            div { class: "section-row",
                                h3 { class: "modal-title", "{subject.icon} {subject.name}" }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: move |_| on_close.call(()),
                                    "Close"
                                }
                            }
                            if subject.levels.is_empty() {
                                div { class: "empty-scaffold",
                                    p { "This subject has no content yet." }
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        onclick: move |_| {
                                            let subjects = scaffold_subjects.clone();
                                            let subject_id = scaffold_subject.clone();
                                            let mut toaster = toaster;
                                            spawn(async move {
                                                match subjects.scaffold_default_content(&subject_id).await {
                                                    Ok(()) => {
                                                        toaster.success("Starter structure created");
                                                        let mut resource = resource;
                                                        resource.restart();
                                                    }
                                                    Err(err) => toaster
                                                        .error(format!("Could not create structure: {err}")),
                                                }
                                            });
                                        },
                                        "Create starter structure"
                                    }
                                }
                            } else {
                                div { class: "section-row",
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        onclick: move |_| chapter_form.set(Some(ChapterFormTarget::New)),
                                        "Add chapter"
                                    }
                                }
                                {level_blocks}
                            }
                            if let Some(target) = chapter_form() {
                                ChapterFormModal {
                                    subject_id: subject.id.clone(),
                                    levels: levels.clone(),
                                    target,
                                    on_close: move |()| chapter_form.set(None),
                                    on_saved: move |()| {
                                        chapter_form.set(None);
                                        let mut resource = resource;
                                        resource.restart();
                                    },
                                }
                            }
                            if let Some(target) = task_form() {
                                TaskFormModal {
                                    subject_id: subject.id.clone(),
                                    existing_ids: subject
                                        .tasks()
                                        .map(|task| task.id.to_string())
                                        .collect::<Vec<_>>(),
                                    target,
                                    on_close: move |()| task_form.set(None),
                                    on_saved: move |()| {
                                        task_form.set(None);
                                        let mut resource = resource;
                                        resource.restart();
                                    },
                                }
                            }
                            if let Some(chapter) = delete_chapter() {
                                ConfirmModal {
                                    title: "Delete chapter?",
                                    body: format!(
                                        "\"{}\" and all of its tasks will be removed.",
                                        chapter.name
                                    ),
                                    confirm_label: "Delete",
                                    busy: false,
                                    on_cancel: move |()| delete_chapter.set(None),
                                    on_confirm: {
                                        let subjects = subjects_for_actions.clone();
                                        let subject_id = subject.id.clone();
                                        let chapter_id = chapter.id.clone();
                                        move |()| {
                                            let subjects = subjects.clone();
                                            let subject_id = subject_id.clone();
                                            let chapter_id = chapter_id.clone();
                                            let mut toaster = toaster;
                                            let mut delete_chapter = delete_chapter;
                                            spawn(async move {
                                                match subjects.delete_chapter(&subject_id, &chapter_id).await {
                                                    Ok(()) => {
                                                        toaster.success("Chapter deleted");
                                                        delete_chapter.set(None);
                                                        let mut resource = resource;
                                                        resource.restart();
                                                    }
                                                    Err(err) => {
                                                        delete_chapter.set(None);
                                                        toaster.error(format!("Could not delete chapter: {err}"));
                                                    }
                                                }
                                            });
                                        }
                                    },
                                }
                            }
                            if let Some((chapter_id, task)) = delete_task() {
                                ConfirmModal {
                                    title: "Delete task?",
                                    body: format!("\"{}\" will be removed.", task.name),
                                    confirm_label: "Delete",
                                    busy: false,
                                    on_cancel: move |()| delete_task.set(None),
                                    on_confirm: {
                                        let subjects = subjects_for_actions.clone();
                                        let subject_id = subject.id.clone();
                                        let task_id = task.id.clone();
                                        move |()| {
                                            let subjects = subjects.clone();
                                            let subject_id = subject_id.clone();
                                            let chapter_id = chapter_id.clone();
                                            let task_id = task_id.clone();
                                            let mut toaster = toaster;
                                            let mut delete_task = delete_task;
                                            spawn(async move {
                                                match subjects
                                                    .delete_task(&subject_id, &chapter_id, &task_id)
                                                    .await
                                                {
                                                    Ok(()) => {
                                                        toaster.success("Task deleted");
                                                        delete_task.set(None);
                                                        let mut resource = resource;
                                                        resource.restart();
                                                    }
                                                    Err(err) => {
                                                        delete_task.set(None);
                                                        toaster.error(format!("Could not delete task: {err}"));
                                                    }
                                                }
                                            });
                                        }
                                    },
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Add/edit form for a chapter, with a level picker.
#[component]
fn ChapterFormModal(
    subject_id: SubjectId,
    levels: Vec<Level>,
    target: ChapterFormTarget,
    on_close: Callback<()>,
    on_saved: Callback<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let toaster = Toaster::from_context();

    let (editing, init_name, init_description, init_level) = match &target {
        ChapterFormTarget::New => (
            None,
            String::new(),
            String::new(),
            levels.first().map(|level| level.id.to_string()).unwrap_or_default(),
        ),
        ChapterFormTarget::Edit(level_id, chapter) => (
            Some(chapter.id.clone()),
            chapter.name.clone(),
            chapter.description.clone(),
            level_id.to_string(),
        ),
    };

    let mut name = use_signal(|| init_name);
    let mut description = use_signal(|| init_description);
    let mut level = use_signal(|| init_level);
    let mut saving = use_signal(|| false);

    let title = if editing.is_some() {
        "Edit chapter"
    } else {
        "Add chapter"
    };

    let subjects_service = ctx.subjects();
    let save = move |_| {
        let subjects = subjects_service.clone();
        let subject_id = subject_id.clone();
        let editing = editing.clone();
        let level_id = LevelId::new(level());
        let (name, description) = (name(), description());
        let mut toaster = toaster;
        spawn(async move {
            saving.set(true);
            let result = match editing {
                Some(chapter_id) => subjects
                    .update_chapter(&subject_id, &chapter_id, name, description, &level_id)
                    .await,
                None => subjects
                    .add_chapter(&subject_id, &level_id, name, description)
                    .await
                    .map(|_| ()),
            };
            saving.set(false);
            match result {
                Ok(()) => {
                    toaster.success("Chapter saved");
                    on_saved.call(());
                }
                Err(err) => toaster.error(format!("Could not save chapter: {err}")),
            }
        });
    };

    rsx! {
        div {
            class: "modal-overlay modal-overlay--nested",
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
                        placeholder: "e.g. Numbers to 100",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Description" }
                    textarea {
                        rows: 3,
                        value: "{description()}",
                        oninput: move |evt| description.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Level" }
                    select {
                        value: "{level()}",
                        onchange: move |evt| level.set(evt.value()),
                        for option_level in levels.iter() {
                            option {
                                key: "{option_level.id}",
                                value: "{option_level.id}",
                                selected: level() == option_level.id.to_string(),
                                "{option_level.name}"
                            }
                        }
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

/// Add/edit form for a task.
#[component]
fn TaskFormModal(
    subject_id: SubjectId,
    existing_ids: Vec<String>,
    target: TaskFormTarget,
    on_close: Callback<()>,
    on_saved: Callback<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let toaster = Toaster::from_context();

    let editing = target.task.as_ref().map(|task| task.id.clone());
    let init_name = target
        .task
        .as_ref()
        .map(|task| task.name.clone())
        .unwrap_or_default();
    let init_kind = target
        .task
        .as_ref()
        .map_or("concept", |task| match task.kind {
            TaskKind::Concept => "concept",
            TaskKind::Skill => "skill",
            TaskKind::Practice => "practice",
            TaskKind::Test => "test",
        })
        .to_owned();
    let init_difficulty = target
        .task
        .as_ref()
        .map_or_else(|| "1".to_owned(), |task| task.difficulty.to_string());
    let init_time = target
        .task
        .as_ref()
        .map_or_else(|| "30".to_owned(), |task| task.estimated_time.to_string());
    let init_steps = target
        .task
        .as_ref()
        .map(|task| task.steps.join("\n"))
        .unwrap_or_default();
    let init_prereqs = target
        .task
        .as_ref()
        .map(|task| {
            task.prerequisites
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    let mut name = use_signal(|| init_name);
    let mut kind = use_signal(|| init_kind);
    let mut difficulty = use_signal(|| init_difficulty);
    let mut time = use_signal(|| init_time);
    let mut steps_text = use_signal(|| init_steps);
    let mut prereqs_text = use_signal(|| init_prereqs);
    let mut saving = use_signal(|| false);

    let title = if editing.is_some() { "Edit task" } else { "Add task" };

    let subjects_service = ctx.subjects();
    let chapter_id = target.chapter_id.clone();
    let save = move |_| {
        let mut toaster = toaster;

        let kind = match kind().as_str() {
            "skill" => TaskKind::Skill,
            "practice" => TaskKind::Practice,
            "test" => TaskKind::Test,
            _ => TaskKind::Concept,
        };
        let Ok(difficulty) = difficulty().parse::<u8>() else {
            toaster.error("Difficulty must be a number from 1 to 5");
            return;
        };
        let Ok(estimated_time) = time().parse::<u32>() else {
            toaster.error("Estimated time must be a number of minutes");
            return;
        };
        let steps: Vec<String> = steps_text().lines().map(str::to_owned).collect();
        let prerequisites: Vec<TaskId> = prereqs_text()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(TaskId::new)
            .collect();
        if let Some(unknown) = prerequisites
            .iter()
            .find(|id| !existing_ids.contains(&id.to_string()))
        {
            toaster.error(format!("Unknown prerequisite task id: {unknown}"));
            return;
        }

        let draft = match TaskDraft::new(name(), kind, difficulty, estimated_time, steps, prerequisites)
        {
            Ok(draft) => draft,
            Err(err) => {
                toaster.error(err.to_string());
                return;
            }
        };

        let subjects = subjects_service.clone();
        let subject_id = subject_id.clone();
        let chapter_id = chapter_id.clone();
        let editing = editing.clone();
        spawn(async move {
            saving.set(true);
            let result = match editing {
                Some(task_id) => subjects.update_task(&subject_id, &task_id, draft).await,
                None => subjects
                    .add_task(&subject_id, &chapter_id, draft)
                    .await
                    .map(|_| ()),
            };
            saving.set(false);
            match result {
                Ok(()) => {
                    toaster.success("Task saved");
                    on_saved.call(());
                }
                Err(err) => toaster.error(format!("Could not save task: {err}")),
            }
        });
    };

    rsx! {
        div {
            class: "modal-overlay modal-overlay--nested",
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
                        placeholder: "Task name",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Type" }
                    select {
                        value: "{kind()}",
                        onchange: move |evt| kind.set(evt.value()),
                        option { value: "concept", selected: kind() == "concept", "Concept" }
                        option { value: "skill", selected: kind() == "skill", "Skill drill" }
                        option { value: "practice", selected: kind() == "practice", "Practice" }
                        option { value: "test", selected: kind() == "test", "Test" }
                    }
                }
                div { class: "form-group",
                    label { "Difficulty" }
                    select {
                        value: "{difficulty()}",
                        onchange: move |evt| difficulty.set(evt.value()),
                        for value in 1..=5u8 {
                            option {
                                key: "{value}",
                                value: "{value}",
                                selected: difficulty() == value.to_string(),
                                "{value}"
                            }
                        }
                    }
                }
                div { class: "form-group",
                    label { "Estimated minutes" }
                    input {
                        r#type: "number",
                        min: "5",
                        max: "120",
                        value: "{time()}",
                        oninput: move |evt| time.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Steps (one per line)" }
                    textarea {
                        rows: 6,
                        value: "{steps_text()}",
                        placeholder: "Watch the intro video\nRead pages 1-3\nFinish the worksheet",
                        oninput: move |evt| steps_text.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Prerequisite task ids (comma separated)" }
                    input {
                        r#type: "text",
                        value: "{prereqs_text()}",
                        placeholder: "task_001, task_002",
                        oninput: move |evt| prereqs_text.set(evt.value()),
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
