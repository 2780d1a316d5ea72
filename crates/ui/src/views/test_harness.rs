use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use backend::{Backend, InMemoryBackend};
use services::{
    AppServices, ProgressService, StatsService, StudentService, SubjectService,
};
use tracker_core::time::fixed_clock;

use crate::context::{UiApp, build_app_context};
use crate::toast::Toaster;
use crate::views::{AdminView, DashboardView, StudentsView, SubjectView, TaskView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn students(&self) -> Arc<StudentService> {
        self.services.students()
    }

    fn subjects(&self) -> Arc<SubjectService> {
        self.services.subjects()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn stats(&self) -> Arc<StatsService> {
        self.services.stats()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Students,
    Dashboard(String),
    Subject(String, String),
    Task(String, String, String),
    Admin,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    Toaster::provide();
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Students => rsx! { StudentsView {} },
        ViewKind::Dashboard(student_id) => rsx! { DashboardView { student_id } },
        ViewKind::Subject(student_id, subject_id) => rsx! {
            SubjectView { student_id, subject_id }
        },
        ViewKind::Task(student_id, subject_id, task_id) => rsx! {
            TaskView { student_id, subject_id, task_id }
        },
        ViewKind::Admin => rsx! { AdminView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: InMemoryBackend,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then give pending resources a few rounds to settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..8 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Harness over a fresh in-memory backend; seed it through `harness.backend`
/// before calling `settle`.
pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let repo = InMemoryBackend::with_clock(fixed_clock());
    setup_view_harness_with_backend(view, repo)
}

pub fn setup_view_harness_with_backend(view: ViewKind, repo: InMemoryBackend) -> ViewHarness {
    let backend = Backend::from_in_memory(repo.clone());
    let services = AppServices::from_backend(&backend, fixed_clock());
    let app = Arc::new(TestApp { services });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, backend: repo }
}

/// Harness over a caller-assembled backend aggregate (e.g. with a failing
/// repository substituted in).
pub fn setup_view_harness_with_aggregate(view: ViewKind, backend: Backend) -> ViewHarness {
    let services = AppServices::from_backend(&backend, fixed_clock());
    let app = Arc::new(TestApp { services });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        backend: InMemoryBackend::with_clock(fixed_clock()),
    }
}
