use std::sync::Arc;

use services::{ProgressService, StatsService, StudentService, SubjectService};

/// What the composition root (the binary, or a test harness) must provide to
/// the views.
pub trait UiApp: Send + Sync {
    fn students(&self) -> Arc<StudentService>;
    fn subjects(&self) -> Arc<SubjectService>;
    fn progress(&self) -> Arc<ProgressService>;
    fn stats(&self) -> Arc<StatsService>;
}

/// Service handles the views pull from the Dioxus context.
#[derive(Clone)]
pub struct AppContext {
    students: Arc<StudentService>,
    subjects: Arc<SubjectService>,
    progress: Arc<ProgressService>,
    stats: Arc<StatsService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            students: app.students(),
            subjects: app.subjects(),
            progress: app.progress(),
            stats: app.stats(),
        }
    }

    #[must_use]
    pub fn students(&self) -> Arc<StudentService> {
        Arc::clone(&self.students)
    }

    #[must_use]
    pub fn subjects(&self) -> Arc<SubjectService> {
        Arc::clone(&self.subjects)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
