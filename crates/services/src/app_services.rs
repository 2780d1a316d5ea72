use std::sync::Arc;

use backend::Backend;
use backend::rest::RestInitError;

use crate::Clock;
use crate::progress_service::ProgressService;
use crate::stats_service::StatsService;
use crate::student_service::StudentService;
use crate::subject_service::SubjectService;

/// Assembles the app-facing services over one backend.
#[derive(Clone)]
pub struct AppServices {
    students: Arc<StudentService>,
    subjects: Arc<SubjectService>,
    progress: Arc<ProgressService>,
    stats: Arc<StatsService>,
}

impl AppServices {
    /// Build services over an already-constructed backend.
    #[must_use]
    pub fn from_backend(backend: &Backend, clock: Clock) -> Self {
        Self {
            students: Arc::new(StudentService::new(Arc::clone(&backend.students))),
            subjects: Arc::new(SubjectService::new(Arc::clone(&backend.subjects))),
            progress: Arc::new(ProgressService::new(clock, Arc::clone(&backend.progress))),
            stats: Arc::new(StatsService::new(Arc::clone(&backend.stats))),
        }
    }

    /// Build services backed by the remote REST API.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` when the base URL is unusable.
    pub fn rest(base_url: &str, clock: Clock) -> Result<Self, RestInitError> {
        let backend = Backend::rest(base_url)?;
        Ok(Self::from_backend(&backend, clock))
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
