#![forbid(unsafe_code)]

pub mod repository;
pub mod rest;

pub use repository::{
    Backend, BackendError, BatchEnrollment, InMemoryBackend, OverallStats, ProgressRepository,
    StatsRepository, StudentRepository, SubjectRepository, SubjectStats,
};
pub use rest::{RestBackend, RestInitError};
