#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod progress_service;
pub mod stats_service;
pub mod student_service;
pub mod subject_service;

pub use tracker_core::Clock;

pub use app_services::AppServices;
pub use error::{
    ProgressServiceError, StatsServiceError, StudentServiceError, SubjectServiceError,
};
pub use progress_service::{ProgressService, StepAction};
pub use stats_service::StatsService;
pub use student_service::StudentService;
pub use subject_service::SubjectService;
