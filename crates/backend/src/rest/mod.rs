use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use tracker_core::model::{
    Student, StudentDraft, StudentId, StudentProgress, Subject, SubjectId,
};

use crate::repository::{
    Backend, BackendError, BatchEnrollment, OverallStats, ProgressRepository, StatsRepository,
    StudentRepository, SubjectRepository, SubjectStats,
};

mod http;

use http::BatchEnrollmentRequest;

/// Adapter that serves the repositories from the remote REST API.
#[derive(Clone)]
pub struct RestBackend {
    client: reqwest::Client,
    base: Url,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RestInitError {
    #[error("invalid API base URL {raw:?}: {source}")]
    InvalidBaseUrl {
        raw: String,
        source: url::ParseError,
    },

    #[error("API base URL must use http or https: {0}")]
    UnsupportedScheme(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl RestBackend {
    /// Build a client for the given base URL (e.g. `http://localhost:5000`).
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` when the URL does not parse, uses a non-HTTP
    /// scheme, or the HTTP client cannot be constructed.
    pub fn connect(base_url: &str) -> Result<Self, RestInitError> {
        let base = Url::parse(base_url.trim()).map_err(|source| RestInitError::InvalidBaseUrl {
            raw: base_url.to_owned(),
            source,
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(RestInitError::UnsupportedScheme(base.scheme().to_owned()));
        }

        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, base })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl StudentRepository for RestBackend {
    async fn list_students(&self) -> Result<Vec<Student>, BackendError> {
        self.get_json("/api/students").await
    }

    async fn get_student(&self, id: &StudentId) -> Result<Student, BackendError> {
        self.get_json(&format!("/api/students/{id}")).await
    }

    async fn add_student(&self, draft: &StudentDraft) -> Result<Student, BackendError> {
        self.post_json("/api/students", draft).await
    }

    async fn update_student(
        &self,
        id: &StudentId,
        draft: &StudentDraft,
    ) -> Result<(), BackendError> {
        self.put_json(&format!("/api/students/{id}"), draft).await
    }

    async fn delete_student(&self, id: &StudentId) -> Result<(), BackendError> {
        self.delete(&format!("/api/students/{id}")).await
    }

    async fn add_subject_to_students(
        &self,
        subject_id: &SubjectId,
        student_ids: &[StudentId],
    ) -> Result<BatchEnrollment, BackendError> {
        let body = BatchEnrollmentRequest {
            subject_id,
            student_ids,
        };
        self.post_json("/api/batch/add-subject-to-students", &body)
            .await
    }
}

#[async_trait]
impl SubjectRepository for RestBackend {
    async fn list_subjects(&self) -> Result<Vec<Subject>, BackendError> {
        self.get_json("/api/subjects").await
    }

    async fn get_subject(&self, id: &SubjectId) -> Result<Subject, BackendError> {
        self.get_json(&format!("/api/subjects/{id}")).await
    }

    async fn add_subject(&self, subject: &Subject) -> Result<(), BackendError> {
        let _created: Subject = self.post_json("/api/subjects", subject).await?;
        Ok(())
    }

    async fn update_subject(&self, subject: &Subject) -> Result<(), BackendError> {
        self.put_json(&format!("/api/subjects/{}", subject.id), subject)
            .await
    }

    async fn delete_subject(&self, id: &SubjectId) -> Result<(), BackendError> {
        self.delete(&format!("/api/subjects/{id}")).await
    }
}

#[async_trait]
impl ProgressRepository for RestBackend {
    async fn get_progress(&self, student_id: &StudentId) -> Result<StudentProgress, BackendError> {
        self.get_json(&format!("/api/students/{student_id}/progress"))
            .await
    }

    async fn save_progress(&self, progress: &StudentProgress) -> Result<(), BackendError> {
        self.post_ack(
            &format!("/api/students/{}/progress", progress.student_id),
            progress,
        )
        .await
    }

    async fn subject_stats(
        &self,
        student_id: &StudentId,
        subject_id: &SubjectId,
    ) -> Result<SubjectStats, BackendError> {
        self.get_json(&format!(
            "/api/students/{student_id}/subjects/{subject_id}/progress"
        ))
        .await
    }
}

#[async_trait]
impl StatsRepository for RestBackend {
    async fn overall_stats(&self) -> Result<OverallStats, BackendError> {
        self.get_json("/api/stats/overall").await
    }
}

impl Backend {
    /// Build a `Backend` backed by the remote REST API.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` when the base URL is unusable.
    pub fn rest(base_url: &str) -> Result<Self, RestInitError> {
        let rest = RestBackend::connect(base_url)?;
        let students: Arc<dyn StudentRepository> = Arc::new(rest.clone());
        let subjects: Arc<dyn SubjectRepository> = Arc::new(rest.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(rest.clone());
        let stats: Arc<dyn StatsRepository> = Arc::new(rest);
        Ok(Self {
            students,
            subjects,
            progress,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_accepts_http_base() {
        let rest = RestBackend::connect("http://localhost:5000").unwrap();
        assert_eq!(rest.base_url().as_str(), "http://localhost:5000/");
    }

    #[test]
    fn connect_rejects_garbage() {
        assert!(matches!(
            RestBackend::connect("not a url"),
            Err(RestInitError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            RestBackend::connect("ftp://host"),
            Err(RestInitError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RestBackend>();
    }
}
