//! Request/response plumbing for the REST adapter.
//!
//! Every endpoint speaks JSON; failures carry an `{"error": "..."}` body with
//! a non-2xx status, which is decoded into `BackendError`.

use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use tracker_core::model::{StudentId, SubjectId};

use crate::repository::BackendError;

use super::RestBackend;

/// Wire body for `POST /api/batch/add-subject-to-students`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BatchEnrollmentRequest<'a> {
    pub subject_id: &'a SubjectId,
    pub student_ids: &'a [StudentId],
}

/// Error body shape served by the API.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: String,
}

/// Maps a non-2xx response to a typed error.
fn rejection(status: StatusCode, body: &[u8]) -> BackendError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_owned());

    match status {
        StatusCode::NOT_FOUND => BackendError::NotFound,
        StatusCode::CONFLICT => BackendError::Conflict,
        _ => BackendError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_decode() {
        BackendError::Serialization(err.to_string())
    } else {
        BackendError::Connection(err.to_string())
    }
}

impl RestBackend {
    fn endpoint(&self, path: &str) -> Result<url::Url, BackendError> {
        self.base
            .join(path)
            .map_err(|e| BackendError::Connection(e.to_string()))
    }

    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_owned();
        let body = response.bytes().await.map_err(transport_error)?;
        let error = rejection(status, &body);
        warn!(%status, path, "api request rejected");
        Err(error)
    }

    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.endpoint(path)?)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(transport_error)
    }

    pub(super) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(transport_error)
    }

    /// POST where the server answers with an acknowledgement message the
    /// client does not need.
    pub(super) async fn post_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?;
        Ok(())
    }

    pub(super) async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .put(self.endpoint(path)?)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?;
        Ok(())
    }

    pub(super) async fn delete(&self, path: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.endpoint(path)?)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_decodes_error_body() {
        let err = rejection(StatusCode::BAD_REQUEST, br#"{"error": "Name is required"}"#);
        match err {
            BackendError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Name is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejection_maps_not_found() {
        let err = rejection(StatusCode::NOT_FOUND, br#"{"error": "Student not found"}"#);
        assert!(matches!(err, BackendError::NotFound));
    }

    #[test]
    fn rejection_falls_back_to_raw_body() {
        let err = rejection(StatusCode::INTERNAL_SERVER_ERROR, b"boom");
        match err {
            BackendError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn batch_request_serializes_camel_case() {
        let subject_id = SubjectId::new("math");
        let student_ids = vec![StudentId::new("student_001")];
        let body = BatchEnrollmentRequest {
            subject_id: &subject_id,
            student_ids: &student_ids,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"subjectId":"math","studentIds":["student_001"]}"#
        );
    }
}
