use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("malformed request: {0}")]
    BadRequest(String),
    #[error("no questions left to play")]
    QuizExhausted,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A failure whose response status is fixed by the endpoint, whatever the cause.
    #[error("{source} (reported as {status})")]
    Reported {
        status: StatusCode,
        source: Box<ApiError>,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::QuizExhausted => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Reported { status, .. } => *status,
        }
    }

    pub fn reported_as(self, status: StatusCode) -> Self {
        let source = match self {
            ApiError::Reported { source, .. } => source,
            cause => Box::new(cause),
        };
        ApiError::Reported { status, source }
    }

    /// The underlying cause, past any reporting wrapper.
    pub fn cause(&self) -> &ApiError {
        match self {
            ApiError::Reported { source, .. } => source.cause(),
            cause => cause,
        }
    }
}

pub trait ReportAs<T> {
    /// Keeps the cause but answers with `status`.
    fn report_as(self, status: StatusCode) -> ApiResult<T>;
}

impl<T, E: Into<ApiError>> ReportAs<T> for Result<T, E> {
    fn report_as(self, status: StatusCode) -> ApiResult<T> {
        self.map_err(|e| e.into().reported_as(status))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

fn message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Request",
        _ => status.canonical_reason().unwrap_or("Internal Server Error"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self.cause() {
            ApiError::Database(_) => tracing::error!(%status, "Request failed: {self}"),
            _ => tracing::warn!(%status, "Request failed: {self}"),
        }
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: message(status),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::Validation(e.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Path did not match: {}", rejection.body_text());
        ApiError::NotFound("route")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn body_of(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn natural_statuses() {
        let (status, body) = body_of(ApiError::NotFound("question")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"success": false, "error": 404, "message": "Not Found"})
        );

        let (status, body) = body_of(ApiError::Validation("empty".to_owned())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Unprocessable Request");

        let (status, body) = body_of(ApiError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], 405);
        assert_eq!(body["message"], "Method Not Allowed");

        let (status, body) = body_of(ApiError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn reported_status_wins_and_cause_survives() {
        let error = ApiError::QuizExhausted.reported_as(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(matches!(error.cause(), ApiError::QuizExhausted));

        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], 422);
    }

    #[test]
    fn reporting_twice_keeps_one_wrapper() {
        let error = ApiError::NotFound("question")
            .reported_as(StatusCode::UNPROCESSABLE_ENTITY)
            .reported_as(StatusCode::NOT_FOUND);
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert!(matches!(error.cause(), ApiError::NotFound("question")));
    }

    #[test]
    fn report_as_converts_database_errors() {
        let res: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        let error = res.report_as(StatusCode::NOT_FOUND).unwrap_err();
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert!(matches!(error.cause(), ApiError::Database(_)));
    }
}
