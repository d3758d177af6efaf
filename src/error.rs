use crate::repository::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

/// 요청 처리 오류
#[derive(Debug, Error)]
pub enum AppError {
    #[error("경매를 찾을 수 없습니다")]
    NotFound,
    #[error("Could not save changes to DB")]
    PersistFailure,
    #[error("날짜 형식이 올바르지 않습니다: {0}")]
    InvalidDate(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::PersistFailure | AppError::InvalidDate(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::PersistFailure => "PERSIST_FAILURE",
            AppError::InvalidDate(_) => "INVALID_DATE",
            AppError::Validation(_) => "VALIDATION",
            AppError::Repository(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Repository(e) = &self {
            error!("{:<12} --> 저장소 오류: {:?}", "Handler", e);
        }
        (
            self.status(),
            Json(serde_json::json!({
                "error": self.to_string(),
                "code": self.code()
            })),
        )
            .into_response()
    }
}
