use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Every failure a handler can surface. Rendered as `{success: false, message}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Token(String),

    #[error("API 호출 실패: {message}")]
    Upstream { status: StatusCode, message: String },

    /// Server-side configuration is missing; the message is safe to show.
    #[error("{0}")]
    Misconfigured(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn token(msg: impl Into<String>) -> Self {
        Self::Token(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Token(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream { status, .. } => *status,
            Self::Misconfigured(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

const MALFORMED_JSON: &str = "요청 본문이 올바른 JSON이 아닙니다.";
const INVALID_FIELDS: &str = "요청 데이터의 형식이 올바르지 않습니다.";

impl AppError {
    /// 400 for a body that failed to decode. Well-formed JSON with the wrong
    /// shape gets its own message.
    pub fn invalid_json(err: &serde_json::Error) -> Self {
        warn!(error = %err, "rejected json body");
        match err.classify() {
            serde_json::error::Category::Data => Self::Validation(INVALID_FIELDS.into()),
            _ => Self::Validation(MALFORMED_JSON.into()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected json body");
        let message = match rejection {
            JsonRejection::JsonDataError(_) => INVALID_FIELDS,
            JsonRejection::MissingJsonContentType(_) => {
                "Content-Type 헤더가 application/json이어야 합니다."
            }
            _ => MALFORMED_JSON,
        };
        Self::Validation(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Internal(err) => {
                error!(error = ?err, "internal error");
                "서버 오류가 발생했습니다.".to_string()
            }
            Self::Upstream { status, message } => {
                warn!(%status, %message, "places provider error");
                self.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
