/*
 * Responsibility
 * - handler が返すエラーの閉じた分類 (Validation / User / Unexpected)
 * - IntoResponse: 1 つの match で status と JSON body を決める
 * - 想定外のエラーも 500 にはせず 400 + envelope で返す
 * - extractor の rejection (Json / Path) も Validation に寄せる (WithRejection 経由)
 */
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// `{"data": ..., "status": ..., "message": ...}` envelope used by every JSON reply.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: Option<T>,
    pub status: i32,
    pub message: String,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            status: 1,
            message: message.into(),
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            status: 1,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            status: 0,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    User { status: StatusCode, message: String },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn user(status: StatusCode, message: impl Into<String>) -> Self {
        Self::User {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::user(StatusCode::FORBIDDEN, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::user(StatusCode::UNAUTHORIZED, message)
    }

}

impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for HandlerError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::Validation { message } => {
                (StatusCode::BAD_REQUEST, Json(MessageBody { message })).into_response()
            }
            HandlerError::User { status, message } => {
                (status, Json(MessageBody { message })).into_response()
            }
            HandlerError::Unexpected(err) => {
                tracing::error!(error = ?err, "handler failed");
                (
                    StatusCode::BAD_REQUEST,
                    Json(Envelope::failure(err.to_string())),
                )
                    .into_response()
            }
        }
    }
}
