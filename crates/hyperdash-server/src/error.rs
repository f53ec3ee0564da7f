use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hyperdash_core::CoreError;
use serde::Serialize;

use crate::gateway::Endpoint;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Gateway base URL not configured (set HYPERDASH__GATEWAY__BASE_URL or QUICKNODE_URL)")]
    NotConfigured,

    #[error("{endpoint} API Error ({status}): {body}")]
    Upstream {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    #[error("{endpoint} request failed: {message}")]
    Transport { endpoint: Endpoint, message: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotConfigured => "CONFIG_ERROR",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::Transport { .. } => "TRANSPORT_ERROR",
            AppError::Core(CoreError::Storage(_)) => "STORAGE_ERROR",
            AppError::Core(CoreError::Serialization(_)) => "INTERNAL_ERROR",
            AppError::Core(_) => "INVALID_PARAM",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream { .. } | AppError::Transport { .. } => StatusCode::BAD_GATEWAY,
            AppError::Core(CoreError::Storage(_))
            | AppError::Core(CoreError::Serialization(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Core(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Emit one log line at a level matching who is at fault.
    pub fn log(&self) {
        let code = self.code();
        match self {
            AppError::Core(e) if self.status().is_client_error() => {
                tracing::warn!(error = %e, error_code = code, "Rejected user input");
            }
            AppError::Upstream { endpoint, status, body } => {
                tracing::error!(
                    endpoint = %endpoint,
                    status = %status,
                    body = %body,
                    error_code = code,
                    "Gateway returned an error"
                );
            }
            other => {
                tracing::error!(error = %other, error_code = code, "Request failed");
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();

        tracing::debug!(
            status_code = %status.as_u16(),
            error_code = %self.code(),
            error_message = %self,
            "Returning error response"
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
