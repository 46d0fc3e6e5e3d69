use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use railbook_catalog::SelectionError;
use railbook_core::CoreError;
use railbook_order::WizardError;
use railbook_shared::Notification;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    UpstreamError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::UpstreamError(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        // Clients show the rejection as an error toast
        let body = Json(json!({
            "error": error_message,
            "notifications": [Notification::error(error_message.clone())],
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
            CoreError::NotFound(msg) => AppError::NotFoundError(msg),
            CoreError::InvalidTransition { .. } => AppError::ConflictError(err.to_string()),
            CoreError::IdentityError(msg) => AppError::AuthenticationError(msg),
            CoreError::UpstreamError(msg) => AppError::UpstreamError(msg),
            CoreError::InternalError(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::InvalidTransition { .. } | WizardError::Busy => AppError::ConflictError(err.to_string()),
            WizardError::InvalidOtp(_) | WizardError::OtpRejected => AppError::ValidationError(err.to_string()),
            WizardError::Core(inner) => inner.into(),
        }
    }
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::UnknownSeat(_) => AppError::NotFoundError(err.to_string()),
            SelectionError::AlreadyBooked(_) => AppError::ConflictError(err.to_string()),
            SelectionError::LimitReached { .. } | SelectionError::Empty => AppError::ValidationError(err.to_string()),
            SelectionError::Api(inner) => inner.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
