use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use playtime_cloud::CloudError;
use playtime_core::error::CoreError;
use playtime_db::DbError;
use playtime_wechat::WechatError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, the store and integration errors,
/// and adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `playtime_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A document-store error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// A failure talking to the WeChat API.
    #[error(transparent)]
    Wechat(#[from] WechatError),

    /// A failure in object storage or reverse geocoding.
    #[error(transparent)]
    Cloud(#[from] CloudError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// `NotFound` for `entity` with the given id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::Core(CoreError::NotFound {
            entity,
            id: id.to_string(),
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Store errors ---
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                internal()
            }

            // --- Integrations ---
            AppError::Wechat(err) => classify_wechat_error(err),
            AppError::Cloud(err) => classify_cloud_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Upstream `errcode`s are passed through verbatim; transport and HTTP
/// failures only say the service is unavailable.
fn classify_wechat_error(err: &WechatError) -> (StatusCode, &'static str, String) {
    match err {
        WechatError::Upstream { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string()),
        WechatError::Transport(_) | WechatError::Status { .. } => {
            tracing::warn!(error = %err, "WeChat API unavailable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                "WeChat API is unavailable".to_string(),
            )
        }
    }
}

fn classify_cloud_error(err: &CloudError) -> (StatusCode, &'static str, String) {
    match err {
        CloudError::NotConfigured(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "NOT_CONFIGURED",
            err.to_string(),
        ),
        CloudError::Upstream { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string()),
        CloudError::InvalidBucketUrl(_) => {
            tracing::error!(error = %err, "Object storage misconfigured");
            internal()
        }
        CloudError::Upload(_) | CloudError::Transport(_) | CloudError::Status { .. } => {
            tracing::warn!(error = %err, "Cloud API unavailable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                "Cloud service is unavailable".to_string(),
            )
        }
    }
}
