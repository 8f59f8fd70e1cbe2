//! Application error type and its HTTP representation.
//!
//! Every handler returns `Result<_, AppError>`. Errors are rendered as
//!
//! ```json
//! { "error": { "code": "not_found", "message": "User not found", "details": { "id": 7 } } }
//! ```

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use validator::ValidationErrors;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input failed declared constraints. Rendered as 422.
    #[error("{message}")]
    Validation { message: String, details: Value },
    /// No live record with the requested identifier. Rendered as 404.
    #[error("{message}")]
    NotFound { message: String, details: Value },
    /// Storage or other unexpected failure. Rendered as 500.
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Shorthand for a validation error on a single field.
    pub fn invalid_field(field: &str, messages: Vec<String>) -> Self {
        let mut details = Map::new();
        details.insert(field.to_string(), json!(messages));
        Self::validation("The given data was invalid", Value::Object(details))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Map::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("The {} field is invalid ({})", field, e.code),
                })
                .collect();
            details.insert(field.to_string(), json!(messages));
        }

        AppError::validation("The given data was invalid", Value::Object(details))
    }
}

/// Prefix axum puts in front of serde's message for well-formed JSON of the
/// wrong shape.
const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Top-level field named in a JSON data error, e.g. `companies` for
/// `companies[1]: invalid type: string "x", expected i64`.
fn rejected_field(body_text: &str) -> Option<String> {
    let detail = body_text.strip_prefix(JSON_DATA_PREFIX)?;
    let (path, _) = detail.split_once(": ")?;
    let field: String = path
        .chars()
        .take_while(|c| *c != '.' && *c != '[')
        .collect();

    (!field.is_empty() && !field.contains(char::is_whitespace)).then_some(field)
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let field = match &rejection {
            JsonRejection::JsonDataError(_) => rejected_field(&message),
            _ => None,
        };

        let mut details = Map::new();
        details.insert(
            field.unwrap_or_else(|| "body".to_string()),
            json!([message]),
        );
        AppError::validation("The given data was invalid", Value::Object(details))
    }
}

/// A path segment that is not a valid identifier cannot name a record.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::not_found(
            "Resource not found",
            json!({ "path": rejection.body_text() }),
        )
    }
}
