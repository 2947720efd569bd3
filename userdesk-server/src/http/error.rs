//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Missing records are not errors here; handlers answer `null` with 200.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationErrors;

/// Message for a duplicate email on create or update
pub const DUPLICATE_EMAIL: &str = "El correo electrónico ya se encuentra registrado";

/// Message for an update that carries no usable fields
pub const NO_DATA_TO_UPDATE: &str = "Sin datos para actualizar";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400, keyed by field)
    Validation(ValidationErrors),

    /// Uniqueness conflict (400, single message)
    Conflict { message: String },

    /// Request can't be acted on (400, single message)
    BadRequest { message: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn duplicate_email() -> Self {
        Self::Conflict {
            message: DUPLICATE_EMAIL.into(),
        }
    }

    pub fn no_data_to_update() -> Self {
        Self::BadRequest {
            message: NO_DATA_TO_UPDATE.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(errors) => (StatusCode::BAD_REQUEST, json!(errors)),
            Self::Conflict { message } | Self::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "ocurrió un error interno" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::UnknownColumn { .. } | DbError::EmptyData { .. } => Self::BadRequest {
                message: e.to_string(),
            },
            _ => Self::Database(e),
        }
    }
}
