//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Path, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::Form;
use serde_json::Value;

use super::error::ApiError;
use crate::db::Fields;
use crate::models::ValidationErrors;

/// Submitted fields from a JSON object, an urlencoded form or a multipart
/// form.
///
/// The body format follows `Content-Type`; anything that is not a form is
/// read as JSON. An empty body yields no fields. File parts of a multipart
/// form are skipped.
pub struct Payload(pub Fields);

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest {
                    message: format!("formulario inválido: {}", e.body_text()),
                })?;
            return multipart_fields(multipart).await.map(Self);
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest {
                    message: format!("formulario inválido: {}", e.body_text()),
                })?;

            let fields = pairs
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            return Ok(Self(fields));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest {
                message: format!("cuerpo ilegible: {}", e.body_text()),
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Fields::new()));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(_) => Err(ApiError::BadRequest {
                message: "el cuerpo debe ser un objeto JSON".into(),
            }),
            Err(e) => Err(ApiError::BadRequest {
                message: format!("JSON inválido: {}", e),
            }),
        }
    }
}

async fn multipart_fields(mut multipart: Multipart) -> Result<Fields, ApiError> {
    let invalid = |e: axum::extract::multipart::MultipartError| ApiError::BadRequest {
        message: format!("formulario inválido: {}", e.body_text()),
    };

    let mut fields = Fields::new();
    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field.text().await.map_err(invalid)?;
        fields.insert(name, Value::String(value));
    }
    Ok(fields)
}

/// Extract and validate an integer record id from path
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || ApiError::Validation(ValidationErrors::single("id", "Id debe ser un número entero"));

        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;

        let id = id.trim().parse::<i64>().map_err(|_| invalid())?;
        Ok(Self(id))
    }
}
