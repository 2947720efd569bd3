//! HTML pages for browsing users

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::db::{DbError, User};
use crate::http::extractors::RecordId;
use crate::http::render::{self, ViewContext};
use crate::http::server::AppState;

/// Failure while loading a page, rendered as a 500 page
#[derive(Debug)]
pub enum ViewError {
    Database(DbError),
    Decode(serde_json::Error),
}

impl From<DbError> for ViewError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        match &self {
            Self::Database(e) => tracing::error!("Database error in view: {}", e),
            Self::Decode(e) => tracing::error!("Bad user record in view: {}", e),
        }
        let ctx = ViewContext::new("Error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render::server_error(&ctx)),
        )
            .into_response()
    }
}

/// GET /usuarios
async fn list_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Html<String>, ViewError> {
    let users = state
        .users
        .all()
        .await?
        .into_iter()
        .map(User::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let ctx = ViewContext::from_headers("Usuarios", &headers);
    Ok(Html(render::users_table(&ctx, &users)))
}

/// GET /usuarios/{id}
async fn detail_page(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    headers: HeaderMap,
) -> Result<Response, ViewError> {
    let Some(record) = state.users.find(id).await? else {
        let ctx = ViewContext::from_headers("Usuario no encontrado", &headers);
        let html = render::not_found(&ctx, "Usuario no encontrado");
        return Ok((StatusCode::NOT_FOUND, Html(html)).into_response());
    };

    let user = User::try_from(record)?;
    let ctx = ViewContext::from_headers(format!("Usuario {}", user.id), &headers);
    Ok(Html(render::user_detail(&ctx, &user)).into_response())
}

/// Fallback for any unmatched route
pub async fn not_found(headers: HeaderMap) -> (StatusCode, Html<String>) {
    let ctx = ViewContext::from_headers("Página no encontrada", &headers);
    (
        StatusCode::NOT_FOUND,
        Html(render::not_found(&ctx, "La página solicitada no existe.")),
    )
}

/// View routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/usuarios", get(list_page))
        .route("/usuarios/{id}", get(detail_page))
}
