//! User endpoints - JSON API over the users model
//!
//! Absent records are answered with `null` and status 200.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::db::Record;
use crate::http::error::ApiError;
use crate::http::extractors::{Payload, RecordId};
use crate::http::server::AppState;
use crate::models::{strip_empty, NewUser, UserChanges};

/// GET /users - list every user
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Record>>, ApiError> {
    let users = state.users.all().await?;
    Ok(Json(users))
}

/// POST /users - create a user
async fn create_user(
    State(state): State<Arc<AppState>>,
    Payload(fields): Payload,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let new_user = NewUser::validate(&strip_empty(fields))?;

    let _guard = state.write_guard().await;
    if state.users.find_by_email(&new_user.email).await?.is_some() {
        return Err(ApiError::duplicate_email());
    }

    let user = state.users.create(&new_user.into_fields()).await?;
    tracing::info!(id = ?user.get("id"), "Created user");

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users/{id} - get a single user or null
async fn show_user(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<Option<Record>>, ApiError> {
    let user = state.users.find(id).await?;
    Ok(Json(user))
}

/// POST /users/{id} - update some fields of a user
async fn update_user(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    Payload(fields): Payload,
) -> Result<Json<Option<Record>>, ApiError> {
    let fields = strip_empty(fields);
    if fields.is_empty() {
        return Err(ApiError::no_data_to_update());
    }

    let changes = UserChanges::validate(&fields)?;
    if changes.is_empty() {
        return Err(ApiError::no_data_to_update());
    }

    let _guard = state.write_guard().await;
    if let Some(email) = changes.email() {
        if state
            .users
            .find_by_email_excluding(email, id)
            .await?
            .is_some()
        {
            return Err(ApiError::duplicate_email());
        }
    }

    let user = state.users.update(id, changes.fields()).await?;
    Ok(Json(user))
}

/// POST /users/{id}/delete - delete a user, answering its last state
async fn delete_user(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<Option<Record>>, ApiError> {
    let user = state.users.delete(id).await?;
    if user.is_some() {
        tracing::info!(id, "Deleted user");
    }
    Ok(Json(user))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(show_user).post(update_user))
        .route("/users/{id}/delete", post(delete_user))
}
