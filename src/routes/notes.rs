//! Note routes: user-scoped CRUD with activity logging.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::activity::ActivityAction;
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::services::activity::log_activity;
use crate::validation::{sanitize_content, sanitize_title};
use crate::AppState;

/// GET /api/notes — list the current user's notes, most recently edited first.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Note>>>, AppError> {
    let notes = sqlx::query_as::<_, Note>(
        "SELECT * FROM notes WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(current_user.id)
    .fetch_all(&state.db)
    .await?;
    Ok(ApiResponse::success(notes))
}

/// POST /api/notes — create a note.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateNote>,
) -> Result<Json<ApiResponse<Note>>, AppError> {
    let title = body
        .title
        .as_deref()
        .map(sanitize_title)
        .filter(|t| !t.is_empty());
    let content = sanitize_content(&body.content);

    let note = sqlx::query_as::<_, Note>(
        "INSERT INTO notes (user_id, title, content) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(current_user.id)
    .bind(title)
    .bind(&content)
    .fetch_one(&state.db)
    .await?;

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::NoteCreated,
        Some(note.id),
        None,
    )
    .await;

    Ok(ApiResponse::success(note))
}

/// PATCH /api/notes/:id — update title and/or content. An empty title clears
/// it.
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNote>,
) -> Result<Json<ApiResponse<Note>>, AppError> {
    let exists = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM notes WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(current_user.id)
    .fetch_optional(&state.db)
    .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Note not found".to_string()));
    }

    let title_change = body
        .title
        .as_deref()
        .map(|t| Some(sanitize_title(t)).filter(|t| !t.is_empty()));
    let content = body.content.as_deref().map(sanitize_content);

    let note = sqlx::query_as::<_, Note>(
        r#"
        UPDATE notes SET
            title = CASE WHEN $3 THEN $4 ELSE title END,
            content = COALESCE($5, content),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(current_user.id)
    .bind(title_change.is_some())
    .bind(title_change.flatten())
    .bind(content)
    .fetch_one(&state.db)
    .await?;

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::NoteUpdated,
        Some(note.id),
        None,
    )
    .await;

    Ok(ApiResponse::success(note))
}

/// DELETE /api/notes/:id
pub async fn remove(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let deleted = sqlx::query_scalar::<_, Uuid>(
        "DELETE FROM notes WHERE id = $1 AND user_id = $2 RETURNING id",
    )
    .bind(id)
    .bind(current_user.id)
    .fetch_optional(&state.db)
    .await?;

    if deleted.is_none() {
        return Err(AppError::NotFound("Note not found".to_string()));
    }

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::NoteDeleted,
        Some(id),
        None,
    )
    .await;

    Ok(ApiResponse::success(json!({ "ok": true })))
}
