//! Task routes: user-scoped CRUD with activity logging.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::activity::ActivityAction;
use crate::models::task::{CreateTask, Task, TaskPriority, UpdateTask};
use crate::services::activity::log_activity;
use crate::validation::{parse_day, sanitize_title};
use crate::AppState;

/// Interpret an optional deadline field: absent leaves it alone, an empty
/// string clears it, anything else must be a valid `YYYY-MM-DD`.
fn deadline_change(raw: &Option<String>) -> Result<Option<Option<NaiveDate>>, AppError> {
    match raw.as_deref() {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(value) => parse_day(value)
            .map(|d| Some(Some(d)))
            .ok_or_else(|| AppError::Validation("Deadline must be YYYY-MM-DD".to_string())),
    }
}

/// GET /api/tasks — list the current user's tasks, newest first.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Task>>>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(current_user.id)
    .fetch_all(&state.db)
    .await?;
    Ok(ApiResponse::success(tasks))
}

/// POST /api/tasks — create a task.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateTask>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    let title = sanitize_title(&body.title);
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    let priority = body.priority.unwrap_or(TaskPriority::Medium);
    let deadline = deadline_change(&body.deadline)?.flatten();

    let task = sqlx::query_as::<_, Task>(
        r#"
        INSERT INTO tasks (user_id, title, priority, deadline)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(current_user.id)
    .bind(&title)
    .bind(priority)
    .bind(deadline)
    .fetch_one(&state.db)
    .await?;

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::TaskCreated,
        Some(task.id),
        Some(json!({ "title": task.title })),
    )
    .await;

    Ok(ApiResponse::success(task))
}

/// PATCH /api/tasks/:id — update task fields; completing a task is logged.
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTask>,
) -> Result<Json<ApiResponse<Task>>, AppError> {
    let existing = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(current_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    let title = match body.title.as_deref() {
        None => None,
        Some(raw) => {
            let title = sanitize_title(raw);
            if title.is_empty() {
                return Err(AppError::Validation("Title cannot be empty".to_string()));
            }
            Some(title)
        }
    };
    let deadline = deadline_change(&body.deadline)?;

    let task = sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks SET
            title = COALESCE($3, title),
            completed = COALESCE($4, completed),
            priority = COALESCE($5, priority),
            deadline = CASE WHEN $6 THEN $7 ELSE deadline END,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(current_user.id)
    .bind(title)
    .bind(body.completed)
    .bind(body.priority)
    .bind(deadline.is_some())
    .bind(deadline.flatten())
    .fetch_one(&state.db)
    .await?;

    if !existing.completed && task.completed {
        log_activity(
            &state.db,
            current_user.id,
            ActivityAction::TaskCompleted,
            Some(task.id),
            Some(json!({ "title": task.title })),
        )
        .await;
    }

    Ok(ApiResponse::success(task))
}

/// DELETE /api/tasks/:id
pub async fn remove(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let deleted = sqlx::query_scalar::<_, Uuid>(
        "DELETE FROM tasks WHERE id = $1 AND user_id = $2 RETURNING id",
    )
    .bind(id)
    .bind(current_user.id)
    .fetch_optional(&state.db)
    .await?;

    if deleted.is_none() {
        return Err(AppError::NotFound("Task not found".to_string()));
    }

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::TaskDeleted,
        Some(id),
        None,
    )
    .await;

    Ok(ApiResponse::success(json!({ "ok": true })))
}
