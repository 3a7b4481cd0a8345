//! Goal routes: user-scoped CRUD with activity logging.

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
use crate::models::goal::{CreateGoal, Goal, GoalStatus, UpdateGoal};
use crate::services::activity::log_activity;
use crate::validation::{parse_day, sanitize_title};
use crate::AppState;

fn clamp_progress(progress: i32) -> i32 {
    progress.clamp(0, 100)
}

fn deadline_change(raw: &Option<String>) -> Result<Option<Option<NaiveDate>>, AppError> {
    match raw.as_deref() {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(value) => parse_day(value)
            .map(|d| Some(Some(d)))
            .ok_or_else(|| AppError::Validation("Deadline must be YYYY-MM-DD".to_string())),
    }
}

/// GET /api/goals — list the current user's goals, newest first.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Goal>>>, AppError> {
    let goals = sqlx::query_as::<_, Goal>(
        "SELECT * FROM goals WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(current_user.id)
    .fetch_all(&state.db)
    .await?;
    Ok(ApiResponse::success(goals))
}

/// POST /api/goals — create a goal.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateGoal>,
) -> Result<Json<ApiResponse<Goal>>, AppError> {
    let title = sanitize_title(&body.title);
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    let progress = clamp_progress(body.progress.unwrap_or(0));
    let status = body.status.unwrap_or(GoalStatus::Active);
    let deadline = deadline_change(&body.deadline)?.flatten();

    let goal = sqlx::query_as::<_, Goal>(
        r#"
        INSERT INTO goals (user_id, title, progress, status, deadline)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(current_user.id)
    .bind(&title)
    .bind(progress)
    .bind(status)
    .bind(deadline)
    .fetch_one(&state.db)
    .await?;

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::GoalCreated,
        Some(goal.id),
        Some(json!({ "title": goal.title })),
    )
    .await;

    Ok(ApiResponse::success(goal))
}

/// PATCH /api/goals/:id — update goal fields.
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateGoal>,
) -> Result<Json<ApiResponse<Goal>>, AppError> {
    let exists = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM goals WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(current_user.id)
    .fetch_optional(&state.db)
    .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Goal not found".to_string()));
    }

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
    let progress = body.progress.map(clamp_progress);
    let deadline = deadline_change(&body.deadline)?;

    let goal = sqlx::query_as::<_, Goal>(
        r#"
        UPDATE goals SET
            title = COALESCE($3, title),
            progress = COALESCE($4, progress),
            status = COALESCE($5, status),
            deadline = CASE WHEN $6 THEN $7 ELSE deadline END,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(current_user.id)
    .bind(title)
    .bind(progress)
    .bind(body.status)
    .bind(deadline.is_some())
    .bind(deadline.flatten())
    .fetch_one(&state.db)
    .await?;

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::GoalUpdated,
        Some(goal.id),
        Some(json!({ "progress": goal.progress })),
    )
    .await;

    Ok(ApiResponse::success(goal))
}

/// DELETE /api/goals/:id
pub async fn remove(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let deleted = sqlx::query_scalar::<_, Uuid>(
        "DELETE FROM goals WHERE id = $1 AND user_id = $2 RETURNING id",
    )
    .bind(id)
    .bind(current_user.id)
    .fetch_optional(&state.db)
    .await?;

    if deleted.is_none() {
        return Err(AppError::NotFound("Goal not found".to_string()));
    }

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::GoalDeleted,
        Some(id),
        None,
    )
    .await;

    Ok(ApiResponse::success(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        assert_eq!(clamp_progress(-10), 0);
        assert_eq!(clamp_progress(50), 50);
        assert_eq!(clamp_progress(250), 100);
    }

    #[test]
    fn deadline_change_semantics() {
        assert_eq!(deadline_change(&None).unwrap(), None);
        assert_eq!(deadline_change(&Some(String::new())).unwrap(), Some(None));
        let set = deadline_change(&Some("2025-06-01".to_string())).unwrap();
        assert_eq!(
            set,
            Some(Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()))
        );
        assert!(deadline_change(&Some("junk".to_string())).is_err());
    }
}
