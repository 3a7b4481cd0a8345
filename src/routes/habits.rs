//! Habit routes: CRUD plus the per-day completion toggle.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::activity::ActivityAction;
use crate::models::habit::{CreateHabit, Habit, HabitLog, HabitWithLogs, LogHabitRequest};
use crate::services::activity::log_activity;
use crate::services::timeseries;
use crate::validation::{parse_day, sanitize_title};
use crate::AppState;

/// Most recent logs returned per habit by the list endpoint.
const RECENT_LOGS_PER_HABIT: i64 = 90;

/// GET /api/habits — list habits with their recent logs, newest first.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<HabitWithLogs>>>, AppError> {
    let habits = sqlx::query_as::<_, Habit>(
        "SELECT * FROM habits WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(current_user.id)
    .fetch_all(&state.db)
    .await?;

    let ids: Vec<Uuid> = habits.iter().map(|h| h.id).collect();
    let logs = sqlx::query_as::<_, HabitLog>(
        r#"
        SELECT id, habit_id, date, completed FROM (
            SELECT *, ROW_NUMBER() OVER (PARTITION BY habit_id ORDER BY date DESC) AS rn
            FROM habit_logs
            WHERE habit_id = ANY($1)
        ) recent
        WHERE rn <= $2
        ORDER BY date DESC
        "#,
    )
    .bind(&ids)
    .bind(RECENT_LOGS_PER_HABIT)
    .fetch_all(&state.db)
    .await?;

    let mut by_habit: HashMap<Uuid, Vec<HabitLog>> = HashMap::new();
    for log in logs {
        by_habit.entry(log.habit_id).or_default().push(log);
    }

    let result = habits
        .into_iter()
        .map(|habit| {
            let logs = by_habit.remove(&habit.id).unwrap_or_default();
            HabitWithLogs { habit, logs }
        })
        .collect();

    Ok(ApiResponse::success(result))
}

/// POST /api/habits — create a habit.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateHabit>,
) -> Result<Json<ApiResponse<Habit>>, AppError> {
    let name = sanitize_title(&body.name);
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let habit = sqlx::query_as::<_, Habit>(
        "INSERT INTO habits (user_id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(current_user.id)
    .bind(&name)
    .fetch_one(&state.db)
    .await?;

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::HabitCreated,
        Some(habit.id),
        Some(json!({ "name": habit.name })),
    )
    .await;

    Ok(ApiResponse::success(habit))
}

/// Result of toggling a habit log for one day.
#[derive(Debug, Serialize)]
pub struct LogToggle {
    pub date: NaiveDate,
    pub completed: bool,
}

/// POST /api/habits/:id/log — toggle the completion mark for a date
/// (defaults to today).
pub async fn log(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<LogHabitRequest>,
) -> Result<Json<ApiResponse<LogToggle>>, AppError> {
    let habit = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM habits WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(current_user.id)
    .fetch_optional(&state.db)
    .await?;
    if habit.is_none() {
        return Err(AppError::NotFound("Habit not found".to_string()));
    }

    let date = match body.date.as_deref() {
        None => timeseries::today_utc(),
        Some(raw) => parse_day(raw)
            .ok_or_else(|| AppError::Validation("Date must be YYYY-MM-DD".to_string()))?,
    };

    // Toggle: a second log for the same day removes the mark.
    let removed = sqlx::query_scalar::<_, Uuid>(
        "DELETE FROM habit_logs WHERE habit_id = $1 AND date = $2 RETURNING id",
    )
    .bind(id)
    .bind(date)
    .fetch_optional(&state.db)
    .await?;

    if removed.is_some() {
        return Ok(ApiResponse::success(LogToggle {
            date,
            completed: false,
        }));
    }

    sqlx::query("INSERT INTO habit_logs (habit_id, date, completed) VALUES ($1, $2, true)")
        .bind(id)
        .bind(date)
        .execute(&state.db)
        .await?;

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::HabitLogged,
        Some(id),
        Some(json!({ "date": date })),
    )
    .await;

    Ok(ApiResponse::success(LogToggle {
        date,
        completed: true,
    }))
}

/// DELETE /api/habits/:id — removes the habit and its logs.
pub async fn remove(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let deleted = sqlx::query_scalar::<_, Uuid>(
        "DELETE FROM habits WHERE id = $1 AND user_id = $2 RETURNING id",
    )
    .bind(id)
    .bind(current_user.id)
    .fetch_optional(&state.db)
    .await?;

    if deleted.is_none() {
        return Err(AppError::NotFound("Habit not found".to_string()));
    }

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::HabitDeleted,
        Some(id),
        None,
    )
    .await;

    Ok(ApiResponse::success(json!({ "ok": true })))
}
