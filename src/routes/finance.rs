//! Finance routes: income/expense entries.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::activity::ActivityAction;
use crate::models::finance::{CreateFinance, Finance, FinanceFilters};
use crate::services::activity::log_activity;
use crate::validation::{parse_amount, sanitize_string, sanitize_title};
use crate::AppState;

const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// GET /api/finance — list entries, newest first, optionally filtered by type.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filters): Query<FinanceFilters>,
) -> Result<Json<ApiResponse<Vec<Finance>>>, AppError> {
    let entries = match filters.entry_type {
        Some(entry_type) => {
            sqlx::query_as::<_, Finance>(
                "SELECT * FROM finance WHERE user_id = $1 AND entry_type = $2
                 ORDER BY date DESC LIMIT $3",
            )
            .bind(current_user.id)
            .bind(entry_type)
            .bind(filters.limit())
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as::<_, Finance>(
                "SELECT * FROM finance WHERE user_id = $1 ORDER BY date DESC LIMIT $2",
            )
            .bind(current_user.id)
            .bind(filters.limit())
            .fetch_all(&state.db)
            .await?
        }
    };
    Ok(ApiResponse::success(entries))
}

/// POST /api/finance — create an income or expense entry.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateFinance>,
) -> Result<Json<ApiResponse<Finance>>, AppError> {
    let amount = parse_amount(body.amount)
        .ok_or_else(|| AppError::Validation("Amount must be a non-negative number".to_string()))?;
    let category = sanitize_title(&body.category);
    if category.is_empty() {
        return Err(AppError::Validation("Category is required".to_string()));
    }
    let description = body
        .description
        .as_deref()
        .map(|d| sanitize_string(d, MAX_DESCRIPTION_LENGTH))
        .filter(|d| !d.is_empty());
    let date = body.date.unwrap_or_else(Utc::now);

    let entry = sqlx::query_as::<_, Finance>(
        r#"
        INSERT INTO finance (user_id, entry_type, amount, category, description, date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(current_user.id)
    .bind(body.entry_type)
    .bind(amount)
    .bind(&category)
    .bind(description)
    .bind(date)
    .fetch_one(&state.db)
    .await?;

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::FinanceCreated,
        Some(entry.id),
        Some(json!({ "type": entry.entry_type, "amount": entry.amount })),
    )
    .await;

    Ok(ApiResponse::success(entry))
}

/// DELETE /api/finance/:id
pub async fn remove(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let deleted = sqlx::query_scalar::<_, Uuid>(
        "DELETE FROM finance WHERE id = $1 AND user_id = $2 RETURNING id",
    )
    .bind(id)
    .bind(current_user.id)
    .fetch_optional(&state.db)
    .await?;

    if deleted.is_none() {
        return Err(AppError::NotFound("Finance entry not found".to_string()));
    }

    log_activity(
        &state.db,
        current_user.id,
        ActivityAction::FinanceDeleted,
        Some(id),
        None,
    )
    .await;

    Ok(ApiResponse::success(json!({ "ok": true })))
}
