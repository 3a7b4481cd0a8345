//! Activity feed route: cursor-paginated listing of logged actions.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::activity::ActivityLogEntry;
use crate::models::pagination::{CursorPage, CursorQuery};
use crate::AppState;

/// GET /api/activity — newest-first feed for the current user.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<CursorQuery>,
) -> Result<Json<ApiResponse<CursorPage<ActivityLogEntry>>>, AppError> {
    let limit = query.limit();

    // Fetch one extra row past the page to detect whether more data exists.
    let rows = match query.cursor {
        Some(cursor) => {
            sqlx::query_as::<_, ActivityLogEntry>(
                r#"
                SELECT * FROM activity_log
                WHERE user_id = $1
                  AND (created_at, id) < (
                      SELECT created_at, id FROM activity_log WHERE id = $2 AND user_id = $1
                  )
                ORDER BY created_at DESC, id DESC
                LIMIT $3
                "#,
            )
            .bind(current_user.id)
            .bind(cursor)
            .bind(limit + 1)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as::<_, ActivityLogEntry>(
                "SELECT * FROM activity_log WHERE user_id = $1
                 ORDER BY created_at DESC, id DESC LIMIT $2",
            )
            .bind(current_user.id)
            .bind(limit + 1)
            .fetch_all(&state.db)
            .await?
        }
    };

    let page = CursorPage::from_rows(rows, limit, |entry| entry.id);
    Ok(ApiResponse::success(page))
}
