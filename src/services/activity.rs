//! Activity logging: append user actions to the activity log for the feed
//! and the analytics action histogram.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::activity::ActivityAction;

/// Record an action for a user. Failures are logged and swallowed so the
/// main request never fails because of activity bookkeeping.
pub async fn log_activity(
    pool: &PgPool,
    user_id: Uuid,
    action: ActivityAction,
    entity_id: Option<Uuid>,
    meta: Option<serde_json::Value>,
) {
    let result = sqlx::query(
        "INSERT INTO activity_log (user_id, action, entity_id, meta) VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(action.as_str())
    .bind(entity_id)
    .bind(meta)
    .execute(pool)
    .await;

    if let Err(e) = result {
        tracing::error!(error = %e, %user_id, %action, "Activity log write failed");
    }
}
