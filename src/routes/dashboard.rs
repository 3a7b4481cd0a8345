//! Dashboard route: aggregated "today" statistics for the overview page.

use axum::{extract::State, Json};

use crate::errors::ApiResponse;
use crate::middleware::auth::CurrentUser;
use crate::services::dashboard::{self, DashboardStats};
use crate::services::gateway::PgGateway;
use crate::AppState;

/// GET /api/dashboard/stats — aggregated dashboard statistics.
///
/// Always succeeds with a fully-shaped result; read failures degrade to
/// zeroed stats.
pub async fn stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Json<ApiResponse<DashboardStats>> {
    let gateway = PgGateway::new(state.db.clone());
    let stats = dashboard::get_stats(&gateway, current_user.id).await;
    ApiResponse::success(stats)
}
