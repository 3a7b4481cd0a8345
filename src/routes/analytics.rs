//! Analytics route: windowed trend series for the analytics page.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::ApiResponse;
use crate::middleware::auth::CurrentUser;
use crate::services::analytics::{self, clamp_window, AnalyticsData};
use crate::services::gateway::PgGateway;
use crate::AppState;

/// Raw query parameters; `days` is taken as a string so garbage input can be
/// clamped to the default instead of rejected.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<String>,
}

/// GET /api/analytics?days=7|30|90 — trend series and action histogram.
///
/// Always succeeds with a fully-shaped result; read failures degrade to a
/// zeroed result.
pub async fn series(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<AnalyticsQuery>,
) -> Json<ApiResponse<AnalyticsData>> {
    let days = clamp_window(query.days.as_deref());
    let gateway = PgGateway::new(state.db.clone());
    let data = analytics::get_analytics(&gateway, current_user.id, days).await;
    ApiResponse::success(data)
}
