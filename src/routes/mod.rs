//! Route definitions for the lifedash API.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::AppState;

pub mod activity;
pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod finance;
pub mod goals;
pub mod habits;
pub mod health;
pub mod notes;
pub mod tasks;

/// Assemble the full application router.
pub fn router() -> Router<AppState> {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/{id}", patch(tasks::update).delete(tasks::remove))
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/{id}", patch(goals::update).delete(goals::remove))
        .route("/habits", get(habits::list).post(habits::create))
        .route("/habits/{id}", delete(habits::remove))
        .route("/habits/{id}/log", post(habits::log))
        .route("/finance", get(finance::list).post(finance::create))
        .route("/finance/{id}", delete(finance::remove))
        .route("/notes", get(notes::list).post(notes::create))
        .route("/notes/{id}", patch(notes::update).delete(notes::remove))
        .route("/activity", get(activity::list))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/analytics", get(analytics::series));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api", api)
}
