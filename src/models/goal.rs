//! Goal model and request DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "goal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub title: String,
    /// Clamped to [0, 100] at ingestion.
    pub progress: i32,
    pub status: GoalStatus,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoal {
    pub title: String,
    pub progress: Option<i32>,
    pub status: Option<GoalStatus>,
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGoal {
    pub title: Option<String>,
    pub progress: Option<i32>,
    pub status: Option<GoalStatus>,
    pub deadline: Option<String>,
}
