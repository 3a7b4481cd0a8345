//! Habit and habit-log models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One completion mark; unique per (habit, date).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub completed: bool,
}

/// Habit together with its recent logs, as returned by the list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HabitWithLogs {
    #[serde(flatten)]
    pub habit: Habit,
    pub logs: Vec<HabitLog>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateHabit {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogHabitRequest {
    /// `YYYY-MM-DD`; defaults to today when omitted.
    pub date: Option<String>,
}
