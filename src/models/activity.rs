//! Activity log model: append-only record of user actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Closed set of action tags written to the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    TaskCreated,
    TaskCompleted,
    TaskDeleted,
    GoalCreated,
    GoalUpdated,
    GoalDeleted,
    HabitCreated,
    HabitLogged,
    HabitDeleted,
    FinanceCreated,
    FinanceDeleted,
    NoteCreated,
    NoteUpdated,
    NoteDeleted,
    SettingsUpdated,
}

impl ActivityAction {
    /// Tag string stored in the database and used as the histogram key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::TaskCompleted => "task_completed",
            Self::TaskDeleted => "task_deleted",
            Self::GoalCreated => "goal_created",
            Self::GoalUpdated => "goal_updated",
            Self::GoalDeleted => "goal_deleted",
            Self::HabitCreated => "habit_created",
            Self::HabitLogged => "habit_logged",
            Self::HabitDeleted => "habit_deleted",
            Self::FinanceCreated => "finance_created",
            Self::FinanceDeleted => "finance_deleted",
            Self::NoteCreated => "note_created",
            Self::NoteUpdated => "note_updated",
            Self::NoteDeleted => "note_deleted",
            Self::SettingsUpdated => "settings_updated",
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the activity feed.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub entity_id: Option<Uuid>,
    pub meta: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tag_matches_serde_form() {
        let json = serde_json::to_string(&ActivityAction::HabitLogged).unwrap();
        assert_eq!(json, format!("\"{}\"", ActivityAction::HabitLogged.as_str()));
    }

    #[test]
    fn action_displays_as_tag() {
        assert_eq!(ActivityAction::TaskCompleted.to_string(), "task_completed");
    }
}
