//! Note model and request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNote {
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNote {
    /// An empty string clears the title; an absent field leaves it untouched.
    pub title: Option<String>,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_title_is_nullable() {
        let note = Note {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            title: None,
            content: "scratchpad".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&note).unwrap();
        assert!(json["title"].is_null());
        assert_eq!(json["content"], "scratchpad");
    }
}
