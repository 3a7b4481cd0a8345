//! Cursor pagination primitives for the activity feed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cursor pagination query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CursorQuery {
    pub cursor: Option<Uuid>,
    pub limit: Option<i64>,
}

impl CursorQuery {
    /// Maximum items per page.
    const MAX_LIMIT: i64 = 100;

    /// Default items per page.
    const DEFAULT_LIMIT: i64 = 50;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// Cursor-paged result envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T: Serialize> {
    pub items: Vec<T>,
    pub next_cursor: Option<Uuid>,
    pub has_more: bool,
}

impl<T: Serialize> CursorPage<T> {
    /// Build a page from `limit + 1` fetched rows; the extra row signals more data.
    pub fn from_rows(mut rows: Vec<T>, limit: i64, id_of: impl Fn(&T) -> Uuid) -> Self {
        let has_more = rows.len() as i64 > limit;
        if has_more {
            rows.truncate(limit as usize);
        }
        let next_cursor = if has_more {
            rows.last().map(&id_of)
        } else {
            None
        };
        Self {
            items: rows,
            next_cursor,
            has_more,
        }
    }
}
