//! Finance entry model and request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "finance_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FinanceType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Finance {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub entry_type: FinanceType,
    /// Rounded to cents at ingestion; non-negative.
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFinance {
    #[serde(rename = "type")]
    pub entry_type: FinanceType,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Query filters for the finance list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinanceFilters {
    #[serde(rename = "type")]
    pub entry_type: Option<FinanceType>,
    pub limit: Option<i64>,
}

impl FinanceFilters {
    const MAX_LIMIT: i64 = 500;
    const DEFAULT_LIMIT: i64 = 100;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}
