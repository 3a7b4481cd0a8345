//! Read-only data access gateway for the aggregation services.
//!
//! The aggregators never touch `sqlx` directly: they consume plain snapshot
//! structs through the [`DataGateway`] trait. The production implementation
//! ([`PgGateway`]) reads from PostgreSQL; tests substitute an in-memory fake
//! without touching the aggregation logic.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::finance::FinanceType;
use crate::models::goal::GoalStatus;

/// Task fields the aggregators need.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskSnapshot {
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Goal fields the aggregators need.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalSnapshot {
    pub progress: i32,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}

/// Habit with its completion logs from the requested day onward.
#[derive(Debug, Clone)]
pub struct HabitSnapshot {
    pub id: Uuid,
    pub name: String,
    pub logs: Vec<HabitLogSnapshot>,
}

#[derive(Debug, Clone, Copy)]
pub struct HabitLogSnapshot {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Finance entry fields the aggregators need.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FinanceSnapshot {
    pub entry_type: FinanceType,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
}

/// Activity log fields the aggregators need.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivitySnapshot {
    pub action: String,
    pub created_at: DateTime<Utc>,
}

/// Read operations over one user's records.
///
/// All reads are bounded queries with no side effects; concurrent calls for
/// the same user are safe.
pub trait DataGateway: Send + Sync {
    fn tasks(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<TaskSnapshot>, AppError>> + Send;

    fn goals(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<GoalSnapshot>, AppError>> + Send;

    /// Habits with logs dated `since` or later.
    fn habits(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> impl Future<Output = Result<Vec<HabitSnapshot>, AppError>> + Send;

    /// Finance entries, optionally restricted to `since` or later.
    fn finance(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<FinanceSnapshot>, AppError>> + Send;

    /// Most recent activity entries since `since`, newest first, at most `limit`.
    fn activity(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<ActivitySnapshot>, AppError>> + Send;
}

/// PostgreSQL-backed gateway.
#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Intermediate row for the habits + logs join.
#[derive(Debug, sqlx::FromRow)]
struct HabitLogRow {
    id: Uuid,
    name: String,
    log_date: Option<NaiveDate>,
    log_completed: Option<bool>,
}

impl DataGateway for PgGateway {
    async fn tasks(&self, user_id: Uuid) -> Result<Vec<TaskSnapshot>, AppError> {
        let rows = sqlx::query_as::<_, TaskSnapshot>(
            "SELECT completed, created_at, updated_at FROM tasks WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn goals(&self, user_id: Uuid) -> Result<Vec<GoalSnapshot>, AppError> {
        let rows = sqlx::query_as::<_, GoalSnapshot>(
            "SELECT progress, status, created_at FROM goals WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn habits(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<HabitSnapshot>, AppError> {
        let rows = sqlx::query_as::<_, HabitLogRow>(
            r#"
            SELECT h.id, h.name, l.date AS log_date, l.completed AS log_completed
            FROM habits h
            LEFT JOIN habit_logs l ON l.habit_id = h.id AND l.date >= $2
            WHERE h.user_id = $1
            ORDER BY h.created_at DESC, l.date ASC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        // Group join rows into one snapshot per habit, preserving habit order.
        let mut habits: Vec<HabitSnapshot> = Vec::new();
        for row in rows {
            if habits.last().map(|h| h.id) != Some(row.id) {
                habits.push(HabitSnapshot {
                    id: row.id,
                    name: row.name,
                    logs: Vec::new(),
                });
            }
            if let (Some(date), Some(completed)) = (row.log_date, row.log_completed) {
                if let Some(habit) = habits.last_mut() {
                    habit.logs.push(HabitLogSnapshot { date, completed });
                }
            }
        }
        Ok(habits)
    }

    async fn finance(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<FinanceSnapshot>, AppError> {
        let rows = match since {
            Some(since) => {
                sqlx::query_as::<_, FinanceSnapshot>(
                    "SELECT entry_type, amount, category, date
                     FROM finance WHERE user_id = $1 AND date >= $2",
                )
                .bind(user_id)
                .bind(since)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, FinanceSnapshot>(
                    "SELECT entry_type, amount, category, date FROM finance WHERE user_id = $1",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn activity(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ActivitySnapshot>, AppError> {
        let rows = sqlx::query_as::<_, ActivitySnapshot>(
            "SELECT action, created_at
             FROM activity_log
             WHERE user_id = $1 AND created_at >= $2
             ORDER BY created_at DESC
             LIMIT $3",
        )
        .bind(user_id)
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
