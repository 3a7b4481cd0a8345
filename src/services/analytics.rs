//! Analytics aggregation: configurable-window trend series for the
//! analytics view.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::services::gateway::{
    ActivitySnapshot, DataGateway, FinanceSnapshot, GoalSnapshot, HabitSnapshot, TaskSnapshot,
};
use crate::services::timeseries::{
    self, day_window, fold_amounts, fold_counts, zeroed_counts, zeroed_sums,
};
use crate::models::finance::FinanceType;
use crate::validation::round_cents;

/// At most this many activity rows are scanned for the action histogram.
/// For very active users the histogram is an approximation over the most
/// recent entries in the window, not the full window.
pub const ACTIVITY_SCAN_LIMIT: i64 = 200;

/// Smallest accepted trend window.
pub const MIN_WINDOW_DAYS: i64 = 7;

/// Largest accepted trend window.
pub const MAX_WINDOW_DAYS: i64 = 90;

/// Window used when the caller supplies nothing usable.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Clamp a raw `days` query value into the accepted window range.
/// Garbage input falls back to the default; out-of-range values are clamped,
/// never rejected.
pub fn clamp_window(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_WINDOW_DAYS)
        .clamp(MIN_WINDOW_DAYS, MAX_WINDOW_DAYS) as u32
}

/// Analytics result for one user and window.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub days: u32,
    pub task_trend: Vec<CountPoint>,
    pub habit_trend: Vec<CountPoint>,
    pub income_trend: Vec<AmountPoint>,
    pub expense_trend: Vec<AmountPoint>,
    pub action_counts: BTreeMap<String, i64>,
    pub summary: AnalyticsSummary,
}

/// One day of a count series.
#[derive(Debug, Serialize)]
pub struct CountPoint {
    pub date: NaiveDate,
    pub count: i64,
}

/// One day of a monetary series.
#[derive(Debug, Serialize)]
pub struct AmountPoint {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Window-wide scalar totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub tasks_total: i64,
    pub tasks_completed: i64,
    pub goals_total: i64,
    pub habits_total: i64,
    pub activity_total: i64,
}

impl AnalyticsData {
    /// Fully-shaped empty result, used when the underlying read fails.
    fn zeroed() -> Self {
        Self {
            days: 0,
            task_trend: vec![],
            habit_trend: vec![],
            income_trend: vec![],
            expense_trend: vec![],
            action_counts: BTreeMap::new(),
            summary: AnalyticsSummary {
                tasks_total: 0,
                tasks_completed: 0,
                goals_total: 0,
                habits_total: 0,
                activity_total: 0,
            },
        }
    }
}

/// Compute the analytics series for one user over a `days`-wide window.
///
/// All five record families are read concurrently, windowed at the gateway,
/// then folded into pre-seeded day buckets. A gateway failure degrades to a
/// zeroed result; the failure is visible in the logs only.
pub async fn get_analytics<G: DataGateway>(
    gateway: &G,
    user_id: Uuid,
    days: u32,
) -> AnalyticsData {
    let today = timeseries::today_utc();
    let fetch_since = today - Days::new(u64::from(days));
    let fetch_since_dt = start_of_day(fetch_since);

    let read = tokio::try_join!(
        gateway.tasks(user_id),
        gateway.goals(user_id),
        gateway.habits(user_id, fetch_since),
        gateway.finance(user_id, Some(fetch_since_dt)),
        gateway.activity(user_id, fetch_since_dt, ACTIVITY_SCAN_LIMIT),
    );

    match read {
        Ok((tasks, goals, habits, finance, activity)) => {
            assemble(today, days, &tasks, &goals, &habits, &finance, &activity)
        }
        Err(e) => {
            tracing::error!(error = %e, %user_id, "Analytics read failed, returning zeroed result");
            AnalyticsData::zeroed()
        }
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).expect("midnight exists"))
}

/// Pure fold from windowed snapshots to the analytics result.
fn assemble(
    today: NaiveDate,
    days: u32,
    tasks: &[TaskSnapshot],
    goals: &[GoalSnapshot],
    habits: &[HabitSnapshot],
    finance: &[FinanceSnapshot],
    activity: &[ActivitySnapshot],
) -> AnalyticsData {
    let window = day_window(today, days);

    // Completion day is approximated by updated_at: editing a completed task
    // later shifts its day. Kept as-is pending a dedicated completed_at column.
    let mut task_buckets = zeroed_counts(&window);
    fold_counts(
        &mut task_buckets,
        tasks
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.updated_at.date_naive()),
    );

    let mut habit_buckets = zeroed_counts(&window);
    fold_counts(
        &mut habit_buckets,
        habits
            .iter()
            .flat_map(|h| h.logs.iter())
            .filter(|l| l.completed)
            .map(|l| l.date),
    );

    let mut income_buckets = zeroed_sums(&window);
    let mut expense_buckets = zeroed_sums(&window);
    fold_amounts(
        &mut income_buckets,
        finance
            .iter()
            .filter(|f| f.entry_type == FinanceType::Income)
            .map(|f| (f.date.date_naive(), f.amount)),
    );
    fold_amounts(
        &mut expense_buckets,
        finance
            .iter()
            .filter(|f| f.entry_type == FinanceType::Expense)
            .map(|f| (f.date.date_naive(), f.amount)),
    );

    let mut action_counts: BTreeMap<String, i64> = BTreeMap::new();
    for log in activity {
        *action_counts.entry(log.action.clone()).or_insert(0) += 1;
    }

    let summary = AnalyticsSummary {
        tasks_total: tasks.len() as i64,
        tasks_completed: tasks.iter().filter(|t| t.completed).count() as i64,
        goals_total: goals.len() as i64,
        habits_total: habits.len() as i64,
        activity_total: activity.len() as i64,
    };

    AnalyticsData {
        days,
        task_trend: window
            .iter()
            .map(|d| CountPoint {
                date: *d,
                count: task_buckets[d],
            })
            .collect(),
        habit_trend: window
            .iter()
            .map(|d| CountPoint {
                date: *d,
                count: habit_buckets[d],
            })
            .collect(),
        income_trend: window
            .iter()
            .map(|d| AmountPoint {
                date: *d,
                amount: round_cents(income_buckets[d]),
            })
            .collect(),
        expense_trend: window
            .iter()
            .map(|d| AmountPoint {
                date: *d,
                amount: round_cents(expense_buckets[d]),
            })
            .collect(),
        action_counts,
        summary,
    }
}
