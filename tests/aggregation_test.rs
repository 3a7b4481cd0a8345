//! End-to-end aggregation scenarios for the dashboard and analytics services,
//! driven through an in-memory data gateway.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use lifedash::errors::AppError;
use lifedash::models::finance::FinanceType;
use lifedash::models::goal::GoalStatus;
use lifedash::services::analytics;
use lifedash::services::dashboard;
use lifedash::services::gateway::{
    ActivitySnapshot, DataGateway, FinanceSnapshot, GoalSnapshot, HabitLogSnapshot, HabitSnapshot,
    TaskSnapshot,
};
use lifedash::validation::parse_amount;

/// In-memory gateway: returns canned snapshots, applying the same windowing
/// the real gateway performs in SQL.
#[derive(Debug, Default, Clone)]
struct FakeGateway {
    tasks: Vec<TaskSnapshot>,
    goals: Vec<GoalSnapshot>,
    habits: Vec<HabitSnapshot>,
    finance: Vec<FinanceSnapshot>,
    activity: Vec<ActivitySnapshot>,
    fail: bool,
}

impl FakeGateway {
    fn check(&self) -> Result<(), AppError> {
        if self.fail {
            Err(AppError::Internal("storage offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DataGateway for FakeGateway {
    async fn tasks(&self, _user_id: Uuid) -> Result<Vec<TaskSnapshot>, AppError> {
        self.check()?;
        Ok(self.tasks.clone())
    }

    async fn goals(&self, _user_id: Uuid) -> Result<Vec<GoalSnapshot>, AppError> {
        self.check()?;
        Ok(self.goals.clone())
    }

    async fn habits(
        &self,
        _user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<HabitSnapshot>, AppError> {
        self.check()?;
        Ok(self
            .habits
            .iter()
            .map(|h| HabitSnapshot {
                id: h.id,
                name: h.name.clone(),
                logs: h.logs.iter().filter(|l| l.date >= since).copied().collect(),
            })
            .collect())
    }

    async fn finance(
        &self,
        _user_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<FinanceSnapshot>, AppError> {
        self.check()?;
        Ok(self
            .finance
            .iter()
            .filter(|f| since.map_or(true, |s| f.date >= s))
            .cloned()
            .collect())
    }

    async fn activity(
        &self,
        _user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ActivitySnapshot>, AppError> {
        self.check()?;
        let mut rows: Vec<ActivitySnapshot> = self
            .activity
            .iter()
            .filter(|a| a.created_at >= since)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn at_noon(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
}

fn task(completed: bool, updated: NaiveDate) -> TaskSnapshot {
    TaskSnapshot {
        completed,
        created_at: at_noon(updated),
        updated_at: at_noon(updated),
    }
}

fn entry(entry_type: FinanceType, amount: f64, day: NaiveDate) -> FinanceSnapshot {
    FinanceSnapshot {
        entry_type,
        amount,
        category: "General".to_string(),
        date: at_noon(day),
    }
}

#[tokio::test]
async fn dashboard_counts_completed_tasks() {
    let gateway = FakeGateway {
        tasks: vec![task(true, today()), task(true, today()), task(false, today())],
        ..Default::default()
    };
    let stats = dashboard::get_stats(&gateway, Uuid::new_v4()).await;
    assert_eq!(stats.tasks.total, 3);
    assert_eq!(stats.tasks.completed, 2);
}

#[tokio::test]
async fn dashboard_streak_stops_at_gap() {
    let t = today();
    let gateway = FakeGateway {
        habits: vec![HabitSnapshot {
            id: Uuid::new_v4(),
            name: "Meditate".to_string(),
            logs: vec![
                HabitLogSnapshot { date: t, completed: true },
                HabitLogSnapshot { date: t - Days::new(1), completed: true },
                HabitLogSnapshot { date: t - Days::new(2), completed: true },
                // gap at t - 3
                HabitLogSnapshot { date: t - Days::new(4), completed: true },
            ],
        }],
        ..Default::default()
    };
    let stats = dashboard::get_stats(&gateway, Uuid::new_v4()).await;
    assert_eq!(stats.habits.total, 1);
    assert_eq!(stats.habits.streaks.len(), 1);
    assert_eq!(stats.habits.streaks[0].streak, 3);
    assert_eq!(stats.habits.best_streak, 3);
}

#[tokio::test]
async fn dashboard_balance_uses_ingestion_rounded_amounts() {
    // Rounding happens at ingestion; the aggregator sums already-rounded cents.
    let income = parse_amount(100.005).unwrap();
    assert_eq!(income, 100.01);
    let gateway = FakeGateway {
        finance: vec![
            entry(FinanceType::Income, income, today()),
            entry(FinanceType::Expense, 40.0, today()),
        ],
        ..Default::default()
    };
    let stats = dashboard::get_stats(&gateway, Uuid::new_v4()).await;
    assert_eq!(stats.finance.income, 100.01);
    assert_eq!(stats.finance.expense, 40.0);
    assert_eq!(stats.finance.balance, 60.01);
}

#[tokio::test]
async fn dashboard_goal_average_handles_no_goals() {
    let stats = dashboard::get_stats(&FakeGateway::default(), Uuid::new_v4()).await;
    assert_eq!(stats.goals.total, 0);
    assert_eq!(stats.goals.avg_progress, 0);
    assert_eq!(stats.activity.len(), 7);
}

#[tokio::test]
async fn dashboard_read_failure_degrades_to_zeroed_shape() {
    let gateway = FakeGateway {
        tasks: vec![task(true, today())],
        fail: true,
        ..Default::default()
    };
    let stats = dashboard::get_stats(&gateway, Uuid::new_v4()).await;
    assert_eq!(stats.tasks.total, 0);
    assert_eq!(stats.goals.avg_progress, 0);
    assert!(stats.habits.streaks.is_empty());
    assert!(stats.activity.is_empty());
}

#[tokio::test]
async fn analytics_empty_window_is_fully_shaped() {
    let data = analytics::get_analytics(&FakeGateway::default(), Uuid::new_v4(), 30).await;
    assert_eq!(data.days, 30);
    assert_eq!(data.task_trend.len(), 30);
    assert_eq!(data.habit_trend.len(), 30);
    assert_eq!(data.income_trend.len(), 30);
    assert_eq!(data.expense_trend.len(), 30);
    assert!(data.task_trend.iter().all(|p| p.count == 0));
    assert!(data.action_counts.is_empty());
    assert_eq!(data.summary.activity_total, 0);
}

#[tokio::test]
async fn analytics_folds_events_into_day_buckets() {
    let t = today();
    let gateway = FakeGateway {
        tasks: vec![
            task(true, t),
            task(true, t - Days::new(2)),
            task(true, t - Days::new(200)), // far outside any window
            task(false, t),
        ],
        goals: vec![GoalSnapshot {
            progress: 40,
            status: GoalStatus::Active,
            created_at: Utc::now(),
        }],
        habits: vec![HabitSnapshot {
            id: Uuid::new_v4(),
            name: "Stretch".to_string(),
            logs: vec![
                HabitLogSnapshot { date: t, completed: true },
                HabitLogSnapshot { date: t - Days::new(1), completed: false },
            ],
        }],
        finance: vec![
            entry(FinanceType::Income, 100.0, t),
            entry(FinanceType::Expense, 25.5, t - Days::new(1)),
        ],
        activity: vec![
            ActivitySnapshot {
                action: "task_completed".to_string(),
                created_at: at_noon(t),
            },
            ActivitySnapshot {
                action: "task_completed".to_string(),
                created_at: at_noon(t),
            },
            ActivitySnapshot {
                action: "habit_logged".to_string(),
                created_at: at_noon(t - Days::new(3)),
            },
        ],
        fail: false,
    };

    let data = analytics::get_analytics(&gateway, Uuid::new_v4(), 7).await;

    assert_eq!(data.days, 7);
    assert_eq!(data.task_trend.last().unwrap().count, 1);
    let task_total: i64 = data.task_trend.iter().map(|p| p.count).sum();
    assert_eq!(task_total, 2);

    let habit_total: i64 = data.habit_trend.iter().map(|p| p.count).sum();
    assert_eq!(habit_total, 1);

    assert_eq!(data.income_trend.last().unwrap().amount, 100.0);
    assert_eq!(data.expense_trend[5].amount, 25.5);

    assert_eq!(data.action_counts["task_completed"], 2);
    assert_eq!(data.action_counts["habit_logged"], 1);

    assert_eq!(data.summary.tasks_total, 4);
    assert_eq!(data.summary.tasks_completed, 3);
    assert_eq!(data.summary.goals_total, 1);
    assert_eq!(data.summary.habits_total, 1);
    assert_eq!(data.summary.activity_total, 3);
}

#[tokio::test]
async fn analytics_activity_histogram_respects_scan_cap() {
    let t = today();
    let activity: Vec<ActivitySnapshot> = (0..250)
        .map(|i| ActivitySnapshot {
            action: "note_updated".to_string(),
            created_at: at_noon(t) - chrono::Duration::seconds(i),
        })
        .collect();
    let gateway = FakeGateway {
        activity,
        ..Default::default()
    };
    let data = analytics::get_analytics(&gateway, Uuid::new_v4(), 30).await;
    assert_eq!(
        data.action_counts["note_updated"],
        analytics::ACTIVITY_SCAN_LIMIT
    );
    assert_eq!(data.summary.activity_total, analytics::ACTIVITY_SCAN_LIMIT);
}

#[tokio::test]
async fn analytics_read_failure_degrades_to_zeroed_shape() {
    let gateway = FakeGateway {
        fail: true,
        ..Default::default()
    };
    let data = analytics::get_analytics(&gateway, Uuid::new_v4(), 30).await;
    assert_eq!(data.days, 0);
    assert!(data.task_trend.is_empty());
    assert!(data.action_counts.is_empty());
    assert_eq!(data.summary.tasks_total, 0);
}
