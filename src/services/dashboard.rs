//! Dashboard statistics aggregation: the "today" snapshot for the home view.

use std::collections::{BTreeMap, HashSet};

use chrono::{Days, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::services::gateway::{
    DataGateway, FinanceSnapshot, GoalSnapshot, HabitSnapshot, TaskSnapshot,
};
use crate::services::timeseries::{
    self, current_streak, day_window, month_start, STREAK_SCAN_DAYS,
};
use crate::models::finance::FinanceType;
use crate::models::goal::GoalStatus;
use crate::validation::round_cents;

/// Days covered by the dashboard activity series.
const ACTIVITY_WINDOW_DAYS: u32 = 7;

/// Aggregated dashboard statistics for the overview page.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub tasks: TaskStats,
    pub goals: GoalStats,
    pub habits: HabitStats,
    pub finance: FinanceStats,
    pub activity: Vec<ActivityDay>,
}

#[derive(Debug, Serialize)]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
    /// Integer-rounded mean progress; 0 when there are no goals.
    pub avg_progress: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub total: i64,
    /// Longest current streak across all habits; 0 when there are none.
    pub best_streak: i64,
    pub streaks: Vec<HabitStreak>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStreak {
    pub habit_id: Uuid,
    pub name: String,
    pub streak: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceStats {
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
    /// Current-month expenses grouped by raw category string.
    pub by_category: Vec<CategoryAmount>,
}

#[derive(Debug, Serialize)]
pub struct CategoryAmount {
    pub name: String,
    pub value: f64,
}

/// One day of the 7-day activity series, oldest first.
#[derive(Debug, Serialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub tasks: i64,
    pub habits: i64,
    pub total: i64,
}

impl DashboardStats {
    /// Fully-shaped all-zero result, used when the underlying read fails.
    fn zeroed() -> Self {
        Self {
            tasks: TaskStats {
                total: 0,
                completed: 0,
            },
            goals: GoalStats {
                total: 0,
                active: 0,
                completed: 0,
                avg_progress: 0,
            },
            habits: HabitStats {
                total: 0,
                best_streak: 0,
                streaks: vec![],
            },
            finance: FinanceStats {
                balance: 0.0,
                income: 0.0,
                expense: 0.0,
                by_category: vec![],
            },
            activity: vec![],
        }
    }
}

/// Compute the dashboard snapshot for one user.
///
/// The five record families are read concurrently and folded once. A gateway
/// failure degrades to a zeroed result instead of surfacing an error; the
/// failure is visible in the logs only.
pub async fn get_stats<G: DataGateway>(gateway: &G, user_id: Uuid) -> DashboardStats {
    let today = timeseries::today_utc();
    // Fetch enough log history to cover the whole streak walk.
    let streak_since = today - Days::new(STREAK_SCAN_DAYS - 1);

    let read = tokio::try_join!(
        gateway.tasks(user_id),
        gateway.goals(user_id),
        gateway.habits(user_id, streak_since),
        gateway.finance(user_id, None),
    );

    match read {
        Ok((tasks, goals, habits, finance)) => {
            assemble(today, &tasks, &goals, &habits, &finance)
        }
        Err(e) => {
            tracing::error!(error = %e, %user_id, "Dashboard read failed, returning zeroed stats");
            DashboardStats::zeroed()
        }
    }
}

/// Pure fold from snapshots to the dashboard result, relative to `today`.
fn assemble(
    today: NaiveDate,
    tasks: &[TaskSnapshot],
    goals: &[GoalSnapshot],
    habits: &[HabitSnapshot],
    finance: &[FinanceSnapshot],
) -> DashboardStats {
    let tasks_completed = tasks.iter().filter(|t| t.completed).count() as i64;

    let goals_active = goals.iter().filter(|g| g.status == GoalStatus::Active).count() as i64;
    let goals_completed = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .count() as i64;
    let avg_progress = if goals.is_empty() {
        0
    } else {
        let sum: i64 = goals.iter().map(|g| i64::from(g.progress)).sum();
        (sum as f64 / goals.len() as f64).round() as i32
    };

    let mut income = 0.0;
    let mut expense = 0.0;
    let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
    let this_month = month_start(today);
    for entry in finance {
        match entry.entry_type {
            FinanceType::Income => income += entry.amount,
            FinanceType::Expense => {
                expense += entry.amount;
                if entry.date.date_naive() >= this_month {
                    *by_category.entry(entry.category.clone()).or_insert(0.0) += entry.amount;
                }
            }
        }
    }
    let income = round_cents(income);
    let expense = round_cents(expense);

    let streaks: Vec<HabitStreak> = habits
        .iter()
        .map(|h| {
            let completed: HashSet<NaiveDate> = h
                .logs
                .iter()
                .filter(|l| l.completed)
                .map(|l| l.date)
                .collect();
            HabitStreak {
                habit_id: h.id,
                name: h.name.clone(),
                streak: current_streak(today, &completed),
            }
        })
        .collect();
    let best_streak = streaks.iter().map(|s| s.streak).max().unwrap_or(0);

    let activity = day_window(today, ACTIVITY_WINDOW_DAYS)
        .into_iter()
        .map(|date| {
            // TODO: count tasks completed per day once tasks carry a
            // dedicated completed_at column; updated_at is not reliable here.
            let task_count = 0;
            let habit_count = habits
                .iter()
                .filter(|h| h.logs.iter().any(|l| l.date == date))
                .count() as i64;
            ActivityDay {
                date,
                tasks: task_count,
                habits: habit_count,
                total: task_count + habit_count,
            }
        })
        .collect();

    DashboardStats {
        tasks: TaskStats {
            total: tasks.len() as i64,
            completed: tasks_completed,
        },
        goals: GoalStats {
            total: goals.len() as i64,
            active: goals_active,
            completed: goals_completed,
            avg_progress,
        },
        habits: HabitStats {
            total: habits.len() as i64,
            best_streak,
            streaks,
        },
        finance: FinanceStats {
            balance: round_cents(income - expense),
            income,
            expense,
            by_category: by_category
                .into_iter()
                .map(|(name, value)| CategoryAmount {
                    name,
                    value: round_cents(value),
                })
                .collect(),
        },
        activity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gateway::HabitLogSnapshot;
    use chrono::{TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(completed: bool) -> TaskSnapshot {
        TaskSnapshot {
            completed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn goal(progress: i32, status: GoalStatus) -> GoalSnapshot {
        GoalSnapshot {
            progress,
            status,
            created_at: Utc::now(),
        }
    }

    fn entry(entry_type: FinanceType, amount: f64, category: &str, date: NaiveDate) -> FinanceSnapshot {
        FinanceSnapshot {
            entry_type,
            amount,
            category: category.to_string(),
            date: Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn task_totals() {
        let stats = assemble(
            day(2025, 3, 10),
            &[task(true), task(true), task(false)],
            &[],
            &[],
            &[],
        );
        assert_eq!(stats.tasks.total, 3);
        assert_eq!(stats.tasks.completed, 2);
    }

    #[test]
    fn goal_counts_and_average() {
        let stats = assemble(
            day(2025, 3, 10),
            &[],
            &[
                goal(50, GoalStatus::Active),
                goal(75, GoalStatus::Completed),
                goal(0, GoalStatus::Paused),
            ],
            &[],
            &[],
        );
        assert_eq!(stats.goals.total, 3);
        assert_eq!(stats.goals.active, 1);
        assert_eq!(stats.goals.completed, 1);
        // round(125 / 3) = 42
        assert_eq!(stats.goals.avg_progress, 42);
    }

    #[test]
    fn avg_progress_over_zero_goals_is_zero() {
        let stats = assemble(day(2025, 3, 10), &[], &[], &[], &[]);
        assert_eq!(stats.goals.avg_progress, 0);
        assert_eq!(stats.habits.best_streak, 0);
    }

    #[test]
    fn balance_is_exact_to_the_cent() {
        let today = day(2025, 3, 10);
        let stats = assemble(
            today,
            &[],
            &[],
            &[],
            &[
                entry(FinanceType::Income, 100.01, "Salary", today),
                entry(FinanceType::Expense, 40.0, "Food", today),
            ],
        );
        assert_eq!(stats.finance.income, 100.01);
        assert_eq!(stats.finance.expense, 40.0);
        assert_eq!(stats.finance.balance, 60.01);
    }

    #[test]
    fn category_breakdown_is_current_month_expenses_only() {
        let today = day(2025, 3, 10);
        let stats = assemble(
            today,
            &[],
            &[],
            &[],
            &[
                entry(FinanceType::Expense, 30.0, "Food", day(2025, 3, 2)),
                entry(FinanceType::Expense, 20.0, "Food", day(2025, 3, 9)),
                entry(FinanceType::Expense, 99.0, "Food", day(2025, 2, 28)),
                entry(FinanceType::Income, 500.0, "Salary", day(2025, 3, 1)),
            ],
        );
        assert_eq!(stats.finance.by_category.len(), 1);
        assert_eq!(stats.finance.by_category[0].name, "Food");
        assert_eq!(stats.finance.by_category[0].value, 50.0);
        // Last month's expense still counts toward the running balance.
        assert_eq!(stats.finance.expense, 149.0);
    }

    #[test]
    fn habit_streaks_end_at_today() {
        let today = day(2025, 3, 10);
        let habit = HabitSnapshot {
            id: Uuid::new_v4(),
            name: "Read".to_string(),
            logs: vec![
                HabitLogSnapshot { date: today, completed: true },
                HabitLogSnapshot { date: today - Days::new(1), completed: true },
                HabitLogSnapshot { date: today - Days::new(2), completed: true },
                // gap at today - 3
                HabitLogSnapshot { date: today - Days::new(4), completed: true },
            ],
        };
        let stats = assemble(today, &[], &[], &[habit], &[]);
        assert_eq!(stats.habits.streaks[0].streak, 3);
        assert_eq!(stats.habits.best_streak, 3);
    }

    #[test]
    fn activity_series_covers_seven_days() {
        let today = day(2025, 3, 10);
        let habit = HabitSnapshot {
            id: Uuid::new_v4(),
            name: "Walk".to_string(),
            logs: vec![HabitLogSnapshot { date: today, completed: true }],
        };
        let stats = assemble(today, &[], &[], &[habit], &[]);
        assert_eq!(stats.activity.len(), 7);
        assert_eq!(stats.activity.last().unwrap().date, today);
        assert_eq!(stats.activity.last().unwrap().habits, 1);
        assert_eq!(stats.activity.last().unwrap().total, 1);
        assert_eq!(stats.activity[0].habits, 0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(assemble(day(2025, 3, 10), &[], &[], &[], &[])).unwrap();
        assert!(json["goals"].get("avgProgress").is_some());
        assert!(json["habits"].get("bestStreak").is_some());
        assert!(json["finance"].get("byCategory").is_some());
    }
}
