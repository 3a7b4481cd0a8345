//! Calendar-day bucketing, trend folding, and streak computation.
//!
//! Everything here works on UTC calendar days (`NaiveDate`). The same day
//! boundary is used for bucket generation, event classification, and streak
//! lookups; mixing conventions would silently misalign the series.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate, Utc};

/// How far back the streak walk scans. Streaks longer than this are reported
/// as exactly this many days; a bound on query and walk cost, not a semantic
/// limit.
pub const STREAK_SCAN_DAYS: u64 = 365;

/// Today's UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// First day of the UTC calendar month containing `today`.
pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// Ordered window of `n` day keys, oldest first, ending at `today`.
pub fn day_window(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| today - Days::new(u64::from(n - 1 - i)))
        .collect()
}

/// Zero-initialized count buckets for every day in the window, so days with
/// no events render as `0` instead of being omitted.
pub fn zeroed_counts(window: &[NaiveDate]) -> HashMap<NaiveDate, i64> {
    window.iter().map(|d| (*d, 0)).collect()
}

/// Zero-initialized sum buckets for every day in the window.
pub fn zeroed_sums(window: &[NaiveDate]) -> HashMap<NaiveDate, f64> {
    window.iter().map(|d| (*d, 0.0)).collect()
}

/// Increment the bucket matching each event day. Days outside the window are
/// dropped, never an error.
pub fn fold_counts(buckets: &mut HashMap<NaiveDate, i64>, days: impl IntoIterator<Item = NaiveDate>) {
    for day in days {
        if let Some(count) = buckets.get_mut(&day) {
            *count += 1;
        }
    }
}

/// Accumulate an amount into the bucket matching each event day, dropping
/// days outside the window.
pub fn fold_amounts(
    buckets: &mut HashMap<NaiveDate, f64>,
    entries: impl IntoIterator<Item = (NaiveDate, f64)>,
) {
    for (day, amount) in entries {
        if let Some(sum) = buckets.get_mut(&day) {
            *sum += amount;
        }
    }
}

/// Consecutive-completion streak ending today.
///
/// Walks backward from `today` for at most [`STREAK_SCAN_DAYS`] days. A day in
/// the completed set extends the streak; a missing day ends the walk unless it
/// is today itself, so an unlogged today does not wipe out an existing streak.
pub fn current_streak(today: NaiveDate, completed: &HashSet<NaiveDate>) -> i64 {
    let mut streak = 0;
    for offset in 0..STREAK_SCAN_DAYS {
        let day = today - Days::new(offset);
        if completed.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_is_ordered_and_ends_today() {
        let today = day(2025, 3, 10);
        for n in [1u32, 7, 30, 90] {
            let window = day_window(today, n);
            assert_eq!(window.len(), n as usize);
            assert_eq!(*window.last().unwrap(), today);
            assert!(window.windows(2).all(|w| w[1] == w[0] + Days::new(1)));
        }
    }

    #[test]
    fn window_crosses_month_boundary() {
        let window = day_window(day(2025, 3, 2), 4);
        assert_eq!(window[0], day(2025, 2, 27));
        assert_eq!(window[3], day(2025, 3, 2));
    }

    #[test]
    fn buckets_are_preseeded_with_zero() {
        let window = day_window(day(2025, 3, 10), 7);
        let counts = zeroed_counts(&window);
        assert_eq!(counts.len(), 7);
        assert!(counts.values().all(|c| *c == 0));
    }

    #[test]
    fn fold_counts_drops_days_outside_window() {
        let today = day(2025, 3, 10);
        let window = day_window(today, 7);
        let mut buckets = zeroed_counts(&window);
        let events = vec![
            today,
            today,
            today - Days::new(3),
            today - Days::new(10), // outside
            today + Days::new(1),  // future, outside
        ];
        fold_counts(&mut buckets, events);
        assert_eq!(buckets.values().sum::<i64>(), 3);
        assert_eq!(buckets[&today], 2);
        assert_eq!(buckets[&(today - Days::new(3))], 1);
    }

    #[test]
    fn fold_amounts_accumulates_per_day() {
        let today = day(2025, 3, 10);
        let window = day_window(today, 3);
        let mut buckets = zeroed_sums(&window);
        fold_amounts(
            &mut buckets,
            vec![(today, 10.5), (today, 4.5), (today - Days::new(1), 2.0)],
        );
        assert_eq!(buckets[&today], 15.0);
        assert_eq!(buckets[&(today - Days::new(1))], 2.0);
    }

    #[test]
    fn streak_empty_set_is_zero() {
        assert_eq!(current_streak(day(2025, 3, 10), &HashSet::new()), 0);
    }

    #[test]
    fn streak_gap_breaks_walk() {
        let today = day(2025, 3, 10);
        let completed: HashSet<_> = [today - Days::new(10)].into_iter().collect();
        assert_eq!(current_streak(today, &completed), 0);
    }

    #[test]
    fn streak_tolerates_missing_today() {
        let today = day(2025, 3, 10);
        let completed: HashSet<_> = [today - Days::new(1), today - Days::new(2)]
            .into_iter()
            .collect();
        assert_eq!(current_streak(today, &completed), 2);
    }

    #[test]
    fn streak_counts_today_and_consecutive_days() {
        let today = day(2025, 3, 10);
        let completed: HashSet<_> = [today, today - Days::new(1), today - Days::new(2)]
            .into_iter()
            .collect();
        // Gap at today - 3 ends the walk at 3.
        assert_eq!(current_streak(today, &completed), 3);
    }

    #[test]
    fn streak_is_capped_by_scan_bound() {
        let today = day(2025, 3, 10);
        let completed: HashSet<_> = (0..500).map(|i| today - Days::new(i)).collect();
        assert_eq!(current_streak(today, &completed), STREAK_SCAN_DAYS as i64);
    }

    #[test]
    fn month_start_is_first_of_month() {
        assert_eq!(month_start(day(2025, 3, 10)), day(2025, 3, 1));
        assert_eq!(month_start(day(2025, 3, 1)), day(2025, 3, 1));
    }
}
