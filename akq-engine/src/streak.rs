//! Daily play streak tracking with day-granularity calendar semantics.
//!
//! All functions here are pure; the caller persists the returned fields and
//! awards any bonus. Dates are calendar days only, no time component.

use chrono::NaiveDate;

use crate::progress::UserProgress;

/// Result of advancing the streak clock for a play on `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_played_date: NaiveDate,
    pub streak_broken: bool,
    pub is_new_day: bool,
}

/// True when `next` is the calendar day immediately after `prev`.
#[must_use]
pub fn is_next_day(prev: NaiveDate, next: NaiveDate) -> bool {
    prev.succ_opt() == Some(next)
}

/// Compute the next streak state for a play on `today`.
#[must_use]
pub fn update_streak(progress: &UserProgress, today: NaiveDate) -> StreakUpdate {
    let Some(last_played) = progress.last_played_date else {
        // First time playing
        return StreakUpdate {
            current_streak: 1,
            longest_streak: progress.longest_streak.max(1),
            last_played_date: today,
            streak_broken: false,
            is_new_day: true,
        };
    };

    // Already played today
    if last_played == today {
        return StreakUpdate {
            current_streak: progress.current_streak,
            longest_streak: progress.longest_streak,
            last_played_date: last_played,
            streak_broken: false,
            is_new_day: false,
        };
    }

    // Played yesterday, streak continues
    if is_next_day(last_played, today) {
        let next = progress.current_streak + 1;
        return StreakUpdate {
            current_streak: next,
            longest_streak: progress.longest_streak.max(next),
            last_played_date: today,
            streak_broken: false,
            is_new_day: true,
        };
    }

    // Gap of two or more days; the longest streak is preserved.
    StreakUpdate {
        current_streak: 1,
        longest_streak: progress.longest_streak,
        last_played_date: today,
        streak_broken: progress.current_streak > 0,
        is_new_day: true,
    }
}

/// Bonus coins for a streak length: a step function at 3/7/14/30 days.
#[must_use]
pub fn streak_bonus(streak: u32) -> u32 {
    if streak >= 30 {
        10
    } else if streak >= 14 {
        7
    } else if streak >= 7 {
        5
    } else if streak >= 3 {
        3
    } else {
        0
    }
}

/// Milestone copy shown when a streak hits a notable length.
#[must_use]
pub fn streak_message(streak: u32) -> Option<&'static str> {
    match streak {
        3 => Some("3-day streak! +3 bonus coins"),
        7 => Some("1-week streak! +5 bonus coins"),
        14 => Some("2-week streak! +7 bonus coins"),
        30 => Some("30-day streak! +10 bonus coins"),
        50 => Some("50-day streak! Amazing dedication!"),
        100 => Some("100-day streak! You're legendary!"),
        365 => Some("1-year streak! Incredible!"),
        _ => None,
    }
}

/// The streak survives only if the player plays today.
#[must_use]
pub fn is_streak_at_risk(progress: &UserProgress, today: NaiveDate) -> bool {
    progress
        .last_played_date
        .is_some_and(|last| is_next_day(last, today))
}

/// Days of slack before the streak breaks: 1 if already played today,
/// 0 if the player must play today, -1 if the streak is already gone.
#[must_use]
pub fn days_until_streak_breaks(progress: &UserProgress, today: NaiveDate) -> i32 {
    match progress.last_played_date {
        None => 0,
        Some(last) if last == today => 1,
        Some(last) if is_next_day(last, today) => 0,
        Some(_) => -1,
    }
}
