//! Single-player session reducer.
//!
//! Every transition mutates `UserProgress` in one atomic update and
//! returns an outcome struct for the presentation layer. Derived
//! aggregates (lifetime stats, streak, badge ids) are written
//! synchronously with the triggering event, so persisted state is always
//! self-consistent and reloads without a recomputation pass.

use chrono::{NaiveDateTime, Timelike};

use crate::badges::{self, BadgeDefinition, Reward, SessionFacts};
use crate::daily;
use crate::pack::{Catalog, Pack};
use crate::progress::{AnsweredQuestion, UserProgress, WrongAnswer};
use crate::streak::{self, StreakUpdate};

pub const POINTS_PER_CORRECT: u32 = 10;
pub const COINS_PER_CORRECT: u32 = 1;
pub const XP_PER_CORRECT: u32 = 15;
pub const XP_PER_MISS: u32 = 5;
pub const SKIP_COST: u32 = 2;

/// Result of starting a pack session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOutcome {
    pub streak: StreakUpdate,
    pub bonus_coins: u32,
    pub milestone: Option<&'static str>,
}

/// Bookkeeping produced when a session reaches its last question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub perfect: bool,
    /// Newly unlocked badges. Their ids are already merged into
    /// `progress.badges`; applying the summed reward is the host's call
    /// (see [`grant_reward`]).
    pub new_badges: Vec<&'static BadgeDefinition>,
    pub badge_reward: Reward,
    /// Fixed daily bonus, present only on the first completion of that
    /// date's challenge. Already applied to coins and XP.
    pub daily_bonus: Option<Reward>,
}

/// Result of one answer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub points: u32,
    /// New level when this answer crossed a threshold.
    pub leveled_up: Option<u32>,
    /// Present when this answer finished the pack.
    pub completion: Option<Completion>,
}

/// Result of a skip request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipOutcome {
    /// Not enough coins; nothing changed.
    Rejected,
    Skipped { completion: Option<Completion> },
}

/// Identity of the question on screen when a delayed advance was
/// scheduled. The host's timer checks `is_current` at fire time and drops
/// the continuation if the session moved on in the meantime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceToken {
    pack_id: String,
    question_index: usize,
}

impl AdvanceToken {
    #[must_use]
    pub fn capture(progress: &UserProgress) -> Option<Self> {
        progress.current_pack_id.clone().map(|pack_id| Self {
            pack_id,
            question_index: progress.current_question_index,
        })
    }

    #[must_use]
    pub fn is_current(&self, progress: &UserProgress) -> bool {
        progress.current_pack_id.as_deref() == Some(self.pack_id.as_str())
            && progress.current_question_index == self.question_index
    }
}

/// Reset the session cursor and bind it to `pack` without touching the
/// streak clock. Used directly for practice pseudo-packs.
pub fn start_practice(progress: &mut UserProgress, pack: &Pack, now: NaiveDateTime) {
    progress.current_pack_id = Some(pack.id.clone());
    progress.current_question_index = 0;
    progress.answered_questions.clear();
    progress.score = 0;
    progress.session_start_ms = Some(now.and_utc().timestamp_millis());
    if progress.created_at.is_none() {
        progress.created_at = Some(now);
    }
    progress.last_updated_at = Some(now);
}

/// Start a pack session. This is the sole point where the streak clock
/// advances; the streak bonus coins are credited here.
pub fn start_pack(progress: &mut UserProgress, pack: &Pack, now: NaiveDateTime) -> StartOutcome {
    let update = streak::update_streak(progress, now.date());
    let bonus_coins = if update.is_new_day {
        streak::streak_bonus(update.current_streak)
    } else {
        0
    };
    let milestone = if update.is_new_day {
        streak::streak_message(update.current_streak)
    } else {
        None
    };

    start_practice(progress, pack, now);
    progress.current_streak = update.current_streak;
    progress.longest_streak = update.longest_streak;
    progress.last_played_date = Some(update.last_played_date);
    progress.coins += bonus_coins;
    progress.lifetime_stats.total_coins_earned += bonus_coins;

    StartOutcome {
        streak: update,
        bonus_coins,
        milestone,
    }
}

/// Start today's daily challenge: resolves the challenge, records it in
/// history so completion can find it, and begins a session on the
/// `daily-<date>` pseudo-pack. `None` when the catalog cannot supply one.
pub fn start_daily_challenge(
    progress: &mut UserProgress,
    catalog: &Catalog,
    now: NaiveDateTime,
) -> Option<(Pack, StartOutcome)> {
    let challenge = daily::today_challenge(progress, catalog, now.date())?;
    let pack = daily::challenge_pack(&challenge, catalog)?;
    if !progress
        .daily_challenge_history
        .iter()
        .any(|c| c.date == challenge.date)
    {
        progress.daily_challenge_history.push(challenge);
    }
    let outcome = start_pack(progress, &pack, now);
    Some((pack, outcome))
}

/// Answer the current question. Correctness is judged against the item's
/// stored answer. Panics if no session is active for `pack` or the cursor
/// is out of range; those are host contract violations, not runtime
/// conditions.
pub fn answer(
    progress: &mut UserProgress,
    pack: &Pack,
    selected_answer: &str,
    time_spent_ms: Option<u64>,
    now: NaiveDateTime,
) -> AnswerOutcome {
    let index = active_question_index(progress, pack);
    let item = &pack.items[index];

    let correct = selected_answer == item.answer;
    let points = if correct { POINTS_PER_CORRECT } else { 0 };
    let coins_earned = if correct { COINS_PER_CORRECT } else { 0 };
    let xp_earned = if correct { XP_PER_CORRECT } else { XP_PER_MISS };
    let old_level = progress.level();
    let is_last = index + 1 == pack.items.len();

    progress.score += points;
    progress.coins += coins_earned;
    progress.xp += xp_earned;
    progress.answered_questions.push(AnsweredQuestion {
        id: item.id.clone(),
        pack_id: Some(pack.id.clone()),
        correct,
        time_spent_ms,
        answered_at: Some(now),
    });

    // Review queue: self-pruning on a correct re-answer, upsert on a miss.
    if correct {
        progress.wrong_answers.retain(|w| w.question_id != item.id);
    } else if let Some(entry) = progress
        .wrong_answers
        .iter_mut()
        .find(|w| w.question_id == item.id)
    {
        entry.wrong_answer = selected_answer.to_string();
        entry.answered_at = Some(now);
    } else {
        progress.wrong_answers.push(WrongAnswer {
            question_id: item.id.clone(),
            pack_id: pack.id.clone(),
            wrong_answer: selected_answer.to_string(),
            correct_answer: item.answer.clone(),
            answered_at: Some(now),
        });
    }

    let stats = &mut progress.lifetime_stats;
    stats.total_questions_answered += 1;
    stats.total_score += points;
    stats.total_xp_earned += xp_earned;
    stats.total_coins_earned += coins_earned;
    if let Some(ms) = time_spent_ms {
        stats.total_time_played_ms += ms;
    }
    if correct {
        stats.total_correct_answers += 1;
        if let Some(ms) = time_spent_ms
            && stats.fastest_correct_answer_ms.is_none_or(|best| ms < best)
        {
            stats.fastest_correct_answer_ms = Some(ms);
        }
    }

    let completion = if is_last {
        Some(finish_pack(progress, pack, now))
    } else {
        progress.current_question_index += 1;
        None
    };

    let new_level = progress.level();
    progress.last_updated_at = Some(now);
    AnswerOutcome {
        correct,
        points,
        leveled_up: (new_level > old_level).then_some(new_level),
        completion,
    }
}

/// Skip the current question for coins. With fewer than `SKIP_COST` coins
/// the request is silently rejected and nothing changes. Skips count
/// toward questions answered but earn nothing.
pub fn skip(progress: &mut UserProgress, pack: &Pack, now: NaiveDateTime) -> SkipOutcome {
    let index = active_question_index(progress, pack);
    if progress.coins < SKIP_COST {
        return SkipOutcome::Rejected;
    }

    progress.coins -= SKIP_COST;
    progress.lifetime_stats.total_questions_answered += 1;

    let is_last = index + 1 == pack.items.len();
    let completion = if is_last {
        Some(finish_pack(progress, pack, now))
    } else {
        progress.current_question_index += 1;
        None
    };
    progress.last_updated_at = Some(now);
    SkipOutcome::Skipped { completion }
}

fn active_question_index(progress: &UserProgress, pack: &Pack) -> usize {
    assert_eq!(
        progress.current_pack_id.as_deref(),
        Some(pack.id.as_str()),
        "no active session for pack {}",
        pack.id
    );
    let index = progress.current_question_index;
    assert!(
        index < pack.items.len(),
        "question cursor {index} out of range for pack {} ({} items)",
        pack.id,
        pack.items.len()
    );
    index
}

/// Terminal transition: completed-pack bookkeeping, per-pack stat rollup,
/// daily bonus, and badge evaluation.
fn finish_pack(progress: &mut UserProgress, pack: &Pack, now: NaiveDateTime) -> Completion {
    let session_answered = progress.answered_questions.len();
    let session_correct = progress.session_correct_count();
    // Session-scoped: a skipped question leaves the answered count short
    // of the pack length, so a run with skips is not perfect.
    let perfect = session_answered == pack.items.len()
        && session_correct == session_answered
        && session_answered > 0;

    let pseudo = Pack::is_pseudo(&pack.id);
    if !pseudo && !progress.is_pack_completed(&pack.id) {
        progress.completed_packs.push(pack.id.clone());
    }

    let elapsed_ms = progress
        .session_start_ms
        .map(|start| u64::try_from((now.and_utc().timestamp_millis() - start).max(0)).unwrap_or(0));
    let timed_quiz_ms = if progress.timed_mode { elapsed_ms } else { None };
    let score = progress.score;

    if !pseudo {
        let entry = progress.pack_stats_mut(&pack.id);
        entry.times_completed += 1;
        entry.best_score = entry.best_score.max(score);
        entry.total_correct += session_correct as u32;
        entry.total_answered += session_answered as u32;
        entry.last_played_at = Some(now);
        if let Some(ms) = timed_quiz_ms
            && entry.best_time_ms.is_none_or(|best| ms < best)
        {
            entry.best_time_ms = Some(ms);
        }
    }

    if perfect {
        progress.lifetime_stats.perfect_games += 1;
    }

    let mut daily_bonus = None;
    if let Some(date) = daily::pack_date(&pack.id)
        && daily::mark_completed(progress, date, score, elapsed_ms)
    {
        let bonus = Reward::new(daily::DAILY_COIN_BONUS, daily::DAILY_XP_BONUS);
        progress.coins += bonus.coins;
        progress.xp += bonus.xp;
        progress.lifetime_stats.total_coins_earned += bonus.coins;
        progress.lifetime_stats.total_xp_earned += bonus.xp;
        daily_bonus = Some(bonus);
    }

    let facts = SessionFacts {
        perfect_pack: perfect,
        timed_quiz_ms,
        fastest_answer_ms: progress
            .answered_questions
            .iter()
            .filter(|a| a.correct)
            .filter_map(|a| a.time_spent_ms)
            .min(),
    };
    let new_badges = badges::new_badges(progress, &facts, now.hour());
    for badge in &new_badges {
        progress.badges.push(badge.id.to_string());
    }
    let badge_reward = badges::total_rewards(&new_badges);

    Completion {
        perfect,
        new_badges,
        badge_reward,
        daily_bonus,
    }
}

/// Toggle timed play. The flag persists with the progress blob, so it
/// applies to every following session until toggled off.
pub fn set_timed_mode(progress: &mut UserProgress, enabled: bool) {
    progress.timed_mode = enabled;
}

/// Credit a reward (typically a badge unlock) to coins, XP, and their
/// lifetime mirrors.
pub fn grant_reward(progress: &mut UserProgress, reward: Reward) {
    progress.coins += reward.coins;
    progress.xp += reward.xp;
    progress.lifetime_stats.total_coins_earned += reward.coins;
    progress.lifetime_stats.total_xp_earned += reward.xp;
}

/// Toggle a question in the favorites set; returns the new state.
pub fn toggle_favorite(progress: &mut UserProgress, question_id: &str) -> bool {
    if let Some(pos) = progress
        .favorite_animals
        .iter()
        .position(|id| id == question_id)
    {
        progress.favorite_animals.remove(pos);
        false
    } else {
        progress.favorite_animals.push(question_id.to_string());
        true
    }
}

pub fn remove_favorite(progress: &mut UserProgress, question_id: &str) {
    progress.favorite_animals.retain(|id| id != question_id);
}

/// Clear the session cursor (play-again or abandoning a session).
pub fn reset_session(progress: &mut UserProgress) {
    progress.current_pack_id = None;
    progress.current_question_index = 0;
    progress.answered_questions.clear();
    progress.score = 0;
    progress.session_start_ms = None;
}
