//! Daily challenge: a date-keyed, deterministically selected question
//! subset with a fixed completion bonus.
//!
//! Selection is driven by a ChaCha stream seeded from the calendar date,
//! so the same date always yields the same pack and question ids no
//! matter how often or in what order the generator runs.

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use crate::pack::{Catalog, DAILY_PACK_PREFIX, Pack, QuizItem};
use crate::progress::UserProgress;

pub const DAILY_QUESTION_COUNT: usize = 5;
pub const DAILY_XP_BONUS: u32 = 50;
pub const DAILY_COIN_BONUS: u32 = 10;

/// Domain separator so the daily stream never collides with other seeded
/// draws keyed on the same date.
const DAILY_SEED_KEY: u64 = 0x414B_515F_4441_494C;

/// One challenge record, keyed by calendar date; at most one per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyChallenge {
    pub date: NaiveDate,
    pub pack_id: String,
    #[serde(default)]
    pub question_ids: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub time_spent_ms: Option<u64>,
}

fn date_seed(date: NaiveDate) -> u64 {
    let key = format!("daily:{date}");
    XxHash64::oneshot(DAILY_SEED_KEY, key.as_bytes())
}

/// Generate the challenge for `today`. `None` only when the catalog holds
/// no playable pack.
#[must_use]
pub fn generate(catalog: &Catalog, today: NaiveDate) -> Option<DailyChallenge> {
    if catalog.is_empty() {
        return None;
    }
    let mut rng = ChaCha20Rng::seed_from_u64(date_seed(today));
    let pack = &catalog.packs[rng.gen_range(0..catalog.packs.len())];
    if pack.items.is_empty() {
        return None;
    }

    let count = DAILY_QUESTION_COUNT.min(pack.items.len());
    let mut indices: Vec<usize> = (0..pack.items.len()).collect();
    indices.shuffle(&mut rng);
    indices.truncate(count);
    let question_ids = indices
        .into_iter()
        .map(|idx| pack.items[idx].id.clone())
        .collect();

    Some(DailyChallenge {
        date: today,
        pack_id: pack.id.clone(),
        question_ids,
        completed: false,
        score: None,
        time_spent_ms: None,
    })
}

/// Today's challenge: the stored record when one exists, else a fresh
/// generation (not persisted until started or completed).
#[must_use]
pub fn today_challenge(
    progress: &UserProgress,
    catalog: &Catalog,
    today: NaiveDate,
) -> Option<DailyChallenge> {
    progress
        .daily_challenge_history
        .iter()
        .find(|c| c.date == today)
        .cloned()
        .or_else(|| generate(catalog, today))
}

#[must_use]
pub fn completed_today(progress: &UserProgress, today: NaiveDate) -> bool {
    progress
        .daily_challenge_history
        .iter()
        .any(|c| c.date == today && c.completed)
}

/// Resolve the challenge's question ids against the catalog; ids that no
/// longer exist are dropped.
#[must_use]
pub fn challenge_questions(challenge: &DailyChallenge, catalog: &Catalog) -> Vec<QuizItem> {
    let Some(pack) = catalog.find(&challenge.pack_id) else {
        return Vec::new();
    };
    challenge
        .question_ids
        .iter()
        .filter_map(|id| pack.items.iter().find(|item| &item.id == id))
        .cloned()
        .collect()
}

/// The pseudo-pack a daily session runs under, id `daily-<date>`.
#[must_use]
pub fn challenge_pack(challenge: &DailyChallenge, catalog: &Catalog) -> Option<Pack> {
    let source = catalog.find(&challenge.pack_id)?;
    let items = challenge_questions(challenge, catalog);
    if items.is_empty() {
        return None;
    }
    Some(Pack {
        id: format!("{DAILY_PACK_PREFIX}{}", challenge.date),
        name: "Daily Challenge".to_string(),
        description: source.description.clone(),
        icon: source.icon.clone(),
        unlock_cost: 0,
        items,
    })
}

/// Date encoded in a daily pseudo-pack id, if the id carries one.
#[must_use]
pub fn pack_date(pack_id: &str) -> Option<NaiveDate> {
    pack_id.strip_prefix(DAILY_PACK_PREFIX)?.parse().ok()
}

/// Upsert the completion record for `date`. Returns true when the date
/// was newly completed; repeated completions of the same date are no-ops,
/// so the lifetime counter moves at most once per calendar date.
pub fn mark_completed(
    progress: &mut UserProgress,
    date: NaiveDate,
    score: u32,
    time_spent_ms: Option<u64>,
) -> bool {
    if let Some(entry) = progress
        .daily_challenge_history
        .iter_mut()
        .find(|c| c.date == date)
    {
        if entry.completed {
            return false;
        }
        entry.completed = true;
        entry.score = Some(score);
        entry.time_spent_ms = time_spent_ms;
    } else {
        progress.daily_challenge_history.push(DailyChallenge {
            date,
            pack_id: String::new(),
            question_ids: Vec::new(),
            completed: true,
            score: Some(score),
            time_spent_ms,
        });
    }
    progress.lifetime_stats.daily_challenges_completed += 1;
    true
}

/// Consecutive completed days ending at `today`.
#[must_use]
pub fn challenge_streak(progress: &UserProgress, today: NaiveDate) -> u32 {
    let completed: HashSet<NaiveDate> = progress
        .daily_challenge_history
        .iter()
        .filter(|c| c.completed)
        .map(|c| c.date)
        .collect();

    let mut streak = 0;
    let mut cursor = today;
    while completed.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}
