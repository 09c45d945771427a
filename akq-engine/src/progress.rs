//! The persisted player aggregate and its nested records.
//!
//! `UserProgress` is the sole unit of persisted state: created with
//! defaults on first use, mutated only through the session reducers, and
//! written back whole after every mutation. Every field carries a serde
//! default so that older or partial payloads always load.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::daily::DailyChallenge;
use crate::level;

/// Storage key hosts should persist the progress blob under.
pub const STORAGE_KEY: &str = "animalQuizProgress";

/// Packs unlocked for every new player.
pub const BASE_PACK_IDS: [&str; 6] = [
    "mammals",
    "birds",
    "reptiles",
    "fish",
    "amphibians",
    "insects",
];

const DEFAULT_THEME_ID: &str = "forest";

fn default_coins() -> u32 {
    10
}

fn default_unlocked_themes() -> Vec<String> {
    vec![DEFAULT_THEME_ID.to_string()]
}

fn default_unlocked_packs() -> Vec<String> {
    BASE_PACK_IDS.iter().map(|id| (*id).to_string()).collect()
}

/// One answer event, appended within a session and cleared on pack start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub id: String,
    #[serde(default)]
    pub pack_id: Option<String>,
    pub correct: bool,
    #[serde(default)]
    pub time_spent_ms: Option<u64>,
    #[serde(default)]
    pub answered_at: Option<NaiveDateTime>,
}

/// Review-queue entry: at most one per question id, replaced on a repeat
/// miss and removed when the question is answered correctly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongAnswer {
    pub question_id: String,
    #[serde(default)]
    pub pack_id: String,
    #[serde(default)]
    pub wrong_answer: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub answered_at: Option<NaiveDateTime>,
}

/// Lifetime aggregates for one pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackStats {
    pub pack_id: String,
    #[serde(default)]
    pub times_completed: u32,
    #[serde(default)]
    pub best_score: u32,
    #[serde(default)]
    pub best_time_ms: Option<u64>,
    #[serde(default)]
    pub total_correct: u32,
    #[serde(default)]
    pub total_answered: u32,
    #[serde(default)]
    pub last_played_at: Option<NaiveDateTime>,
}

impl PackStats {
    #[must_use]
    pub fn new(pack_id: &str) -> Self {
        Self {
            pack_id: pack_id.to_string(),
            times_completed: 0,
            best_score: 0,
            best_time_ms: None,
            total_correct: 0,
            total_answered: 0,
            last_played_at: None,
        }
    }
}

/// Monotonic counters that never decrease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeStats {
    #[serde(default)]
    pub total_questions_answered: u32,
    #[serde(default)]
    pub total_correct_answers: u32,
    #[serde(default)]
    pub total_score: u32,
    #[serde(default)]
    pub total_xp_earned: u32,
    #[serde(default)]
    pub total_coins_earned: u32,
    #[serde(default)]
    pub total_time_played_ms: u64,
    #[serde(default)]
    pub fastest_correct_answer_ms: Option<u64>,
    #[serde(default)]
    pub perfect_games: u32,
    #[serde(default)]
    pub daily_challenges_completed: u32,
}

/// The central player aggregate, owned by the single-player engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    // Core progression. The level is derived from xp, never stored.
    #[serde(default = "default_coins")]
    pub coins: u32,
    #[serde(default)]
    pub xp: u32,

    // Session cursor, reset on every pack start.
    #[serde(default)]
    pub current_pack_id: Option<String>,
    #[serde(default)]
    pub current_question_index: usize,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub session_start_ms: Option<i64>,
    #[serde(default)]
    pub timed_mode: bool,

    // Question history
    #[serde(default)]
    pub answered_questions: Vec<AnsweredQuestion>,
    #[serde(default)]
    pub completed_packs: Vec<String>,

    // Unlocked badge ids, append-only.
    #[serde(default)]
    pub badges: Vec<String>,

    // Streak system
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub last_played_date: Option<NaiveDate>,

    // Daily challenge, one record per calendar date.
    #[serde(default)]
    pub daily_challenge_history: Vec<DailyChallenge>,

    // Per-pack statistics
    #[serde(default)]
    pub pack_stats: Vec<PackStats>,

    // Favorites (question ids, toggle semantics)
    #[serde(default)]
    pub favorite_animals: Vec<String>,

    // Review queue
    #[serde(default)]
    pub wrong_answers: Vec<WrongAnswer>,

    // Unlocked content
    #[serde(default = "default_unlocked_themes")]
    pub unlocked_themes: Vec<String>,
    #[serde(default = "default_unlocked_packs")]
    pub unlocked_packs: Vec<String>,

    #[serde(default)]
    pub lifetime_stats: LifetimeStats,

    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_updated_at: Option<NaiveDateTime>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            coins: default_coins(),
            xp: 0,
            current_pack_id: None,
            current_question_index: 0,
            score: 0,
            session_start_ms: None,
            timed_mode: false,
            answered_questions: Vec::new(),
            completed_packs: Vec::new(),
            badges: Vec::new(),
            current_streak: 0,
            longest_streak: 0,
            last_played_date: None,
            daily_challenge_history: Vec::new(),
            pack_stats: Vec::new(),
            favorite_animals: Vec::new(),
            wrong_answers: Vec::new(),
            unlocked_themes: default_unlocked_themes(),
            unlocked_packs: default_unlocked_packs(),
            lifetime_stats: LifetimeStats::default(),
            created_at: None,
            last_updated_at: None,
        }
    }
}

impl UserProgress {
    /// Load from a persisted JSON payload. Missing fields fall back to
    /// their defaults; a payload that does not parse at all yields a fresh
    /// default progress rather than an error.
    #[must_use]
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|err| {
            log::warn!("stored progress did not parse, starting fresh: {err}");
            Self::default()
        })
    }

    /// Serialize for persistence.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Level derived from cumulative XP.
    #[must_use]
    pub fn level(&self) -> u32 {
        level::level_for_xp(self.xp)
    }

    #[must_use]
    pub fn level_name(&self) -> &'static str {
        level::level_name(self.level())
    }

    /// Correct answers within the current session.
    #[must_use]
    pub fn session_correct_count(&self) -> usize {
        self.answered_questions.iter().filter(|a| a.correct).count()
    }

    #[must_use]
    pub fn is_pack_completed(&self, pack_id: &str) -> bool {
        self.completed_packs.iter().any(|id| id == pack_id)
    }

    #[must_use]
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.iter().any(|id| id == badge_id)
    }

    #[must_use]
    pub fn is_favorite(&self, question_id: &str) -> bool {
        self.favorite_animals.iter().any(|id| id == question_id)
    }

    #[must_use]
    pub fn is_theme_unlocked(&self, theme_id: &str) -> bool {
        self.unlocked_themes.iter().any(|id| id == theme_id)
    }

    #[must_use]
    pub fn is_pack_unlocked(&self, pack_id: &str) -> bool {
        self.unlocked_packs.iter().any(|id| id == pack_id)
    }

    /// Question ids currently queued for review, in queue order.
    #[must_use]
    pub fn review_question_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(self.wrong_answers.len());
        for entry in &self.wrong_answers {
            if !ids.iter().any(|id| id == &entry.question_id) {
                ids.push(entry.question_id.clone());
            }
        }
        ids
    }

    /// Find-or-insert the lifetime stats entry for a pack.
    pub fn pack_stats_mut(&mut self, pack_id: &str) -> &mut PackStats {
        let idx = match self.pack_stats.iter().position(|s| s.pack_id == pack_id) {
            Some(idx) => idx,
            None => {
                self.pack_stats.push(PackStats::new(pack_id));
                self.pack_stats.len() - 1
            }
        };
        &mut self.pack_stats[idx]
    }

    #[must_use]
    pub fn pack_stats_for(&self, pack_id: &str) -> Option<&PackStats> {
        self.pack_stats.iter().find(|s| s.pack_id == pack_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run_state() {
        let progress = UserProgress::default();
        assert_eq!(progress.coins, 10);
        assert_eq!(progress.xp, 0);
        assert_eq!(progress.level(), 1);
        assert_eq!(progress.unlocked_themes, vec!["forest".to_string()]);
        assert_eq!(progress.unlocked_packs.len(), 6);
        assert!(progress.badges.is_empty());
        assert!(progress.last_played_date.is_none());
    }

    #[test]
    fn partial_payload_gets_field_defaults() {
        let progress = UserProgress::from_json(r#"{"coins": 42, "xp": 120}"#);
        assert_eq!(progress.coins, 42);
        assert_eq!(progress.xp, 120);
        assert_eq!(progress.level(), 2);
        assert_eq!(progress.unlocked_themes, vec!["forest".to_string()]);
        assert_eq!(progress.lifetime_stats, LifetimeStats::default());
    }

    #[test]
    fn corrupt_payload_starts_fresh() {
        let progress = UserProgress::from_json("definitely { not json");
        assert_eq!(progress, UserProgress::default());
    }

    #[test]
    fn nested_lifetime_stats_default_as_a_whole() {
        let progress =
            UserProgress::from_json(r#"{"lifetimeStats": {"totalCorrectAnswers": 7}}"#);
        assert_eq!(progress.lifetime_stats.total_correct_answers, 7);
        assert_eq!(progress.lifetime_stats.total_questions_answered, 0);
        assert!(progress.lifetime_stats.fastest_correct_answer_ms.is_none());
    }

    #[test]
    fn review_ids_dedupe_preserving_order() {
        let mut progress = UserProgress::default();
        for id in ["owl", "lion", "owl"] {
            progress.wrong_answers.push(WrongAnswer {
                question_id: id.to_string(),
                pack_id: "mammals".to_string(),
                wrong_answer: "x".to_string(),
                correct_answer: "y".to_string(),
                answered_at: None,
            });
        }
        assert_eq!(progress.review_question_ids(), ["owl", "lion"]);
    }

    #[test]
    fn pack_stats_find_or_insert() {
        let mut progress = UserProgress::default();
        progress.pack_stats_mut("mammals").times_completed += 1;
        progress.pack_stats_mut("mammals").times_completed += 1;
        assert_eq!(progress.pack_stats.len(), 1);
        assert_eq!(
            progress.pack_stats_for("mammals").unwrap().times_completed,
            2
        );
    }
}
