//! Badge catalog and requirement evaluator.
//!
//! Badges are build-time constants. Requirements are an open string-keyed
//! set: unknown kinds evaluate to false rather than failing, so catalogs
//! can grow without breaking older evaluators.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::progress::UserProgress;

/// Night-owl window is [0, 5); early-bird is [5, 7).
const NIGHT_PLAY_END_HOUR: u32 = 5;
const EARLY_PLAY_END_HOUR: u32 = 7;

const PACK_COMPLETIONS_PREFIX: &str = "pack_completions_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Progress,
    Streak,
    Speed,
    Mastery,
    Special,
}

/// Requirement descriptor: a kind key plus a numeric threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub kind: &'static str,
    pub value: u32,
}

/// Coins and XP granted when a badge unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Reward {
    #[serde(default)]
    pub coins: u32,
    #[serde(default)]
    pub xp: u32,
}

impl Reward {
    #[must_use]
    pub const fn new(coins: u32, xp: u32) -> Self {
        Self { coins, xp }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.coins == 0 && self.xp == 0
    }
}

/// Static catalog entry. Immutable configuration, not part of player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub requirement: Requirement,
    pub reward: Reward,
}

const fn badge(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: BadgeCategory,
    kind: &'static str,
    value: u32,
    reward: Reward,
) -> BadgeDefinition {
    BadgeDefinition {
        id,
        name,
        description,
        icon,
        category,
        requirement: Requirement { kind, value },
        reward,
    }
}

pub static BADGE_CATALOG: [BadgeDefinition; 23] = [
    // Progress badges
    badge(
        "first-quiz",
        "First Steps",
        "Complete your first quiz",
        "🎯",
        BadgeCategory::Progress,
        "completed_packs",
        1,
        Reward::new(5, 50),
    ),
    badge(
        "pack-master",
        "Pack Master",
        "Complete all 6 animal packs",
        "🏆",
        BadgeCategory::Progress,
        "completed_packs",
        6,
        Reward::new(50, 500),
    ),
    badge(
        "centurion",
        "Centurion",
        "Answer 100 questions correctly",
        "💯",
        BadgeCategory::Progress,
        "correct_answers",
        100,
        Reward::new(25, 250),
    ),
    badge(
        "quiz-marathon",
        "Quiz Marathon",
        "Answer 500 questions total",
        "🏃",
        BadgeCategory::Progress,
        "total_answered",
        500,
        Reward::new(50, 500),
    ),
    // Streak badges
    badge(
        "streak-3",
        "Getting Started",
        "Maintain a 3-day streak",
        "🔥",
        BadgeCategory::Streak,
        "streak",
        3,
        Reward::new(10, 100),
    ),
    badge(
        "streak-7",
        "Week Warrior",
        "Maintain a 7-day streak",
        "⚡",
        BadgeCategory::Streak,
        "streak",
        7,
        Reward::new(25, 250),
    ),
    badge(
        "streak-30",
        "Monthly Master",
        "Maintain a 30-day streak",
        "🌟",
        BadgeCategory::Streak,
        "streak",
        30,
        Reward::new(100, 1_000),
    ),
    badge(
        "streak-100",
        "Legendary Learner",
        "Maintain a 100-day streak",
        "👑",
        BadgeCategory::Streak,
        "streak",
        100,
        Reward::new(500, 5_000),
    ),
    // Speed badges
    badge(
        "speedster",
        "Speedster",
        "Complete a timed quiz in under 60 seconds",
        "⚡",
        BadgeCategory::Speed,
        "timed_quiz_under",
        60_000,
        Reward::new(15, 150),
    ),
    badge(
        "lightning-fast",
        "Lightning Fast",
        "Answer a question correctly in under 3 seconds",
        "💨",
        BadgeCategory::Speed,
        "fast_answer",
        3_000,
        Reward::new(10, 100),
    ),
    // Mastery badges
    badge(
        "perfect-pack",
        "Perfect Pack",
        "Complete a pack with 100% accuracy",
        "✨",
        BadgeCategory::Mastery,
        "perfect_pack",
        1,
        Reward::new(20, 200),
    ),
    badge(
        "mammal-expert",
        "Mammal Expert",
        "Complete the Mammals pack 3 times",
        "🦁",
        BadgeCategory::Mastery,
        "pack_completions_mammals",
        3,
        Reward::new(15, 150),
    ),
    badge(
        "bird-watcher",
        "Bird Watcher",
        "Complete the Birds pack 3 times",
        "🦅",
        BadgeCategory::Mastery,
        "pack_completions_birds",
        3,
        Reward::new(15, 150),
    ),
    badge(
        "reptile-ranger",
        "Reptile Ranger",
        "Complete the Reptiles pack 3 times",
        "🦎",
        BadgeCategory::Mastery,
        "pack_completions_reptiles",
        3,
        Reward::new(15, 150),
    ),
    badge(
        "fish-finder",
        "Fish Finder",
        "Complete the Fish pack 3 times",
        "🐠",
        BadgeCategory::Mastery,
        "pack_completions_fish",
        3,
        Reward::new(15, 150),
    ),
    badge(
        "amphibian-ace",
        "Amphibian Ace",
        "Complete the Amphibians pack 3 times",
        "🐸",
        BadgeCategory::Mastery,
        "pack_completions_amphibians",
        3,
        Reward::new(15, 150),
    ),
    badge(
        "insect-investigator",
        "Insect Investigator",
        "Complete the Insects pack 3 times",
        "🦋",
        BadgeCategory::Mastery,
        "pack_completions_insects",
        3,
        Reward::new(15, 150),
    ),
    // Special badges
    badge(
        "night-owl",
        "Night Owl",
        "Play a quiz between midnight and 5 AM",
        "🦉",
        BadgeCategory::Special,
        "night_play",
        1,
        Reward::new(10, 100),
    ),
    badge(
        "early-bird",
        "Early Bird",
        "Play a quiz between 5 AM and 7 AM",
        "🐦",
        BadgeCategory::Special,
        "early_play",
        1,
        Reward::new(10, 100),
    ),
    badge(
        "daily-devotee",
        "Daily Devotee",
        "Complete 10 daily challenges",
        "📅",
        BadgeCategory::Special,
        "daily_challenges",
        10,
        Reward::new(30, 300),
    ),
    badge(
        "coin-collector",
        "Coin Collector",
        "Earn 100 coins total",
        "💰",
        BadgeCategory::Special,
        "total_coins",
        100,
        Reward::new(20, 200),
    ),
    badge(
        "level-10",
        "Rising Star",
        "Reach level 10",
        "⭐",
        BadgeCategory::Special,
        "level",
        10,
        Reward::new(50, 0),
    ),
    badge(
        "level-15",
        "Animal Master",
        "Reach level 15 (max level)",
        "🎖️",
        BadgeCategory::Special,
        "level",
        15,
        Reward::new(200, 0),
    ),
];

static BADGE_INDEX: Lazy<HashMap<&'static str, &'static BadgeDefinition>> =
    Lazy::new(|| BADGE_CATALOG.iter().map(|b| (b.id, b)).collect());

/// Ephemeral facts about the session that just finished, fed into
/// requirements that cumulative progress cannot answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionFacts {
    pub perfect_pack: bool,
    pub timed_quiz_ms: Option<u64>,
    pub fastest_answer_ms: Option<u64>,
}

/// Evaluate one requirement against cumulative progress, session facts,
/// and the local hour of day. Unknown kinds are false, never an error.
#[must_use]
pub fn requirement_met(
    def: &BadgeDefinition,
    progress: &UserProgress,
    facts: &SessionFacts,
    local_hour: u32,
) -> bool {
    let Requirement { kind, value } = def.requirement;
    match kind {
        "completed_packs" => progress.completed_packs.len() >= value as usize,
        "correct_answers" => progress.lifetime_stats.total_correct_answers >= value,
        "total_answered" => progress.lifetime_stats.total_questions_answered >= value,
        "streak" => progress.current_streak >= value || progress.longest_streak >= value,
        "perfect_pack" => facts.perfect_pack,
        "timed_quiz_under" => facts.timed_quiz_ms.is_some_and(|ms| ms < u64::from(value)),
        "fast_answer" => facts
            .fastest_answer_ms
            .is_some_and(|ms| ms < u64::from(value)),
        "night_play" => local_hour < NIGHT_PLAY_END_HOUR,
        "early_play" => (NIGHT_PLAY_END_HOUR..EARLY_PLAY_END_HOUR).contains(&local_hour),
        "daily_challenges" => progress.lifetime_stats.daily_challenges_completed >= value,
        "total_coins" => progress.lifetime_stats.total_coins_earned >= value,
        "level" => progress.level() >= value,
        other => {
            if let Some(pack_id) = other.strip_prefix(PACK_COMPLETIONS_PREFIX) {
                progress
                    .pack_stats_for(pack_id)
                    .is_some_and(|stats| stats.times_completed >= value)
            } else {
                false
            }
        }
    }
}

/// Badges newly qualifying for this progress. Already-unlocked badges are
/// skipped, so repeated calls never return the same badge twice once the
/// caller has merged the ids.
#[must_use]
pub fn new_badges(
    progress: &UserProgress,
    facts: &SessionFacts,
    local_hour: u32,
) -> Vec<&'static BadgeDefinition> {
    BADGE_CATALOG
        .iter()
        .filter(|def| !progress.has_badge(def.id))
        .filter(|def| requirement_met(def, progress, facts, local_hour))
        .collect()
}

#[must_use]
pub fn badge_by_id(id: &str) -> Option<&'static BadgeDefinition> {
    BADGE_INDEX.get(id).copied()
}

#[must_use]
pub fn badges_by_category(category: BadgeCategory) -> Vec<&'static BadgeDefinition> {
    BADGE_CATALOG
        .iter()
        .filter(|def| def.category == category)
        .collect()
}

/// Every badge paired with its unlock status, for gallery display.
#[must_use]
pub fn badges_with_status(unlocked: &[String]) -> Vec<(&'static BadgeDefinition, bool)> {
    BADGE_CATALOG
        .iter()
        .map(|def| (def, unlocked.iter().any(|id| id == def.id)))
        .collect()
}

/// Sum the rewards of a set of badge definitions.
#[must_use]
pub fn total_rewards(defs: &[&BadgeDefinition]) -> Reward {
    defs.iter().fold(Reward::default(), |acc, def| Reward {
        coins: acc.coins + def.reward.coins,
        xp: acc.xp + def.reward.xp,
    })
}
