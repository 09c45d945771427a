//! Animal Kingdom Quiz Engine
//!
//! Platform-agnostic progression and session logic for the Animal Kingdom
//! Quiz app. This crate provides the full state model (levels, streaks,
//! badges, daily challenges, single-player and multiplayer reducers, and
//! the shop ledger) without UI or platform-specific dependencies.

pub mod badges;
pub mod daily;
pub mod level;
pub mod multiplayer;
pub mod pack;
pub mod progress;
pub mod session;
pub mod shop;
pub mod streak;

// Re-export commonly used types
pub use badges::{
    BADGE_CATALOG, BadgeCategory, BadgeDefinition, Requirement, Reward, SessionFacts,
    badge_by_id, badges_by_category, badges_with_status, new_badges, total_rewards,
};
pub use daily::{
    DAILY_COIN_BONUS, DAILY_QUESTION_COUNT, DAILY_XP_BONUS, DailyChallenge, challenge_pack,
    challenge_questions, challenge_streak, completed_today, today_challenge,
};
pub use level::{LEVEL_NAMES, LEVEL_THRESHOLDS, MAX_LEVEL, level_for_xp, level_name, xp_for_next_level};
pub use multiplayer::{MatchOutcome, MultiplayerAction, MultiplayerState, Player, PlayerAnswer};
pub use pack::{
    Catalog, CatalogError, DAILY_PACK_PREFIX, FAVORITES_PACK_ID, Media, Pack, PackConfig,
    PackConfigFile, QuestionType, QuizItem, REVIEW_PACK_ID,
};
pub use progress::{
    AnsweredQuestion, BASE_PACK_IDS, LifetimeStats, PackStats, STORAGE_KEY, UserProgress,
    WrongAnswer,
};
pub use session::{
    AdvanceToken, AnswerOutcome, Completion, SKIP_COST, SkipOutcome, StartOutcome, answer,
    grant_reward, remove_favorite, reset_session, set_timed_mode, skip, start_daily_challenge,
    start_pack, start_practice, toggle_favorite,
};
pub use shop::{
    PREMIUM_PACK_CATALOG, PurchaseError, ShopPack, ShopTheme, THEME_CATALOG, purchase_pack,
    purchase_theme,
};
pub use streak::{
    StreakUpdate, days_until_streak_breaks, is_streak_at_risk, streak_bonus, streak_message,
    update_streak,
};

/// Trait for abstracting pack content loading.
/// Platform-specific implementations should provide this.
pub trait PackSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the pack catalog config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded; the engine falls
    /// back to the built-in pack list.
    fn load_pack_configs(&self) -> Result<Vec<PackConfig>, Self::Error>;

    /// Load the question items for one pack.
    ///
    /// # Errors
    ///
    /// Returns an error if the pack content cannot be loaded or parsed.
    fn load_pack_items(&self, pack_id: &str) -> Result<Vec<QuizItem>, Self::Error>;
}

/// Trait for abstracting progress persistence.
/// Platform-specific implementations should provide this.
pub trait ProgressStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the whole progress blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the progress cannot be written.
    fn save(&self, progress: &UserProgress) -> Result<(), Self::Error>;

    /// Load the persisted progress, `None` on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreadable.
    fn load(&self) -> Result<Option<UserProgress>, Self::Error>;

    /// Delete the persisted progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared.
    fn clear(&self) -> Result<(), Self::Error>;
}

/// Engine facade binding a content source and a progress store.
pub struct QuizEngine<L, S>
where
    L: PackSource,
    S: ProgressStore,
{
    source: L,
    store: S,
}

impl<L, S> QuizEngine<L, S>
where
    L: PackSource,
    S: ProgressStore,
{
    pub const fn new(source: L, store: S) -> Self {
        Self { source, store }
    }

    /// Build the catalog from the content source. Config failures fall
    /// back to the built-in pack list and a pack whose content fails to
    /// load is dropped; neither is fatal. `notify_ready` fires exactly
    /// once with the total question count, replacing ad hoc global
    /// readiness hooks.
    pub fn load_catalog(&self, notify_ready: impl FnOnce(usize)) -> Catalog {
        let configs = match self.source.load_pack_configs() {
            Ok(configs) if !configs.is_empty() => configs,
            Ok(_) => {
                log::warn!("pack config is empty, using built-in pack list");
                pack::fallback_configs()
            }
            Err(err) => {
                log::warn!("pack config unavailable ({err}), using built-in pack list");
                pack::fallback_configs()
            }
        };

        let mut packs = Vec::with_capacity(configs.len());
        for config in configs {
            let pack_id = config.id.clone();
            match self.source.load_pack_items(&pack_id) {
                Ok(items) => match Pack::from_config_and_items(config, items) {
                    Ok(pack) => packs.push(pack),
                    Err(err) => log::warn!("dropping pack {pack_id}: {err}"),
                },
                Err(err) => log::error!("failed to load pack {pack_id}: {err}"),
            }
        }

        let catalog = Catalog::from_packs(packs);
        notify_ready(catalog.total_items());
        catalog
    }

    /// Load the player's progress. A missing, unreadable, or corrupt
    /// store yields fresh defaults, never an error to the player.
    pub fn load_progress(&self) -> UserProgress {
        match self.store.load() {
            Ok(Some(progress)) => progress,
            Ok(None) => UserProgress::default(),
            Err(err) => {
                log::warn!("stored progress unavailable, starting fresh: {err}");
                UserProgress::default()
            }
        }
    }

    /// Persist the progress blob, whole-object replace.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn save_progress(&self, progress: &UserProgress) -> Result<(), anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        self.store.save(progress).map_err(Into::into)
    }

    /// Clear the persisted progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete.
    pub fn clear_progress(&self) -> Result<(), anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        self.store.clear().map_err(Into::into)
    }
}

/// Wall-clock timestamp in the host's local timezone. The reducers take
/// time as a parameter; this is the one place the clock is read.
#[must_use]
pub fn local_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
