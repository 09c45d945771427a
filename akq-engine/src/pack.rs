//! Quiz content model: questions, packs, the loaded catalog, and the
//! runtime pseudo-packs (favorites, review) assembled from player state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::progress::UserProgress;

pub const FAVORITES_PACK_ID: &str = "favorites";
pub const REVIEW_PACK_ID: &str = "review";
/// Daily challenge sessions run under a synthetic pack id `daily-<date>`.
pub const DAILY_PACK_PREFIX: &str = "daily-";

/// Question presentation style. Content files omit the field for plain
/// multiple-choice questions; unrecognized values fall back to it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    TrueFalse,
    SoundId,
    ImageMatch,
    #[default]
    #[serde(other)]
    MultipleChoice,
}

/// Optional media attached to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Media {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub sound: Option<String>,
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fact: String,
    pub question: String,
    #[serde(default)]
    pub question_type: QuestionType,
    pub options: SmallVec<[String; 4]>,
    pub answer: String,
    #[serde(default)]
    pub media: Option<Media>,
}

impl QuizItem {
    /// The answer must be one of the offered options.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.options.is_empty() && self.options.iter().any(|opt| opt == &self.answer)
    }
}

/// A named, ordered collection of questions on a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub unlock_cost: u32,
    pub items: Vec<QuizItem>,
}

/// Catalog metadata for one pack; items live in a separate content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub unlock_cost: u32,
}

/// Wrapper shape of the companion `packs-config.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PackConfigFile {
    #[serde(default)]
    pub packs: Vec<PackConfig>,
}

impl PackConfigFile {
    /// Parse the companion config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The six base packs, used when no config is available.
#[must_use]
pub fn fallback_configs() -> Vec<PackConfig> {
    crate::progress::BASE_PACK_IDS
        .iter()
        .map(|id| {
            let mut name: Vec<char> = id.chars().collect();
            name[0] = name[0].to_ascii_uppercase();
            PackConfig {
                id: (*id).to_string(),
                name: name.into_iter().collect(),
                description: None,
                icon: None,
                unlock_cost: 0,
            }
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("pack {pack_id} has no usable questions")]
    EmptyPack { pack_id: String },
    #[error("failed to parse pack content: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Pack {
    /// Synthetic packs assembled at runtime never count as "completed".
    #[must_use]
    pub fn is_pseudo(pack_id: &str) -> bool {
        pack_id == FAVORITES_PACK_ID
            || pack_id == REVIEW_PACK_ID
            || pack_id.starts_with(DAILY_PACK_PREFIX)
    }

    /// Assemble a pack from its config entry and parsed items, dropping
    /// items whose answer is not among their options.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyPack` if no usable item remains.
    pub fn from_config_and_items(
        config: PackConfig,
        items: Vec<QuizItem>,
    ) -> Result<Self, CatalogError> {
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if item.is_well_formed() {
                kept.push(item);
            } else {
                log::warn!(
                    "dropping malformed question {} in pack {}",
                    item.id,
                    config.id
                );
            }
        }
        if kept.is_empty() {
            return Err(CatalogError::EmptyPack {
                pack_id: config.id,
            });
        }
        Ok(Self {
            id: config.id,
            name: config.name,
            description: config.description,
            icon: config.icon,
            unlock_cost: config.unlock_cost,
            items: kept,
        })
    }

    /// Parse a JSON array of questions and assemble a pack.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or no item is usable.
    pub fn from_config_and_json(config: PackConfig, json: &str) -> Result<Self, CatalogError> {
        let items: Vec<QuizItem> = serde_json::from_str(json)?;
        Self::from_config_and_items(config, items)
    }

    /// Pseudo-pack of the player's favorite questions, in catalog order.
    /// `None` when no favorites are flagged.
    #[must_use]
    pub fn favorites(catalog: &Catalog, progress: &UserProgress) -> Option<Self> {
        let items: Vec<QuizItem> = catalog
            .packs
            .iter()
            .flat_map(|pack| pack.items.iter())
            .filter(|item| progress.favorite_animals.iter().any(|id| id == &item.id))
            .cloned()
            .collect();
        if items.is_empty() {
            return None;
        }
        Some(Self {
            id: FAVORITES_PACK_ID.to_string(),
            name: "Favorites".to_string(),
            description: Some("Your favorite animals".to_string()),
            icon: Some("heart".to_string()),
            unlock_cost: 0,
            items,
        })
    }

    /// Pseudo-pack of questions currently in the review queue.
    /// `None` when the queue is empty or no question matches the catalog.
    #[must_use]
    pub fn review(catalog: &Catalog, progress: &UserProgress) -> Option<Self> {
        let wanted = progress.review_question_ids();
        let items: Vec<QuizItem> = catalog
            .packs
            .iter()
            .flat_map(|pack| pack.items.iter())
            .filter(|item| wanted.iter().any(|id| id == &item.id))
            .cloned()
            .collect();
        if items.is_empty() {
            return None;
        }
        Some(Self {
            id: REVIEW_PACK_ID.to_string(),
            name: "Review Mode".to_string(),
            description: Some("Practice questions you got wrong".to_string()),
            icon: Some("refresh".to_string()),
            unlock_cost: 0,
            items,
        })
    }
}

/// The immutable pack catalog loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub packs: Vec<Pack>,
}

impl Catalog {
    /// Create an empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self { packs: Vec::new() }
    }

    #[must_use]
    pub fn from_packs(packs: Vec<Pack>) -> Self {
        Self { packs }
    }

    #[must_use]
    pub fn find(&self, pack_id: &str) -> Option<&Pack> {
        self.packs.iter().find(|pack| pack.id == pack_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    #[must_use]
    pub fn total_items(&self) -> usize {
        self.packs.iter().map(|pack| pack.items.len()).sum()
    }
}
