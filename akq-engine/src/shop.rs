//! Shop catalogs and the coin ledger.
//!
//! Catalogs are build-time constants; the ledger only guards
//! affordability. Hiding already-owned items is a presentation concern.

use thiserror::Error;

use crate::progress::UserProgress;

/// Primary/accent color pair rendered by theme-aware hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub primary: &'static str,
    pub accent: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopTheme {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub colors: ThemeColors,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopPack {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub description: &'static str,
    pub question_count: u32,
    pub icon: &'static str,
}

pub static THEME_CATALOG: [ShopTheme; 7] = [
    ShopTheme {
        id: "forest",
        name: "Forest Green",
        price: 0,
        colors: ThemeColors {
            primary: "#22c55e",
            accent: "#16a34a",
        },
        description: "A natural forest theme (Free)",
    },
    ShopTheme {
        id: "royal",
        name: "Royal Purple",
        price: 50,
        colors: ThemeColors {
            primary: "#8b5cf6",
            accent: "#7c3aed",
        },
        description: "A regal purple theme",
    },
    ShopTheme {
        id: "safari",
        name: "Safari Red",
        price: 50,
        colors: ThemeColors {
            primary: "#ef4444",
            accent: "#dc2626",
        },
        description: "A bold safari adventure theme",
    },
    ShopTheme {
        id: "ocean",
        name: "Ocean Blue",
        price: 50,
        colors: ThemeColors {
            primary: "#3b82f6",
            accent: "#2563eb",
        },
        description: "A calming ocean theme",
    },
    ShopTheme {
        id: "sunset",
        name: "Sunset Orange",
        price: 75,
        colors: ThemeColors {
            primary: "#f97316",
            accent: "#ea580c",
        },
        description: "A warm sunset theme",
    },
    ShopTheme {
        id: "midnight",
        name: "Midnight",
        price: 100,
        colors: ThemeColors {
            primary: "#1e293b",
            accent: "#0f172a",
        },
        description: "A sleek dark theme",
    },
    ShopTheme {
        id: "rainbow",
        name: "Rainbow",
        price: 150,
        colors: ThemeColors {
            primary: "#ec4899",
            accent: "#8b5cf6",
        },
        description: "A vibrant multicolor theme",
    },
];

pub static PREMIUM_PACK_CATALOG: [ShopPack; 4] = [
    ShopPack {
        id: "dinosaurs",
        name: "Dinosaurs",
        price: 200,
        description: "Journey back in time with prehistoric creatures!",
        question_count: 20,
        icon: "dino",
    },
    ShopPack {
        id: "ocean-creatures",
        name: "Deep Sea",
        price: 200,
        description: "Explore the mysterious depths of the ocean!",
        question_count: 20,
        icon: "fish",
    },
    ShopPack {
        id: "endangered",
        name: "Endangered Species",
        price: 250,
        description: "Learn about animals that need our protection",
        question_count: 25,
        icon: "heart",
    },
    ShopPack {
        id: "australian",
        name: "Australian Wildlife",
        price: 150,
        description: "Discover unique creatures from Down Under!",
        question_count: 15,
        icon: "kangaroo",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("not enough coins: need {required}, have {available}")]
    InsufficientCoins { required: u32, available: u32 },
}

#[must_use]
pub fn theme_by_id(theme_id: &str) -> Option<&'static ShopTheme> {
    THEME_CATALOG.iter().find(|theme| theme.id == theme_id)
}

#[must_use]
pub fn premium_pack_by_id(pack_id: &str) -> Option<&'static ShopPack> {
    PREMIUM_PACK_CATALOG.iter().find(|pack| pack.id == pack_id)
}

fn debit(progress: &mut UserProgress, price: u32) -> Result<(), PurchaseError> {
    if progress.coins < price {
        return Err(PurchaseError::InsufficientCoins {
            required: price,
            available: progress.coins,
        });
    }
    progress.coins -= price;
    Ok(())
}

/// Debit `price` and unlock a theme. Owning a theme twice is not modeled;
/// a repeat unlock only costs again if the caller allows it.
pub fn purchase_theme(
    progress: &mut UserProgress,
    theme_id: &str,
    price: u32,
) -> Result<(), PurchaseError> {
    debit(progress, price)?;
    if !progress.is_theme_unlocked(theme_id) {
        progress.unlocked_themes.push(theme_id.to_string());
    }
    Ok(())
}

/// Debit `price` and unlock a premium pack.
pub fn purchase_pack(
    progress: &mut UserProgress,
    pack_id: &str,
    price: u32,
) -> Result<(), PurchaseError> {
    debit(progress, price)?;
    if !progress.is_pack_unlocked(pack_id) {
        progress.unlocked_packs.push(pack_id.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_debits_and_unlocks() {
        let mut progress = UserProgress::default();
        progress.coins = 60;
        purchase_theme(&mut progress, "royal", 50).unwrap();
        assert_eq!(progress.coins, 10);
        assert!(progress.is_theme_unlocked("royal"));
        // The free default stays unlocked too.
        assert!(progress.is_theme_unlocked("forest"));
    }

    #[test]
    fn purchase_rejected_when_unaffordable() {
        let mut progress = UserProgress::default();
        progress.coins = 49;
        let err = purchase_theme(&mut progress, "royal", 50).unwrap_err();
        assert_eq!(
            err,
            PurchaseError::InsufficientCoins {
                required: 50,
                available: 49
            }
        );
        assert_eq!(progress.coins, 49);
        assert!(!progress.is_theme_unlocked("royal"));
    }

    #[test]
    fn pack_purchase_extends_unlocked_set() {
        let mut progress = UserProgress::default();
        progress.coins = 200;
        purchase_pack(&mut progress, "dinosaurs", 200).unwrap();
        assert_eq!(progress.coins, 0);
        assert!(progress.is_pack_unlocked("dinosaurs"));
        assert_eq!(progress.unlocked_packs.len(), 7);
    }

    #[test]
    fn catalog_lookups() {
        assert_eq!(theme_by_id("midnight").unwrap().price, 100);
        assert_eq!(premium_pack_by_id("endangered").unwrap().price, 250);
        assert!(theme_by_id("nope").is_none());
    }
}
