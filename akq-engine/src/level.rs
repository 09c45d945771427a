//! Level and XP model: a monotonic threshold table mapping cumulative XP
//! to a level number and a display title.

/// Cumulative XP required to reach each level; index 0 is level 1.
pub const LEVEL_THRESHOLDS: [u32; 15] = [
    0, 100, 250, 500, 1_000, 2_000, 3_500, 5_500, 8_000, 12_000, 17_000, 23_000, 30_000, 40_000,
    50_000,
];

/// Display titles, parallel to `LEVEL_THRESHOLDS`.
pub const LEVEL_NAMES: [&str; 15] = [
    "Curious Cub",
    "Eager Explorer",
    "Wildlife Watcher",
    "Nature Novice",
    "Animal Apprentice",
    "Safari Seeker",
    "Creature Connoisseur",
    "Beast Expert",
    "Wildlife Wizard",
    "Nature Navigator",
    "Animal Ace",
    "Fauna Fanatic",
    "Creature Champion",
    "Wildlife Warrior",
    "Animal Master",
];

pub const MAX_LEVEL: u32 = LEVEL_THRESHOLDS.len() as u32;

/// Highest level whose threshold is at or below `xp`.
#[must_use]
pub fn level_for_xp(xp: u32) -> u32 {
    let mut level = 1;
    for (idx, threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
        if xp >= *threshold {
            level = idx as u32 + 1;
        }
    }
    level
}

/// XP threshold for the level after `level`. At max level there is no
/// further leveling, so the last table entry is returned.
#[must_use]
pub fn xp_for_next_level(level: u32) -> u32 {
    let idx = level as usize;
    if idx >= LEVEL_THRESHOLDS.len() {
        LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1]
    } else {
        LEVEL_THRESHOLDS[idx]
    }
}

/// Display title for `level`, clamped to the last entry.
#[must_use]
pub fn level_name(level: u32) -> &'static str {
    let idx = (level.saturating_sub(1) as usize).min(LEVEL_NAMES.len() - 1);
    LEVEL_NAMES[idx]
}
