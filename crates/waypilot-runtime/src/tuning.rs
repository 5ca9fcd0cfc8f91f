//! Thresholds and timeouts read by the behaviors.
//!
//! [`PilotTuning`] is embedded as the `[tuning]` table of the CLI config.
//! Every field has a default, so a partial table (or none at all) is valid.
//! Durations are stored as integer milliseconds or seconds to keep the TOML
//! readable; use the accessor methods to get [`Duration`]s.
//!
//! ```toml
//! [tuning]
//! heal_below_percent = 35
//! heal_potion = "strong health potion"
//! loot_policy = "newest"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::movement::MovementTuning;

/// Order in which corpses are looted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootPolicy {
    #[default]
    Oldest,
    Newest,
}

impl std::fmt::Display for LootPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LootPolicy::Oldest => write!(f, "oldest"),
            LootPolicy::Newest => write!(f, "newest"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotTuning {
    // ── movement ────────────────────────────────────────────────────────
    /// Ticks to wait for a step to be confirmed before replanning.
    pub max_wait_ticks: u32,
    /// Consecutive ticks the position must be unchanged before stepping.
    pub min_stable_ticks: u32,
    pub step_cooldown_ms: u64,
    /// Consecutive ticks without a position fix before a relocation or floor
    /// change fails.
    pub no_fix_timeout_ticks: u32,
    /// Ticks to wait for a floor change before giving up.
    pub floor_change_timeout_ticks: u32,
    /// Treat corpses as obstacles when planning.
    pub corpses_block: bool,

    // ── emergency heal ──────────────────────────────────────────────────
    pub heal_below_percent: u8,
    pub heal_potion: String,
    pub heal_confirm_ms: u64,
    pub heal_max_attempts: u32,
    pub heal_disable_secs: u64,

    // ── combat ──────────────────────────────────────────────────────────
    pub combat_enabled: bool,
    pub attack_confirm_ticks: u32,
    pub max_attack_failures: u32,
    pub combat_max_duration_secs: u64,

    // ── mana heal ───────────────────────────────────────────────────────
    pub mana_heal_below_percent: u8,
    pub mana_heal_min_mana: u8,
    pub mana_heal_hotkey: String,
    pub mana_heal_cooldown_ms: u64,

    // ── loot ────────────────────────────────────────────────────────────
    pub loot_enabled: bool,
    pub loot_policy: LootPolicy,
    pub loot_max_attempts: u32,
    pub loot_confirm_ticks: u32,
    pub loot_failures_before_disable: u32,
    pub loot_disable_secs: u64,
}

impl Default for PilotTuning {
    fn default() -> Self {
        Self {
            max_wait_ticks: 6,
            min_stable_ticks: 1,
            step_cooldown_ms: 150,
            no_fix_timeout_ticks: 40,
            floor_change_timeout_ticks: 20,
            corpses_block: false,

            heal_below_percent: 40,
            heal_potion: "health potion".to_string(),
            heal_confirm_ms: 1_000,
            heal_max_attempts: 3,
            heal_disable_secs: 30,

            combat_enabled: true,
            attack_confirm_ticks: 8,
            max_attack_failures: 3,
            combat_max_duration_secs: 60,

            mana_heal_below_percent: 80,
            mana_heal_min_mana: 30,
            mana_heal_hotkey: "F1".to_string(),
            mana_heal_cooldown_ms: 1_000,

            loot_enabled: true,
            loot_policy: LootPolicy::Oldest,
            loot_max_attempts: 2,
            loot_confirm_ticks: 8,
            loot_failures_before_disable: 3,
            loot_disable_secs: 20,
        }
    }
}

impl PilotTuning {
    pub fn movement(&self) -> MovementTuning {
        MovementTuning {
            max_wait_ticks: self.max_wait_ticks,
            min_stable_ticks: self.min_stable_ticks,
            step_cooldown: Duration::from_millis(self.step_cooldown_ms),
            no_fix_timeout_ticks: self.no_fix_timeout_ticks,
        }
    }

    pub fn heal_confirm(&self) -> Duration {
        Duration::from_millis(self.heal_confirm_ms)
    }

    pub fn heal_disable_for(&self) -> Duration {
        Duration::from_secs(self.heal_disable_secs)
    }

    pub fn combat_max_duration(&self) -> Duration {
        Duration::from_secs(self.combat_max_duration_secs)
    }

    pub fn mana_heal_cooldown(&self) -> Duration {
        Duration::from_millis(self.mana_heal_cooldown_ms)
    }

    pub fn loot_disable_for(&self) -> Duration {
        Duration::from_secs(self.loot_disable_secs)
    }
}
