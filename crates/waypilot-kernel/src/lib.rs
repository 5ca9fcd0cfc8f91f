//! `waypilot-kernel` – cross-tick rule state.
//!
//! Snapshots are replaced wholesale every tick.  The few facts that must
//! survive from one tick to the next live here, owned by the pilot and lent
//! to the active task through its context.
//!
//! # Modules
//!
//! - [`target_ledger`] – [`TargetLedger`][target_ledger::TargetLedger]:
//!   creatures excluded from targeting and the failed-attack counter per
//!   creature that feeds the exclusion.
//! - [`loot_ledger`] – [`LootLedger`][loot_ledger::LootLedger]: corpses
//!   given up on and the failure streak that disables looting.
//! - [`cooldown`] – [`Cooldowns`][cooldown::Cooldowns]: timed disable
//!   windows for behaviors that keep failing (no potion found, loot never
//!   confirmed), so a broken behavior cannot loop forever.

pub mod cooldown;
pub mod loot_ledger;
pub mod target_ledger;

pub use cooldown::Cooldowns;
pub use loot_ledger::LootLedger;
pub use target_ledger::TargetLedger;
