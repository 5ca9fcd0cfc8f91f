//! [`TargetLedger`] – the two targeting accumulators kept across ticks.
//!
//! | Accumulator | Written by | Read by |
//! |---|---|---|
//! | ignored creature ids | combat (failure threshold, duration cap) | policy target selection |
//! | failed attacks per id | combat (unconfirmed attack) | the threshold check itself |
//!
//! Both are only touched from inside one tick's synchronous call chain, so
//! no locking is needed.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};
use waypilot_types::CreatureId;

#[derive(Debug, Default, Clone)]
pub struct TargetLedger {
    ignored: HashSet<CreatureId>,
    failed_attacks: HashMap<CreatureId, u32>,
}

impl TargetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ignored(&self, id: CreatureId) -> bool {
        self.ignored.contains(&id)
    }

    /// Exclude `id` from targeting until [`reset`][Self::reset].
    pub fn ignore(&mut self, id: CreatureId) {
        if self.ignored.insert(id) {
            info!(creature = id.0, "creature ignored");
        }
    }

    /// Count one unconfirmed attack on `id`.
    ///
    /// Once the count reaches `threshold` the creature is ignored and `true`
    /// is returned.
    pub fn record_failure(&mut self, id: CreatureId, threshold: u32) -> bool {
        let count = self.failed_attacks.entry(id).or_insert(0);
        *count += 1;
        debug!(creature = id.0, failures = *count, "attack not confirmed");
        if *count >= threshold {
            self.ignore(id);
            true
        } else {
            false
        }
    }

    /// Forget the failure count of `id` (a confirmed attack).
    pub fn clear_failures(&mut self, id: CreatureId) {
        self.failed_attacks.remove(&id);
    }

    /// Number of creatures excluded from targeting (reported by `/run`).
    pub fn ignored_count(&self) -> usize {
        self.ignored.len()
    }

    pub fn reset(&mut self) {
        self.ignored.clear();
        self.failed_attacks.clear();
    }
}
