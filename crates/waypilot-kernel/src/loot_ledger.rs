//! [`LootLedger`] – corpses given up on, kept across loot tasks.
//!
//! A loot task lives only until nothing is left to loot, but a corpse that
//! could not be reached or opened stays on the floor.  Remembering the skip
//! here keeps the next loot task (and the policy trigger) from picking the
//! same corpse again, and lets the failure streak that disables looting
//! span several tasks.

use std::collections::HashSet;

use tracing::debug;
use waypilot_types::CorpseId;

#[derive(Debug, Default, Clone)]
pub struct LootLedger {
    skipped: HashSet<CorpseId>,
    /// Corpses skipped since the last confirmed loot or disable.
    failures: u32,
}

impl LootLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_skipped(&self, id: CorpseId) -> bool {
        self.skipped.contains(&id)
    }

    pub fn skipped(&self) -> &HashSet<CorpseId> {
        &self.skipped
    }

    /// Give up on `id` and return the current failure streak.
    ///
    /// Skipping a corpse that is already skipped does not lengthen the
    /// streak.
    pub fn skip(&mut self, id: CorpseId) -> u32 {
        if self.skipped.insert(id) {
            self.failures += 1;
        }
        debug!(corpse = id.0, failures = self.failures, "corpse skipped");
        self.failures
    }

    /// Restart the streak (a corpse was looted, or looting was disabled).
    /// Skipped corpses stay skipped.
    pub fn clear_failures(&mut self) {
        self.failures = 0;
    }

    /// Forget skips for corpses no longer present.
    pub fn retain_visible<I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = CorpseId>,
    {
        if self.skipped.is_empty() {
            return;
        }
        let visible: HashSet<CorpseId> = visible.into_iter().collect();
        self.skipped.retain(|id| visible.contains(id));
    }

    pub fn reset(&mut self) {
        self.skipped.clear();
        self.failures = 0;
    }
}
