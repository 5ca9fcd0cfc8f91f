//! [`TickContext`] – everything a task may touch during one tick.
//!
//! The pilot builds a fresh context each tick from the snapshot and the state
//! it owns, then lends it to the active task, which lends it on to its
//! subtask.  Nothing in here outlives the tick.

use std::time::Instant;

use tracing::{debug, warn};
use waypilot_hal::InputSink;
use waypilot_kernel::{Cooldowns, LootLedger, TargetLedger};
use waypilot_memory::Route;
use waypilot_perception::Pathfinder;
use waypilot_types::{InputAction, WorldSnapshot};

use crate::tuning::PilotTuning;

pub struct TickContext<'a> {
    pub snapshot: &'a WorldSnapshot,
    /// Wall-clock time of this tick.  Tasks never read the clock themselves.
    pub now: Instant,
    pub input: &'a mut dyn InputSink,
    pub ledger: &'a mut TargetLedger,
    pub loot: &'a mut LootLedger,
    pub cooldowns: &'a mut Cooldowns,
    pub route: &'a mut dyn Route,
    pub pathfinder: &'a mut Pathfinder,
    pub tuning: &'a PilotTuning,
}

impl TickContext<'_> {
    /// Send `action` to the input backend.
    ///
    /// Returns `false` when the backend refused it; the failure is logged and
    /// callers treat it like an action whose effect never showed up.
    pub fn emit(&mut self, action: InputAction) -> bool {
        match self.input.dispatch(&action) {
            Ok(()) => {
                debug!(%action, "input sent");
                true
            }
            Err(e) => {
                warn!(%action, error = %e, "input dispatch failed");
                false
            }
        }
    }
}
