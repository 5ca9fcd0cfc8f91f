//! [`Pilot`] – the per-tick driver tying policy, orchestrator and state
//! together.
//!
//! ```text
//! snapshot ──▶ PriorityPolicy::propose ──▶ Orchestrator::propose
//!                                               │
//!                                               ▼
//!                               Orchestrator::tick(TickContext)
//!                                               │
//!                                               ▼
//!                                          TickReport
//! ```
//!
//! The host owns the input backend and the route; the pilot owns everything
//! that must survive between ticks (ledgers, cooldowns, pathfinder scratch
//! space, the active task).

use std::time::Instant;

use tracing::instrument;
use waypilot_hal::InputSink;
use waypilot_kernel::{Cooldowns, LootLedger, TargetLedger};
use waypilot_memory::Route;
use waypilot_perception::Pathfinder;
use waypilot_types::WorldSnapshot;

use crate::context::TickContext;
use crate::orchestrator::{Orchestrator, Proposal};
use crate::policy::PriorityPolicy;
use crate::tuning::PilotTuning;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Name of the active task after the tick, if one is still running.
    pub active: Option<&'static str>,
    pub proposal: Proposal,
    /// Whether an action is awaiting its observable effect.
    pub critical: bool,
}

#[derive(Debug)]
pub struct Pilot {
    orchestrator: Orchestrator,
    policy: PriorityPolicy,
    ledger: TargetLedger,
    loot: LootLedger,
    cooldowns: Cooldowns,
    pathfinder: Pathfinder,
    tuning: PilotTuning,
    ticks: u64,
}

impl Pilot {
    pub fn new(tuning: PilotTuning) -> Self {
        Self {
            orchestrator: Orchestrator::new(),
            policy: PriorityPolicy::new(tuning.clone()),
            ledger: TargetLedger::new(),
            loot: LootLedger::new(),
            cooldowns: Cooldowns::new(),
            pathfinder: Pathfinder::default(),
            tuning,
            ticks: 0,
        }
    }

    /// Run one scheduling tick against `snapshot`.
    #[instrument(level = "debug", skip_all, fields(tick = self.ticks))]
    pub fn tick(
        &mut self,
        snapshot: &WorldSnapshot,
        now: Instant,
        input: &mut dyn InputSink,
        route: &mut dyn Route,
    ) -> TickReport {
        self.ticks += 1;
        self.loot.retain_visible(snapshot.corpses.iter().map(|c| c.id));
        let candidate = self.policy.propose(
            snapshot,
            &self.ledger,
            &self.loot,
            &self.cooldowns,
            &*route,
            now,
        );
        let proposal = self.orchestrator.propose(candidate);

        let mut ctx = TickContext {
            snapshot,
            now,
            input,
            ledger: &mut self.ledger,
            loot: &mut self.loot,
            cooldowns: &mut self.cooldowns,
            route,
            pathfinder: &mut self.pathfinder,
            tuning: &self.tuning,
        };
        self.orchestrator.tick(&mut ctx);

        TickReport {
            active: self.orchestrator.active().map(|t| t.name()),
            proposal,
            critical: self.orchestrator.active_is_critical(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.orchestrator.active_is_critical()
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn ledger(&self) -> &TargetLedger {
        &self.ledger
    }

    pub fn loot_ledger(&self) -> &LootLedger {
        &self.loot
    }

    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    pub fn tuning(&self) -> &PilotTuning {
        &self.tuning
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Drop the active task and forget all cross-tick state.
    pub fn reset(&mut self) {
        self.orchestrator.clear();
        self.ledger.reset();
        self.loot.reset();
        self.cooldowns.reset();
        self.ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypilot_hal::RecordingInput;
    use waypilot_memory::PathRepository;
    use waypilot_types::{InputAction, PlayerFix, Tile, Vitals, Waypoint};

    fn snapshot(health: u8) -> WorldSnapshot {
        WorldSnapshot {
            player: Some(PlayerFix {
                tile: Tile::new(1, 1, 7),
                confidence: 1.0,
            }),
            vitals: Vitals {
                health_percent: health,
                mana_percent: 0,
            },
            ..WorldSnapshot::default()
        }
    }

    #[test]
    fn idle_without_anything_to_do() {
        let mut pilot = Pilot::new(PilotTuning::default());
        let mut input = RecordingInput::new();
        let mut route = PathRepository::default();
        let report = pilot.tick(&snapshot(100), Instant::now(), &mut input, &mut route);
        assert_eq!(
            report,
            TickReport {
                active: None,
                proposal: Proposal::Ignored,
                critical: false,
            }
        );
        assert_eq!(pilot.ticks(), 1);
    }

    #[test]
    fn adopts_and_runs_follow_path() {
        let mut pilot = Pilot::new(PilotTuning::default());
        let mut input = RecordingInput::new();
        let mut route = PathRepository::new(vec![Waypoint::Step {
            tile: Tile::new(1, 1, 7),
            direction: waypilot_types::Direction::South,
        }]);
        let s = snapshot(100);
        let now = Instant::now();
        let first = pilot.tick(&s, now, &mut input, &mut route);
        assert_eq!(first.proposal, Proposal::Adopted);
        assert_eq!(first.active, Some("follow_path"));
        let second = pilot.tick(&s, now, &mut input, &mut route);
        assert_eq!(second.proposal, Proposal::Rejected);
        pilot.tick(&s, now, &mut input, &mut route);
        let issued = pilot.tick(&s, now, &mut input, &mut route);
        assert_eq!(
            input.actions(),
            &[InputAction::Step(waypilot_types::Direction::South)]
        );
        assert!(issued.critical);
        assert!(pilot.is_critical());
    }

    #[test]
    fn reset_clears_active_task() {
        let mut pilot = Pilot::new(PilotTuning::default());
        let mut input = RecordingInput::new();
        let mut route = PathRepository::default();
        pilot.tick(&snapshot(10), Instant::now(), &mut input, &mut route);
        assert!(pilot.orchestrator().active().is_some());
        pilot.reset();
        assert!(pilot.orchestrator().active().is_none());
        assert_eq!(pilot.ticks(), 0);
    }
}
