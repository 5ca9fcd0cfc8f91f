//! Discrete-step movement with arrival confirmation.
//!
//! The only feedback about movement is the next snapshot's player position,
//! which arrives late and is sometimes wrong.  [`MovementController`] issues
//! at most one step per planning cycle and refuses to issue another until
//! the world has caught up.
//!
//! # Per-tick protocol
//!
//! 1. **Expectation.**  If a step is outstanding and the player now stands
//!    on the expected tile, the step is confirmed.  Otherwise the wait
//!    counter grows; past `max_wait_ticks` the expectation is dropped (a
//!    silently failed step) and planning resumes on the next tick.
//! 2. **Stability.**  An unchanged position increments `stable_ticks`; any
//!    change resets it.  Stepping needs `min_stable_ticks`.
//! 3. **Plan.**  With nothing outstanding, a stable position and the step
//!    cooldown elapsed: rebuild the walkability view, plan, and emit one
//!    step toward the second tile of the path.
//!
//! A tick without a position fix reports [`MoveStatus::NoFix`].  Once more
//! than `no_fix_timeout_ticks` of them arrive in a row the controller
//! reports [`MoveStatus::FixLost`] instead.
//!
//! The controller never fails on its own; it reports a [`MoveStatus`] and the
//! owning subtask decides what that means.

use std::time::{Duration, Instant};

use tracing::{debug, trace};
use waypilot_perception::WalkabilityView;
use waypilot_types::{InputAction, Tile};

use crate::context::TickContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementTuning {
    pub max_wait_ticks: u32,
    pub min_stable_ticks: u32,
    pub step_cooldown: Duration,
    pub no_fix_timeout_ticks: u32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            max_wait_ticks: 6,
            min_stable_ticks: 1,
            step_cooldown: Duration::from_millis(150),
            no_fix_timeout_ticks: 40,
        }
    }
}

/// Where a relocation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Stand exactly on the tile.
    Exact(Tile),
    /// Stand on the tile or any of its eight neighbours.
    Reach(Tile),
}

impl Goal {
    pub fn tile(&self) -> Tile {
        match *self {
            Goal::Exact(t) | Goal::Reach(t) => t,
        }
    }

    pub fn is_met_at(&self, pos: Tile) -> bool {
        match *self {
            Goal::Exact(t) => pos == t,
            Goal::Reach(t) => pos == t || pos.is_adjacent(&t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    Arrived,
    /// A step was emitted this tick.
    Moving,
    /// Blocked on a confirmation, stability or cooldown gate.
    Waiting,
    Unreachable,
    /// The player's position is unknown this tick.
    NoFix,
    /// The position has been unknown for longer than `no_fix_timeout_ticks`.
    FixLost,
}

#[derive(Debug, Clone, Default)]
pub struct MovementController {
    tuning: MovementTuning,
    expected: Option<Tile>,
    waited_ticks: u32,
    next_step_at: Option<Instant>,
    last_position: Option<Tile>,
    stable_ticks: u32,
    no_fix_ticks: u32,
}

impl MovementController {
    pub fn new(tuning: MovementTuning) -> Self {
        Self {
            tuning,
            ..Self::default()
        }
    }

    /// The tile the last step should have landed on, while unconfirmed.
    pub fn expected(&self) -> Option<Tile> {
        self.expected
    }

    /// Run one tick of the protocol toward `goal`.
    ///
    /// `exempt` is an occupied tile the planner may path into, typically the
    /// creature being approached.
    pub fn tick(
        &mut self,
        ctx: &mut TickContext<'_>,
        goal: Goal,
        exempt: Option<Tile>,
    ) -> MoveStatus {
        let Some(pos) = ctx.snapshot.player_tile() else {
            self.last_position = None;
            self.stable_ticks = 0;
            self.no_fix_ticks = self.no_fix_ticks.saturating_add(1);
            if self.no_fix_ticks > self.tuning.no_fix_timeout_ticks {
                debug!(ticks = self.no_fix_ticks, "no position fix, giving up");
                return MoveStatus::FixLost;
            }
            return MoveStatus::NoFix;
        };
        self.no_fix_ticks = 0;

        if self.last_position == Some(pos) {
            self.stable_ticks = self.stable_ticks.saturating_add(1);
        } else {
            self.last_position = Some(pos);
            self.stable_ticks = 0;
        }

        if goal.is_met_at(pos) {
            self.expected = None;
            self.waited_ticks = 0;
            return MoveStatus::Arrived;
        }

        if let Some(expected) = self.expected {
            if pos == expected {
                trace!(%pos, "step confirmed");
                self.expected = None;
                self.waited_ticks = 0;
            } else {
                self.waited_ticks += 1;
                if self.waited_ticks > self.tuning.max_wait_ticks {
                    debug!(%expected, %pos, waited = self.waited_ticks, "step unconfirmed, replanning");
                    self.expected = None;
                    self.waited_ticks = 0;
                }
                return MoveStatus::Waiting;
            }
        }

        if self.stable_ticks < self.tuning.min_stable_ticks {
            return MoveStatus::Waiting;
        }
        if self.next_step_at.is_some_and(|t| ctx.now < t) {
            return MoveStatus::Waiting;
        }

        let Some(floor) = ctx.snapshot.floor_for(pos.z) else {
            return MoveStatus::Unreachable;
        };
        let mut blockers: Vec<Tile> = ctx
            .snapshot
            .creatures
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| c.tile)
            .collect();
        if ctx.tuning.corpses_block {
            blockers.extend(ctx.snapshot.corpses.iter().map(|c| c.tile));
        }
        let view = WalkabilityView::with_blockers(floor, blockers, exempt);
        let path = ctx.pathfinder.find_path(&view, pos, goal.tile());
        let Some(dir) = path.get(1).and_then(|next| pos.direction_to(next)) else {
            return MoveStatus::Unreachable;
        };

        self.next_step_at = Some(ctx.now + self.tuning.step_cooldown);
        if ctx.emit(InputAction::Step(dir)) {
            self.expected = Some(path[1]);
            self.waited_ticks = 0;
        }
        MoveStatus::Moving
    }
}
