//! Relocation subtasks built on the [`MovementController`].
//!
//! | Subtask | Succeeds when | Fails with |
//! |---|---|---|
//! | [`WalkTo`] | player stands on the tile | `Unreachable`, `WrongFloor`, `Unconfirmed` |
//! | [`Approach`] | player is on or next to the target | `Unreachable`, `WrongFloor`, `TargetLost`, `Unconfirmed` |
//!
//! `Unconfirmed` means the position fix stayed missing past
//! `no_fix_timeout_ticks`.

use tracing::debug;
use waypilot_types::{CreatureId, Tile};

use crate::context::TickContext;
use crate::movement::{Goal, MoveStatus, MovementController, MovementTuning};
use crate::task::{Failure, Outcome, SubtaskLogic};

fn outcome_of(status: MoveStatus) -> Outcome {
    match status {
        MoveStatus::Arrived => Outcome::Succeed,
        MoveStatus::Unreachable => Outcome::Fail(Failure::Unreachable),
        MoveStatus::FixLost => Outcome::Fail(Failure::Unconfirmed),
        MoveStatus::Moving | MoveStatus::Waiting | MoveStatus::NoFix => Outcome::Continue,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WalkTo
// ─────────────────────────────────────────────────────────────────────────────

/// Walk onto an exact tile.
pub struct WalkTo {
    goal: Tile,
    movement: MovementController,
}

impl WalkTo {
    pub fn new(goal: Tile, tuning: MovementTuning) -> Self {
        Self {
            goal,
            movement: MovementController::new(tuning),
        }
    }
}

impl SubtaskLogic for WalkTo {
    fn name(&self) -> &'static str {
        "walk_to"
    }

    fn on_start(&mut self, ctx: &mut TickContext<'_>) -> Outcome {
        if ctx.snapshot.player_tile() == Some(self.goal) {
            return Outcome::Succeed;
        }
        self.execute(ctx)
    }

    fn execute(&mut self, ctx: &mut TickContext<'_>) -> Outcome {
        if let Some(pos) = ctx.snapshot.player_tile()
            && pos.z != self.goal.z
        {
            debug!(%pos, goal = %self.goal, "walk target on another floor");
            return Outcome::Fail(Failure::WrongFloor);
        }
        outcome_of(self.movement.tick(ctx, Goal::Exact(self.goal), None))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Approach
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproachTarget {
    Tile(Tile),
    /// Followed through the snapshot every tick; the goal moves with it.
    Creature(CreatureId),
}

/// Get within one tile of a fixed tile or a moving creature.
pub struct Approach {
    target: ApproachTarget,
    movement: MovementController,
}

impl Approach {
    pub fn new(target: ApproachTarget, tuning: MovementTuning) -> Self {
        Self {
            target,
            movement: MovementController::new(tuning),
        }
    }

    fn target_tile(&self, ctx: &TickContext<'_>) -> Option<Tile> {
        match self.target {
            ApproachTarget::Tile(t) => Some(t),
            ApproachTarget::Creature(id) => ctx
                .snapshot
                .creature(id)
                .filter(|c| c.is_alive())
                .map(|c| c.tile),
        }
    }
}

impl SubtaskLogic for Approach {
    fn name(&self) -> &'static str {
        "approach"
    }

    fn on_start(&mut self, ctx: &mut TickContext<'_>) -> Outcome {
        self.execute(ctx)
    }

    fn execute(&mut self, ctx: &mut TickContext<'_>) -> Outcome {
        let Some(tile) = self.target_tile(ctx) else {
            return Outcome::Fail(Failure::TargetLost);
        };
        if let Some(pos) = ctx.snapshot.player_tile()
            && pos.z != tile.z
        {
            return Outcome::Fail(Failure::WrongFloor);
        }
        outcome_of(self.movement.tick(ctx, Goal::Reach(tile), Some(tile)))
    }
}
