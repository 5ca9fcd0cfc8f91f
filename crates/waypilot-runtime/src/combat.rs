//! [`Combat`] – engage the nearest attackable creature until none is left.
//!
//! # Phases
//!
//! | Phase | Action | Leaves when |
//! |---|---|---|
//! | `Approach` | [`Approach`] subtask toward the target | adjacent, or the subtask fails |
//! | `Attack` | left-click the target once | always, to `AwaitTarget` |
//! | `AwaitTarget` | wait for the `targeted` flag (critical) | flag set, or `attack_confirm_ticks` elapse |
//! | `Fighting` | nothing; the game does the hitting | target dies, moves away or is untargeted |
//!
//! An unconfirmed attack counts against the creature in the
//! [`TargetLedger`][waypilot_kernel::TargetLedger]; at
//! `max_attack_failures` it is ignored for good.  When the target disappears
//! the task reacquires the next best one, or completes.  A fight longer than
//! `combat_max_duration_secs` ignores the current target and completes.
//! Losing the position fix sends the task back to `Approach`, whose
//! movement budget ends it if the fix does not return.

use std::time::Instant;

use tracing::{debug, info, warn};
use waypilot_kernel::TargetLedger;
use waypilot_types::{Creature, CreatureId, InputAction, MouseButton, WorldSnapshot};

use crate::context::TickContext;
use crate::relocate::{Approach, ApproachTarget};
use crate::task::{Behavior, Failure, Step, Subtask};

pub const NAME: &str = "combat";
pub const PRIORITY: i32 = 80;

/// Nearest live creature on the player's floor that is neither whitelisted
/// nor ignored.  Ties go to the lower id.
pub fn best_target<'s>(
    snapshot: &'s WorldSnapshot,
    ledger: &TargetLedger,
) -> Option<&'s Creature> {
    let pos = snapshot.player_tile()?;
    snapshot
        .creatures
        .iter()
        .filter(|c| c.is_alive() && c.tile.z == pos.z)
        .filter(|c| !c.whitelisted && !ledger.is_ignored(c.id))
        .min_by_key(|c| (c.tile.manhattan(&pos), c.id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Approach,
    Attack,
    AwaitTarget { waited: u32 },
    Fighting,
}

pub struct Combat {
    target: Option<CreatureId>,
    phase: Phase,
    approach: Option<Subtask>,
    started_at: Option<Instant>,
}

impl Combat {
    pub fn new() -> Self {
        Self {
            target: None,
            phase: Phase::Approach,
            approach: None,
            started_at: None,
        }
    }

    /// Switch to the next best target, or report that none is left.
    fn reacquire(&mut self, ctx: &TickContext<'_>) -> Step {
        self.approach = None;
        self.phase = Phase::Approach;
        match best_target(ctx.snapshot, ctx.ledger) {
            Some(c) => {
                debug!(creature = c.id.0, tile = %c.tile, "target acquired");
                self.target = Some(c.id);
                Step::Continue
            }
            None => {
                self.target = None;
                Step::Complete
            }
        }
    }

    fn approach_step(&mut self, ctx: &mut TickContext<'_>, id: CreatureId) -> Step {
        let sub = self.approach.get_or_insert_with(|| {
            Subtask::new(Approach::new(
                ApproachTarget::Creature(id),
                ctx.tuning.movement(),
            ))
        });
        sub.tick(ctx);
        let Some(result) = sub.result().cloned() else {
            return Step::Continue;
        };
        self.approach = None;
        match result {
            Ok(()) => {
                self.phase = Phase::Attack;
                Step::Continue
            }
            Err(Failure::TargetLost) => self.reacquire(ctx),
            Err(Failure::Unconfirmed) => {
                warn!(creature = id.0, "position lost while approaching");
                Step::Complete
            }
            Err(reason) => {
                warn!(creature = id.0, %reason, "cannot reach target");
                ctx.ledger.record_failure(id, ctx.tuning.max_attack_failures);
                Step::Complete
            }
        }
    }
}

impl Default for Combat {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for Combat {
    fn name(&self) -> &'static str {
        NAME
    }

    fn on_start(&mut self, ctx: &mut TickContext<'_>) -> Step {
        self.started_at = Some(ctx.now);
        self.reacquire(ctx)
    }

    fn execute(&mut self, ctx: &mut TickContext<'_>) -> Step {
        let Some(id) = self.target else {
            return self.reacquire(ctx);
        };

        if let Some(start) = self.started_at
            && ctx.now.duration_since(start) >= ctx.tuning.combat_max_duration()
        {
            warn!(creature = id.0, "combat took too long, ignoring target");
            ctx.ledger.ignore(id);
            return Step::Complete;
        }

        let snapshot = ctx.snapshot;
        let Some(creature) = snapshot.creature(id).filter(|c| c.is_alive()) else {
            info!(creature = id.0, "target gone");
            return self.reacquire(ctx);
        };
        if self.phase == Phase::Approach {
            return self.approach_step(ctx, id);
        }
        let Some(pos) = snapshot.player_tile() else {
            debug!(creature = id.0, "no position fix, approaching again");
            self.phase = Phase::Approach;
            return Step::Continue;
        };

        match self.phase {
            Phase::Approach => self.approach_step(ctx, id),
            Phase::Attack => {
                if !creature.tile.is_adjacent(&pos) {
                    self.phase = Phase::Approach;
                    return Step::Continue;
                }
                if creature.targeted {
                    self.phase = Phase::Fighting;
                    return Step::Continue;
                }
                ctx.emit(InputAction::Click {
                    dx: creature.tile.x - pos.x,
                    dy: creature.tile.y - pos.y,
                    button: MouseButton::Left,
                });
                self.phase = Phase::AwaitTarget { waited: 0 };
                Step::Continue
            }
            Phase::AwaitTarget { waited } => {
                if creature.targeted {
                    ctx.ledger.clear_failures(id);
                    self.phase = Phase::Fighting;
                    return Step::Continue;
                }
                let waited = waited + 1;
                if waited < ctx.tuning.attack_confirm_ticks {
                    self.phase = Phase::AwaitTarget { waited };
                    return Step::Continue;
                }
                if ctx.ledger.record_failure(id, ctx.tuning.max_attack_failures) {
                    return self.reacquire(ctx);
                }
                self.phase = Phase::Attack;
                Step::Continue
            }
            Phase::Fighting => {
                if !creature.tile.is_adjacent(&pos) {
                    self.phase = Phase::Approach;
                } else if !creature.targeted {
                    self.phase = Phase::Attack;
                }
                Step::Continue
            }
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self.phase, Phase::AwaitTarget { .. })
            || self.approach.as_ref().is_some_and(Subtask::is_critical)
    }
}
