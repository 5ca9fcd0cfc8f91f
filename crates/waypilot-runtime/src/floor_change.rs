//! [`FloorChange`] – one action whose effect is a z-level transition.
//!
//! Stepping onto a ramp, using a rope on a hole or right-clicking a ladder
//! all share the same shape: send the action once, then watch for the
//! player's floor to differ from the floor it started on.  The subtask is
//! critical for that whole window and fails with
//! [`Failure::Unconfirmed`] after `floor_change_timeout_ticks`.  Waiting
//! for a position fix before the action is sent draws on the same budget.

use tracing::{debug, warn};
use waypilot_types::{Direction, InputAction, MouseButton, Tile};

use crate::context::TickContext;
use crate::task::{Failure, Outcome, SubtaskLogic};

/// The action expected to change floors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloorAction {
    Step(Direction),
    UseItem { item: String, target: Tile },
    RightClick { target: Tile },
}

pub struct FloorChange {
    action: FloorAction,
    start_z: Option<i32>,
    issued: bool,
    waited_ticks: u32,
}

impl FloorChange {
    pub fn new(action: FloorAction) -> Self {
        Self {
            action,
            start_z: None,
            issued: false,
            waited_ticks: 0,
        }
    }

    fn input_for(&self, pos: Tile) -> InputAction {
        match &self.action {
            FloorAction::Step(dir) => InputAction::Step(*dir),
            FloorAction::UseItem { item, target } => InputAction::UseItemOn {
                item: item.clone(),
                dx: target.x - pos.x,
                dy: target.y - pos.y,
            },
            FloorAction::RightClick { target } => InputAction::Click {
                dx: target.x - pos.x,
                dy: target.y - pos.y,
                button: MouseButton::Right,
            },
        }
    }
}

impl SubtaskLogic for FloorChange {
    fn name(&self) -> &'static str {
        "floor_change"
    }

    fn execute(&mut self, ctx: &mut TickContext<'_>) -> Outcome {
        let pos = ctx.snapshot.player_tile();

        if !self.issued {
            let Some(pos) = pos else {
                self.waited_ticks += 1;
                if self.waited_ticks >= ctx.tuning.floor_change_timeout_ticks {
                    warn!(action = ?self.action, "no position fix to start floor change");
                    return Outcome::Fail(Failure::Unconfirmed);
                }
                return Outcome::Continue;
            };
            self.waited_ticks = 0;
            if let FloorAction::UseItem { item, .. } = &self.action
                && ctx.snapshot.find_item(item).is_none()
            {
                warn!(item = %item, "floor change item not in inventory");
                return Outcome::Fail(Failure::Unconfirmed);
            }
            self.start_z = Some(pos.z);
            let action = self.input_for(pos);
            if !ctx.emit(action) {
                return Outcome::Fail(Failure::Unconfirmed);
            }
            self.issued = true;
            return Outcome::Continue;
        }

        if let (Some(pos), Some(start_z)) = (pos, self.start_z)
            && pos.z != start_z
        {
            debug!(from = start_z, to = pos.z, "floor change confirmed");
            return Outcome::Succeed;
        }
        self.waited_ticks += 1;
        if self.waited_ticks >= ctx.tuning.floor_change_timeout_ticks {
            warn!(action = ?self.action, waited = self.waited_ticks, "floor change not observed");
            return Outcome::Fail(Failure::Unconfirmed);
        }
        Outcome::Continue
    }

    fn is_critical(&self) -> bool {
        self.issued
    }
}
