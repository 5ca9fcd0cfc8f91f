//! [`ManaHeal`] – spend mana on the heal spell.
//!
//! Presses the configured hotkey once, then holds the slot for
//! `mana_heal_cooldown_ms` so the spell's own cooldown is respected before
//! anything else is proposed.

use std::time::Instant;

use tracing::debug;
use waypilot_types::InputAction;

use crate::context::TickContext;
use crate::task::{Behavior, Step};

pub const NAME: &str = "mana_heal";
pub const PRIORITY: i32 = 60;

#[derive(Default)]
pub struct ManaHeal {
    until: Option<Instant>,
}

impl ManaHeal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for ManaHeal {
    fn name(&self) -> &'static str {
        NAME
    }

    fn on_start(&mut self, ctx: &mut TickContext<'_>) -> Step {
        let hotkey = ctx.tuning.mana_heal_hotkey.clone();
        if !ctx.emit(InputAction::Hotkey(hotkey)) {
            return Step::Complete;
        }
        self.until = Some(ctx.now + ctx.tuning.mana_heal_cooldown());
        Step::Continue
    }

    fn execute(&mut self, ctx: &mut TickContext<'_>) -> Step {
        match self.until {
            Some(until) if ctx.now < until => Step::Continue,
            _ => {
                debug!(mana = ctx.snapshot.vitals.mana_percent, "mana heal done");
                Step::Complete
            }
        }
    }
}
