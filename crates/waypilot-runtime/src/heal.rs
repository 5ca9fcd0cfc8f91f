//! [`EmergencyHeal`] – drink a potion when health is low.
//!
//! # Phases
//!
//! ```text
//! Locate ──found──▶ Use ──▶ Await ──healed──▶ Done
//!   │                        │
//!   │ missing                └─timeout─▶ Locate (miss)
//!   ▼
//! OpenContainer ──▶ Recheck ──found──▶ Use
//!   │                  └─timeout─▶ OpenContainer (miss)
//!   └─nothing left to open─▶ disabled
//! ```
//!
//! Every miss counts toward `heal_max_attempts`; reaching it disables the
//! behavior through [`Cooldowns`][waypilot_kernel::Cooldowns] for
//! `heal_disable_secs`, and the task completes.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info, warn};
use waypilot_types::{InputAction, SlotRef};

use crate::context::TickContext;
use crate::task::{Behavior, Step};

pub const NAME: &str = "emergency_heal";
pub const PRIORITY: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Locate,
    Use(SlotRef),
    Await {
        deadline: Instant,
        health_before: u8,
        count_before: u32,
    },
    OpenContainer,
    Recheck {
        deadline: Instant,
    },
}

pub struct EmergencyHeal {
    phase: Phase,
    misses: u32,
    opened: HashSet<SlotRef>,
}

impl EmergencyHeal {
    pub fn new() -> Self {
        Self {
            phase: Phase::Locate,
            misses: 0,
            opened: HashSet::new(),
        }
    }

    /// Count a miss; on exhaustion disable the behavior and finish.
    fn miss(&mut self, ctx: &mut TickContext<'_>, next: Phase) -> Step {
        self.misses += 1;
        if self.misses >= ctx.tuning.heal_max_attempts {
            warn!(misses = self.misses, "emergency heal exhausted");
            ctx.cooldowns
                .disable(NAME, ctx.now, ctx.tuning.heal_disable_for());
            return Step::Complete;
        }
        self.phase = next;
        Step::Continue
    }
}

impl Default for EmergencyHeal {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for EmergencyHeal {
    fn name(&self) -> &'static str {
        NAME
    }

    fn execute(&mut self, ctx: &mut TickContext<'_>) -> Step {
        let tuning = ctx.tuning;
        let potion = tuning.heal_potion.as_str();
        match self.phase {
            Phase::Locate => {
                if ctx.snapshot.vitals.health_percent >= ctx.tuning.heal_below_percent {
                    debug!("health recovered before healing");
                    return Step::Complete;
                }
                self.phase = match ctx.snapshot.find_item(potion) {
                    Some(slot) => Phase::Use(slot.slot),
                    None => Phase::OpenContainer,
                };
                Step::Continue
            }
            Phase::Use(slot) => {
                let health_before = ctx.snapshot.vitals.health_percent;
                let count_before = ctx.snapshot.item_count(potion);
                if !ctx.emit(InputAction::UseSlot { slot }) {
                    return self.miss(ctx, Phase::Locate);
                }
                self.phase = Phase::Await {
                    deadline: ctx.now + ctx.tuning.heal_confirm(),
                    health_before,
                    count_before,
                };
                Step::Continue
            }
            Phase::Await {
                deadline,
                health_before,
                count_before,
            } => {
                let healed = ctx.snapshot.vitals.health_percent > health_before
                    || ctx.snapshot.item_count(potion) < count_before;
                if healed {
                    info!(
                        health = ctx.snapshot.vitals.health_percent,
                        "emergency heal confirmed"
                    );
                    return Step::Complete;
                }
                if ctx.now >= deadline {
                    return self.miss(ctx, Phase::Locate);
                }
                Step::Continue
            }
            Phase::OpenContainer => {
                let closed = ctx
                    .snapshot
                    .inventory
                    .iter()
                    .find(|s| s.is_container && !self.opened.contains(&s.slot))
                    .map(|s| s.slot);
                let Some(slot) = closed else {
                    warn!(item = potion, "no potion and nothing left to open");
                    ctx.cooldowns
                        .disable(NAME, ctx.now, ctx.tuning.heal_disable_for());
                    return Step::Complete;
                };
                self.opened.insert(slot);
                if !ctx.emit(InputAction::OpenContainer { slot }) {
                    return self.miss(ctx, Phase::OpenContainer);
                }
                self.phase = Phase::Recheck {
                    deadline: ctx.now + ctx.tuning.heal_confirm(),
                };
                Step::Continue
            }
            Phase::Recheck { deadline } => {
                if let Some(slot) = ctx.snapshot.find_item(potion) {
                    self.phase = Phase::Use(slot.slot);
                    return Step::Continue;
                }
                if ctx.now >= deadline {
                    return self.miss(ctx, Phase::OpenContainer);
                }
                Step::Continue
            }
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self.phase, Phase::Await { .. })
    }
}
