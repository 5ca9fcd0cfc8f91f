//! [`Loot`] – quick-loot every reachable corpse on the floor.
//!
//! # Phases
//!
//! ```text
//! Select ──corpse──▶ Approach ──adjacent──▶ Open ──▶ AwaitLooted ──gone──▶ Select
//!   │                   │                     ▲          │
//!   │ none              └─fails─▶ skip        └─timeout──┘ (≤ loot_max_attempts)
//!   ▼
//! Done
//! ```
//!
//! Corpses are picked in [`LootPolicy`] order.  A corpse that cannot be
//! reached, or whose loot is never confirmed within `loot_max_attempts`
//! clicks, is recorded in the [`LootLedger`] and not picked again while it
//! stays on the floor.  After `loot_failures_before_disable` skips without
//! a confirmed loot in between, the behavior disables itself for
//! `loot_disable_secs`.
//!
//! [`LootLedger`]: waypilot_kernel::LootLedger

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};
use waypilot_types::{Corpse, CorpseId, InputAction, MouseButton, WorldSnapshot};

use crate::context::TickContext;
use crate::relocate::{Approach, ApproachTarget};
use crate::task::{Behavior, Failure, Step, Subtask};
use crate::tuning::LootPolicy;

pub const NAME: &str = "loot";
pub const PRIORITY: i32 = 40;

/// Next corpse on the player's floor in `policy` order, skipping `skip`.
pub fn next_corpse<'s>(
    snapshot: &'s WorldSnapshot,
    policy: LootPolicy,
    skip: &HashSet<CorpseId>,
) -> Option<&'s Corpse> {
    let z = snapshot.player_tile()?.z;
    let mut candidates = snapshot
        .corpses
        .iter()
        .filter(|c| c.tile.z == z && !skip.contains(&c.id));
    match policy {
        LootPolicy::Oldest => candidates.next(),
        LootPolicy::Newest => candidates.last(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Select,
    Approach(CorpseId),
    Open(CorpseId),
    AwaitLooted { corpse: CorpseId, waited: u32 },
}

pub struct Loot {
    phase: Phase,
    approach: Option<Subtask>,
    attempts: HashMap<CorpseId, u32>,
    looted: u32,
}

impl Loot {
    pub fn new() -> Self {
        Self {
            phase: Phase::Select,
            approach: None,
            attempts: HashMap::new(),
            looted: 0,
        }
    }

    /// Give up on `corpse`; disable looting once too many were given up.
    fn skip(&mut self, ctx: &mut TickContext<'_>, corpse: CorpseId) -> Step {
        self.approach = None;
        self.attempts.remove(&corpse);
        self.phase = Phase::Select;
        let failures = ctx.loot.skip(corpse);
        if failures >= ctx.tuning.loot_failures_before_disable {
            warn!(failures, "looting keeps failing");
            ctx.cooldowns
                .disable(NAME, ctx.now, ctx.tuning.loot_disable_for());
            ctx.loot.clear_failures();
            return Step::Complete;
        }
        Step::Continue
    }
}

impl Default for Loot {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for Loot {
    fn name(&self) -> &'static str {
        NAME
    }

    fn execute(&mut self, ctx: &mut TickContext<'_>) -> Step {
        let snapshot = ctx.snapshot;
        let tuning = ctx.tuning;

        // A corpse that vanished while being worked on needs no more work.
        let current = match self.phase {
            Phase::Select => None,
            Phase::Approach(id) | Phase::Open(id) | Phase::AwaitLooted { corpse: id, .. } => {
                Some(id)
            }
        };
        if let Some(id) = current
            && snapshot.corpse(id).is_none()
        {
            if matches!(self.phase, Phase::AwaitLooted { .. }) {
                self.looted += 1;
                ctx.loot.clear_failures();
                info!(corpse = id.0, "corpse looted");
            } else {
                debug!(corpse = id.0, "corpse disappeared");
            }
            self.attempts.remove(&id);
            self.approach = None;
            self.phase = Phase::Select;
            return Step::Continue;
        }

        match self.phase {
            Phase::Select => match next_corpse(snapshot, tuning.loot_policy, ctx.loot.skipped()) {
                Some(corpse) => {
                    self.phase = Phase::Approach(corpse.id);
                    Step::Continue
                }
                None => {
                    debug!(looted = self.looted, "nothing left to loot");
                    Step::Complete
                }
            },
            Phase::Approach(id) => {
                let Some(corpse) = snapshot.corpse(id) else {
                    return Step::Continue;
                };
                let tile = corpse.tile;
                let sub = self.approach.get_or_insert_with(|| {
                    Subtask::new(Approach::new(ApproachTarget::Tile(tile), tuning.movement()))
                });
                sub.tick(ctx);
                match sub.result() {
                    None => Step::Continue,
                    Some(Ok(())) => {
                        self.approach = None;
                        self.phase = Phase::Open(id);
                        Step::Continue
                    }
                    Some(Err(Failure::Unconfirmed)) => {
                        warn!(corpse = id.0, "position lost while approaching corpse");
                        self.approach = None;
                        Step::Complete
                    }
                    Some(Err(reason)) => {
                        warn!(corpse = id.0, %reason, "cannot reach corpse");
                        self.skip(ctx, id)
                    }
                }
            }
            Phase::Open(id) => {
                let (Some(corpse), Some(pos)) = (snapshot.corpse(id), snapshot.player_tile())
                else {
                    // Without a fix the approach subtask owns the wait and its
                    // budget.
                    self.phase = Phase::Approach(id);
                    return Step::Continue;
                };
                if corpse.tile != pos && !corpse.tile.is_adjacent(&pos) {
                    self.phase = Phase::Approach(id);
                    return Step::Continue;
                }
                ctx.emit(InputAction::Click {
                    dx: corpse.tile.x - pos.x,
                    dy: corpse.tile.y - pos.y,
                    button: MouseButton::Right,
                });
                *self.attempts.entry(id).or_insert(0) += 1;
                self.phase = Phase::AwaitLooted {
                    corpse: id,
                    waited: 0,
                };
                Step::Continue
            }
            Phase::AwaitLooted { corpse, waited } => {
                let waited = waited + 1;
                if waited < tuning.loot_confirm_ticks {
                    self.phase = Phase::AwaitLooted { corpse, waited };
                    return Step::Continue;
                }
                let attempts = self.attempts.get(&corpse).copied().unwrap_or(0);
                if attempts >= tuning.loot_max_attempts {
                    return self.skip(ctx, corpse);
                }
                self.phase = Phase::Open(corpse);
                Step::Continue
            }
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self.phase, Phase::AwaitLooted { .. })
            || self.approach.as_ref().is_some_and(Subtask::is_critical)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::context::harness::Harness;
    use crate::task::Task;
    use waypilot_types::Tile;

    fn corpse(id: u64, tile: Tile) -> Corpse {
        Corpse {
            id: CorpseId(id),
            tile,
        }
    }

    #[test]
    fn policy_order_and_floor_filter() {
        let mut h = Harness::open(5, 5, Tile::new(0, 0, 7));
        h.snapshot.corpses = vec![
            corpse(1, Tile::new(1, 1, 6)),
            corpse(2, Tile::new(1, 1, 7)),
            corpse(3, Tile::new(2, 2, 7)),
        ];
        let none = HashSet::new();
        let oldest = next_corpse(&h.snapshot, LootPolicy::Oldest, &none).map(|c| c.id);
        let newest = next_corpse(&h.snapshot, LootPolicy::Newest, &none).map(|c| c.id);
        assert_eq!(oldest, Some(CorpseId(2)));
        assert_eq!(newest, Some(CorpseId(3)));
        let skip: HashSet<_> = [CorpseId(2)].into();
        assert_eq!(
            next_corpse(&h.snapshot, LootPolicy::Oldest, &skip).map(|c| c.id),
            Some(CorpseId(3))
        );
    }

    #[test]
    fn adjacent_corpse_is_right_clicked_and_confirmed() {
        let mut h = Harness::open(5, 5, Tile::new(1, 1, 7));
        h.snapshot.corpses = vec![corpse(1, Tile::new(1, 2, 7))];
        let mut task = Task::new(PRIORITY, Loot::new());
        task.tick(&mut h.ctx()); // start
        task.tick(&mut h.ctx()); // select
        task.tick(&mut h.ctx()); // approach: adjacent
        task.tick(&mut h.ctx()); // open
        assert_eq!(
            h.input.actions(),
            &[InputAction::Click {
                dx: 0,
                dy: 1,
                button: MouseButton::Right,
            }]
        );
        assert!(task.is_critical());
        h.snapshot.corpses.clear();
        task.tick(&mut h.ctx()); // gone → select
        task.tick(&mut h.ctx()); // nothing left
        assert!(task.is_completed());
        assert!(!h.cooldowns.is_disabled(NAME, h.now));
    }

    #[test]
    fn stubborn_corpse_is_retried_then_skipped() {
        let mut h = Harness::open(5, 5, Tile::new(1, 1, 7));
        h.snapshot.corpses = vec![corpse(1, Tile::new(1, 2, 7))];
        let mut task = Task::new(PRIORITY, Loot::new());
        for _ in 0..100 {
            task.tick(&mut h.ctx());
            if task.is_completed() {
                break;
            }
        }
        assert!(task.is_completed());
        assert_eq!(h.input.actions().len(), 2);
        assert!(h.loot.is_skipped(CorpseId(1)));
        assert!(!h.cooldowns.is_disabled(NAME, h.now));
    }

    #[test]
    fn corpse_skipped_by_one_task_is_left_alone_by_the_next() {
        let mut h = Harness::open(5, 5, Tile::new(1, 1, 7));
        h.snapshot.corpses = vec![corpse(1, Tile::new(1, 2, 7))];
        h.loot.skip(CorpseId(1));
        let mut task = Task::new(PRIORITY, Loot::new());
        task.tick(&mut h.ctx()); // start
        task.tick(&mut h.ctx()); // select: nothing eligible
        assert!(task.is_completed());
        assert!(h.input.actions().is_empty());
    }

    #[test]
    fn failure_streak_spans_tasks() {
        let mut h = Harness::open(6, 6, Tile::new(1, 1, 7));
        h.tuning.loot_failures_before_disable = 2;
        h.snapshot.corpses = vec![corpse(1, Tile::new(1, 2, 7))];
        let mut first = Task::new(PRIORITY, Loot::new());
        for _ in 0..100 {
            first.tick(&mut h.ctx());
            if first.is_completed() {
                break;
            }
        }
        assert!(first.is_completed());
        assert!(!h.cooldowns.is_disabled(NAME, h.now));

        h.snapshot.corpses.push(corpse(2, Tile::new(2, 1, 7)));
        let mut second = Task::new(PRIORITY, Loot::new());
        for _ in 0..100 {
            second.tick(&mut h.ctx());
            if second.is_completed() {
                break;
            }
        }
        assert!(second.is_completed());
        assert_eq!(h.input.actions().len(), 4);
        assert!(h.cooldowns.is_disabled(NAME, h.now));
        // The streak starts over once looting is disabled.
        assert_eq!(h.loot.skip(CorpseId(9)), 1);
    }

    #[test]
    fn repeated_failures_disable_looting() {
        let mut h = Harness::open(6, 6, Tile::new(1, 1, 7));
        h.snapshot.corpses = vec![
            corpse(1, Tile::new(1, 2, 7)),
            corpse(2, Tile::new(2, 1, 7)),
            corpse(3, Tile::new(2, 2, 7)),
            corpse(4, Tile::new(0, 0, 7)),
        ];
        let mut task = Task::new(PRIORITY, Loot::new());
        for _ in 0..300 {
            task.tick(&mut h.ctx());
            if task.is_completed() {
                break;
            }
        }
        assert!(task.is_completed());
        // Three corpses × two attempts, the fourth never touched.
        assert_eq!(h.input.actions().len(), 6);
        assert!(h.cooldowns.is_disabled(NAME, h.now + Duration::from_secs(19)));
    }
}
