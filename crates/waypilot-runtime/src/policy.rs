//! [`PriorityPolicy`] – decides which root task to offer each tick.
//!
//! Behaviors are checked in fixed priority order and the first one whose
//! trigger holds is returned as a fresh [`Task`]:
//!
//! | Priority | Behavior | Trigger |
//! |---|---|---|
//! | 100 | emergency heal | health below `heal_below_percent` |
//! | 80 | combat | `combat_enabled` and an attackable creature on the floor |
//! | 60 | mana heal | health below `mana_heal_below_percent` and mana at least `mana_heal_min_mana` |
//! | 40 | loot | `loot_enabled` and a corpse on the player's floor not yet given up on |
//! | 20 | follow path | the route has a current waypoint |
//!
//! A behavior whose [`Cooldowns`] window is open is skipped, so the next one
//! down gets its turn.

use std::time::Instant;

use tracing::trace;
use waypilot_kernel::{Cooldowns, LootLedger, TargetLedger};
use waypilot_memory::Route;
use waypilot_types::WorldSnapshot;

use crate::combat::{self, Combat};
use crate::follow_path::{self, FollowPath};
use crate::heal::{self, EmergencyHeal};
use crate::loot::{self, Loot};
use crate::mana_heal::{self, ManaHeal};
use crate::task::Task;
use crate::tuning::PilotTuning;

#[derive(Debug, Clone)]
pub struct PriorityPolicy {
    tuning: PilotTuning,
}

impl PriorityPolicy {
    pub fn new(tuning: PilotTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &PilotTuning {
        &self.tuning
    }

    /// The highest-priority task whose trigger holds, if any.
    pub fn propose(
        &self,
        snapshot: &WorldSnapshot,
        ledger: &TargetLedger,
        loot: &LootLedger,
        cooldowns: &Cooldowns,
        route: &dyn Route,
        now: Instant,
    ) -> Option<Task> {
        let t = &self.tuning;
        let ready = |name: &str| {
            let disabled = cooldowns.is_disabled(name, now);
            if disabled {
                trace!(behavior = name, "skipped while disabled");
            }
            !disabled
        };
        let health = snapshot.vitals.health_percent;
        let mana = snapshot.vitals.mana_percent;

        if health < t.heal_below_percent && ready(heal::NAME) {
            return Some(Task::new(heal::PRIORITY, EmergencyHeal::new()));
        }
        if t.combat_enabled
            && combat::best_target(snapshot, ledger).is_some()
            && ready(combat::NAME)
        {
            return Some(Task::new(combat::PRIORITY, Combat::new()));
        }
        if health < t.mana_heal_below_percent
            && mana >= t.mana_heal_min_mana
            && ready(mana_heal::NAME)
        {
            return Some(Task::new(mana_heal::PRIORITY, ManaHeal::new()));
        }
        if t.loot_enabled
            && loot::next_corpse(snapshot, t.loot_policy, loot.skipped()).is_some()
            && ready(loot::NAME)
        {
            return Some(Task::new(loot::PRIORITY, Loot::new()));
        }
        if route.current().is_some() && ready(follow_path::NAME) {
            return Some(Task::new(follow_path::PRIORITY, FollowPath::new()));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use waypilot_memory::PathRepository;
    use waypilot_types::{
        Corpse, CorpseId, Creature, CreatureId, PlayerFix, Tile, Vitals, Waypoint,
    };

    fn snapshot(health: u8, mana: u8) -> WorldSnapshot {
        WorldSnapshot {
            player: Some(PlayerFix {
                tile: Tile::new(5, 5, 7),
                confidence: 1.0,
            }),
            vitals: Vitals {
                health_percent: health,
                mana_percent: mana,
            },
            ..WorldSnapshot::default()
        }
    }

    fn route() -> PathRepository {
        PathRepository::new(vec![Waypoint::Move {
            tile: Tile::new(1, 1, 7),
        }])
    }

    fn pick(
        policy: &PriorityPolicy,
        s: &WorldSnapshot,
        cooldowns: &Cooldowns,
    ) -> Option<&'static str> {
        policy
            .propose(
                s,
                &TargetLedger::new(),
                &LootLedger::new(),
                cooldowns,
                &route(),
                Instant::now(),
            )
            .map(|t| t.name())
    }

    #[test]
    fn fixed_priority_order() {
        let policy = PriorityPolicy::new(PilotTuning::default());
        let cooldowns = Cooldowns::new();
        let mut s = snapshot(20, 90);
        s.creatures.push(Creature {
            id: CreatureId(1),
            tile: Tile::new(6, 5, 7),
            health_percent: 100,
            targeted: false,
            whitelisted: false,
        });
        s.corpses.push(Corpse {
            id: CorpseId(1),
            tile: Tile::new(4, 5, 7),
        });
        assert_eq!(pick(&policy, &s, &cooldowns), Some(heal::NAME));
        s.vitals.health_percent = 50;
        assert_eq!(pick(&policy, &s, &cooldowns), Some(combat::NAME));
        s.creatures.clear();
        assert_eq!(pick(&policy, &s, &cooldowns), Some(mana_heal::NAME));
        s.vitals.health_percent = 100;
        assert_eq!(pick(&policy, &s, &cooldowns), Some(loot::NAME));
        s.corpses.clear();
        assert_eq!(pick(&policy, &s, &cooldowns), Some(follow_path::NAME));
    }

    #[test]
    fn disabled_behavior_falls_through() {
        let policy = PriorityPolicy::new(PilotTuning::default());
        let now = Instant::now();
        let mut cooldowns = Cooldowns::new();
        cooldowns.disable(heal::NAME, now, Duration::from_secs(30));
        let s = snapshot(10, 0);
        let picked = policy
            .propose(
                &s,
                &TargetLedger::new(),
                &LootLedger::new(),
                &cooldowns,
                &route(),
                now,
            )
            .map(|t| t.name());
        assert_eq!(picked, Some(follow_path::NAME));
    }

    #[test]
    fn mana_heal_needs_mana() {
        let policy = PriorityPolicy::new(PilotTuning::default());
        let cooldowns = Cooldowns::new();
        let s = snapshot(60, 10);
        assert_eq!(pick(&policy, &s, &cooldowns), Some(follow_path::NAME));
    }

    #[test]
    fn switches_respect_tuning() {
        let tuning = PilotTuning {
            combat_enabled: false,
            loot_enabled: false,
            ..PilotTuning::default()
        };
        let policy = PriorityPolicy::new(tuning);
        let mut s = snapshot(100, 100);
        s.creatures.push(Creature {
            id: CreatureId(1),
            tile: Tile::new(6, 5, 7),
            health_percent: 100,
            targeted: false,
            whitelisted: false,
        });
        s.corpses.push(Corpse {
            id: CorpseId(1),
            tile: Tile::new(4, 5, 7),
        });
        assert_eq!(pick(&policy, &s, &Cooldowns::new()), Some(follow_path::NAME));
    }

    #[test]
    fn nothing_to_do() {
        let policy = PriorityPolicy::new(PilotTuning::default());
        let s = snapshot(100, 100);
        let empty = PathRepository::default();
        let task = policy.propose(
            &s,
            &TargetLedger::new(),
            &LootLedger::new(),
            &Cooldowns::new(),
            &empty,
            Instant::now(),
        );
        assert!(task.is_none());
    }

    #[test]
    fn skipped_corpses_do_not_trigger_loot() {
        let policy = PriorityPolicy::new(PilotTuning::default());
        let mut s = snapshot(100, 100);
        s.corpses.push(Corpse {
            id: CorpseId(4),
            tile: Tile::new(4, 5, 7),
        });
        let mut loot = LootLedger::new();
        let propose = |loot: &LootLedger| {
            policy
                .propose(
                    &s,
                    &TargetLedger::new(),
                    loot,
                    &Cooldowns::new(),
                    &route(),
                    Instant::now(),
                )
                .map(|t| t.name())
        };
        assert_eq!(propose(&loot), Some(loot::NAME));
        loot.skip(CorpseId(4));
        assert_eq!(propose(&loot), Some(follow_path::NAME));
    }
}
