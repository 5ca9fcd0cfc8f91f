//! End-to-end runs of the full pilot against the simulated world.

use std::time::{Duration, Instant};

use waypilot_hal::{SimWorld, Trigger};
use waypilot_memory::PathRepository;
use waypilot_runtime::{Pilot, PilotTuning, TickReport};
use waypilot_types::{
    CorpseId, CreatureId, Direction, FloorGrid, InputAction, InventorySlot, MouseButton, SlotRef,
    Tile, Vitals, Waypoint,
};

const TICK: Duration = Duration::from_millis(50);

/// Host loop: snapshot, tick, then let the world catch up.
struct Session {
    pilot: Pilot,
    world: SimWorld,
    route: PathRepository,
    now: Instant,
}

impl Session {
    fn new(world: SimWorld, route: Vec<Waypoint>) -> Self {
        Self {
            pilot: Pilot::new(PilotTuning::default()),
            world,
            route: PathRepository::new(route),
            now: Instant::now(),
        }
    }

    fn tick(&mut self) -> TickReport {
        let snapshot = self.world.snapshot();
        let report = self
            .pilot
            .tick(&snapshot, self.now, &mut self.world, &mut self.route);
        self.world.advance();
        self.now += TICK;
        report
    }

    /// Tick until `done` holds; panics after `limit` ticks.
    fn run_until(&mut self, limit: usize, mut done: impl FnMut(&Self) -> bool) {
        for _ in 0..limit {
            if done(self) {
                return;
            }
            self.tick();
        }
        assert!(done(self), "condition not reached in {limit} ticks");
    }

    fn sent(&self, action: &InputAction) -> bool {
        self.world.dispatched().contains(action)
    }
}

#[test]
fn kills_loots_then_resumes_route() {
    let world = SimWorld::new(FloorGrid::open(7, 8, 8), Tile::new(1, 1, 7))
        .with_creature(1, Tile::new(5, 1, 7), false)
        .with_creature(2, Tile::new(6, 6, 7), true);
    let route = vec![
        Waypoint::Move {
            tile: Tile::new(1, 6, 7),
        },
        Waypoint::Move {
            tile: Tile::new(1, 1, 7),
        },
    ];
    let mut s = Session::new(world, route);

    s.run_until(200, |s| s.world.creatures().len() == 1);
    assert!(s.sent(&InputAction::Click {
        dx: 1,
        dy: 0,
        button: MouseButton::Left,
    }));
    assert_eq!(s.world.corpses().len(), 1);
    assert_eq!(s.route.position(), 0, "combat runs before the route");

    s.run_until(100, |s| s.world.corpses().is_empty());
    assert!(
        s.world
            .dispatched()
            .iter()
            .any(|a| matches!(a, InputAction::Click { button: MouseButton::Right, .. }))
    );

    s.run_until(300, |s| s.route.position() == 1);
    assert_eq!(s.world.player(), Tile::new(1, 6, 7));
    // The whitelisted creature was never attacked.
    assert_eq!(s.world.creatures()[0].health_percent, 100);
}

#[test]
fn route_with_floor_changes_loops() {
    let world = SimWorld::new(FloorGrid::open(7, 8, 8), Tile::new(1, 1, 7))
        .with_floor(FloorGrid::open(6, 8, 8))
        .with_transition(Trigger::Step, Tile::new(3, 2, 7), Tile::new(3, 2, 6))
        .with_transition(Trigger::RightClick, Tile::new(5, 4, 6), Tile::new(5, 4, 7));
    let route = vec![
        Waypoint::Step {
            tile: Tile::new(2, 2, 7),
            direction: Direction::East,
        },
        Waypoint::Move {
            tile: Tile::new(5, 5, 6),
        },
        Waypoint::RightClick {
            tile: Tile::new(5, 5, 6),
            direction: Direction::North,
        },
        Waypoint::Move {
            tile: Tile::new(6, 6, 7),
        },
    ];
    let mut s = Session::new(world, route);

    s.run_until(100, |s| s.route.position() == 1);
    assert_eq!(s.world.player(), Tile::new(3, 2, 6));

    s.run_until(200, |s| s.route.position() == 3);
    assert_eq!(s.world.player(), Tile::new(5, 4, 7));
    assert!(s.sent(&InputAction::Click {
        dx: 0,
        dy: -1,
        button: MouseButton::Right,
    }));

    s.run_until(200, |s| s.route.position() == 0);
    assert_eq!(s.world.player(), Tile::new(6, 6, 7));
}

#[test]
fn rope_spot_needs_the_rope() {
    let world = SimWorld::new(FloorGrid::open(7, 5, 5), Tile::new(2, 2, 7))
        .with_floor(FloorGrid::open(6, 5, 5))
        .with_item(
            SlotRef {
                container: 0,
                index: 0,
            },
            "rope",
            1,
        )
        .with_transition(
            Trigger::Use {
                item: "rope".into(),
            },
            Tile::new(2, 3, 7),
            Tile::new(2, 3, 6),
        );
    let route = vec![
        Waypoint::UseItem {
            item: "rope".into(),
            tile: Tile::new(2, 2, 7),
            direction: Direction::South,
        },
        Waypoint::Move {
            tile: Tile::new(0, 0, 6),
        },
    ];
    let mut s = Session::new(world, route);
    s.run_until(50, |s| s.route.position() == 1);
    assert_eq!(s.world.player(), Tile::new(2, 3, 6));
    assert!(s.sent(&InputAction::UseItemOn {
        item: "rope".into(),
        dx: 0,
        dy: 1,
    }));
}

#[test]
fn low_health_opens_backpack_and_drinks() {
    let potion = InventorySlot {
        slot: SlotRef {
            container: 1,
            index: 0,
        },
        item: "health potion".into(),
        count: 2,
        is_container: false,
    };
    let world = SimWorld::new(FloorGrid::open(7, 5, 5), Tile::new(2, 2, 7))
        .with_vitals(Vitals {
            health_percent: 20,
            mana_percent: 100,
        })
        .with_container(
            SlotRef {
                container: 0,
                index: 3,
            },
            vec![potion],
        );
    let mut s = Session::new(world, Vec::new());

    s.run_until(20, |s| s.world.vitals().health_percent >= 40);
    assert!(s.sent(&InputAction::OpenContainer {
        slot: SlotRef {
            container: 0,
            index: 3,
        },
    }));
    assert!(s.sent(&InputAction::UseSlot {
        slot: SlotRef {
            container: 1,
            index: 0,
        },
    }));

    // Mana heal tops the rest up, one cast per cooldown window.
    s.run_until(200, |s| s.world.vitals().health_percent >= 80);
    let casts = s
        .world
        .dispatched()
        .iter()
        .filter(|a| matches!(a, InputAction::Hotkey(_)))
        .count();
    assert_eq!(casts, 2);
}

#[test]
fn missing_potion_disables_heal_and_lets_route_run() {
    let world = SimWorld::new(FloorGrid::open(7, 5, 5), Tile::new(0, 0, 7)).with_vitals(Vitals {
        health_percent: 10,
        mana_percent: 0,
    });
    let route = vec![Waypoint::Move {
        tile: Tile::new(3, 0, 7),
    }];
    let mut s = Session::new(world, route);
    s.run_until(50, |s| s.world.player() == Tile::new(3, 0, 7));
    assert!(s.pilot.cooldowns().is_disabled("emergency_heal", s.now));
}

#[test]
fn lost_fix_pauses_movement() {
    let world = SimWorld::new(FloorGrid::open(7, 6, 1), Tile::new(0, 0, 7));
    let route = vec![Waypoint::Move {
        tile: Tile::new(5, 0, 7),
    }];
    let mut s = Session::new(world, route);
    s.world.set_position_confidence(0.1);
    for _ in 0..30 {
        s.tick();
    }
    assert!(s.world.dispatched().is_empty());

    s.world.set_position_confidence(0.9);
    s.run_until(60, |s| s.world.player() == Tile::new(5, 0, 7));
}

/// An 8 × 3 floor whose top-right tile (7,0) is walled in.
fn walled_corner() -> FloorGrid {
    FloorGrid::parse(
        7,
        "
        ......#.
        ......##
        ........
        ",
    )
}

fn two_stop_route() -> Vec<Waypoint> {
    vec![
        Waypoint::Move {
            tile: Tile::new(1, 2, 7),
        },
        Waypoint::Move {
            tile: Tile::new(4, 2, 7),
        },
    ]
}

#[test]
fn walled_in_corpse_is_given_up_and_route_resumes() {
    let world = SimWorld::new(walled_corner(), Tile::new(1, 1, 7)).with_corpse(Tile::new(7, 0, 7));
    let mut s = Session::new(world, two_stop_route());

    let mut loot_ticks = 0;
    for _ in 0..200 {
        if s.route.position() == 1 {
            break;
        }
        if s.tick().active == Some("loot") {
            loot_ticks += 1;
        }
    }
    assert_eq!(s.route.position(), 1);
    assert!(loot_ticks <= 10, "loot ran for {loot_ticks} ticks");
    assert!(s.pilot.loot_ledger().is_skipped(CorpseId(1)));
    assert!(!s.pilot.cooldowns().is_disabled("loot", s.now));
    assert!(s.world.dispatched().iter().all(|a| matches!(a, InputAction::Step(_))));
    assert_eq!(s.world.corpses().len(), 1);
}

#[test]
fn walled_in_creature_ends_up_ignored() {
    let world = SimWorld::new(walled_corner(), Tile::new(1, 1, 7)).with_creature(
        1,
        Tile::new(7, 0, 7),
        false,
    );
    let mut s = Session::new(world, two_stop_route());

    s.run_until(200, |s| s.route.position() == 1);
    assert!(s.pilot.ledger().is_ignored(CreatureId(1)));
    assert!(
        !s.world
            .dispatched()
            .iter()
            .any(|a| matches!(a, InputAction::Click { .. }))
    );
}

#[test]
fn lost_fix_lets_emergency_heal_take_over() {
    let world = SimWorld::new(FloorGrid::open(7, 8, 1), Tile::new(0, 0, 7)).with_item(
        SlotRef {
            container: 0,
            index: 0,
        },
        "health potion",
        1,
    );
    let route = vec![Waypoint::Move {
        tile: Tile::new(7, 0, 7),
    }];
    let mut s = Session::new(world, route);
    for _ in 0..3 {
        assert_eq!(s.tick().active, Some("follow_path"));
    }

    s.world.set_position_confidence(0.1);
    s.world.set_vitals(Vitals {
        health_percent: 20,
        mana_percent: 0,
    });
    s.run_until(100, |s| s.world.vitals().health_percent >= 40);
    assert!(s.sent(&InputAction::UseSlot {
        slot: SlotRef {
            container: 0,
            index: 0,
        },
    }));
    assert_eq!(s.route.position(), 0, "the waypoint is kept for later");
}

#[test]
fn pending_floor_change_is_critical_until_observed() {
    let world = SimWorld::new(FloorGrid::open(7, 5, 5), Tile::new(1, 1, 7))
        .with_floor(FloorGrid::open(8, 5, 5))
        .with_transition(Trigger::Step, Tile::new(1, 2, 7), Tile::new(1, 2, 8))
        .with_latency(3);
    let route = vec![Waypoint::Step {
        tile: Tile::new(1, 1, 7),
        direction: Direction::South,
    }];
    let mut s = Session::new(world, route);

    let mut critical_ticks = 0;
    for _ in 0..20 {
        let report = s.tick();
        if report.critical {
            critical_ticks += 1;
        }
        if s.world.player().z == 8 && !report.critical {
            break;
        }
    }
    assert_eq!(s.world.player(), Tile::new(1, 2, 8));
    assert!(critical_ticks >= 3, "critical for {critical_ticks} ticks");
    assert!(!s.pilot.is_critical());
}
