//! The built-in demo: a two-floor hunting ground for [`SimWorld`] and the
//! route that loops through it.
//!
//! ```text
//! floor 7                         floor 6
//! ############                    ########
//! #..........#                    #S.....#   S  arrival from the ramp
//! #..####.o..#                    #.####.#
//! #..#..#....#                    #..o...#
//! #.....#....#                    #....H.#   H  ladder up (right-click)
//! #..####..>.#   > ramp down      ########
//! #.........w#   o hostile, w whitelisted
//! ############
//! ```
//!
//! Ramps and ladders are drawn as blocked cells so walking never triggers
//! them by accident; only the route's floor-change waypoints use them.

use waypilot_hal::{SimWorld, Trigger};
use waypilot_types::{Direction, FloorGrid, InventorySlot, SlotRef, Tile, Vitals, Waypoint};

const SURFACE: &str = "
    ############
    #..........#
    #..####....#
    #..#..#....#
    #.....#....#
    #..####..>.#
    #..........#
    ############
";

const CAVE: &str = "
    ########
    #......#
    #.####.#
    #......#
    #....H.#
    ########
";

pub const START: Tile = Tile { x: 1, y: 1, z: 7 };

pub fn world() -> SimWorld {
    let backpack = SlotRef {
        container: 0,
        index: 2,
    };
    let potions = InventorySlot {
        slot: SlotRef {
            container: 1,
            index: 0,
        },
        item: "health potion".to_string(),
        count: 5,
        is_container: false,
    };
    SimWorld::new(FloorGrid::parse(7, SURFACE), START)
        .with_floor(FloorGrid::parse(6, CAVE))
        .with_vitals(Vitals {
            health_percent: 35,
            mana_percent: 100,
        })
        .with_container(backpack, vec![potions])
        .with_creature(1, Tile::new(8, 2, 7), false)
        .with_creature(2, Tile::new(10, 6, 7), true)
        .with_creature(3, Tile::new(3, 3, 6), false)
        .with_transition(Trigger::Step, Tile::new(9, 5, 7), Tile::new(1, 1, 6))
        .with_transition(Trigger::RightClick, Tile::new(5, 4, 6), Tile::new(8, 4, 7))
}

pub fn route() -> Vec<Waypoint> {
    vec![
        Waypoint::Move {
            tile: Tile::new(4, 4, 7),
        },
        Waypoint::Move {
            tile: Tile::new(9, 2, 7),
        },
        Waypoint::Step {
            tile: Tile::new(9, 4, 7),
            direction: Direction::South,
        },
        Waypoint::Move {
            tile: Tile::new(6, 3, 6),
        },
        Waypoint::RightClick {
            tile: Tile::new(5, 3, 6),
            direction: Direction::South,
        },
        Waypoint::Move {
            tile: Tile::new(2, 6, 7),
        },
    ]
}
