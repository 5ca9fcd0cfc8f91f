//! [`FollowPath`] – work through the route's current waypoint, then finish.
//!
//! | Waypoint | Subtasks |
//! |---|---|
//! | `Move` | [`WalkTo`] |
//! | `Step` | [`WalkTo`], then [`FloorChange`] stepping in `direction` |
//! | `UseItem` | [`WalkTo`], then [`FloorChange`] using `item` on the neighbour |
//! | `RightClick` | [`WalkTo`], then [`FloorChange`] right-clicking the neighbour |
//!
//! On success the route advances.  A `WrongFloor` failure means the player
//! fell behind the route (a previous floor change did not stick), so the
//! cursor steps back.  A walk abandoned for lack of a position fix leaves
//! the cursor where it is; any other failure skips the waypoint.

use std::collections::VecDeque;

use tracing::{debug, info, warn};
use waypilot_types::Waypoint;

use crate::context::TickContext;
use crate::floor_change::{FloorAction, FloorChange};
use crate::movement::MovementTuning;
use crate::relocate::WalkTo;
use crate::task::{Behavior, Failure, Step, Subtask};

pub const NAME: &str = "follow_path";
pub const PRIORITY: i32 = 20;

/// The subtask chain that carries out `waypoint`.
fn plan(waypoint: &Waypoint, tuning: MovementTuning) -> VecDeque<Subtask> {
    let mut chain = VecDeque::new();
    chain.push_back(Subtask::new(WalkTo::new(waypoint.tile(), tuning)));
    let floor_action = match waypoint {
        Waypoint::Move { .. } => None,
        Waypoint::Step { direction, .. } => Some(FloorAction::Step(*direction)),
        Waypoint::UseItem {
            item,
            tile,
            direction,
        } => Some(FloorAction::UseItem {
            item: item.clone(),
            target: tile.offset(*direction),
        }),
        Waypoint::RightClick { tile, direction } => Some(FloorAction::RightClick {
            target: tile.offset(*direction),
        }),
    };
    if let Some(action) = floor_action {
        chain.push_back(Subtask::new(FloorChange::new(action)));
    }
    chain
}

pub struct FollowPath {
    waypoint: Option<Waypoint>,
    chain: VecDeque<Subtask>,
}

impl FollowPath {
    pub fn new() -> Self {
        Self {
            waypoint: None,
            chain: VecDeque::new(),
        }
    }
}

impl Default for FollowPath {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for FollowPath {
    fn name(&self) -> &'static str {
        NAME
    }

    fn on_start(&mut self, ctx: &mut TickContext<'_>) -> Step {
        let Some(waypoint) = ctx.route.current().cloned() else {
            debug!("route is empty");
            return Step::Complete;
        };
        debug!(kind = ?waypoint.kind(), tile = %waypoint.tile(), "following waypoint");
        self.chain = plan(&waypoint, ctx.tuning.movement());
        self.waypoint = Some(waypoint);
        Step::Continue
    }

    fn execute(&mut self, ctx: &mut TickContext<'_>) -> Step {
        let Some(sub) = self.chain.front_mut() else {
            return Step::Complete;
        };
        sub.tick(ctx);
        let stage = sub.name();
        let Some(result) = sub.result().cloned() else {
            return Step::Continue;
        };
        self.chain.pop_front();
        match result {
            Ok(()) if self.chain.is_empty() => {
                if let Some(waypoint) = &self.waypoint {
                    info!(tile = %waypoint.tile(), "waypoint reached");
                }
                ctx.route.advance();
                Step::Complete
            }
            Ok(()) => Step::Continue,
            Err(Failure::Unconfirmed) if stage == "walk_to" => {
                warn!(waypoint = ?self.waypoint, "position lost while walking, will retry");
                self.chain.clear();
                Step::Complete
            }
            Err(Failure::WrongFloor) => {
                warn!("route is on another floor, stepping back");
                self.chain.clear();
                ctx.route.go_back();
                Step::Complete
            }
            Err(reason) => {
                warn!(%reason, waypoint = ?self.waypoint, "skipping waypoint");
                self.chain.clear();
                ctx.route.advance();
                Step::Complete
            }
        }
    }

    fn is_critical(&self) -> bool {
        self.chain.front().is_some_and(Subtask::is_critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::harness::Harness;
    use crate::task::Task;
    use waypilot_memory::{PathRepository, Route};
    use waypilot_types::{Direction, InputAction, Tile};

    fn run(h: &mut Harness, task: &mut Task, ticks: usize) {
        for _ in 0..ticks {
            task.tick(&mut h.ctx());
            if task.is_completed() {
                return;
            }
            for action in h.input.take() {
                if let InputAction::Step(dir) = action
                    && let Some(to) = h.snapshot.player_tile().map(|p| p.offset(dir))
                {
                    h.move_player(to);
                }
            }
            h.advance();
        }
    }

    #[test]
    fn empty_route_completes_on_start() {
        let mut h = Harness::open(3, 3, Tile::new(0, 0, 7));
        let mut task = Task::new(PRIORITY, FollowPath::new());
        task.tick(&mut h.ctx());
        assert!(task.is_completed());
    }

    #[test]
    fn move_waypoint_walks_and_advances() {
        let mut h = Harness::open(6, 6, Tile::new(0, 0, 7));
        h.route = PathRepository::new(vec![
            Waypoint::Move {
                tile: Tile::new(3, 2, 7),
            },
            Waypoint::Move {
                tile: Tile::new(0, 0, 7),
            },
        ]);
        let mut task = Task::new(PRIORITY, FollowPath::new());
        run(&mut h, &mut task, 100);
        assert!(task.is_completed());
        assert_eq!(h.snapshot.player_tile(), Some(Tile::new(3, 2, 7)));
        assert_eq!(h.route.position(), 1);
    }

    #[test]
    fn step_waypoint_is_critical_until_floor_changes() {
        let mut h = Harness::open(4, 4, Tile::new(1, 1, 7));
        h.route = PathRepository::new(vec![Waypoint::Step {
            tile: Tile::new(1, 1, 7),
            direction: Direction::East,
        }]);
        let mut task = Task::new(PRIORITY, FollowPath::new());
        task.tick(&mut h.ctx()); // plan
        task.tick(&mut h.ctx()); // walk: already there
        task.tick(&mut h.ctx()); // floor change started
        task.tick(&mut h.ctx()); // step issued
        assert_eq!(h.input.actions(), &[InputAction::Step(Direction::East)]);
        assert!(task.is_critical());
        h.move_player(Tile::new(2, 1, 6));
        task.tick(&mut h.ctx());
        assert!(task.is_completed());
        assert!(!task.is_critical());
    }

    #[test]
    fn wrong_floor_steps_route_back() {
        let mut h = Harness::open(4, 4, Tile::new(1, 1, 7));
        h.route = PathRepository::new(vec![
            Waypoint::Move {
                tile: Tile::new(0, 0, 7),
            },
            Waypoint::Move {
                tile: Tile::new(2, 2, 6),
            },
        ]);
        h.route.advance();
        let mut task = Task::new(PRIORITY, FollowPath::new());
        task.tick(&mut h.ctx());
        task.tick(&mut h.ctx());
        assert!(task.is_completed());
        assert_eq!(h.route.position(), 0);
    }

    #[test]
    fn unreachable_waypoint_is_skipped() {
        let mut h = Harness::open(1, 1, Tile::new(0, 0, 7));
        h.snapshot.floor = Some(std::sync::Arc::new(waypilot_types::FloorGrid::parse(
            7, ".#.",
        )));
        h.route = PathRepository::new(vec![
            Waypoint::Move {
                tile: Tile::new(2, 0, 7),
            },
            Waypoint::Move {
                tile: Tile::new(0, 0, 7),
            },
        ]);
        let mut task = Task::new(PRIORITY, FollowPath::new());
        run(&mut h, &mut task, 20);
        assert!(task.is_completed());
        assert_eq!(h.route.position(), 1);
    }

    #[test]
    fn unconfirmed_floor_change_skips() {
        let mut h = Harness::open(4, 4, Tile::new(1, 1, 7));
        h.tuning.floor_change_timeout_ticks = 2;
        h.route = PathRepository::new(vec![
            Waypoint::RightClick {
                tile: Tile::new(1, 1, 7),
                direction: Direction::North,
            },
            Waypoint::Move {
                tile: Tile::new(0, 0, 7),
            },
        ]);
        let mut task = Task::new(PRIORITY, FollowPath::new());
        for _ in 0..10 {
            task.tick(&mut h.ctx());
        }
        assert!(task.is_completed());
        assert_eq!(h.route.position(), 1);
        assert_eq!(h.input.actions().len(), 1);
    }

    #[test]
    fn lost_fix_ends_task_without_skipping_waypoint() {
        let mut h = Harness::open(6, 6, Tile::new(0, 0, 7));
        h.tuning.no_fix_timeout_ticks = 2;
        h.snapshot.player = None;
        h.route = PathRepository::new(vec![
            Waypoint::Move {
                tile: Tile::new(3, 2, 7),
            },
            Waypoint::Move {
                tile: Tile::new(0, 0, 7),
            },
        ]);
        let mut task = Task::new(PRIORITY, FollowPath::new());
        run(&mut h, &mut task, 10);
        assert!(task.is_completed());
        assert_eq!(h.route.position(), 0);
    }
}
