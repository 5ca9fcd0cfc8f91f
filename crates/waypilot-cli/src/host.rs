//! The tick loop that drives a [`Pilot`] against a [`SimWorld`].
//!
//! Each iteration takes a snapshot, ticks the pilot, then advances the world.
//! Time is virtual: the clock starts at the real `Instant` the run begins and
//! moves forward by `interval` after every tick.  The loop only sleeps when
//! `pace` is set, so tests run as fast as the CPU allows.
//!
//! When the shutdown flag is raised the loop stops at the next tick boundary
//! unless the active task is critical; then it keeps ticking for at most
//! `grace_ticks` so the pending action can be confirmed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{info, warn};
use waypilot_hal::SimWorld;
use waypilot_memory::PathRepository;
use waypilot_runtime::Pilot;
use waypilot_types::Tile;

#[derive(Debug, Clone, Copy)]
pub struct HostLoop {
    pub interval: Duration,
    pub grace_ticks: u32,
    /// Sleep `interval` between ticks.
    pub pace: bool,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Stopped by the shutdown flag rather than the tick budget.
    pub interrupted: bool,
    /// Ticks spent finishing a critical action after the flag was raised.
    pub grace_used: u32,
    pub final_tile: Tile,
    pub last_task: Option<&'static str>,
    /// The virtual clock when the loop stopped.
    pub finished_at: Instant,
}

impl HostLoop {
    pub fn run(
        &self,
        pilot: &mut Pilot,
        world: &mut SimWorld,
        route: &mut PathRepository,
        max_ticks: u64,
        shutdown: &AtomicBool,
    ) -> RunSummary {
        let mut now = Instant::now();
        let mut ticks = 0;
        let mut grace_used = 0;
        let mut interrupted = false;
        let mut last_task = None;

        while ticks < max_ticks {
            if shutdown.load(Ordering::SeqCst) {
                interrupted = true;
                if !pilot.is_critical() {
                    break;
                }
                if grace_used >= self.grace_ticks {
                    warn!(grace_used, "critical action still pending, stopping anyway");
                    break;
                }
                grace_used += 1;
            }

            let snapshot = world.snapshot();
            let report = pilot.tick(&snapshot, now, world, route);
            world.advance();
            ticks += 1;
            now += self.interval;

            if report.active != last_task {
                if let Some(name) = report.active {
                    info!(tick = ticks, task = name, "active task");
                }
                last_task = report.active.or(last_task);
            }
            if self.pace {
                std::thread::sleep(self.interval);
            }
        }

        RunSummary {
            ticks,
            interrupted,
            grace_used,
            final_tile: world.player(),
            last_task,
            finished_at: now,
        }
    }
}
