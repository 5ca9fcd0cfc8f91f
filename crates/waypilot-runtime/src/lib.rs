//! `waypilot-runtime` – the behavior scheduler.
//!
//! Each tick the [`Pilot`] asks the [`PriorityPolicy`] for the most urgent
//! behavior, offers it to the [`Orchestrator`] and ticks whichever root task
//! holds the single active slot.  Root tasks run their own phase machines and
//! delegate navigation to subtasks built on the [`MovementController`].
//!
//! # Modules
//!
//! - [`task`] – [`Task`] / [`Subtask`] lifecycle (`NotStarted → Running →
//!   Completed`) and the [`Behavior`] / [`SubtaskLogic`] hooks.
//! - [`orchestrator`] – the active-task slot; selection happens only at task
//!   boundaries.
//! - [`context`] – [`TickContext`], everything a task may touch in one tick.
//! - [`movement`] – the one-step-in-flight movement confirmation protocol.
//! - [`relocate`] – [`WalkTo`][relocate::WalkTo] and
//!   [`Approach`][relocate::Approach] subtasks.
//! - [`floor_change`] – ramps, ropes and ladders.
//! - Root behaviors, highest priority first: [`heal`], [`combat`],
//!   [`mana_heal`], [`loot`], [`follow_path`].
//! - [`policy`] – which behavior to propose.
//! - [`pilot`] – the tick driver.
//! - [`tuning`] – [`PilotTuning`], every threshold and timeout.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing].
//!
//! # Time
//!
//! Nothing in this crate reads the clock.  The host passes `now` into
//! [`Pilot::tick`] and every timeout is measured against it.

pub mod combat;
pub mod context;
pub mod floor_change;
pub mod follow_path;
pub mod heal;
pub mod loot;
pub mod mana_heal;
pub mod movement;
pub mod orchestrator;
pub mod pilot;
pub mod policy;
pub mod relocate;
pub mod task;
pub mod telemetry;
pub mod tuning;

pub use context::TickContext;
pub use movement::{Goal, MoveStatus, MovementController, MovementTuning};
pub use orchestrator::{Orchestrator, Proposal};
pub use pilot::{Pilot, TickReport};
pub use policy::PriorityPolicy;
pub use task::{Behavior, Failure, Outcome, Status, Step, Subtask, SubtaskLogic, Task};
pub use telemetry::{TracerProviderGuard, init_tracing};
pub use tuning::{LootPolicy, PilotTuning};
