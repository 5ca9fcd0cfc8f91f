//! The two-level unit of schedulable work.
//!
//! A [`Task`] is root-schedulable: it carries a priority and is owned by the
//! [`Orchestrator`][crate::orchestrator::Orchestrator].  A [`Subtask`] is only
//! ever driven by a parent task and ends in success or failure instead.
//!
//! Both share one lifecycle, enforced here rather than by implementors:
//!
//! ```text
//!  NotStarted ──on_start──▶ Running ──execute…──▶ Completed
//!       │                                            ▲
//!       └──────── on_start finished early ───────────┘
//! ```
//!
//! | Status | `tick` does |
//! |---|---|
//! | `NotStarted` | runs `on_start` once; `Running` unless it already finished |
//! | `Running` | runs `execute` exactly once |
//! | `Completed` | nothing, forever |
//!
//! Implementors supply the hooks through [`Behavior`] (root) or
//! [`SubtaskLogic`] (child).  Hooks never block: each call performs at most
//! one input action or one replan, and all waiting is expressed as tick
//! counters or deadlines checked on the next call.

use thiserror::Error;
use tracing::{debug, info};

use crate::context::TickContext;

// ─────────────────────────────────────────────────────────────────────────────
// Shared vocabulary
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NotStarted,
    Running,
    Completed,
}

/// What a root hook asks the wrapper to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Complete,
}

/// What a subtask hook asks the wrapper to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Succeed,
    Fail(Failure),
}

/// Why a subtask failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    #[error("no path to the goal")]
    Unreachable,
    #[error("target disappeared")]
    TargetLost,
    #[error("player is on the wrong floor")]
    WrongFloor,
    #[error("expected effect was not observed")]
    Unconfirmed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Root tasks
// ─────────────────────────────────────────────────────────────────────────────

/// Hooks of a root behavior.
pub trait Behavior {
    fn name(&self) -> &'static str;

    fn on_start(&mut self, _ctx: &mut TickContext<'_>) -> Step {
        Step::Continue
    }

    fn execute(&mut self, ctx: &mut TickContext<'_>) -> Step;

    fn on_complete(&mut self, _ctx: &mut TickContext<'_>) {}

    /// True while an issued action awaits its confirmation.
    fn is_critical(&self) -> bool {
        false
    }
}

/// A root-schedulable unit of work.
pub struct Task {
    priority: i32,
    status: Status,
    behavior: Box<dyn Behavior>,
}

impl Task {
    pub fn new(priority: i32, behavior: impl Behavior + 'static) -> Self {
        Self {
            priority,
            status: Status::NotStarted,
            behavior: Box::new(behavior),
        }
    }

    pub fn name(&self) -> &'static str {
        self.behavior.name()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Critical only while running and the behavior says so.
    pub fn is_critical(&self) -> bool {
        self.status == Status::Running && self.behavior.is_critical()
    }

    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let step = match self.status {
            Status::NotStarted => {
                self.status = Status::Running;
                debug!(task = self.name(), priority = self.priority, "task started");
                self.behavior.on_start(ctx)
            }
            Status::Running => self.behavior.execute(ctx),
            Status::Completed => return,
        };
        if step == Step::Complete {
            self.status = Status::Completed;
            self.behavior.on_complete(ctx);
            info!(task = self.name(), "task completed");
        }
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name())
            .field("priority", &self.priority)
            .field("status", &self.status)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subtasks
// ─────────────────────────────────────────────────────────────────────────────

/// Hooks of a subtask.
pub trait SubtaskLogic {
    fn name(&self) -> &'static str;

    fn on_start(&mut self, _ctx: &mut TickContext<'_>) -> Outcome {
        Outcome::Continue
    }

    fn execute(&mut self, ctx: &mut TickContext<'_>) -> Outcome;

    fn on_finish(&mut self, _ctx: &mut TickContext<'_>, _result: &Result<(), Failure>) {}

    fn is_critical(&self) -> bool {
        false
    }
}

/// A unit of work owned and ticked by a parent task.
pub struct Subtask {
    status: Status,
    result: Option<Result<(), Failure>>,
    logic: Box<dyn SubtaskLogic>,
}

impl Subtask {
    pub fn new(logic: impl SubtaskLogic + 'static) -> Self {
        Self {
            status: Status::NotStarted,
            result: None,
            logic: Box::new(logic),
        }
    }

    pub fn name(&self) -> &'static str {
        self.logic.name()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// `Some` once completed: `Ok` on success, the failure otherwise.
    pub fn result(&self) -> Option<&Result<(), Failure>> {
        self.result.as_ref()
    }

    pub fn failed(&self) -> bool {
        matches!(self.result, Some(Err(_)))
    }

    pub fn is_critical(&self) -> bool {
        self.status == Status::Running && self.logic.is_critical()
    }

    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let outcome = match self.status {
            Status::NotStarted => {
                self.status = Status::Running;
                self.logic.on_start(ctx)
            }
            Status::Running => self.logic.execute(ctx),
            Status::Completed => return,
        };
        let result = match outcome {
            Outcome::Continue => return,
            Outcome::Succeed => Ok(()),
            Outcome::Fail(reason) => Err(reason),
        };
        self.status = Status::Completed;
        self.logic.on_finish(ctx, &result);
        match &result {
            Ok(()) => debug!(subtask = self.name(), "subtask succeeded"),
            Err(reason) => debug!(subtask = self.name(), %reason, "subtask failed"),
        }
        self.result = Some(result);
    }
}
