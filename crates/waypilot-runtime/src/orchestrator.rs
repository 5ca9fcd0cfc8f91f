//! [`Orchestrator`] – the single active-root-task slot.
//!
//! Priority is a *selection* mechanism applied at task boundaries, not a
//! preemption mechanism:
//!
//! | Active task | `propose(Some(candidate))` |
//! |---|---|
//! | none / `Completed` | adopt candidate |
//! | `NotStarted` | adopt only if `candidate.priority > active.priority` |
//! | `Running` | reject, whatever the priority |
//!
//! A running task therefore always reaches its own completion, which keeps
//! in-flight actions (a click awaiting confirmation, a step onto a ramp) from
//! being abandoned.  [`Orchestrator::active_is_critical`] still exposes the
//! composed critical flag so the host can delay shutdown while one is
//! pending.

use tracing::{debug, info, instrument};

use crate::context::TickContext;
use crate::task::{Status, Task};

/// What happened to a proposed candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    Adopted,
    Rejected,
    /// No candidate was offered.
    Ignored,
}

#[derive(Debug, Default)]
pub struct Orchestrator {
    active: Option<Task>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&Task> {
        self.active.as_ref()
    }

    pub fn active_is_critical(&self) -> bool {
        self.active.as_ref().is_some_and(Task::is_critical)
    }

    /// Offer `candidate` for the active slot.
    pub fn propose(&mut self, candidate: Option<Task>) -> Proposal {
        let Some(candidate) = candidate else {
            return Proposal::Ignored;
        };
        let adopt = match &self.active {
            None => true,
            Some(active) => match active.status() {
                Status::Completed => true,
                Status::NotStarted => candidate.priority() > active.priority(),
                Status::Running => false,
            },
        };
        if adopt {
            if let Some(old) = &self.active {
                debug!(replaced = old.name(), "dropping unstarted task");
            }
            info!(
                task = candidate.name(),
                priority = candidate.priority(),
                "task adopted"
            );
            self.active = Some(candidate);
            Proposal::Adopted
        } else {
            Proposal::Rejected
        }
    }

    /// Tick the active task and retire it once it completes.
    #[instrument(level = "debug", skip_all)]
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        if let Some(task) = self.active.as_mut() {
            task.tick(ctx);
            if task.is_completed() {
                self.active = None;
            }
        }
    }

    /// Drop the active task without running any hook.
    pub fn clear(&mut self) {
        self.active = None;
    }
}
