//! Deferred one-shot actions ("respawn in 5 seconds")
//!
//! Pending actions are plain data holding actor and effect ids. Whoever runs a
//! due action must re-validate every id, since anything may have happened to
//! those actors while the action was waiting.

use crate::classes::ClassTask;
use crate::effect::EffectId;
use crate::types::ActorId;
use serde::{Deserialize, Serialize};

/// Handle used to cancel a pending action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// What to do when a timer fires
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredAction {
    /// Forward to the effect's timer hook, if the effect is still live
    Effect(EffectId),
    /// Forward to the actor's class controller, if it still plays `class`
    Class { actor: ActorId, task: ClassTask },
}

impl DeferredAction {
    /// Actor the action belongs to, when it names one directly
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            DeferredAction::Effect(_) => None,
            DeferredAction::Class { actor, .. } => Some(*actor),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingTimer {
    handle: TimerHandle,
    due_at: f64,
    action: DeferredAction,
}

/// Queue of pending deferred actions, driven by simulation time
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: f64,
    next_handle: u64,
    pending: Vec<PendingTimer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulation time seen by the scheduler
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Run `action` once, `delay` seconds from now
    pub fn schedule(&mut self, delay: f64, action: DeferredAction) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        tracing::trace!(handle = handle.0, delay, ?action, "scheduled deferred action");
        self.pending.push(PendingTimer {
            handle,
            due_at: self.now + delay.max(0.0),
            action,
        });
        handle
    }

    /// Cancel a pending action. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        let cancelled = self.pending.len() != before;
        if cancelled {
            tracing::trace!(handle = handle.0, "cancelled deferred action");
        }
        cancelled
    }

    /// Cancel every pending action matching the predicate, returning how many
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&DeferredAction) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| !predicate(&t.action));
        before - self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    /// Seconds until a pending action fires
    pub fn time_left(&self, handle: TimerHandle) -> Option<f64> {
        self.pending
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| (t.due_at - self.now).max(0.0))
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Advance time and take every action that is now due
    ///
    /// Due actions come out in due-time order; equal due times keep their
    /// scheduling order.
    pub fn advance(&mut self, delta: f64) -> Vec<(TimerHandle, DeferredAction)> {
        if delta > 0.0 {
            self.now += delta;
        }
        let now = self.now;

        let mut due: Vec<PendingTimer> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_at <= now + f64::EPSILON {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }

        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at).then(a.handle.cmp(&b.handle)));
        due.into_iter().map(|t| (t.handle, t.action)).collect()
    }

    /// Drop every pending action
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
