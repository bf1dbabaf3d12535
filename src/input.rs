use crate::grid::Dir;
use std::time::Duration;

/// Latches the next intended movement direction from input events.
///
/// Two directions exist at any moment: the *applied* direction (what the
/// last movement step used) and the *pending* one (what the next step will
/// use). Requests are rejected when they arrive inside the debounce window
/// or would reverse the applied direction; the split means two quick key
/// presses can never fold the snake back onto its own neck within one tick.
#[derive(Debug)]
pub struct DirectionBuffer {
    applied: Dir,
    pending: Dir,
    last_accepted: Option<Duration>,
    debounce: Duration,
}

impl DirectionBuffer {
    pub fn new(initial: Dir, debounce: Duration) -> Self {
        Self {
            applied: initial,
            pending: initial,
            last_accepted: None,
            debounce,
        }
    }

    /// Offer a direction change. Returns whether it was accepted.
    pub fn request(&mut self, candidate: Dir, now: Duration) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_sub(last) < self.debounce {
                return false;
            }
        }
        if candidate.is_opposite(self.applied) {
            return false;
        }
        self.pending = candidate;
        self.last_accepted = Some(now);
        true
    }

    /// Promote pending to applied at the top of a movement step.
    pub fn commit(&mut self) -> Dir {
        self.applied = self.pending;
        self.applied
    }

    pub fn applied(&self) -> Dir {
        self.applied
    }

    /// Forget history and face `initial` again (session reset).
    pub fn rearm(&mut self, initial: Dir) {
        self.applied = initial;
        self.pending = initial;
        self.last_accepted = None;
    }
}
