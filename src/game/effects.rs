//! Timed visuals and the continuations that drive them.
//!
//! Continuations are keyed to a tick number and resolved by the orchestrator
//! at the top of a tick, so they always run on the same mutation path as the
//! rest of the game and never part-way through one.

#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub frame: u8,
}

/// The expanding blast drawn while a nuke counts down.
#[derive(Clone, Debug, PartialEq)]
pub struct NukeBlast {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    ExplosionFrame { id: u32, frame: u8 },
    ExplosionDone { id: u32 },
    NukeDetonate,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: u64,
    action: Deferred,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: Vec<Scheduled>,
}

impl Scheduler {
    pub fn schedule(&mut self, now: u64, delay: u64, action: Deferred) {
        self.queue.push(Scheduled {
            due: now + delay,
            action,
        });
    }

    /// Removes and returns everything due at or before `now`, in the order
    /// it was scheduled.
    pub fn take_due(&mut self, now: u64) -> Vec<Deferred> {
        let mut due = Vec::new();
        self.queue.retain(|s| {
            if s.due <= now {
                due.push(s.action);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn is_pending(&self, action: Deferred) -> bool {
        self.queue.iter().any(|s| s.action == action)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_actions_come_out_in_order() {
        let mut s = Scheduler::default();
        s.schedule(0, 4, Deferred::ExplosionDone { id: 1 });
        s.schedule(0, 2, Deferred::ExplosionFrame { id: 1, frame: 1 });
        s.schedule(1, 2, Deferred::NukeDetonate);

        assert!(s.take_due(1).is_empty());
        assert_eq!(s.take_due(3), vec![
            Deferred::ExplosionFrame { id: 1, frame: 1 },
            Deferred::NukeDetonate,
        ]);
        assert!(s.is_pending(Deferred::ExplosionDone { id: 1 }));
        assert_eq!(s.take_due(10), vec![Deferred::ExplosionDone { id: 1 }]);
        assert!(s.is_empty());
    }
}
