use crate::timeline::{Cue, Sequencer};

/// Host timer facility the sequencer schedules its cues on.
pub trait Timers {
    /// Deliver `cue` back to the sequencer after `delay_ms`.
    fn schedule(&mut self, delay_ms: u32, cue: Cue);
    /// Drop every cue that has not fired yet, where the host supports it.
    fn cancel_pending(&mut self);
}

/// Deterministic clock for tests and offline rendering.
#[derive(Clone, Debug)]
pub struct ManualTimers {
    now: f64,
    queue: Vec<(f64, Cue)>,
    cancellable: bool,
    stale_fired: usize,
}

impl Default for ManualTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimers {
    pub fn new() -> Self {
        ManualTimers {
            now: 0.0,
            queue: Vec::new(),
            cancellable: true,
            stale_fired: 0,
        }
    }

    /// A clock whose pending cues survive `cancel_pending`, like a host
    /// that can only overwrite.
    pub fn without_cancellation() -> Self {
        ManualTimers {
            cancellable: false,
            ..Self::new()
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Cues delivered after their run was superseded.
    pub fn stale_fired(&self) -> usize {
        self.stale_fired
    }

    /// Move the clock to `t`, firing due cues in time order (each at its own
    /// due time), then tick the sequencer at `t`. Returns the tick result.
    pub fn advance_to(&mut self, t: f64, seq: &mut Sequencer) -> bool {
        loop {
            let next = self
                .queue
                .iter()
                .enumerate()
                .filter(|(_, (due, _))| *due <= t)
                .min_by(|a, b| a.1.0.total_cmp(&b.1.0))
                .map(|(i, _)| i);
            let Some(i) = next else { break };
            let (due, cue) = self.queue.remove(i);
            self.now = due;
            if !seq.fire(cue, due) {
                self.stale_fired += 1;
            }
        }
        self.now = self.now.max(t);
        seq.tick(self.now)
    }
}

impl Timers for ManualTimers {
    fn schedule(&mut self, delay_ms: u32, cue: Cue) {
        self.queue.push((self.now + delay_ms as f64, cue));
    }

    fn cancel_pending(&mut self) {
        if self.cancellable {
            self.queue.clear();
        }
    }
}
