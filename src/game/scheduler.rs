//! Virtual-clock timer facility.
//!
//! Plays the part of `setInterval` / `setTimeout` for the game core, but every
//! timer lives in one table so a stop can cancel them deterministically. Time
//! only moves when the owner calls [`Scheduler::pop_due`] (once per animation
//! frame in the browser, explicitly in tests).

/// Handle of a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Timer<E> {
    id: TimerId,
    due: f64,
    /// `Some(period)` for repeating cadences.
    period: Option<f64>,
    event: E,
}

pub struct Scheduler<E> {
    now: f64,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E: Clone> Scheduler<E> {
    pub fn new(now: f64) -> Self {
        Self { now, next_id: 0, timers: Vec::new() }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    #[cfg(test)]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// One-shot timer firing `delay_ms` from the current clock.
    pub fn schedule_once(&mut self, delay_ms: f64, event: E) -> TimerId {
        self.insert(delay_ms, None, event)
    }

    /// Repeating cadence; first fires one `period_ms` from now.
    pub fn schedule_repeating(&mut self, period_ms: f64, event: E) -> TimerId {
        debug_assert!(period_ms > 0.0, "repeating timer needs a positive period");
        self.insert(period_ms, Some(period_ms), event)
    }

    fn insert(&mut self, delay_ms: f64, period: Option<f64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer { id, due: self.now + delay_ms.max(0.0), period, event });
        id
    }

    /// Cancels a timer. Unknown or already fired ids are ignored.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to
    /// its due time. Ties fire in scheduling order. Repeating timers are
    /// re-armed before being returned, so the caller may cancel them.
    pub fn pop_due(&mut self, until: f64) -> Option<(TimerId, E)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        let timer = &mut self.timers[idx];
        self.now = self.now.max(timer.due);
        let fired = (timer.id, timer.event.clone());
        if let Some(period) = timer.period {
            timer.due += period;
        } else {
            self.timers.swap_remove(idx);
        }
        Some(fired)
    }

    /// Moves the clock forward to `until` once nothing else is due.
    pub fn settle(&mut self, until: f64) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, until: f64) -> Vec<(f64, &'static str)> {
        let mut out = Vec::new();
        while let Some((_, e)) = s.pop_due(until) {
            out.push((s.now(), e));
        }
        s.settle(until);
        out
    }

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new(0.0);
        s.schedule_once(300.0, "c");
        s.schedule_once(100.0, "a");
        s.schedule_once(200.0, "b");
        assert_eq!(drain(&mut s, 1_000.0), vec![(100.0, "a"), (200.0, "b"), (300.0, "c")]);
        assert_eq!(s.pending(), 0);
        assert_eq!(s.now(), 1_000.0);
    }

    #[test]
    fn ties_keep_schedule_order() {
        let mut s = Scheduler::new(0.0);
        s.schedule_once(50.0, "first");
        s.schedule_once(50.0, "second");
        assert_eq!(drain(&mut s, 50.0), vec![(50.0, "first"), (50.0, "second")]);
    }

    #[test]
    fn repeating_rearms_until_cancelled() {
        let mut s = Scheduler::new(0.0);
        let id = s.schedule_repeating(800.0, "tick");
        let fired = drain(&mut s, 2_500.0);
        assert_eq!(fired, vec![(800.0, "tick"), (1_600.0, "tick"), (2_400.0, "tick")]);
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(drain(&mut s, 10_000.0).is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut s = Scheduler::new(0.0);
        let id = s.schedule_once(10.0, "x");
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(drain(&mut s, 100.0).is_empty());
    }

    #[test]
    fn nothing_fires_early() {
        let mut s = Scheduler::new(0.0);
        s.schedule_once(400.0, "pop");
        assert!(drain(&mut s, 399.0).is_empty());
        assert_eq!(drain(&mut s, 400.0), vec![(400.0, "pop")]);
    }
}
