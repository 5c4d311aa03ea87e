use std::time::{Duration, Instant};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Cancellable periodic tick handle.
///
/// Nothing runs in the background: the event loop asks [`Metronome::take_due`]
/// for pending ticks, so cancelling is just clearing the next deadline.
#[derive(Debug, Clone)]
pub struct Metronome {
    period: Duration,
    next_due: Option<Instant>,
}

impl Metronome {
    pub fn new(period: Duration) -> Self {
        Self { period, next_due: None }
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Schedule the first tick one period after `at`. Already armed: no-op.
    pub fn arm(&mut self, at: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(at + self.period);
        }
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Returns the deadline of the oldest pending tick and schedules the next one.
    pub fn take_due(&mut self, now: Instant) -> Option<Instant> {
        let due = self.next_due?;
        if due > now {
            return None;
        }
        self.next_due = Some(due + self.period);
        Some(due)
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_metronome_never_fires() {
        let mut m = Metronome::default();
        let now = Instant::now();
        assert!(m.take_due(now + Duration::from_secs(60)).is_none());
        assert!(m.time_until_due(now).is_none());
    }

    #[test]
    fn fires_once_per_elapsed_period() {
        let mut m = Metronome::default();
        let t0 = Instant::now();
        m.arm(t0);

        assert!(m.take_due(t0 + Duration::from_millis(999)).is_none());

        let now = t0 + Duration::from_millis(3500);
        let mut fired = Vec::new();
        while let Some(at) = m.take_due(now) {
            fired.push(at);
        }
        assert_eq!(
            fired,
            vec![
                t0 + Duration::from_secs(1),
                t0 + Duration::from_secs(2),
                t0 + Duration::from_secs(3)
            ]
        );
        assert_eq!(m.time_until_due(now), Some(Duration::from_millis(500)));
    }

    #[test]
    fn arm_twice_keeps_first_deadline() {
        let mut m = Metronome::default();
        let t0 = Instant::now();
        m.arm(t0);
        m.arm(t0 + Duration::from_millis(700));
        assert_eq!(m.take_due(t0 + Duration::from_secs(1)), Some(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut m = Metronome::default();
        let t0 = Instant::now();
        m.arm(t0);
        m.cancel();
        m.cancel();
        assert!(!m.is_armed());
        assert!(m.take_due(t0 + Duration::from_secs(5)).is_none());
    }
}
