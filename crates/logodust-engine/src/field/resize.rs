use std::time::{Duration, Instant};

/// What the field should do this frame with respect to resizing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResizePhase {
    Idle,
    /// A resize burst is in progress; render nothing.
    Suspended,
    /// The burst ended; rebuild size-dependent resources now. Reported once.
    Settled,
}

/// Collapses a burst of resize events into one rebuild after a quiet period.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl ResizeDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, deadline: None }
    }

    /// Records a resize at `now`, pushing the rebuild back by the quiet period.
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn is_suspended(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> ResizePhase {
        match self.deadline {
            None => ResizePhase::Idle,
            Some(deadline) if now < deadline => ResizePhase::Suspended,
            Some(_) => {
                self.deadline = None;
                ResizePhase::Settled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn idle_without_events() {
        let mut d = ResizeDebouncer::new(QUIET);
        assert_eq!(d.poll(Instant::now()), ResizePhase::Idle);
    }

    #[test]
    fn suspended_from_first_event() {
        let mut d = ResizeDebouncer::new(QUIET);
        let t0 = Instant::now();
        d.notify(t0);
        assert!(d.is_suspended());
        assert_eq!(d.poll(t0), ResizePhase::Suspended);
    }

    #[test]
    fn burst_settles_once_after_quiet_period() {
        let mut d = ResizeDebouncer::new(QUIET);
        let t0 = Instant::now();
        for ms in [0, 50, 100, 250] {
            d.notify(t0 + Duration::from_millis(ms));
        }

        // 300ms after the first event but only 100ms after the last.
        assert_eq!(d.poll(t0 + Duration::from_millis(350)), ResizePhase::Suspended);
        assert_eq!(d.poll(t0 + Duration::from_millis(550)), ResizePhase::Settled);
        assert_eq!(d.poll(t0 + Duration::from_millis(560)), ResizePhase::Idle);
        assert!(!d.is_suspended());
    }
}
