/// Countdown driven by an external one-second signal.
///
/// Nothing here reads wall time: the owner calls [`SessionClock::tick`] once
/// per second, which keeps sessions testable without sleeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    duration_seconds: u64,
    remaining_seconds: u64,
    running: bool,
}

impl SessionClock {
    pub fn new(duration_seconds: u64) -> Self {
        Self {
            duration_seconds,
            remaining_seconds: duration_seconds,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if self.remaining_seconds > 0 {
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Count one second down. Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.running = false;
            return true;
        }
        false
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.duration_seconds - self.remaining_seconds
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_clock_ignores_ticks() {
        let mut clock = SessionClock::new(3);
        assert!(!clock.tick());
        assert_eq!(clock.remaining_seconds(), 3);
        assert_eq!(clock.elapsed_seconds(), 0);
    }

    #[test]
    fn counts_down_to_zero_once() {
        let mut clock = SessionClock::new(2);
        clock.start();

        assert!(!clock.tick());
        assert_eq!(clock.elapsed_seconds(), 1);
        assert!(clock.tick());
        assert!(clock.is_expired());
        assert!(!clock.is_running());

        assert!(!clock.tick());
        assert_eq!(clock.remaining_seconds(), 0);
        assert_eq!(clock.elapsed_seconds(), 2);
    }

    #[test]
    fn zero_length_clock_never_runs() {
        let mut clock = SessionClock::new(0);
        clock.start();
        assert!(!clock.is_running());
        assert!(clock.is_expired());
    }

    #[test]
    fn stop_freezes_remaining_time() {
        let mut clock = SessionClock::new(10);
        clock.start();
        clock.tick();
        clock.stop();
        clock.tick();
        assert_eq!(clock.remaining_seconds(), 9);
        assert_eq!(clock.duration_seconds(), 10);
    }
}
