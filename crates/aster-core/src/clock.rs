use std::time::Instant;

/// Monotonic time source. Seconds from an arbitrary epoch.
pub trait Clock {
    fn now(&self) -> f64;
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Tracks the time of the last loop iteration and hands out the elapsed
/// time since it was last sampled.
pub struct Timer<C = SystemClock> {
    clock: C,
    last_loop_time: f64,
}

impl<C: Clock> Timer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_loop_time: 0.0,
        }
    }

    pub fn init(&mut self) {
        self.last_loop_time = self.clock.now();
    }

    /// Seconds since the previous call (or `init`), advancing the sample point.
    pub fn elapsed(&mut self) -> f32 {
        let time = self.clock.now();
        let elapsed = (time - self.last_loop_time) as f32;
        self.last_loop_time = time;
        elapsed
    }

    pub fn last_loop_time(&self) -> f64 {
        self.last_loop_time
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct ScriptedClock {
        times: RefCell<VecDeque<f64>>,
    }

    impl ScriptedClock {
        fn new(times: &[f64]) -> Self {
            Self {
                times: RefCell::new(times.iter().copied().collect()),
            }
        }
    }

    impl Clock for ScriptedClock {
        fn now(&self) -> f64 {
            self.times
                .borrow_mut()
                .pop_front()
                .expect("scripted clock ran out of samples")
        }
    }

    #[test]
    fn elapsed_advances_sample_point() {
        let mut timer = Timer::new(ScriptedClock::new(&[1.0, 1.5, 1.75]));
        timer.init();
        assert!((timer.elapsed() - 0.5).abs() < 1e-6);
        assert!((timer.elapsed() - 0.25).abs() < 1e-6);
        assert!((timer.last_loop_time() - 1.75).abs() < 1e-9);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
