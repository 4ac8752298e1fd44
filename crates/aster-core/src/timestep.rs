/// Fixed-timestep accumulator.
///
/// Real elapsed time is folded into the accumulator and drained in
/// constant-size simulation steps, decoupling update cadence from frame rate.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    interval: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(target_ups: u32) -> Self {
        Self {
            interval: 1.0 / target_ups as f32,
            accumulator: 0.0,
        }
    }

    /// Fixed simulation step in seconds.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Residual simulation time not yet consumed by a full step.
    /// Always in `[0, interval)` after `accumulate` returns.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Folds `elapsed` seconds in and returns how many full fixed steps
    /// the caller must run.
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            steps += 1;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_equal_floor_of_accumulated_time() {
        let mut step = FixedTimestep::new(30);
        let interval = step.interval();

        // Cumulative totals stay well clear of step boundaries so float
        // rounding cannot flip the expected count.
        let samples = [0.013f32, 0.052, 0.19, 0.0, 0.041, 0.09, 0.012, 0.47];
        let mut total = 0.0f64;
        let mut updates = 0u64;
        for elapsed in samples {
            total += elapsed as f64;
            updates += step.accumulate(elapsed) as u64;

            // Residual never negative, never a full interval.
            assert!(step.accumulator() >= 0.0);
            assert!(step.accumulator() < interval);

            let expected = (total / interval as f64).floor() as u64;
            assert_eq!(updates, expected);
        }
    }

    #[test]
    fn exact_interval_samples_drain_to_zero() {
        let mut step = FixedTimestep::new(30);
        for _ in 0..10 {
            assert_eq!(step.accumulate(1.0 / 30.0), 1);
            assert!(step.accumulator().abs() < 1e-4);
        }
    }

    #[test]
    fn sub_interval_sample_runs_no_update() {
        let mut step = FixedTimestep::new(30);
        assert_eq!(step.accumulate(0.01), 0);
        assert!((step.accumulator() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn large_sample_drains_multiple_steps() {
        let mut step = FixedTimestep::new(30);
        assert_eq!(step.accumulate(0.11), 3);
        assert!(step.accumulator() < step.interval());
    }
}
