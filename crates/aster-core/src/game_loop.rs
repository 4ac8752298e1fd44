use std::thread;
use std::time::Duration;

use log::{debug, error, info};

use crate::clock::{Clock, SystemClock, Timer};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::timestep::FixedTimestep;
use crate::window::EngineWindow;

/// Game-side hooks driven by the loop. Input is sampled once per outer
/// iteration; `update` runs zero or more times per iteration in fixed-size
/// steps; `render` runs exactly once.
pub trait GameLogic<W: EngineWindow> {
    fn init(&mut self, window: &mut W) -> Result<(), EngineError>;
    fn input(&mut self, window: &W);
    fn update(&mut self, interval: f32, window: &W);
    fn render(&mut self, window: &mut W) -> Result<(), EngineError>;
    fn cleanup(&mut self);
}

/// Fixed-timestep loop: drains whole simulation steps from an accumulator,
/// renders every iteration, and optionally sleeps to cap the frame rate when
/// the surface does not throttle via vsync.
pub struct GameLoop<W, L, C = SystemClock> {
    window: W,
    logic: L,
    timer: Timer<C>,
    step: FixedTimestep,
    target_fps: u32,
}

impl<W, L> GameLoop<W, L, SystemClock>
where
    W: EngineWindow,
    L: GameLogic<W>,
{
    pub fn new(window: W, logic: L, config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::with_clock(window, logic, config, SystemClock::new()))
    }
}

impl<W, L, C> GameLoop<W, L, C>
where
    W: EngineWindow,
    L: GameLogic<W>,
    C: Clock,
{
    pub fn with_clock(window: W, logic: L, config: &EngineConfig, clock: C) -> Self {
        Self {
            window,
            logic,
            timer: Timer::new(clock),
            step: FixedTimestep::new(config.target_ups),
            target_fps: config.target_fps,
        }
    }

    /// Begins the loop on a dedicated thread, unless the window reports that
    /// its platform ties the rendering context to the owning thread, in
    /// which case the loop runs synchronously on the caller. Window
    /// implementations that are `!Send` get the synchronous path enforced at
    /// compile time via `run`.
    pub fn start(self) -> Result<(), EngineError>
    where
        W: Send + 'static,
        L: Send + 'static,
        C: Send + 'static,
    {
        if W::MAIN_THREAD_ONLY {
            info!("window is main-thread bound, running loop synchronously");
            return self.run();
        }
        let handle = thread::Builder::new()
            .name("game_loop".into())
            .spawn(move || self.run())?;
        handle
            .join()
            .unwrap_or_else(|_| Err(EngineError::frame("game loop thread panicked")))
    }

    /// Runs the loop on the calling thread until the window requests close
    /// or a frame fails. Cleanup runs exactly once on every exit path.
    pub fn run(mut self) -> Result<(), EngineError> {
        let result = self.drive();
        if let Err(err) = &result {
            error!("game loop aborted: {err}");
        }
        self.logic.cleanup();
        result
    }

    fn drive(&mut self) -> Result<(), EngineError> {
        self.logic.init(&mut self.window)?;
        self.timer.init();
        debug!(
            "entering loop: interval {:.4}s, fps cap {}",
            self.step.interval(),
            self.target_fps
        );

        while !self.window.close_requested() {
            let elapsed = self.timer.elapsed();
            let steps = self.step.accumulate(elapsed);

            self.window.poll_events();
            self.logic.input(&self.window);

            for _ in 0..steps {
                self.logic.update(self.step.interval(), &self.window);
            }

            self.logic.render(&mut self.window)?;

            if !self.window.vsync_enabled() {
                self.sync();
            }
        }
        Ok(())
    }

    /// Frame cap: sleep in small increments until the slot for this frame
    /// has passed. Only used when the surface does not vsync-throttle.
    fn sync(&self) {
        let loop_slot = 1.0 / self.target_fps as f64;
        let end_time = self.timer.last_loop_time() + loop_slot;
        while self.timer.now() < end_time {
            thread::sleep(Duration::from_millis(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    struct FakeClock {
        times: Mutex<Vec<f64>>,
    }

    impl FakeClock {
        fn from_elapsed(step: f64, count: usize) -> Self {
            // init() consumes the first sample.
            let mut times = vec![0.0];
            for i in 1..=count {
                times.push(step * i as f64);
            }
            times.reverse();
            Self {
                times: Mutex::new(times),
            }
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> f64 {
            let mut times = self.times.lock().unwrap();
            times.pop().unwrap_or(f64::MAX)
        }
    }

    struct FakeWindow {
        iterations_left: u32,
        input: InputState,
        vsync: bool,
    }

    impl FakeWindow {
        fn closing_after(iterations: u32) -> Self {
            Self {
                iterations_left: iterations,
                input: InputState::new(),
                vsync: true,
            }
        }
    }

    impl EngineWindow for FakeWindow {
        const MAIN_THREAD_ONLY: bool = false;

        fn width(&self) -> u32 {
            640
        }
        fn height(&self) -> u32 {
            480
        }
        fn is_resized(&self) -> bool {
            false
        }
        fn set_resized(&mut self, _resized: bool) {}
        fn vsync_enabled(&self) -> bool {
            self.vsync
        }
        fn close_requested(&self) -> bool {
            self.iterations_left == 0
        }
        fn poll_events(&mut self) {
            self.iterations_left = self.iterations_left.saturating_sub(1);
        }
        fn input(&self) -> &InputState {
            &self.input
        }
    }

    #[derive(Default)]
    struct Counters {
        inits: AtomicU32,
        updates: AtomicU32,
        renders: AtomicU32,
        cleanups: AtomicU32,
    }

    struct CountingLogic {
        counters: Arc<Counters>,
        fail_render_on: Option<u32>,
    }

    impl GameLogic<FakeWindow> for CountingLogic {
        fn init(&mut self, _window: &mut FakeWindow) -> Result<(), EngineError> {
            self.counters.inits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn input(&mut self, _window: &FakeWindow) {}

        fn update(&mut self, interval: f32, _window: &FakeWindow) {
            assert!((interval - 1.0 / 30.0).abs() < 1e-6);
            self.counters.updates.fetch_add(1, Ordering::SeqCst);
        }

        fn render(&mut self, _window: &mut FakeWindow) -> Result<(), EngineError> {
            let frame = self.counters.renders.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_render_on == Some(frame) {
                return Err(EngineError::frame("boom"));
            }
            Ok(())
        }

        fn cleanup(&mut self) {
            self.counters.cleanups.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn config() -> EngineConfig {
        EngineConfig {
            target_ups: 30,
            target_fps: 75,
            vsync: false,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn ten_exact_intervals_give_ten_updates() {
        let counters = Arc::new(Counters::default());
        let logic = CountingLogic {
            counters: Arc::clone(&counters),
            fail_render_on: None,
        };
        let mut window = FakeWindow::closing_after(10);
        // vsync "on" so sync() does not consume clock samples.
        window.vsync = true;
        let game_loop = GameLoop::with_clock(
            window,
            logic,
            &config(),
            FakeClock::from_elapsed(1.0 / 30.0, 10),
        );
        game_loop.run().unwrap();

        assert_eq!(counters.inits.load(Ordering::SeqCst), 1);
        assert_eq!(counters.updates.load(Ordering::SeqCst), 10);
        assert_eq!(counters.renders.load(Ordering::SeqCst), 10);
        assert_eq!(counters.cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn render_error_aborts_loop_and_still_cleans_up() {
        let counters = Arc::new(Counters::default());
        let logic = CountingLogic {
            counters: Arc::clone(&counters),
            fail_render_on: Some(3),
        };
        let mut window = FakeWindow::closing_after(100);
        window.vsync = true;
        let game_loop = GameLoop::with_clock(
            window,
            logic,
            &config(),
            FakeClock::from_elapsed(1.0 / 30.0, 100),
        );
        assert!(game_loop.run().is_err());

        assert_eq!(counters.renders.load(Ordering::SeqCst), 3);
        assert_eq!(counters.cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn start_runs_on_dedicated_thread_for_sendable_windows() {
        let counters = Arc::new(Counters::default());
        let logic = CountingLogic {
            counters: Arc::clone(&counters),
            fail_render_on: None,
        };
        let mut window = FakeWindow::closing_after(2);
        window.vsync = true;
        let game_loop = GameLoop::with_clock(
            window,
            logic,
            &config(),
            FakeClock::from_elapsed(0.001, 2),
        );
        game_loop.start().unwrap();
        assert_eq!(counters.renders.load(Ordering::SeqCst), 2);
        assert_eq!(counters.cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let counters = Arc::new(Counters::default());
        let logic = CountingLogic {
            counters,
            fail_render_on: None,
        };
        let bad = EngineConfig {
            target_ups: 0,
            ..EngineConfig::default()
        };
        assert!(GameLoop::new(FakeWindow::closing_after(1), logic, &bad).is_err());
    }
}
