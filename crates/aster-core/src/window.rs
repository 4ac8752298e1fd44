use crate::input::InputState;

/// Presentation surface as seen by the loop and renderer.
///
/// The engine never touches the windowing system directly; the binary
/// provides an implementation over its window/GPU backend.
pub trait EngineWindow {
    /// True when the backing window system requires the thread that owns the
    /// window to also own the rendering context. `GameLoop::start` runs the
    /// loop synchronously on the caller for such windows.
    const MAIN_THREAD_ONLY: bool;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Edge-triggered resize flag; set by the backend when the surface size
    /// changes and cleared by the renderer once it has responded.
    fn is_resized(&self) -> bool;
    fn set_resized(&mut self, resized: bool);

    fn vsync_enabled(&self) -> bool;

    /// Polled once per outer loop iteration; the only way to unwind the loop.
    fn close_requested(&self) -> bool;

    /// Pumps window/device events and refreshes `input()`.
    fn poll_events(&mut self);

    fn input(&self) -> &InputState;
}
