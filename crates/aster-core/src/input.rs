use std::collections::HashSet;

use glam::Vec2;

/// Keys the engine cares about. The window backend maps its own key codes
/// onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Z,
    X,
    N,
    M,
    Shift,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

/// Device state polled once per outer loop iteration and used for the whole
/// batch of fixed-step updates that follow.
#[derive(Debug, Default)]
pub struct InputState {
    cursor_delta: Vec2,
    left_button: bool,
    right_button: bool,
    keys: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the per-frame cursor displacement. Button and key state is
    /// level-triggered and carries over.
    pub fn begin_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
    }

    pub fn add_cursor_delta(&mut self, dx: f32, dy: f32) {
        self.cursor_delta += Vec2::new(dx, dy);
    }

    /// Cursor displacement accumulated since `begin_frame`.
    pub fn cursor_delta(&self) -> Vec2 {
        self.cursor_delta
    }

    pub fn set_left_button(&mut self, pressed: bool) {
        self.left_button = pressed;
    }

    pub fn set_right_button(&mut self, pressed: bool) {
        self.right_button = pressed;
    }

    pub fn left_button(&self) -> bool {
        self.left_button
    }

    pub fn right_button(&self) -> bool {
        self.right_button
    }

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }
}
