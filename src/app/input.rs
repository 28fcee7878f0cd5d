use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixel-based scroll (trackpads) converted to line units.
const PIXELS_PER_LINE: f32 = 10.0;

/// Pointer state coalesced over one frame.
///
/// winit delivers pointer events one at a time; the event loop folds them
/// in here and the camera controls read the sums once per frame.
/// [`end_frame`](Self::end_frame) resets the deltas after they have been
/// consumed; held buttons carry over.
#[derive(Default, Debug, Clone)]
pub struct Input {
    /// Cursor position in window coordinates.
    pub cursor_position: Vec2,
    /// Summed cursor movement for the current frame.
    pub cursor_delta: Vec2,
    /// Summed scroll for the current frame, in lines.
    pub scroll_delta: Vec2,
    /// Window size in physical pixels.
    pub screen_size: Vec2,
    /// Buttons currently held down.
    pub mouse_buttons: HashSet<MouseButton>,
    /// The first cursor event establishes a position without a delta.
    has_cursor: bool,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the per-frame deltas. Held buttons stay held.
    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn handle_cursor_move(&mut self, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        if self.has_cursor {
            self.cursor_delta += position - self.cursor_position;
        }
        self.cursor_position = position;
        self.has_cursor = true;
    }

    pub fn handle_mouse_input(&mut self, state: ElementState, button: MouseButton) {
        match state {
            ElementState::Pressed => self.mouse_buttons.insert(button),
            ElementState::Released => self.mouse_buttons.remove(&button),
        };
    }

    pub fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        self.scroll_delta += match delta {
            MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y),
            MouseScrollDelta::PixelDelta(pos) => {
                Vec2::new(pos.x as f32, pos.y as f32) / PIXELS_PER_LINE
            }
        };
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }
}
