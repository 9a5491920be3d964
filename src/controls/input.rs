use std::collections::HashSet;

use glam::Vec2;

/// Pointer buttons, from DOM-style button codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
}

impl MouseButton {
    /// 0 = primary, 1 = middle, 2 = secondary.
    #[must_use]
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct Input {
    /// Pointer position in surface pixels.
    pub cursor_position: Option<Vec2>,
    /// Pointer motion since the last frame.
    pub cursor_delta: Vec2,
    /// Wheel motion since the last frame, positive towards the scene.
    pub scroll_delta: Vec2,
    /// Render surface size in pixels.
    pub screen_size: Vec2,
    pub mouse_buttons: HashSet<MouseButton>,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the per-frame deltas.
    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn handle_cursor_move(&mut self, x: f32, y: f32) {
        let new_pos = Vec2::new(x, y);
        // First sample produces no delta.
        if let Some(previous) = self.cursor_position {
            self.cursor_delta += new_pos - previous;
        }
        self.cursor_position = Some(new_pos);
    }

    pub fn handle_button(&mut self, code: i16, pressed: bool) {
        let Some(button) = MouseButton::from_code(code) else {
            return;
        };
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    pub fn handle_mouse_wheel(&mut self, delta_y: f32) {
        self.scroll_delta.y += delta_y;
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Forgets all pressed buttons, for when a drag takes the pointer over.
    pub fn release_all(&mut self) {
        self.mouse_buttons.clear();
    }
}
