// Pannable viewport over the sprite sheet

use crate::core::math::clamp;
use glam::Vec2;

/// A window of `size` pixels looking at `content` from `pan`
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Top-left corner of the visible area in sheet pixels
    pan: Vec2,
    size: Vec2,
    content: Vec2,
    drag: Option<Drag>,
}

/// Pointer and pan at the moment a drag started
#[derive(Debug, Clone, Copy)]
struct Drag {
    pointer: Vec2,
    pan: Vec2,
}

impl Viewport {
    pub fn new(size: Vec2) -> Self {
        Self {
            pan: Vec2::ZERO,
            size,
            content: Vec2::ZERO,
            drag: None,
        }
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Set the viewed content size and scroll back to the origin
    pub fn set_content(&mut self, content: Vec2) {
        self.content = content;
        self.pan = Vec2::ZERO;
        self.drag = None;
    }

    /// Largest pan on each axis; zero when the content fits
    pub fn max_pan(&self) -> Vec2 {
        (self.content - self.size).max(Vec2::ZERO)
    }

    /// Set the pan, clamped to the content
    pub fn set_pan(&mut self, pan: Vec2) {
        let max = self.max_pan();
        self.pan = Vec2::new(clamp(pan.x, 0.0, max.x), clamp(pan.y, 0.0, max.y));
    }

    /// Start a drag at `pointer` (viewport pixels)
    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.drag = Some(Drag {
            pointer,
            pan: self.pan,
        });
    }

    /// Follow the pointer; the content moves with it
    pub fn drag_to(&mut self, pointer: Vec2) {
        if let Some(drag) = self.drag {
            self.set_pan(drag.pan - (pointer - drag.pointer));
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Convert sheet coordinates to viewport coordinates
    pub fn sheet_to_view(&self, point: Vec2) -> Vec2 {
        point - self.pan
    }

    /// Check if a sheet rectangle is at least partly visible
    pub fn intersects_rect(&self, origin: Vec2, extent: Vec2) -> bool {
        let min = self.sheet_to_view(origin);
        let max = min + extent;

        max.x > 0.0 && min.x < self.size.x && max.y > 0.0 && min.y < self.size.y
    }
}
