//! Axis-aligned bounding rectangles in field space
//!
//! The play field is a simple 2D rectangle: x grows right, y grows up, drops
//! enter at y = FIELD_HEIGHT and leave below y = 0. Every entity keeps a
//! `Bounds` derived from its position and size; overlap tests between these
//! rectangles are the only collision primitive the core needs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (origin at bottom-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Bottom-left corner
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// A zero-or-negative extent rectangle overlaps nothing and is rejected
    /// by operations that require a real query area
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict rectangle overlap (shared edges don't count)
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}
