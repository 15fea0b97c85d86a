//! Render adapter boundary
//!
//! The core never draws. A host implements [`RenderAdapter`] and receives
//! the frame snapshot after each `advance`; what it does with it (WebGPU,
//! canvas 2D, nothing at all) is its own business.

use glam::Vec2;

use crate::sim::FrameSnapshot;

/// Consumes read-only frame snapshots for display.
pub trait RenderAdapter {
    fn draw_frame(&mut self, frame: &FrameSnapshot<'_>);
}

/// Adapter that draws nothing. Used by headless runs and tests.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl RenderAdapter for NullRenderer {
    fn draw_frame(&mut self, _frame: &FrameSnapshot<'_>) {}
}

/// Axis-aligned rounded rectangle, for HUD panels and health bars.
#[derive(Debug, Clone, Copy)]
pub struct RoundedRect {
    pub min: Vec2,
    pub max: Vec2,
    /// Corner radius; clamped to half the shorter side
    pub corner: f32,
}

impl RoundedRect {
    pub fn new(min: Vec2, max: Vec2, corner: f32) -> Self {
        let half_short = ((max.x - min.x).min(max.y - min.y) / 2.0).max(0.0);
        Self { min, max, corner: corner.clamp(0.0, half_short) }
    }

    /// Centers of the four corner arcs, for adapters that rasterize the
    /// shape as a cross plus quarter circles.
    pub fn corner_centers(&self) -> [Vec2; 4] {
        let c = self.corner;
        [
            Vec2::new(self.min.x + c, self.min.y + c),
            Vec2::new(self.max.x - c, self.min.y + c),
            Vec2::new(self.max.x - c, self.max.y - c),
            Vec2::new(self.min.x + c, self.max.y - c),
        ]
    }

    /// Point containment, rounding included
    pub fn contains(&self, p: Vec2) -> bool {
        if p.x < self.min.x || p.x > self.max.x || p.y < self.min.y || p.y > self.max.y {
            return false;
        }
        let c = self.corner;
        let inner_x = p.x.clamp(self.min.x + c, self.max.x - c);
        let inner_y = p.y.clamp(self.min.y + c, self.max.y - c);
        crate::dist(p, Vec2::new(inner_x, inner_y)) <= c
    }
}
