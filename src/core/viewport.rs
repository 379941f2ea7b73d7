use glam::Vec2;

/// Viewport - window size in physical pixels and pixel/clip-space mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create new viewport
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel position (origin top-left, y down) to clip space (origin centre, y up)
    pub fn to_clip(&self, x: f32, y: f32) -> Vec2 {
        let size = self.size();
        Vec2::new(2.0 * x / size.x - 1.0, 1.0 - 2.0 * y / size.y)
    }

    /// Pick radius in clip units for a marker `point_size` pixels wide
    pub fn pick_radius(&self, point_size: f32) -> f32 {
        point_size / self.width.min(self.height).max(1) as f32
    }

    /// Half extent in clip units of a square `point_size` pixels wide
    pub fn point_half_extent(&self, point_size: f32) -> Vec2 {
        Vec2::splat(point_size) / self.size()
    }

    fn size(&self) -> Vec2 {
        Vec2::new(self.width.max(1) as f32, self.height.max(1) as f32)
    }
}
