use glam::Vec2;
use thiserror::Error;

use crate::math::cubic_bezier;

/// Number of control points in a cubic Bezier polygon
pub const CONTROL_POINT_COUNT: usize = 4;

/// Start-up control points, in clip space
pub const DEFAULT_CONTROL_POINTS: [Vec2; CONTROL_POINT_COUNT] = [
    Vec2::new(-0.7, -0.2),
    Vec2::new(-0.3, 0.2),
    Vec2::new(0.3, 0.5),
    Vec2::new(0.7, 0.0),
];

/// Errors raised by control point edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControlPointError {
    #[error(
        "control point index {index} out of range (polygon has {} points)",
        CONTROL_POINT_COUNT
    )]
    IndexOutOfRange { index: usize },
}

/// Editable cubic Bezier control polygon
///
/// Owns the four points, the index of the point being dragged, and a version
/// counter that changes once per point mutation. Consumers holding a copy of
/// the points (e.g. a GPU vertex buffer) compare versions to know when to
/// re-upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPolygon {
    points: [Vec2; CONTROL_POINT_COUNT],
    selection: Option<usize>,
    version: u64,
}

impl ControlPolygon {
    pub fn new(points: [Vec2; CONTROL_POINT_COUNT]) -> Self {
        Self {
            points,
            selection: None,
            version: 0,
        }
    }

    pub fn points(&self) -> &[Vec2; CONTROL_POINT_COUNT] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    /// Index of the point currently being dragged
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Selection as a shader-friendly index, -1 when nothing is selected
    pub fn selection_index(&self) -> i32 {
        self.selection.map_or(-1, |i| i as i32)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Point on the curve described by this polygon
    pub fn evaluate(&self, t: f32) -> Vec2 {
        let [p0, p1, p2, p3] = self.points;
        cubic_bezier(p0, p1, p2, p3, t)
    }

    /// First point (in storage order) strictly closer than `pick_radius` to `cursor`
    pub fn hit_test(&self, cursor: Vec2, pick_radius: f32) -> Option<usize> {
        self.points
            .iter()
            .position(|p| p.distance(cursor) < pick_radius)
    }

    pub fn begin_drag(&mut self, index: usize) -> Result<(), ControlPointError> {
        Self::check_index(index)?;
        self.selection = Some(index);
        Ok(())
    }

    /// Move point `index` to `position`; no clamping is applied
    pub fn update_drag(&mut self, index: usize, position: Vec2) -> Result<(), ControlPointError> {
        Self::check_index(index)?;
        self.points[index] = position;
        self.version += 1;
        Ok(())
    }

    pub fn end_drag(&mut self, index: usize) -> Result<(), ControlPointError> {
        Self::check_index(index)?;
        if self.selection == Some(index) {
            self.selection = None;
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn check_index(index: usize) -> Result<(), ControlPointError> {
        if index < CONTROL_POINT_COUNT {
            Ok(())
        } else {
            Err(ControlPointError::IndexOutOfRange { index })
        }
    }
}

impl Default for ControlPolygon {
    fn default() -> Self {
        Self::new(DEFAULT_CONTROL_POINTS)
    }
}
