use glam::Vec2;

use super::control_polygon::ControlPolygon;
use super::viewport::Viewport;

/// Pointer input, already mapped to clip space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(Vec2),
    Pressed,
    Released,
}

/// Drives control point drags from pointer events
#[derive(Debug, Clone)]
pub struct ControlPointEditor {
    cursor: Vec2,
    viewport: Viewport,
    point_size: f32,
}

impl ControlPointEditor {
    pub fn new(viewport: Viewport, point_size: f32) -> Self {
        Self {
            cursor: Vec2::ZERO,
            viewport,
            point_size,
        }
    }

    /// Last known cursor position in clip space
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn pick_radius(&self) -> f32 {
        self.viewport.pick_radius(self.point_size)
    }

    /// Apply `event` to `polygon`; returns true when a point moved
    pub fn handle(&mut self, event: PointerEvent, polygon: &mut ControlPolygon) -> bool {
        match event {
            PointerEvent::Moved(position) => {
                let moved = position != self.cursor;
                self.cursor = position;
                match polygon.selection() {
                    Some(index) if moved => polygon.update_drag(index, position).is_ok(),
                    _ => false,
                }
            }
            PointerEvent::Pressed => {
                polygon.clear_selection();
                if let Some(index) = polygon.hit_test(self.cursor, self.pick_radius()) {
                    if polygon.begin_drag(index).is_ok() {
                        log::debug!("dragging control point {}", index);
                    }
                }
                false
            }
            PointerEvent::Released => {
                let Some(index) = polygon.selection() else {
                    return false;
                };
                let moved = polygon.update_drag(index, self.cursor).is_ok();
                if polygon.end_drag(index).is_ok() {
                    log::debug!(
                        "released control point {} at ({:.3}, {:.3})",
                        index,
                        self.cursor.x,
                        self.cursor.y
                    );
                }
                moved
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::control_polygon::DEFAULT_CONTROL_POINTS;

    fn editor() -> ControlPointEditor {
        ControlPointEditor::new(Viewport::new(720, 720), 10.0)
    }

    #[test]
    fn press_on_point_selects_it() {
        let mut editor = editor();
        let mut polygon = ControlPolygon::default();

        editor.handle(PointerEvent::Moved(DEFAULT_CONTROL_POINTS[1]), &mut polygon);
        editor.handle(PointerEvent::Pressed, &mut polygon);

        assert_eq!(polygon.selection(), Some(1));
        assert_eq!(polygon.version(), 0);
    }

    #[test]
    fn press_on_empty_space_clears_selection() {
        let mut editor = editor();
        let mut polygon = ControlPolygon::default();
        polygon.begin_drag(2).unwrap();

        editor.handle(PointerEvent::Moved(Vec2::ZERO), &mut polygon);
        editor.handle(PointerEvent::Pressed, &mut polygon);

        assert_eq!(polygon.selection(), None);
    }

    #[test]
    fn move_without_selection_changes_nothing() {
        let mut editor = editor();
        let mut polygon = ControlPolygon::default();

        let changed = editor.handle(PointerEvent::Moved(Vec2::new(0.5, 0.5)), &mut polygon);

        assert!(!changed);
        assert_eq!(polygon.points(), &DEFAULT_CONTROL_POINTS);
        assert_eq!(editor.cursor(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn drag_follows_cursor_and_release_finalises() {
        let mut editor = editor();
        let mut polygon = ControlPolygon::default();

        editor.handle(PointerEvent::Moved(DEFAULT_CONTROL_POINTS[0]), &mut polygon);
        editor.handle(PointerEvent::Pressed, &mut polygon);

        let target = Vec2::new(-0.5, 0.1);
        assert!(editor.handle(PointerEvent::Moved(target), &mut polygon));
        assert_eq!(polygon.point(0), Some(target));
        assert_eq!(polygon.version(), 1);

        assert!(editor.handle(PointerEvent::Released, &mut polygon));
        assert_eq!(polygon.point(0), Some(target));
        assert_eq!(polygon.selection(), None);
        assert_eq!(polygon.version(), 2);
    }

    #[test]
    fn repeated_move_to_same_position_is_ignored() {
        let mut editor = editor();
        let mut polygon = ControlPolygon::default();

        editor.handle(PointerEvent::Moved(DEFAULT_CONTROL_POINTS[2]), &mut polygon);
        editor.handle(PointerEvent::Pressed, &mut polygon);
        let changed = editor.handle(PointerEvent::Moved(DEFAULT_CONTROL_POINTS[2]), &mut polygon);

        assert!(!changed);
        assert_eq!(polygon.version(), 0);
    }

    #[test]
    fn release_without_selection_is_noop() {
        let mut editor = editor();
        let mut polygon = ControlPolygon::default();
        assert!(!editor.handle(PointerEvent::Released, &mut polygon));
        assert_eq!(polygon.version(), 0);
    }

    #[test]
    fn pick_radius_tracks_viewport() {
        let mut editor = editor();
        assert_eq!(editor.pick_radius(), 10.0 / 720.0);

        editor.set_viewport(Viewport::new(1000, 500));
        assert_eq!(editor.pick_radius(), 0.02);
    }
}
