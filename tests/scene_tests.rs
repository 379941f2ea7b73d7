use bat_flight::core::{
    build_transforms, AnimationParams, ControlOverlay, ControlPolygon, DrawCommand,
    SceneRenderer, SceneState, TextureHandle, TextureSlot,
};
use glam::Vec2;

/// Renderer double that records the call sequence
#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<Call>,
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Quad(DrawCommand),
    Overlay(ControlOverlay),
}

impl SceneRenderer for RecordingRenderer {
    fn draw_quad(&mut self, command: &DrawCommand) {
        self.calls.push(Call::Quad(*command));
    }

    fn draw_overlay(&mut self, overlay: &ControlOverlay) {
        self.calls.push(Call::Overlay(*overlay));
    }
}

impl RecordingRenderer {
    fn quad_slots(&self) -> Vec<TextureSlot> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Quad(command) => Some(command.slot),
                Call::Overlay(_) => None,
            })
            .collect()
    }
}

fn loaded_scene() -> SceneState {
    let mut scene = SceneState::default();
    for (i, slot) in TextureSlot::DRAW_ORDER.into_iter().enumerate() {
        scene.textures.set(slot, TextureHandle(i as u32));
    }
    scene
}

#[cfg(test)]
mod scene_tests {
    use super::*;

    #[test]
    fn test_quads_follow_draw_order_then_overlay() {
        let scene = loaded_scene();
        let mut renderer = RecordingRenderer::default();

        scene.draw(3.0, &mut renderer);

        assert_eq!(renderer.calls.len(), 5);
        assert_eq!(
            renderer.quad_slots(),
            vec![
                TextureSlot::Background,
                TextureSlot::LeftWing,
                TextureSlot::RightWing,
                TextureSlot::Body,
            ]
        );
        assert!(matches!(renderer.calls.last(), Some(Call::Overlay(_))));
    }

    #[test]
    fn test_quads_carry_frame_transforms() {
        let scene = loaded_scene();
        let mut renderer = RecordingRenderer::default();

        let frame = scene.draw(2.0, &mut renderer);
        let expected = build_transforms(2.0, &scene.control_polygon, &scene.params);
        assert_eq!(frame, expected);

        for call in &renderer.calls {
            if let Call::Quad(command) = call {
                let transform = match command.slot {
                    TextureSlot::Background => frame.background,
                    TextureSlot::LeftWing => frame.left_wing,
                    TextureSlot::RightWing => frame.right_wing,
                    TextureSlot::Body => frame.body,
                };
                assert_eq!(command.transform, transform);
            }
        }
    }

    #[test]
    fn test_missing_texture_defers_quad() {
        let mut scene = loaded_scene();
        scene.textures.clear(TextureSlot::Body);
        let mut renderer = RecordingRenderer::default();

        scene.draw(1.0, &mut renderer);

        assert_eq!(
            renderer.quad_slots(),
            vec![
                TextureSlot::Background,
                TextureSlot::LeftWing,
                TextureSlot::RightWing,
            ]
        );
        assert!(matches!(renderer.calls.last(), Some(Call::Overlay(_))));
    }

    #[test]
    fn test_no_textures_still_draws_overlay() {
        let scene = SceneState::default();
        let mut renderer = RecordingRenderer::default();

        scene.draw(0.0, &mut renderer);

        assert_eq!(renderer.calls.len(), 1);
        assert!(matches!(renderer.calls[0], Call::Overlay(_)));
    }

    #[test]
    fn test_wings_may_share_a_texture() {
        let mut scene = loaded_scene();
        scene.textures.set(TextureSlot::RightWing, TextureHandle(1));
        let mut renderer = RecordingRenderer::default();

        scene.draw(0.5, &mut renderer);

        let handles: Vec<TextureHandle> = renderer
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Quad(command) => Some(command.texture),
                Call::Overlay(_) => None,
            })
            .collect();
        assert_eq!(handles[1], handles[2]);
    }

    #[test]
    fn test_overlay_reports_selection_and_version() {
        let mut scene = SceneState::new(ControlPolygon::default(), AnimationParams::default());
        let initial = scene.overlay();
        assert_eq!(initial.selection, -1);

        scene.control_polygon.begin_drag(1).unwrap();
        scene
            .control_polygon
            .update_drag(1, Vec2::new(0.0, -0.5))
            .unwrap();

        let mut renderer = RecordingRenderer::default();
        scene.draw(0.0, &mut renderer);

        let Some(Call::Overlay(overlay)) = renderer.calls.last() else {
            panic!("overlay not drawn last");
        };
        assert_eq!(overlay.selection, 1);
        assert_eq!(overlay.points[1], Vec2::new(0.0, -0.5));
        assert_ne!(overlay.version, initial.version);
    }

    #[test]
    fn test_edited_polygon_moves_the_bat() {
        let mut scene = loaded_scene();
        let before = build_transforms(0.0, &scene.control_polygon, &scene.params);

        scene
            .control_polygon
            .update_drag(0, Vec2::new(0.5, 0.5))
            .unwrap();
        let after = build_transforms(0.0, &scene.control_polygon, &scene.params);

        assert_eq!(before.bat_position, Vec2::new(-0.7, -0.2));
        assert_eq!(after.bat_position, Vec2::new(0.5, 0.5));
    }
}
