use glam::Vec2;

use super::animation::{build_transforms, AnimationParams, SceneTransforms};
use super::control_polygon::{ControlPolygon, CONTROL_POINT_COUNT};
use crate::math::Transform;

/// Unit quad corner positions, shared by every sprite
pub const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [-1.0, -1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
];

/// Texture coordinates matching `QUAD_POSITIONS`, origin at the bottom-left
pub const QUAD_TEXCOORDS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];

pub const QUAD_INDICES: [u16; 6] = [0, 2, 1, 1, 2, 3];

/// Sprite layers, listed in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Background,
    LeftWing,
    RightWing,
    Body,
}

impl TextureSlot {
    pub const DRAW_ORDER: [TextureSlot; 4] = [
        TextureSlot::Background,
        TextureSlot::LeftWing,
        TextureSlot::RightWing,
        TextureSlot::Body,
    ];

    fn index(self) -> usize {
        match self {
            TextureSlot::Background => 0,
            TextureSlot::LeftWing => 1,
            TextureSlot::RightWing => 2,
            TextureSlot::Body => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextureSlot::Background => "background",
            TextureSlot::LeftWing => "left wing",
            TextureSlot::RightWing => "right wing",
            TextureSlot::Body => "body",
        }
    }

    fn transform(self, frame: &SceneTransforms) -> Transform {
        match self {
            TextureSlot::Background => frame.background,
            TextureSlot::LeftWing => frame.left_wing,
            TextureSlot::RightWing => frame.right_wing,
            TextureSlot::Body => frame.body,
        }
    }
}

/// Opaque handle to a texture owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Texture bound to each sprite slot; empty until the texture is ready
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureSet {
    handles: [Option<TextureHandle>; 4],
}

impl TextureSet {
    pub fn set(&mut self, slot: TextureSlot, handle: TextureHandle) {
        self.handles[slot.index()] = Some(handle);
    }

    pub fn get(&self, slot: TextureSlot) -> Option<TextureHandle> {
        self.handles[slot.index()]
    }

    pub fn clear(&mut self, slot: TextureSlot) {
        self.handles[slot.index()] = None;
    }
}

/// One textured quad submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub slot: TextureSlot,
    pub transform: Transform,
    pub texture: TextureHandle,
}

/// Control polygon geometry for the line strip and point overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOverlay {
    pub points: [Vec2; CONTROL_POINT_COUNT],
    /// Selected point, -1 when none
    pub selection: i32,
    /// Changes whenever `points` changes
    pub version: u64,
}

/// Receiver of the per-frame draw sequence
pub trait SceneRenderer {
    /// Queue a textured quad
    fn draw_quad(&mut self, command: &DrawCommand);

    /// Queue the control polygon overlay, drawn after every quad
    fn draw_overlay(&mut self, overlay: &ControlOverlay);
}

/// Mutable scene data owned by the application
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    pub control_polygon: ControlPolygon,
    pub params: AnimationParams,
    pub textures: TextureSet,
}

impl SceneState {
    pub fn new(control_polygon: ControlPolygon, params: AnimationParams) -> Self {
        Self {
            control_polygon,
            params,
            textures: TextureSet::default(),
        }
    }

    /// Quads for `frame`, in draw order
    ///
    /// Slots without a ready texture are skipped for this frame.
    pub fn frame_commands(&self, frame: &SceneTransforms) -> Vec<DrawCommand> {
        TextureSlot::DRAW_ORDER
            .iter()
            .filter_map(|&slot| match self.textures.get(slot) {
                Some(texture) => Some(DrawCommand {
                    slot,
                    transform: slot.transform(frame),
                    texture,
                }),
                None => {
                    log::trace!("deferring {} quad, texture not ready", slot.label());
                    None
                }
            })
            .collect()
    }

    pub fn overlay(&self) -> ControlOverlay {
        ControlOverlay {
            points: *self.control_polygon.points(),
            selection: self.control_polygon.selection_index(),
            version: self.control_polygon.version(),
        }
    }

    /// Submit the whole frame to `renderer` and return the transforms used
    pub fn draw(&self, time: f64, renderer: &mut dyn SceneRenderer) -> SceneTransforms {
        let frame = build_transforms(time, &self.control_polygon, &self.params);

        for command in self.frame_commands(&frame) {
            renderer.draw_quad(&command);
        }
        renderer.draw_overlay(&self.overlay());

        frame
    }
}
