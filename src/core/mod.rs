pub mod animation;
pub mod control_polygon;
pub mod editor;
pub mod gpu_context;
pub mod input_adapter;
pub mod scene;
pub mod viewport;

pub use animation::{build_transforms, bezier_parameter, AnimationParams, SceneTransforms};
pub use control_polygon::{
    ControlPointError, ControlPolygon, CONTROL_POINT_COUNT, DEFAULT_CONTROL_POINTS,
};
pub use editor::{ControlPointEditor, PointerEvent};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitPointer;
pub use scene::{
    ControlOverlay, DrawCommand, SceneRenderer, SceneState, TextureHandle, TextureSet,
    TextureSlot,
};
pub use viewport::Viewport;
