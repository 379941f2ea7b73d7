mod bezier;
mod transform;

pub use bezier::{cubic_bezier, sawtooth};
pub use transform::Transform;
