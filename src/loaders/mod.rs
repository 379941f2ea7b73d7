pub mod texture;

pub use texture::{flip_rows, load_texture, TextureImage};
